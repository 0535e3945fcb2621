use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same colour with its alpha multiplied by `alpha`.
    pub fn faded(self, alpha: f64) -> Self {
        Self {
            a: self.a * alpha.clamp(0.0, 1.0) as f32,
            ..self
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }

    /// Half-open hit test: the left and top edges are inside, the right and
    /// bottom edges are not.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn mask(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
        }
    }
}

bitflags! {
    /// Buttons held down while the pointer moves
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const LEFT   = 0b001;
        const RIGHT  = 0b010;
        const MIDDLE = 0b100;
    }
}

/// Whether a mouse button went down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Keyboard modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub logo: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        logo: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
}

/// Named keys for special keyboard keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Home key
    Home,
    /// End key
    End,
    /// Character key (includes A-Z for Ctrl+A shortcuts)
    Char(char),
}

/// Input delivered by the host event loop, in surface coordinates.
///
/// Printable text arrives as [`Event::KeyChar`]; navigation keys and
/// shortcuts arrive as [`Event::KeyDown`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer moved
    MouseMove {
        x: f64,
        y: f64,
        buttons: MouseButtons,
    },
    /// Mouse button pressed
    MouseDown { x: f64, y: f64, button: MouseButton },
    /// Mouse button released
    MouseUp { x: f64, y: f64, button: MouseButton },
    /// Translated character input
    KeyChar {
        ch: char,
        /// Auto-repeat count
        repeat: u32,
        /// The key was already down before this message
        previous: bool,
        /// The key is being released
        transition: bool,
    },
    /// Key pressed
    KeyDown {
        key: Key,
        modifiers: Modifiers,
        /// Auto-repeat of a key that is held down
        previous: bool,
    },
    /// Key released
    KeyUp { key: Key, modifiers: Modifiers },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Handled,
}

impl EventResponse {
    pub fn is_handled(self) -> bool {
        self == EventResponse::Handled
    }
}

impl From<bool> for EventResponse {
    fn from(handled: bool) -> Self {
        if handled {
            EventResponse::Handled
        } else {
            EventResponse::Ignored
        }
    }
}

impl Event {
    /// Get the coordinates from this event, if any
    pub fn coords(&self) -> Option<(f64, f64)> {
        match self {
            Event::MouseMove { x, y, .. } => Some((*x, *y)),
            Event::MouseDown { x, y, .. } => Some((*x, *y)),
            Event::MouseUp { x, y, .. } => Some((*x, *y)),
            Event::KeyChar { .. } | Event::KeyDown { .. } | Event::KeyUp { .. } => None,
        }
    }
}
