//! Single-line text entry control.
//!
//! The TextBox handles:
//! - Character input, replacing the selection if there is one
//! - Caret movement by character or word, with shift-extended selection
//! - Password masking and a maximum length
//! - Grouped undo/redo (Ctrl+Z, Ctrl+Y or Ctrl+Shift+Z)
//! - Enter to submit, which releases keyboard focus
//!
//! Printable characters arrive through key-character events, everything else
//! through key-down events.

use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{FocusScope, ObjectState, SceneObject};
use crate::Bindable;

use super::control::{impl_control_object, Control, Interface};
use super::widget::{ButtonState, Color, Key, Modifiers, MouseButton, Rect};
use super::TextStyle;

/// Type alias for text box callbacks
type TextCallback = Rc<dyn Fn(&str)>;

/// Inner padding between the box edge and the text
const TEXT_PADDING: f64 = 4.0;

/// Selection state tracking anchor and cursor positions, in characters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started (anchor point)
    pub anchor: usize,
    /// Current cursor position
    pub cursor: usize,
}

impl Selection {
    /// Create a new selection with cursor at given position (no selection)
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// Check if there is an active selection (anchor != cursor)
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Get the start and end of the selection (min, max)
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    /// Collapse selection to cursor position
    pub fn collapse(&mut self) {
        self.anchor = self.cursor;
    }
}

/// Where a text box draws its caption
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptionPosition {
    #[default]
    Left,
    Above,
}

#[derive(Clone, Debug)]
struct Caption {
    text: String,
    position: CaptionPosition,
    gap: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditKind {
    Insert,
    DeleteBack,
    DeleteForward,
    DeleteSelection,
}

#[derive(Clone, Debug)]
struct Snapshot {
    text: String,
    caret: usize,
    kind: EditKind,
    sealed: bool,
}

/// Undo and redo stacks. Consecutive edits of the same kind at adjacent caret
/// positions share one undo step.
#[derive(Clone, Debug, Default)]
struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    last_caret: Option<usize>,
}

impl History {
    /// Remember the state before an edit of `kind` made with the caret at `caret`.
    fn record(&mut self, kind: EditKind, text: &str, caret: usize) {
        self.redo.clear();

        let continues = match (self.undo.last(), self.last_caret) {
            (Some(last), Some(previous)) if !last.sealed && last.kind == kind => match kind {
                EditKind::Insert => caret == previous + 1,
                EditKind::DeleteBack => caret + 1 == previous,
                EditKind::DeleteForward => caret == previous,
                EditKind::DeleteSelection => false,
            },
            _ => false,
        };

        if !continues {
            self.undo.push(Snapshot {
                text: text.to_owned(),
                caret,
                kind,
                sealed: kind == EditKind::DeleteSelection,
            });
        }
        self.last_caret = Some(caret);
    }

    fn undo(&mut self, text: &str, caret: usize) -> Option<Snapshot> {
        let snapshot = self.undo.pop()?;
        self.redo.push(Snapshot {
            text: text.to_owned(),
            caret,
            kind: snapshot.kind,
            sealed: true,
        });
        self.last_caret = None;
        Some(snapshot)
    }

    fn redo(&mut self, text: &str, caret: usize) -> Option<Snapshot> {
        let snapshot = self.redo.pop()?;
        self.undo.push(Snapshot {
            text: text.to_owned(),
            caret,
            kind: snapshot.kind,
            sealed: true,
        });
        self.last_caret = None;
        Some(snapshot)
    }

    fn clear(&mut self) {
        *self = History::default();
    }
}

#[derive(Clone, Bindable)]
pub struct TextBox {
    state: ObjectState,
    #[bind(flatten)]
    interface: Interface,

    // Content (actual value, never masked)
    text: String,
    max_len: usize,

    // Password mode
    is_password: bool,
    mask_char: char,

    selection: Selection,
    history: History,
    focused: bool,
    return_pressed: bool,

    // Styling
    style: TextStyle,
    caret_color: Color,
    selection_color: Color,
    fill_color: Color,
    outline_color: Color,
    corner_radius: f64,
    caption: Option<Caption>,
    caption_style: TextStyle,

    on_change: Option<TextCallback>,
}

impl TextBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            state: ObjectState::new(),
            interface: Interface::new(x, y, width, height).tab_stop(true),
            text: String::new(),
            max_len: usize::MAX,
            is_password: false,
            mask_char: '•',
            selection: Selection::new(0),
            history: History::default(),
            focused: false,
            return_pressed: false,
            style: TextStyle::default(),
            caret_color: Color::rgb(0.4, 0.8, 1.0),
            selection_color: Color::rgba(0.4, 0.6, 1.0, 0.4),
            fill_color: Color::rgba(0.0, 0.0, 0.0, 0.5),
            outline_color: Color::WHITE,
            corner_radius: 4.0,
            caption: None,
            caption_style: TextStyle::default(),
            on_change: None,
        }
    }

    /// Set the initial text, with the caret at its end
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Limit the text to `max_len` characters
    pub fn max_length(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Enable password mode (masks input)
    pub fn password(mut self, enabled: bool) -> Self {
        self.is_password = enabled;
        self
    }

    /// Set the character used for masking in password mode
    pub fn mask_char(mut self, c: char) -> Self {
        self.mask_char = c;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn colors(mut self, fill: Color, outline: Color, caret: Color, selection: Color) -> Self {
        self.fill_color = fill;
        self.outline_color = outline;
        self.caret_color = caret;
        self.selection_color = selection;
        self
    }

    pub fn caption(
        mut self,
        text: impl Into<String>,
        position: CaptionPosition,
        gap: f64,
        style: TextStyle,
    ) -> Self {
        self.caption = Some(Caption {
            text: text.into(),
            position,
            gap,
        });
        self.caption_style = style;
        self
    }

    /// Called with the new text after every edit
    pub fn on_change<F: Fn(&str) + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, move the caret to its end and forget the undo history.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = Selection::new(self.char_count());
        self.history.clear();
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn caret(&self) -> usize {
        self.selection.cursor
    }

    /// Set after Enter was pressed on a non-empty text; cleared by a click,
    /// by showing or hiding the box, or by [`clear_return_pressed`](Self::clear_return_pressed).
    pub fn return_pressed(&self) -> bool {
        self.return_pressed
    }

    pub fn clear_return_pressed(&mut self) {
        self.return_pressed = false;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn is_password(&self) -> bool {
        self.is_password
    }

    /// Get the display text (masked if password mode)
    fn display_text(&self) -> String {
        if self.is_password {
            self.mask_char.to_string().repeat(self.char_count())
        } else {
            self.text.clone()
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert a character at the caret, replacing any selection
    fn insert_char(&mut self, c: char) {
        self.delete_selection();
        if self.char_count() >= self.max_len {
            return;
        }

        self.history.record(EditKind::Insert, &self.text, self.selection.cursor);
        let at = self.byte_index(self.selection.cursor);
        self.text.insert(at, c);
        self.selection = Selection::new(self.selection.cursor + 1);
        self.notify_change();
    }

    /// Delete the selection as one separate undo step
    fn delete_selection(&mut self) -> bool {
        if !self.selection.has_selection() {
            return false;
        }

        let (start, end) = self.selection.range();
        self.history
            .record(EditKind::DeleteSelection, &self.text, self.selection.cursor);
        self.delete_range(start, end);
        self.selection = Selection::new(start);
        true
    }

    /// Delete selected text or character before/after cursor
    fn delete(&mut self, forward: bool) {
        if self.delete_selection() {
            return;
        }

        let cursor = self.selection.cursor;
        if forward {
            if cursor < self.char_count() {
                self.history.record(EditKind::DeleteForward, &self.text, cursor);
                self.delete_range(cursor, cursor + 1);
            }
        } else if cursor > 0 {
            self.history.record(EditKind::DeleteBack, &self.text, cursor);
            self.delete_range(cursor - 1, cursor);
            self.selection = Selection::new(cursor - 1);
        }
    }

    /// Delete a range of characters
    fn delete_range(&mut self, start: usize, end: usize) {
        let byte_start = self.byte_index(start);
        let byte_end = self.byte_index(end);
        self.text.replace_range(byte_start..byte_end, "");
        self.notify_change();
    }

    /// Move cursor left/right, optionally extending selection
    fn move_cursor(&mut self, direction: i32, extend_selection: bool, word: bool) {
        let new_pos = if word {
            self.find_word_boundary(self.selection.cursor, direction)
        } else if direction < 0 {
            self.selection.cursor.saturating_sub(1)
        } else {
            (self.selection.cursor + 1).min(self.char_count())
        };

        self.selection.cursor = new_pos;
        if !extend_selection {
            self.selection.collapse();
        }
    }

    /// Find word boundary in given direction
    fn find_word_boundary(&self, start: usize, direction: i32) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        let len = chars.len();

        if direction < 0 {
            if start == 0 {
                return 0;
            }
            let mut pos = start - 1;
            // Skip whitespace
            while pos > 0 && chars[pos].is_whitespace() {
                pos -= 1;
            }
            // Skip word characters
            while pos > 0 && !chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            pos
        } else {
            if start >= len {
                return len;
            }
            let mut pos = start;
            // Skip word characters
            while pos < len && !chars[pos].is_whitespace() {
                pos += 1;
            }
            // Skip whitespace
            while pos < len && chars[pos].is_whitespace() {
                pos += 1;
            }
            pos
        }
    }

    /// Move cursor to start/end
    fn move_to_edge(&mut self, to_start: bool, extend_selection: bool) {
        self.selection.cursor = if to_start { 0 } else { self.char_count() };
        if !extend_selection {
            self.selection.collapse();
        }
    }

    fn select_all(&mut self) {
        self.selection.anchor = 0;
        self.selection.cursor = self.char_count();
    }

    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo(&self.text, self.selection.cursor) {
            self.restore(snapshot);
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo(&self.text, self.selection.cursor) {
            self.restore(snapshot);
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.selection = Selection::new(snapshot.caret.min(self.char_count()));
        self.notify_change();
    }

    /// Notify change callback
    fn notify_change(&self) {
        if let Some(ref callback) = self.on_change {
            callback(&self.text);
        }
    }

    /// Handle key down event
    fn handle_key(&mut self, key: Key, modifiers: Modifiers, focus: &mut FocusScope<'_>) -> bool {
        let (ctrl, shift) = (modifiers.ctrl, modifiers.shift);
        match key {
            Key::Backspace => {
                self.delete(false);
                true
            }
            Key::Delete => {
                self.delete(true);
                true
            }
            Key::Enter => {
                if !self.text.is_empty() {
                    focus.release();
                    self.return_pressed = true;
                    log::debug!("Text box {:?} submitted", focus.id());
                }
                true
            }
            Key::Left => {
                if !shift && self.selection.has_selection() {
                    // Collapse to start of selection
                    let (start, _) = self.selection.range();
                    self.selection = Selection::new(start);
                } else {
                    self.move_cursor(-1, shift, ctrl);
                }
                true
            }
            Key::Right => {
                if !shift && self.selection.has_selection() {
                    // Collapse to end of selection
                    let (_, end) = self.selection.range();
                    self.selection = Selection::new(end);
                } else {
                    self.move_cursor(1, shift, ctrl);
                }
                true
            }
            Key::Home => {
                self.move_to_edge(true, shift);
                true
            }
            Key::End => {
                self.move_to_edge(false, shift);
                true
            }
            Key::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'a' => {
                    self.select_all();
                    true
                }
                'z' if shift => {
                    self.redo();
                    true
                }
                'z' => {
                    self.undo();
                    true
                }
                'y' => {
                    self.redo();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn text_origin(&self, surface: &dyn Surface) -> (f64, f64) {
        let bounds = self.interface.bounds();
        let metrics = surface.measure_text("", &self.style);
        (
            bounds.x + TEXT_PADDING,
            bounds.y + (bounds.height - metrics.height) / 2.0,
        )
    }

    fn draw_caption(&self, surface: &mut dyn Surface) {
        let Some(caption) = &self.caption else {
            return;
        };
        let bounds = self.interface.bounds();
        let metrics = surface.measure_text(&caption.text, &self.caption_style);
        let (x, y) = match caption.position {
            CaptionPosition::Left => (
                bounds.x - caption.gap - metrics.width,
                bounds.y + (bounds.height - metrics.height) / 2.0,
            ),
            CaptionPosition::Above => (bounds.x, bounds.y - caption.gap - metrics.height),
        };
        surface.text(x, y, &caption.text, &self.caption_style);
    }
}

impl std::fmt::Debug for TextBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBox")
            .field("interface", &self.interface)
            .field("text", &if self.is_password { self.display_text() } else { self.text.clone() })
            .field("selection", &self.selection)
            .field("return_pressed", &self.return_pressed)
            .finish_non_exhaustive()
    }
}

impl Control for TextBox {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }

    fn mouse_button_hook(
        &mut self,
        _button: MouseButton,
        _state: ButtonState,
        _x: f64,
        _y: f64,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        self.return_pressed = false;
        false
    }

    fn key_char_hook(
        &mut self,
        ch: char,
        _repeat: u32,
        _previous: bool,
        _transition: bool,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        if ch.is_control() || self.interface.just_got_focus() {
            return false;
        }
        self.insert_char(ch);
        true
    }

    fn key_down_hook(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        _previous: bool,
        focus: &mut FocusScope<'_>,
    ) -> bool {
        self.handle_key(key, modifiers, focus)
    }

    fn visibility_hook(&mut self, _visible: bool) {
        self.return_pressed = false;
    }

    fn focus_hook(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl SceneObject for TextBox {
    impl_control_object!();

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let bounds = self.interface.bounds();
        surface.fill_rounded_rect(bounds, self.corner_radius, self.fill_color);
        surface.stroke_rounded_rect(bounds, self.corner_radius, self.outline_color, 1.0);
        self.draw_caption(surface);

        let display = self.display_text();
        let (text_x, text_y) = self.text_origin(surface);
        let line_height = self.style.line_height();
        let offset_of = |surface: &dyn Surface, chars: usize| {
            let prefix: String = display.chars().take(chars).collect();
            surface.measure_text(&prefix, &self.style).width
        };

        // Draw selection highlight if focused and has selection
        if self.focused && self.selection.has_selection() {
            let (start, end) = self.selection.range();
            let start_x = offset_of(&*surface, start);
            let end_x = offset_of(&*surface, end);
            surface.fill_rect(
                Rect::new(text_x + start_x, text_y, end_x - start_x, line_height),
                self.selection_color,
            );
        }

        surface.text(text_x, text_y, &display, &self.style);

        if self.focused {
            let caret_x = offset_of(&*surface, self.selection.cursor);
            surface.fill_rect(
                Rect::new(text_x + caret_x, text_y, 1.5, line_height),
                self.caret_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandList;
    use crate::scene::{Focus, ObjectId};

    fn scope_test(text_box: &mut TextBox, f: impl FnOnce(&mut TextBox, &mut FocusScope<'_>)) -> Focus {
        let id = ObjectId::next();
        let mut focus = Focus::new();
        focus.request(id);
        let mut scope = FocusScope::new(&mut focus, id);
        f(text_box, &mut scope);
        focus
    }

    fn type_str(text_box: &mut TextBox, s: &str) {
        for c in s.chars() {
            scope_test(text_box, |tb, scope| {
                assert!(tb.key_char_hook(c, 1, false, false, scope));
            });
        }
    }

    fn press(text_box: &mut TextBox, key: Key, modifiers: Modifiers) -> bool {
        let mut handled = false;
        scope_test(text_box, |tb, scope| {
            handled = tb.key_down_hook(key, modifiers, false, scope);
        });
        handled
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        type_str(&mut tb, "hello");
        assert_eq!(tb.text(), "hello");
        assert_eq!(tb.caret(), 5);

        press(&mut tb, Key::Backspace, Modifiers::NONE);
        assert_eq!(tb.text(), "hell");

        press(&mut tb, Key::Home, Modifiers::NONE);
        press(&mut tb, Key::Delete, Modifiers::NONE);
        assert_eq!(tb.text(), "ell");
        assert_eq!(tb.caret(), 0);
    }

    #[test]
    fn test_max_length() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0).max_length(3);
        for c in "abcdef".chars() {
            scope_test(&mut tb, |tb, scope| {
                tb.key_char_hook(c, 1, false, false, scope);
            });
        }
        assert_eq!(tb.text(), "abc");
    }

    #[test]
    fn test_selection_replace() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0).with_text("hello world");
        press(&mut tb, Key::Left, Modifiers::CTRL_SHIFT);
        assert_eq!(tb.selection().range(), (6, 11));

        type_str(&mut tb, "there");
        assert_eq!(tb.text(), "hello there");
    }

    #[test]
    fn test_select_all_and_collapse() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0).with_text("abc");
        press(&mut tb, Key::Char('A'), Modifiers::CTRL);
        assert_eq!(tb.selection().range(), (0, 3));

        press(&mut tb, Key::Left, Modifiers::NONE);
        assert_eq!(tb.selection(), Selection::new(0));
    }

    #[test]
    fn test_word_navigation() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0).with_text("one two three");
        press(&mut tb, Key::Home, Modifiers::NONE);
        press(&mut tb, Key::Right, Modifiers::CTRL);
        assert_eq!(tb.caret(), 4);
        press(&mut tb, Key::End, Modifiers::NONE);
        press(&mut tb, Key::Left, Modifiers::CTRL);
        assert_eq!(tb.caret(), 8);
    }

    #[test]
    fn test_undo_groups_typing() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        type_str(&mut tb, "abc");
        press(&mut tb, Key::Backspace, Modifiers::NONE);
        press(&mut tb, Key::Backspace, Modifiers::NONE);
        assert_eq!(tb.text(), "a");

        press(&mut tb, Key::Char('z'), Modifiers::CTRL);
        assert_eq!(tb.text(), "abc");
        assert_eq!(tb.caret(), 3);

        press(&mut tb, Key::Char('z'), Modifiers::CTRL);
        assert_eq!(tb.text(), "");

        press(&mut tb, Key::Char('y'), Modifiers::CTRL);
        assert_eq!(tb.text(), "abc");
        press(&mut tb, Key::Char('z'), Modifiers::CTRL_SHIFT);
        assert_eq!(tb.text(), "a");

        // Nothing left to redo
        press(&mut tb, Key::Char('y'), Modifiers::CTRL);
        assert_eq!(tb.text(), "a");
    }

    #[test]
    fn test_undo_after_moving_caret_starts_new_group() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        type_str(&mut tb, "ab");
        press(&mut tb, Key::Home, Modifiers::NONE);
        type_str(&mut tb, "x");
        assert_eq!(tb.text(), "xab");

        tb.undo();
        assert_eq!(tb.text(), "ab");
        tb.undo();
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_enter_releases_focus() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        let focus = scope_test(&mut tb, |tb, scope| {
            assert!(tb.key_down_hook(Key::Enter, Modifiers::NONE, false, scope));
        });
        assert!(!tb.return_pressed());
        assert!(focus.focused().is_some());

        tb.set_text("name");
        let focus = scope_test(&mut tb, |tb, scope| {
            tb.key_down_hook(Key::Enter, Modifiers::NONE, false, scope);
        });
        assert!(tb.return_pressed());
        assert_eq!(focus.focused(), None);

        tb.off();
        assert!(!tb.return_pressed());
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        scope_test(&mut tb, |tb, scope| {
            assert!(!tb.key_char_hook('\t', 1, false, false, scope));
            assert!(!tb.key_char_hook('\u{8}', 1, false, false, scope));
        });
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_password_masks_drawing() {
        let tb = TextBox::new(0.0, 0.0, 100.0, 20.0)
            .with_text("secret")
            .password(true)
            .mask_char('*');
        let mut commands = CommandList::new();
        tb.draw(&mut commands);
        assert!(commands.texts().any(|t| t == "******"));
        assert!(!commands.texts().any(|t| t == "secret"));
    }

    #[test]
    fn test_caption_is_drawn() {
        let tb = TextBox::new(100.0, 0.0, 100.0, 20.0).caption(
            "Name",
            CaptionPosition::Left,
            10.0,
            TextStyle::new(10.0, Color::WHITE),
        );
        let mut commands = CommandList::new();
        tb.draw(&mut commands);
        assert!(commands.texts().any(|t| t == "Name"));
    }

    #[test]
    fn test_is_tab_stop() {
        let tb = TextBox::new(0.0, 0.0, 100.0, 20.0);
        assert!(tb.interface().is_tab_stop());
    }
}
