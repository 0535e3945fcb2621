// Lets `#[derive(Bindable)]` refer to `::simple2d` from inside this crate.
extern crate self as simple2d;

pub mod animation;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod widgets;

pub use scene::Bindable;
pub use simple2d_macros::Bindable;

use animation::{Clock, SystemClock};
use renderer::Surface;
use scene::Scene;
use widgets::{ButtonState, Color, Event, EventResponse, MouseButton};

pub mod prelude {
    pub use crate::animation::{
        Animation, AnimationChain, ChainCycle, Clock, CycleType, ManualClock, Shaping, SystemClock,
    };
    pub use crate::error::SceneError;
    pub use crate::renderer::{CommandList, DrawCommand, ImageId, Surface, TextMetrics};
    pub use crate::scene::{
        Binding, Focus, Handle, ObjectGroup, ObjectId, ObjectManager, Scene, SceneObject,
    };
    pub use crate::widgets::{
        Button, ButtonGroupTemplate, ButtonState, ButtonTemplate, CheckBox, Color, Control,
        CustomDraw, Event, EventResponse, Interface, InterfaceObject, ItemGroup, Key, Label, Modifiers,
        MouseButton, MouseButtons, Rect, Rectangle, Slider, Sprite, SpriteSheet, TextBox,
        TextBoxGroupTemplate, TextBoxTemplate, TextStyle,
    };
    pub use crate::{App, AppConfig, Bindable, Host};
}

pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Restart every animation of a scene when it becomes current
    pub reset_animations_on_switch: bool,
    /// Pause between frames in [`App::run`], in milliseconds
    pub frame_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background_color: Color::rgb(0.1, 0.1, 0.15),
            reset_animations_on_switch: true,
            frame_interval: 16,
        }
    }
}

/// A callback that gets called each frame before the scenes update.
pub type UpdateCallback = Box<dyn FnMut(u64)>;

/// Window and event source driven by [`App::run`].
pub trait Host {
    /// Input received since the last call
    fn take_events(&mut self) -> Vec<Event>;

    /// Surface the next frame is drawn into
    fn surface(&mut self) -> &mut dyn Surface;

    /// Show the frame just drawn
    fn present(&mut self);

    fn should_exit(&self) -> bool;
}

/// Frame driver holding the current scene and an overlay drawn above it.
///
/// The overlay is never swapped out and sees input after the scene.
pub struct App<C: Clock = SystemClock> {
    config: AppConfig,
    clock: C,
    scene: Option<Scene>,
    overlay: Scene,
    on_update: Option<UpdateCallback>,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            clock: SystemClock::new(),
            scene: None,
            overlay: Scene::new(),
            on_update: None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> App<C> {
    /// Drive animations from `clock` instead of the wall clock.
    pub fn with_clock<D: Clock>(self, clock: D) -> App<D> {
        App {
            config: self.config,
            clock,
            scene: self.scene,
            overlay: self.overlay,
            on_update: self.on_update,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.config.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.config.height = height;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.config.background_color = color;
        self
    }

    pub fn reset_animations_on_switch(mut self, reset: bool) -> Self {
        self.config.reset_animations_on_switch = reset;
        self
    }

    /// Set a callback that gets called each frame with the current tick,
    /// before the scenes update.
    pub fn on_update<F: FnMut(u64) + 'static>(mut self, callback: F) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Make `scene` current and return the previous one.
    pub fn set_scene(&mut self, mut scene: Scene) -> Option<Scene> {
        let mut previous = self.scene.take();
        if let Some(previous) = previous.as_mut() {
            previous.deactivate();
        }

        if self.config.reset_animations_on_switch {
            scene.reset_animations(self.clock.now());
        }
        scene.activate();
        log::debug!("Switched scene");

        self.scene = Some(scene);
        previous
    }

    pub fn clear_scene(&mut self) -> Option<Scene> {
        let mut previous = self.scene.take();
        if let Some(previous) = previous.as_mut() {
            previous.deactivate();
        }
        previous
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn overlay(&self) -> &Scene {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Scene {
        &mut self.overlay
    }

    /// Update the scene, then the overlay, at one clock sample and draw both.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        let now = self.clock.now();

        if let Some(ref mut callback) = self.on_update {
            callback(now);
        }

        if let Some(scene) = self.scene.as_mut() {
            scene.update(now);
        }
        self.overlay.update(now);

        surface.clear(self.config.background_color);
        if let Some(scene) = self.scene.as_ref() {
            scene.draw(surface);
        }
        self.overlay.draw(surface);
    }

    /// Route one input event to the scene, then the overlay. A left press
    /// first clears keyboard focus everywhere.
    pub fn handle_event(&mut self, event: &Event) -> EventResponse {
        if let Event::MouseDown {
            button: MouseButton::Left,
            ..
        } = event
        {
            if let Some(scene) = self.scene.as_mut() {
                scene.clear_focus();
            }
            self.overlay.clear_focus();
        }

        let scene = self.scene.as_mut();
        let overlay = &mut self.overlay;
        (scene.is_some_and(|scene| route(scene, event)) || route(overlay, event)).into()
    }

    /// Run frames against `host` until it asks to exit.
    pub fn run<H: Host>(&mut self, host: &mut H) {
        // The host may already have installed a logger
        let _ = env_logger::try_init();

        log::info!(
            "Running {}x{} at {} ms per frame",
            self.config.width,
            self.config.height,
            self.config.frame_interval
        );

        while !host.should_exit() {
            for event in host.take_events() {
                self.handle_event(&event);
            }

            self.frame(host.surface());
            host.present();

            if self.config.frame_interval > 0 {
                std::thread::sleep(std::time::Duration::from_millis(self.config.frame_interval));
            }
        }
    }
}

fn route(scene: &mut Scene, event: &Event) -> bool {
    match *event {
        Event::MouseMove { x, y, buttons } => scene.on_mouse_move(x, y, buttons),
        Event::MouseDown { x, y, button } => {
            scene.on_mouse_button(button, ButtonState::Pressed, x, y)
        }
        Event::MouseUp { x, y, button } => {
            scene.on_mouse_button(button, ButtonState::Released, x, y)
        }
        Event::KeyChar {
            ch,
            repeat,
            previous,
            transition,
        } => scene.on_key_char(ch, repeat, previous, transition),
        Event::KeyDown {
            key,
            modifiers,
            previous,
        } => scene.on_key_down(key, modifiers, previous),
        Event::KeyUp { key, modifiers } => scene.on_key_up(key, modifiers),
    }
}
