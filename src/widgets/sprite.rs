use crate::animation::{AnimationChain, ChainCycle};
use crate::renderer::{ImageId, Surface};
use crate::scene::{ObjectState, SceneObject};
use crate::Bindable;

use super::widget::Rect;

/// Part of a bitmap drawn into a destination rectangle.
///
/// The destination is bound to `X`/`Y`/`Width`/`Height`, the source region to
/// `X2`/`Y2`/`Width2`/`Height2`.
#[derive(Clone, Debug, Bindable)]
pub struct Sprite {
    state: ObjectState,
    image: ImageId,
    #[bind(X)]
    x: f64,
    #[bind(Y)]
    y: f64,
    #[bind(Width)]
    width: f64,
    #[bind(Height)]
    height: f64,
    #[bind(X2)]
    source_x: f64,
    #[bind(Y2)]
    source_y: f64,
    #[bind(Width2)]
    source_width: f64,
    #[bind(Height2)]
    source_height: f64,
    #[bind(Alpha)]
    alpha: f64,
}

impl Sprite {
    /// Draw the whole `image_width` x `image_height` bitmap at its natural size.
    pub fn new(image: ImageId, x: f64, y: f64, image_width: f64, image_height: f64) -> Self {
        Self {
            state: ObjectState::new(),
            image,
            x,
            y,
            width: image_width,
            height: image_height,
            source_x: 0.0,
            source_y: 0.0,
            source_width: image_width,
            source_height: image_height,
            alpha: 1.0,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn set_source_rect(&mut self, rect: Rect) {
        self.source_x = rect.x;
        self.source_y = rect.y;
        self.source_width = rect.width;
        self.source_height = rect.height;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.source_x,
            self.source_y,
            self.source_width,
            self.source_height,
        )
    }
}

impl SceneObject for Sprite {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        surface.image(self.image, self.source_rect(), self.rect(), self.alpha);
    }
}

/// A sprite cut from a grid of equally sized frames.
///
/// The frame is either chosen directly with [`set_frame`](Self::set_frame) or
/// driven by a selector chain whose `[0, 1]` value is scaled to the frame
/// count on every update.
#[derive(Clone, Debug, Bindable)]
pub struct SpriteSheet {
    #[bind(flatten)]
    sprite: Sprite,
    sheet_width: f64,
    sheet_height: f64,
    columns: u32,
    rows: u32,
    frames: u32,
    frame: u32,
    selector: Option<AnimationChain>,
}

impl SpriteSheet {
    /// `columns` x `rows` frames laid out in a `sheet_width` x `sheet_height`
    /// bitmap, positioned at (`x`, `y`) at the natural frame size.
    pub fn new(
        image: ImageId,
        x: f64,
        y: f64,
        sheet_width: f64,
        sheet_height: f64,
        columns: u32,
        rows: u32,
    ) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let mut sprite = Sprite::new(image, x, y, sheet_width, sheet_height);
        sprite.width = sheet_width / f64::from(columns);
        sprite.height = sheet_height / f64::from(rows);

        let mut sheet = Self {
            sprite,
            sheet_width,
            sheet_height,
            columns,
            rows,
            frames: columns * rows,
            frame: 0,
            selector: None,
        };
        sheet.select_source();
        sheet
    }

    /// Use only the first `frames` cells of the grid.
    pub fn frames(mut self, frames: u32) -> Self {
        self.frames = frames.clamp(1, self.columns * self.rows);
        self
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    /// Show a fixed frame, dropping any selector animation.
    pub fn set_frame(&mut self, frame: u32) {
        self.selector = None;
        self.frame = frame.min(self.frames - 1);
        self.select_source();
    }

    /// Drive the frame from `chain`. It starts on the next update.
    pub fn set_animation(&mut self, chain: AnimationChain) {
        self.selector = Some(chain);
    }

    /// Cycle through every frame once per `interval` milliseconds.
    pub fn animate(&mut self, interval: u64) {
        let selector = AnimationChain::from(crate::animation::Animation::from_to(0.0, 1.0, interval))
            .cycle(ChainCycle::Repeat);
        self.set_animation(selector);
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn select_source(&mut self) {
        let frame_width = self.sheet_width / f64::from(self.columns);
        let frame_height = self.sheet_height / f64::from(self.rows);
        let column = self.frame % self.columns;
        let row = self.frame / self.columns;
        self.sprite.set_source_rect(Rect::new(
            f64::from(column) * frame_width,
            f64::from(row) * frame_height,
            frame_width,
            frame_height,
        ));
    }
}

impl SceneObject for SpriteSheet {
    fn state(&self) -> &ObjectState {
        &self.sprite.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.sprite.state
    }

    fn update_hook(&mut self, now: u64) {
        let Some(selector) = self.selector.as_mut() else {
            return;
        };
        let value = selector.poll(now, 0.0);
        let last = self.frames - 1;
        self.frame = ((value * f64::from(self.frames)).max(0.0) as u32).min(last);
        self.select_source();
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        self.sprite.draw_hook(surface);
    }

    fn reset_animations(&mut self, now: u64) {
        self.sprite.state.reset_chains(now);
        if let Some(selector) = self.selector.as_mut() {
            selector.reset(now);
        }
    }
}
