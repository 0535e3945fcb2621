pub mod button;
pub mod checkbox;
pub mod control;
pub mod font;
pub mod shapes;
pub mod slider;
pub mod sprite;
pub mod templates;
pub mod text_box;
pub mod widget;

pub use button::Button;
pub use checkbox::CheckBox;
pub use control::{Control, Interface, InterfaceObject, KeyDispatch};
pub use font::{FontFamily, FontWeight, TextStyle};
pub use shapes::{CustomDraw, Label, Rectangle};
pub use slider::Slider;
pub use sprite::{Sprite, SpriteSheet};
pub use templates::{
    ButtonGroupTemplate, ButtonTemplate, GroupTemplate, ItemGroup, TextBoxGroupTemplate,
    TextBoxTemplate,
};
pub use text_box::{CaptionPosition, Selection, TextBox};
pub use widget::{
    ButtonState, Color, Event, EventResponse, Key, Modifiers, MouseButton, MouseButtons, Rect,
};
