//! Built-in screen filters.

mod screen_color;
mod screen_fade;

pub use screen_color::ScreenColorFilter;
pub use screen_fade::ScreenFadeFilter;
