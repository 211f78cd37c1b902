//! Solid screen-color overlay.

use std::path::Path;

use crate::component::{FilterContext, ScreenFilter};
use crate::error::FilterError;
use crate::properties::{PropertySet, PropertyValue};

/// Covers the screen with a configurable solid color.
///
/// The color is fixed for the lifetime of the component, so the uniform is
/// set once at startup and never touched again.
#[derive(Debug, Default)]
pub struct ScreenColorFilter;

impl ScreenFilter for ScreenColorFilter {
    fn properties(&self) -> PropertySet {
        PropertySet::screen_filter_base().declare(
            "color",
            "Color",
            PropertyValue::Color3([0.0, 0.0, 0.0]),
        )
    }

    fn fragment_program(&self, ctx: &FilterContext<'_>) -> Result<String, FilterError> {
        ctx.read("shaders/screen_color.fs", Some(Path::new(file!())))
    }

    fn setup(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        let [r, g, b] = ctx.color3("color")?;
        ctx.set_uniform_4f("color", [r, g, b, 1.0])
    }
}
