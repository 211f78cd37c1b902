//! Timed screen fade.

use std::path::Path;

use crate::component::{FilterContext, ScreenFilter};
use crate::error::FilterError;
use crate::properties::{PropertySet, PropertyValue};

/// Fades the screen to a color and back, oscillating over wall-clock time.
///
/// The `fade` uniform follows `(cos(speed * t) + 1) / 2`, so it moves
/// smoothly through [0, 1] at a rate set by the `speed` property,
/// independent of frame rate.
#[derive(Debug, Default)]
pub struct ScreenFadeFilter;

impl ScreenFilter for ScreenFadeFilter {
    fn properties(&self) -> PropertySet {
        PropertySet::screen_filter_base()
            .declare("speed", "Speed", PropertyValue::Float(1.0))
            .declare("color", "Color", PropertyValue::Color3([0.0, 0.0, 0.0]))
    }

    fn fragment_program(&self, ctx: &FilterContext<'_>) -> Result<String, FilterError> {
        ctx.read("shaders/screen_fade.fs", Some(Path::new(file!())))
    }

    fn update(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        let [r, g, b] = ctx.color3("color")?;
        ctx.set_uniform_4f("color", [r, g, b, 1.0])?;

        let fade = (f64::from(ctx.float("speed")?) * ctx.time()).cos() as f32;
        ctx.set_uniform_1f("fade", (fade + 1.0) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::component::{FilterInstance, SceneInfo};
    use crate::manager::testing::{BackendCall, RecordingBackend};
    use crate::properties::ResolvedArgs;

    fn fade_instance() -> FilterInstance {
        let args = ResolvedArgs::new()
            .with("Pass Index", PropertyValue::Int(0))
            .with("Speed", PropertyValue::Float(2.0))
            .with("Color", PropertyValue::Color3([0.2, 0.4, 0.6]));
        FilterInstance::new(ScreenFadeFilter, args)
    }

    #[test]
    fn fade_tracks_the_cosine_of_scaled_time() {
        let mut backend = RecordingBackend::default();
        let scene = SceneInfo::default();
        let mut instance = fade_instance();
        instance.start(&scene, &mut backend, 0.0).unwrap();

        // cos(2.0 * 0) = 1 -> fully faded in.
        instance.update(&scene, &mut backend, 0.0).unwrap();
        // cos(2.0 * pi/2) = -1 -> fully faded out.
        instance.update(&scene, &mut backend, FRAC_PI_2).unwrap();

        let handle = instance.handle().unwrap();
        let fades: Vec<f32> = backend
            .calls()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Uniform1f { filter, name, value }
                    if *filter == handle && name == "fade" =>
                {
                    Some(*value)
                }
                _ => None,
            })
            .collect();
        assert_eq!(fades, [1.0, 0.0]);
    }

    #[test]
    fn color_is_reset_identically_every_tick() {
        let mut backend = RecordingBackend::default();
        let scene = SceneInfo::default();
        let mut instance = fade_instance();
        instance.start(&scene, &mut backend, 0.0).unwrap();

        // Startup performs no uniform calls; only pass creation.
        assert_eq!(backend.calls().len(), 1);

        instance.update(&scene, &mut backend, 0.0).unwrap();
        instance.update(&scene, &mut backend, 1.0).unwrap();

        let colors: Vec<[f32; 4]> = backend
            .calls()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Uniform4f { name, value, .. } if name == "color" => Some(*value),
                _ => None,
            })
            .collect();
        assert_eq!(colors, [[0.2, 0.4, 0.6, 1.0], [0.2, 0.4, 0.6, 1.0]]);
    }
}
