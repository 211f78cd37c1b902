//! # Filter Components
//!
//! Base lifecycle for screen-filter components. The host constructs a
//! [`FilterInstance`] from a [`ScreenFilter`] behavior plus the property
//! values it resolved, starts it once against the scene's filter stack,
//! then ticks it every logic frame until the owning object is destroyed.
//!
//! Everything a behavior needs (resolved properties, the scene, the filter
//! stack, the clock) arrives through [`FilterContext`]; behaviors never
//! reach for ambient globals.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use tracing::debug;

use crate::error::FilterError;
use crate::manager::{FilterBackend, FilterHandle, FilterKind};
use crate::properties::{PropertySet, PropertyValue, ResolvedArgs};
use crate::source;

// ============================================================================
// Scene Info
// ============================================================================

/// Where the currently-loaded scene lives on disk.
///
/// Shader paths with no explicit base resolve against the scene file's
/// directory.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneInfo {
    /// Path of the loaded scene file, if any.
    pub file: Option<PathBuf>,
}

impl SceneInfo {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    /// Directory shader paths resolve against by default.
    ///
    /// Falls back to the working directory when no scene file is loaded.
    pub fn base_dir(&self) -> PathBuf {
        self.file
            .as_ref()
            .and_then(|file| file.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ============================================================================
// Filter Context
// ============================================================================

/// Per-call view a filter behavior receives during its hooks.
///
/// Bundles the resolved property values, the owning scene, the filter-stack
/// backend, the created pass (once it exists), and the tick's wall-clock
/// time.
pub struct FilterContext<'a> {
    scene: &'a SceneInfo,
    backend: &'a mut dyn FilterBackend,
    table: &'a PropertySet,
    args: &'a ResolvedArgs,
    filter: Option<FilterHandle>,
    time: f64,
}

impl<'a> FilterContext<'a> {
    /// Resolved value of the property declared under `name`.
    pub fn value(&self, name: &str) -> Result<&PropertyValue, FilterError> {
        self.args.lookup(self.table, name)
    }

    /// Resolved float property. Integer values coerce.
    pub fn float(&self, name: &str) -> Result<f32, FilterError> {
        match self.value(name)? {
            PropertyValue::Float(value) => Ok(*value),
            PropertyValue::Int(value) => Ok(*value as f32),
            _ => Err(FilterError::WrongType {
                name: name.to_string(),
                expected: "float",
            }),
        }
    }

    /// Resolved integer property.
    pub fn int(&self, name: &str) -> Result<i32, FilterError> {
        match self.value(name)? {
            PropertyValue::Int(value) => Ok(*value),
            _ => Err(FilterError::WrongType {
                name: name.to_string(),
                expected: "int",
            }),
        }
    }

    /// Resolved RGB color property.
    pub fn color3(&self, name: &str) -> Result<[f32; 3], FilterError> {
        match self.value(name)? {
            PropertyValue::Color3(value) => Ok(*value),
            _ => Err(FilterError::WrongType {
                name: name.to_string(),
                expected: "Color3",
            }),
        }
    }

    /// The scene this component is attached to.
    pub fn scene(&self) -> &SceneInfo {
        self.scene
    }

    /// Wall-clock seconds, sampled once per tick by the host.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Read a shader file relative to `relative_to`, or to the scene
    /// directory when `relative_to` is `None`.
    ///
    /// A file path as base resolves through its containing directory, so
    /// filters can pass their own source location (`file!()`).
    pub fn read(&self, file_path: &str, relative_to: Option<&Path>) -> Result<String, FilterError> {
        match relative_to {
            Some(base) => source::read_relative(file_path, base),
            None => source::read_relative(file_path, self.scene.base_dir()),
        }
    }

    /// Create a pass in the filter stack.
    pub fn add_filter(
        &mut self,
        pass_index: i32,
        kind: FilterKind,
        fragment_source: &str,
    ) -> Result<FilterHandle, FilterError> {
        self.backend.add_filter(pass_index, kind, fragment_source)
    }

    /// Set a scalar uniform on this component's pass.
    pub fn set_uniform_1f(&mut self, name: &str, value: f32) -> Result<(), FilterError> {
        let filter = self.filter.ok_or(FilterError::NotCreated)?;
        self.backend.set_uniform_1f(filter, name, value);
        Ok(())
    }

    /// Set a vec4 uniform on this component's pass.
    pub fn set_uniform_4f(&mut self, name: &str, value: [f32; 4]) -> Result<(), FilterError> {
        let filter = self.filter.ok_or(FilterError::NotCreated)?;
        self.backend.set_uniform_4f(filter, name, value);
        Ok(())
    }
}

// ============================================================================
// Behavior Trait
// ============================================================================

/// Behavior of one screen-filter component type.
///
/// Implementations declare their properties, supply a fragment program, and
/// optionally hook one-time setup and per-tick updates.
pub trait ScreenFilter: Send + Sync + 'static {
    /// Property declarations for this filter type.
    ///
    /// Start from [`PropertySet::screen_filter_base`] and declare on top of
    /// it; re-declaring a name overrides the inherited default in place.
    fn properties(&self) -> PropertySet {
        PropertySet::screen_filter_base()
    }

    /// Fragment-program source for this filter's pass.
    fn fragment_program(&self, ctx: &FilterContext<'_>) -> Result<String, FilterError>;

    /// Create the filter pass.
    ///
    /// The default registers a custom fragment filter at the resolved
    /// `pass_index`; override for a different creation strategy.
    fn create_filter(&self, ctx: &mut FilterContext<'_>) -> Result<FilterHandle, FilterError> {
        let pass_index = ctx.int("pass_index")?;
        let fragment_source = self.fragment_program(ctx)?;
        ctx.add_filter(pass_index, FilterKind::Custom, &fragment_source)
    }

    /// One-time hook, called right after the filter pass exists.
    fn setup(&mut self, _ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        Ok(())
    }

    /// Per-tick hook, called once per logic frame while the component lives.
    fn update(&mut self, _ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        Ok(())
    }
}

// ============================================================================
// Instance Lifecycle
// ============================================================================

/// Lifecycle of a filter component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    /// Constructed; no filter pass yet.
    #[default]
    Uninitialized,
    /// `start` ran and the filter pass exists.
    Started,
    /// The per-tick hook is being invoked.
    Running,
    /// Startup or an update failed; the instance will not tick again.
    Failed,
}

/// One attached filter component: a behavior plus its per-instance state.
///
/// The host resolves the declared properties, constructs the instance, and
/// drives [`start`](Self::start) once and [`update`](Self::update) once per
/// logic tick, either directly or through
/// [`ScreenFilterPlugin`](crate::plugin::ScreenFilterPlugin).
#[derive(Component)]
pub struct FilterInstance {
    behavior: Box<dyn ScreenFilter>,
    table: PropertySet,
    args: ResolvedArgs,
    filter: Option<FilterHandle>,
    state: FilterState,
}

impl FilterInstance {
    /// Wrap a behavior with the property values the host resolved.
    pub fn new(behavior: impl ScreenFilter, args: ResolvedArgs) -> Self {
        let behavior = Box::new(behavior);
        let table = behavior.properties();
        Self {
            behavior,
            table,
            args,
            filter: None,
            state: FilterState::Uninitialized,
        }
    }

    /// Wrap a behavior with every property at its declared default.
    pub fn with_defaults(behavior: impl ScreenFilter) -> Self {
        let table = behavior.properties();
        let args = ResolvedArgs::from_defaults(&table);
        Self::new(behavior, args)
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Handle of the created pass, once startup has succeeded.
    pub fn handle(&self) -> Option<FilterHandle> {
        self.filter
    }

    /// Declarations for this instance's type; source of the host-UI schema.
    pub fn table(&self) -> &PropertySet {
        &self.table
    }

    /// Create the filter pass and run the one-time setup hook.
    ///
    /// On error the instance stays un-started; the caller decides whether
    /// to park it with [`mark_failed`](Self::mark_failed).
    pub fn start(
        &mut self,
        scene: &SceneInfo,
        backend: &mut dyn FilterBackend,
        time: f64,
    ) -> Result<(), FilterError> {
        let mut ctx = FilterContext {
            scene,
            backend,
            table: &self.table,
            args: &self.args,
            filter: None,
            time,
        };
        let filter = self.behavior.create_filter(&mut ctx)?;
        ctx.filter = Some(filter);
        self.behavior.setup(&mut ctx)?;
        self.filter = Some(filter);
        self.state = FilterState::Started;
        debug!(?filter, "screen filter started");
        Ok(())
    }

    /// Per-tick update. A no-op until `start` has succeeded, and after a
    /// failure.
    pub fn update(
        &mut self,
        scene: &SceneInfo,
        backend: &mut dyn FilterBackend,
        time: f64,
    ) -> Result<(), FilterError> {
        match self.state {
            FilterState::Started | FilterState::Running => {}
            FilterState::Uninitialized | FilterState::Failed => return Ok(()),
        }
        self.state = FilterState::Running;
        let mut ctx = FilterContext {
            scene,
            backend,
            table: &self.table,
            args: &self.args,
            filter: self.filter,
            time,
        };
        self.behavior.update(&mut ctx)
    }

    /// Park the instance so it is never ticked again.
    pub fn mark_failed(&mut self) {
        self.state = FilterState::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::testing::{BackendCall, RecordingBackend};
    use crate::manager::NullBackend;

    struct Probe;

    impl ScreenFilter for Probe {
        fn properties(&self) -> PropertySet {
            PropertySet::screen_filter_base().declare(
                "strength",
                "Strength",
                PropertyValue::Float(0.25),
            )
        }

        fn fragment_program(&self, _ctx: &FilterContext<'_>) -> Result<String, FilterError> {
            Ok("uniform float strength;\nvoid main() {}\n".to_string())
        }

        fn setup(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
            let strength = ctx.float("strength")?;
            ctx.set_uniform_1f("strength", strength)
        }
    }

    fn probe_ctx<'a>(
        scene: &'a SceneInfo,
        backend: &'a mut NullBackend,
        table: &'a PropertySet,
        args: &'a ResolvedArgs,
    ) -> FilterContext<'a> {
        FilterContext {
            scene,
            backend,
            table,
            args,
            filter: None,
            time: 0.0,
        }
    }

    #[test]
    fn start_uses_resolved_values_not_declared_defaults() {
        let mut backend = RecordingBackend::default();
        let scene = SceneInfo::default();
        let args = ResolvedArgs::new()
            .with("Pass Index", PropertyValue::Int(7))
            .with("Strength", PropertyValue::Float(2.5));
        let mut instance = FilterInstance::new(Probe, args);

        instance.start(&scene, &mut backend, 0.0).unwrap();
        assert_eq!(instance.state(), FilterState::Started);

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            BackendCall::AddFilter { pass_index: 7, kind: FilterKind::Custom, .. }
        ));
        assert_eq!(
            calls[1],
            BackendCall::Uniform1f {
                filter: instance.handle().unwrap(),
                name: "strength".to_string(),
                value: 2.5,
            }
        );
    }

    #[test]
    fn update_is_a_noop_before_start_and_flips_to_running_after() {
        let mut backend = RecordingBackend::default();
        let scene = SceneInfo::default();
        let mut instance = FilterInstance::with_defaults(Probe);

        instance.update(&scene, &mut backend, 0.0).unwrap();
        assert_eq!(instance.state(), FilterState::Uninitialized);
        assert!(backend.calls().is_empty());

        instance.start(&scene, &mut backend, 0.0).unwrap();
        instance.update(&scene, &mut backend, 1.0).unwrap();
        assert_eq!(instance.state(), FilterState::Running);
    }

    #[test]
    fn reading_an_undeclared_property_fails() {
        let scene = SceneInfo::default();
        let mut backend = NullBackend::default();
        let table = Probe.properties();
        let args = ResolvedArgs::from_defaults(&table);
        let ctx = probe_ctx(&scene, &mut backend, &table, &args);

        assert!(matches!(
            ctx.float("missing"),
            Err(FilterError::UnknownProperty(name)) if name == "missing"
        ));
    }

    #[test]
    fn type_mismatches_are_reported() {
        let scene = SceneInfo::default();
        let mut backend = NullBackend::default();
        let table = Probe.properties();
        let args = ResolvedArgs::from_defaults(&table);
        let ctx = probe_ctx(&scene, &mut backend, &table, &args);

        assert!(matches!(
            ctx.color3("strength"),
            Err(FilterError::WrongType { expected: "Color3", .. })
        ));
    }

    #[test]
    fn uniforms_require_a_created_pass() {
        let scene = SceneInfo::default();
        let mut backend = NullBackend::default();
        let table = Probe.properties();
        let args = ResolvedArgs::from_defaults(&table);
        let mut ctx = probe_ctx(&scene, &mut backend, &table, &args);

        assert!(matches!(
            ctx.set_uniform_1f("strength", 1.0),
            Err(FilterError::NotCreated)
        ));
    }

    #[test]
    fn read_defaults_to_the_scene_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shader.fs"), "void main() {}").unwrap();
        let scene = SceneInfo::from_file(dir.path().join("level.scene"));

        let mut backend = NullBackend::default();
        let table = Probe.properties();
        let args = ResolvedArgs::from_defaults(&table);
        let ctx = probe_ctx(&scene, &mut backend, &table, &args);

        assert_eq!(ctx.read("shader.fs", None).unwrap(), "void main() {}");
    }

    #[test]
    fn a_failing_fragment_program_leaves_the_instance_unstarted() {
        struct MissingSource;

        impl ScreenFilter for MissingSource {
            fn fragment_program(&self, ctx: &FilterContext<'_>) -> Result<String, FilterError> {
                ctx.read("does_not_exist.fs", None)
            }
        }

        let mut backend = RecordingBackend::default();
        let scene = SceneInfo::default();
        let mut instance = FilterInstance::with_defaults(MissingSource);

        let err = instance.start(&scene, &mut backend, 0.0).unwrap_err();
        assert!(matches!(err, FilterError::Source { .. }));
        assert_eq!(instance.state(), FilterState::Uninitialized);
        assert!(backend.calls().is_empty());
    }
}
