//! # Filter Stack Backend
//!
//! Seam between filter components and the engine's post-processing stack.
//! The engine owns the actual GPU filter passes; this layer talks to them
//! through [`FilterBackend`] and addresses them by [`FilterHandle`]. Pass
//! teardown is the backend's responsibility, never the component's.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FilterError;

// ============================================================================
// Filter Kinds
// ============================================================================

/// Kinds of screen filter the stack can host.
///
/// `Custom` runs a fragment program supplied by the component; the rest
/// select built-in passes of the host stack. This layer only registers
/// `Custom` passes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Custom,
    Blur,
    Sharpen,
    Dilation,
    Erosion,
    Laplacian,
    Sobel,
    Prewitt,
    GrayScale,
    Sepia,
    Invert,
}

// ============================================================================
// Handles
// ============================================================================

/// Handle addressing one created filter pass.
///
/// The backend owns the pass; components keep the handle for the lifetime
/// of the component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterHandle(pub u32);

// ============================================================================
// Backend Trait
// ============================================================================

/// Engine side of the filter stack.
///
/// Hosts implement this against their renderer and install it through
/// [`FilterManager`].
pub trait FilterBackend: Send + Sync {
    /// Create a filter pass at `pass_index` in the stack.
    fn add_filter(
        &mut self,
        pass_index: i32,
        kind: FilterKind,
        fragment_source: &str,
    ) -> Result<FilterHandle, FilterError>;

    /// Set a scalar uniform on a created pass.
    fn set_uniform_1f(&mut self, filter: FilterHandle, name: &str, value: f32);

    /// Set a vec4 uniform on a created pass.
    fn set_uniform_4f(&mut self, filter: FilterHandle, name: &str, value: [f32; 4]);
}

// ============================================================================
// Manager Resource
// ============================================================================

/// Resource wrapping the engine-provided backend.
#[derive(Resource)]
pub struct FilterManager {
    backend: Box<dyn FilterBackend>,
}

impl FilterManager {
    pub fn new(backend: impl FilterBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn backend_mut(&mut self) -> &mut dyn FilterBackend {
        self.backend.as_mut()
    }
}

impl Default for FilterManager {
    fn default() -> Self {
        Self::new(NullBackend::default())
    }
}

// ============================================================================
// Null Backend
// ============================================================================

/// Backend used when no engine stack is installed.
///
/// Accepts every call and hands out handles so components run headless;
/// warns on creation that nothing will render.
#[derive(Debug, Default)]
pub struct NullBackend {
    next: u32,
}

impl FilterBackend for NullBackend {
    fn add_filter(
        &mut self,
        pass_index: i32,
        kind: FilterKind,
        _fragment_source: &str,
    ) -> Result<FilterHandle, FilterError> {
        warn!(pass_index, ?kind, "no filter backend installed; pass will not render");
        let handle = FilterHandle(self.next);
        self.next += 1;
        Ok(handle)
    }

    fn set_uniform_1f(&mut self, _filter: FilterHandle, _name: &str, _value: f32) {}

    fn set_uniform_4f(&mut self, _filter: FilterHandle, _name: &str, _value: [f32; 4]) {}
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// One observed backend call.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum BackendCall {
        AddFilter {
            pass_index: i32,
            kind: FilterKind,
            source: String,
        },
        Uniform1f {
            filter: FilterHandle,
            name: String,
            value: f32,
        },
        Uniform4f {
            filter: FilterHandle,
            name: String,
            value: [f32; 4],
        },
    }

    /// Records every backend call; clones share the same log so a view can
    /// outlive the backend after it moves into a [`FilterManager`].
    #[derive(Clone, Default)]
    pub(crate) struct RecordingBackend {
        calls: Arc<Mutex<Vec<BackendCall>>>,
    }

    impl RecordingBackend {
        pub(crate) fn calls(&self) -> Vec<BackendCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FilterBackend for RecordingBackend {
        fn add_filter(
            &mut self,
            pass_index: i32,
            kind: FilterKind,
            fragment_source: &str,
        ) -> Result<FilterHandle, FilterError> {
            let mut calls = self.calls.lock().unwrap();
            let created = calls
                .iter()
                .filter(|call| matches!(call, BackendCall::AddFilter { .. }))
                .count();
            calls.push(BackendCall::AddFilter {
                pass_index,
                kind,
                source: fragment_source.to_string(),
            });
            Ok(FilterHandle(created as u32))
        }

        fn set_uniform_1f(&mut self, filter: FilterHandle, name: &str, value: f32) {
            self.calls.lock().unwrap().push(BackendCall::Uniform1f {
                filter,
                name: name.to_string(),
                value,
            });
        }

        fn set_uniform_4f(&mut self, filter: FilterHandle, name: &str, value: [f32; 4]) {
            self.calls.lock().unwrap().push(BackendCall::Uniform4f {
                filter,
                name: name.to_string(),
                value,
            });
        }
    }

    #[test]
    fn null_backend_hands_out_distinct_handles() {
        let mut backend = NullBackend::default();
        let first = backend
            .add_filter(0, FilterKind::Custom, "void main() {}")
            .unwrap();
        let second = backend
            .add_filter(1, FilterKind::Custom, "void main() {}")
            .unwrap();
        assert_ne!(first, second);
    }
}
