//! # Haze
//!
//! Declarative screen-filter components for a game engine's full-screen
//! post-processing stack.
//!
//! A filter component declares named, defaulted configuration values
//! ("properties") as an ordered table; the host editor exposes the table's
//! labels to the user, resolves them to concrete values, and attaches the
//! component. At startup the component registers a fragment-shader pass
//! with the scene's filter stack and from then on receives one update per
//! logic tick.
//!
//! ## Modules
//!
//! - `properties`: property declarations, resolved arguments, host schema
//! - `component`: the [`ScreenFilter`] trait and per-instance lifecycle
//! - `manager`: the filter-stack backend seam
//! - `source`: fragment-program loading from disk
//! - `filters`: built-in filters (solid color, timed fade)
//! - `plugin`: Bevy plugin driving the lifecycle from the logic loop
//!
//! ## Architecture
//!
//! The engine side of the stack (the object that owns the GPU passes) is
//! injected as a [`FilterBackend`] through the [`FilterManager`] resource.
//! Components never touch the renderer and never reach for globals: scene,
//! backend, clock, and resolved properties all arrive through
//! [`FilterContext`].
//!
//! ```no_run
//! use bevy::prelude::*;
//! use haze::{FilterInstance, PropertyValue, ResolvedArgs, ScreenColorFilter,
//!            ScreenFilterPlugin};
//!
//! let mut app = App::new();
//! app.add_plugins(ScreenFilterPlugin);
//! app.world_mut().spawn(FilterInstance::new(
//!     ScreenColorFilter,
//!     ResolvedArgs::new()
//!         .with("Pass Index", PropertyValue::Int(0))
//!         .with("Color", PropertyValue::Color3([1.0, 0.0, 0.0])),
//! ));
//! ```

pub mod component;
pub mod error;
pub mod filters;
pub mod manager;
pub mod plugin;
pub mod properties;
pub mod source;

pub use component::{FilterContext, FilterInstance, FilterState, SceneInfo, ScreenFilter};
pub use error::FilterError;
pub use filters::{ScreenColorFilter, ScreenFadeFilter};
pub use manager::{FilterBackend, FilterHandle, FilterKind, FilterManager, NullBackend};
pub use plugin::ScreenFilterPlugin;
pub use properties::{
    FilterProperty, PropertyDescriptor, PropertySet, PropertyValue, ResolvedArgs,
};
