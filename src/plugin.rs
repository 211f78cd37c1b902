//! # Host Integration
//!
//! Bevy plugin that drives filter components through the engine's logic
//! loop: pending instances start once, running instances tick every frame.
//! All of it runs single-threaded under the host's tick scheduler; the
//! backend and scene resources are reached through exclusive borrows.

use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use tracing::error;

use crate::component::{FilterInstance, FilterState, SceneInfo};
use crate::manager::FilterManager;

/// Registers the filter-component lifecycle systems and default resources.
///
/// Hosts install their rendering backend by inserting a configured
/// [`FilterManager`]; the default manager accepts every call without
/// rendering, so headless runs work out of the box. Point [`SceneInfo`] at
/// the loaded scene file for scene-relative shader paths.
pub struct ScreenFilterPlugin;

impl Plugin for ScreenFilterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FilterManager>()
            .init_resource::<SceneInfo>()
            .add_systems(Update, (start_filters, update_filters).chain());
    }
}

/// Wall-clock seconds; the time base filter updates oscillate against.
fn wall_clock() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// Start every uninitialized instance against the scene's filter stack.
fn start_filters(
    scene: Res<SceneInfo>,
    mut manager: ResMut<FilterManager>,
    mut filters: Query<&mut FilterInstance>,
) {
    let now = wall_clock();
    for mut instance in &mut filters {
        if instance.state() != FilterState::Uninitialized {
            continue;
        }
        if let Err(err) = instance.start(&scene, manager.backend_mut(), now) {
            error!(%err, "screen filter failed to start");
            instance.mark_failed();
        }
    }
}

/// Tick every started instance once per logic frame.
fn update_filters(
    scene: Res<SceneInfo>,
    mut manager: ResMut<FilterManager>,
    mut filters: Query<&mut FilterInstance>,
) {
    let now = wall_clock();
    for mut instance in &mut filters {
        match instance.state() {
            FilterState::Started | FilterState::Running => {}
            FilterState::Uninitialized | FilterState::Failed => continue,
        }
        if let Err(err) = instance.update(&scene, manager.backend_mut(), now) {
            error!(%err, "screen filter update failed");
            instance.mark_failed();
        }
    }
}
