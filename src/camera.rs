//! Smoothed horizontal follow.

use crate::config::Tuning;
use crate::entities::Camera;

/// Ease the camera toward `player_x - camera_lead`, never scrolling left of
/// the world start.
pub fn follow(camera: Camera, player_x: f32, tuning: &Tuning) -> Camera {
    let target = player_x - tuning.camera_lead;
    let offset = camera.offset + (target - camera.offset) * tuning.camera_smoothing;
    Camera {
        offset: offset.max(0.0),
    }
}
