//! Scripted hazard motion.

use std::time::Duration;

use crate::config::Tuning;
use crate::entities::{Hazard, HazardKind};

/// Advance one hazard.  Dead hazards and pipes are returned unchanged.
///
/// Patrollers bounce inside `[origin_x - range, origin_x + range]`.  Flyers
/// additionally take their altitude straight from the run's elapsed time, so
/// a given start time always reproduces the same flight path.
pub fn step_hazard(hazard: &Hazard, dt: f32, elapsed: Duration, tuning: &Tuning) -> Hazard {
    if !hazard.alive {
        return hazard.clone();
    }
    let step = match hazard.kind {
        HazardKind::Ground => tuning.ground_step,
        HazardKind::Flying => tuning.flying_step,
        HazardKind::Pipe => return hazard.clone(),
    };

    let mut h = hazard.clone();
    h.x += step * h.direction * dt;
    if h.x > h.max_x() {
        h.x = h.max_x();
        h.direction = -1.0;
    } else if h.x < h.min_x() {
        h.x = h.min_x();
        h.direction = 1.0;
    }

    if h.kind == HazardKind::Flying {
        h.y = flight_altitude(&h, elapsed, tuning);
    }
    h
}

pub fn flight_altitude(hazard: &Hazard, elapsed: Duration, tuning: &Tuning) -> f32 {
    let t = elapsed.as_secs_f32() * 1000.0 / tuning.flight_period_ms;
    hazard.base_y + tuning.flight_amplitude * (t + hazard.phase).sin()
}

pub fn step_hazards(hazards: &[Hazard], dt: f32, elapsed: Duration, tuning: &Tuning) -> Vec<Hazard> {
    hazards
        .iter()
        .map(|h| step_hazard(h, dt, elapsed, tuning))
        .collect()
}
