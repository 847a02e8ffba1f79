//! Per-frame simulation step.
//!
//! [`tick`] takes an immutable reference to the current [`RunState`] and
//! returns a brand-new one.  Time comes in through [`FrameTime`], so the step
//! is fully deterministic for a given clock reading and input.

use std::time::Duration;

use crate::camera;
use crate::collision::{collect_pickups, expire_power, fell_out, resolve_hazards};
use crate::entities::{EndCause, RunState, RunStatus};
use crate::input::HeldActions;
use crate::physics::{integrate, resolve_landing};
use crate::ruleset::Ruleset;
use crate::scripts::step_hazards;

/// Clock reading and frame scale for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    pub now: Duration,
    /// 1.0 ≈ one nominal frame interval.
    pub dt: f32,
}

impl FrameTime {
    pub fn new(now: Duration, dt: f32) -> Self {
        Self { now, dt }
    }
}

/// Advance the run by one frame.  Finished runs are returned unchanged.
///
/// Order: power expiry, kinematics, landing, fall check, hazard scripts,
/// hazard contact, pickups, camera.  A lethal contact ends the frame before
/// pickups, so nothing scores after it.  The score saturates at `u32::MAX`.
pub fn tick(state: &RunState, ruleset: &dyn Ruleset, held: HeldActions, time: FrameTime) -> RunState {
    if !state.is_running() {
        return state.clone();
    }
    let tuning = ruleset.tuning();
    let elapsed = state.elapsed(time.now);
    let frame = state.frame + 1;

    // ── 1. Power-up deadline ─────────────────────────────────────────────────
    let player = expire_power(&state.player, time.now);

    // ── 2. Kinematics + landing ──────────────────────────────────────────────
    let prev_y = player.y;
    let player = integrate(
        &player,
        held,
        time.dt,
        tuning,
        ruleset.jump_policy(),
        ruleset.drive_speed(elapsed),
    );
    let player = resolve_landing(&player, prev_y, &state.platforms, time.dt, tuning);

    // ── 3. Fall-death ────────────────────────────────────────────────────────
    if fell_out(&player, tuning) {
        return RunState {
            player,
            status: RunStatus::Over(EndCause::Fell),
            frame,
            ..state.clone()
        };
    }

    // ── 4. Hazard scripts + contact ──────────────────────────────────────────
    let hazards = step_hazards(&state.hazards, time.dt, elapsed, tuning);
    let contact = resolve_hazards(&player, &hazards, ruleset);
    if let Some(hazard) = contact.lethal {
        return RunState {
            player,
            hazards: contact.hazards,
            score: state.score.saturating_add(contact.score_gain),
            status: RunStatus::Over(EndCause::Struck { hazard }),
            frame,
            ..state.clone()
        };
    }

    // ── 5. Pickups ───────────────────────────────────────────────────────────
    let pickups = collect_pickups(&player, &state.collectibles, time.now, tuning);

    // ── 6. Camera ────────────────────────────────────────────────────────────
    let camera = camera::follow(state.camera, pickups.player.x, tuning);

    RunState {
        player: pickups.player,
        hazards: contact.hazards,
        collectibles: pickups.collectibles,
        camera,
        score: state
            .score
            .saturating_add(contact.score_gain)
            .saturating_add(pickups.score_gain),
        frame,
        ..state.clone()
    }
}
