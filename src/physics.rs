//! Player kinematics and landing on platforms.
//!
//! `dt` is a frame scale: 1.0 is one nominal frame.

use crate::config::Tuning;
use crate::entities::{Facing, Platform, Player};
use crate::input::HeldActions;
use crate::ruleset::JumpPolicy;

/// Advance the player one step from held input and gravity.
///
/// `drive` forces a forward speed (auto-running rulesets) and replaces the
/// horizontal input entirely.
pub fn integrate(
    player: &Player,
    held: HeldActions,
    dt: f32,
    tuning: &Tuning,
    policy: JumpPolicy,
    drive: Option<f32>,
) -> Player {
    let mut p = player.clone();

    // ── Horizontal ──
    match drive {
        Some(speed) => {
            p.vx = speed;
            p.facing = Facing::Right;
            p.is_walking = true;
        }
        None => {
            if held.right {
                p.vx += tuning.accel * dt;
                p.facing = Facing::Right;
                p.is_walking = true;
            } else if held.left {
                p.vx -= tuning.accel * dt;
                p.facing = Facing::Left;
                p.is_walking = true;
            } else {
                p.vx *= tuning.friction.powf(dt);
                if p.vx.abs() < tuning.stop_epsilon {
                    p.vx = 0.0;
                    p.is_walking = false;
                }
            }
        }
    }

    let cap = tuning.speed_cap(p.is_powered);
    p.vx = p.vx.clamp(-cap, cap);
    p.x += p.vx * dt;
    if tuning.clamp_left_edge && p.x < 0.0 {
        p.x = 0.0;
        p.vx = p.vx.max(0.0);
    }

    // ── Vertical ──
    let starts_jump = match policy {
        JumpPolicy::Grounded => held.jump && !p.is_jumping,
        JumpPolicy::Flap => held.jump && !p.jump_was_held,
    };
    if starts_jump {
        p.vy = tuning.jump_impulse;
        p.is_jumping = true;
    } else if policy == JumpPolicy::Grounded && !held.jump && p.vy < tuning.release_threshold {
        // Variable jump height: letting go early cuts the ascent.
        p.vy *= tuning.release_damping;
    }

    p.vy += tuning.gravity * dt;
    p.y += p.vy * dt;
    p.jump_was_held = held.jump;
    p
}

/// Snap the player onto the first platform that catches them.
///
/// A platform catches when the player's footprint overlaps its span, the
/// player is not rising, their feet started the step at or above the surface,
/// and they reach the surface within one more step.  Overlapping platforms
/// resolve in list order.
pub fn resolve_landing(
    player: &Player,
    prev_y: f32,
    platforms: &[Platform],
    dt: f32,
    tuning: &Tuning,
) -> Player {
    let mut p = player.clone();
    let left = p.x - tuning.player_half_width;
    let right = p.x + tuning.player_half_width;

    let caught = platforms.iter().find(|plat| {
        plat.overlaps(left, right)
            && p.vy >= 0.0
            && prev_y <= plat.y
            && p.y + p.vy * dt >= plat.y
    });

    match caught {
        Some(plat) => {
            p.y = plat.y;
            p.vy = 0.0;
            p.is_jumping = false;
        }
        None => p.is_jumping = true,
    }
    p
}
