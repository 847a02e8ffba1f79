//! Contact with hazards, pickups, power-up expiry, and fall-death.

use std::time::Duration;

use crate::config::Tuning;
use crate::entities::{Collectible, CollectibleKind, Hazard, Player};
use crate::ruleset::Ruleset;

// ── Hazards ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct HazardOutcome {
    pub hazards: Vec<Hazard>,
    pub score_gain: u32,
    /// Id of the hazard that ended the run.
    pub lethal: Option<u32>,
}

/// Distance-threshold contact, measured from the player's body centre.
pub fn within_reach(player: &Player, hazard: &Hazard, tuning: &Tuning) -> bool {
    let dx = (player.x - hazard.x).abs();
    let dy = (player.y - tuning.body_offset - hazard.y).abs();
    dx < tuning.hazard_reach_x && dy < tuning.hazard_reach_y
}

/// Check every live hazard in list order.
///
/// A powered player defeats what it touches; otherwise the first contact is
/// lethal and the scan stops there.
pub fn resolve_hazards(player: &Player, hazards: &[Hazard], ruleset: &dyn Ruleset) -> HazardOutcome {
    let tuning = ruleset.tuning();
    let mut hazards = hazards.to_vec();
    let mut score_gain: u32 = 0;

    for hazard in hazards.iter_mut() {
        if !hazard.alive || !ruleset.touches(player, hazard) {
            continue;
        }
        if player.is_powered {
            hazard.alive = false;
            score_gain = score_gain.saturating_add(tuning.defeat_bonus);
            tracing::debug!(hazard = hazard.id, "hazard defeated");
        } else {
            return HazardOutcome {
                lethal: Some(hazard.id),
                hazards,
                score_gain,
            };
        }
    }

    HazardOutcome {
        hazards,
        score_gain,
        lethal: None,
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PickupOutcome {
    pub player: Player,
    pub collectibles: Vec<Collectible>,
    pub score_gain: u32,
}

pub fn collect_pickups(
    player: &Player,
    collectibles: &[Collectible],
    now: Duration,
    tuning: &Tuning,
) -> PickupOutcome {
    let mut player = player.clone();
    let mut collectibles = collectibles.to_vec();
    let mut score_gain: u32 = 0;

    for item in collectibles.iter_mut().filter(|c| !c.collected) {
        let dx = (player.x - item.x).abs();
        let dy = (player.y - item.y).abs();
        if dx >= tuning.pickup_reach_x || dy >= tuning.pickup_reach_y {
            continue;
        }
        item.collected = true;
        match item.kind {
            CollectibleKind::Coin => score_gain = score_gain.saturating_add(tuning.coin_bonus),
            CollectibleKind::Power => {
                player.is_powered = true;
                player.power_expiry = Some(now + tuning.power_duration());
                score_gain = score_gain.saturating_add(tuning.power_bonus);
            }
        }
        tracing::debug!(item = item.id, kind = ?item.kind, "collected");
    }

    PickupOutcome {
        player,
        collectibles,
        score_gain,
    }
}

// ── Power-up and world bounds ─────────────────────────────────────────────────

/// Drop the power-up once its deadline has been reached.
pub fn expire_power(player: &Player, now: Duration) -> Player {
    let mut p = player.clone();
    if p.is_powered && p.power_expiry.map_or(true, |deadline| now >= deadline) {
        p.is_powered = false;
        p.power_expiry = None;
    }
    p
}

pub fn fell_out(player: &Player, tuning: &Tuning) -> bool {
    player.y > tuning.fall_limit
}
