//! Rulesets: one engine, three games.
//!
//! A [`Ruleset`] decides the level roster, how jumping works, whether the
//! player is auto-driven forward, and what counts as touching a hazard.
//! Everything else (integration, landing, scripts, scoring, camera) is shared.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::{Rng, RngCore};

use crate::collision::within_reach;
use crate::config::{ArcadeConfig, Tuning};
use crate::entities::{CollectibleKind, Hazard, HazardKind, Player, Roster, RosterBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPolicy {
    /// Jump only from the ground; releasing early shortens the jump.
    Grounded,
    /// Every fresh press flaps, airborne or not.
    Flap,
}

pub trait Ruleset: Send {
    fn name(&self) -> &'static str;

    fn tuning(&self) -> &Tuning;

    /// Build the pristine entity table.  Called once per game; runs reset by
    /// cloning it.
    fn roster(&self, rng: &mut dyn RngCore) -> Roster;

    fn jump_policy(&self) -> JumpPolicy {
        JumpPolicy::Grounded
    }

    /// Forced forward speed after `elapsed` run time, if any.
    fn drive_speed(&self, _elapsed: Duration) -> Option<f32> {
        None
    }

    fn touches(&self, player: &Player, hazard: &Hazard) -> bool {
        within_reach(player, hazard, self.tuning())
    }
}

// ── Platformer ────────────────────────────────────────────────────────────────

const GROUND: f32 = 80.0;

#[derive(Clone, Debug)]
pub struct Platformer {
    tuning: Tuning,
}

impl Platformer {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Ruleset for Platformer {
    fn name(&self) -> &'static str {
        "platformer"
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn roster(&self, rng: &mut dyn RngCore) -> Roster {
        let mut phase = || rng.gen_range(0.0..TAU);
        RosterBuilder::new(10.0, GROUND)
            .platform(0.0, GROUND, 60.0)
            .platform(70.0, GROUND, 50.0)
            .platform(130.0, 70.0, 25.0)
            .platform(165.0, 60.0, 25.0)
            .platform(200.0, GROUND, 80.0)
            .platform(290.0, GROUND, 40.0)
            .platform(340.0, 65.0, 30.0)
            .platform(380.0, GROUND, 120.0)
            .platform(420.0, 55.0, 20.0)
            .platform(510.0, GROUND, 90.0)
            .hazard(HazardKind::Ground, 40.0, GROUND, 10.0, 0.0)
            .hazard(HazardKind::Flying, 105.0, 50.0, 12.0, phase())
            .hazard(HazardKind::Ground, 230.0, GROUND, 15.0, 0.0)
            .hazard(HazardKind::Flying, 265.0, 45.0, 10.0, phase())
            .hazard(HazardKind::Ground, 440.0, GROUND, 25.0, 0.0)
            .hazard(HazardKind::Flying, 540.0, 50.0, 20.0, phase())
            .collectible(CollectibleKind::Coin, 25.0, 75.0)
            .collectible(CollectibleKind::Coin, 90.0, 75.0)
            .collectible(CollectibleKind::Coin, 140.0, 65.0)
            .collectible(CollectibleKind::Power, 175.0, 55.0)
            .collectible(CollectibleKind::Coin, 215.0, 75.0)
            .collectible(CollectibleKind::Coin, 300.0, 75.0)
            .collectible(CollectibleKind::Coin, 355.0, 60.0)
            .collectible(CollectibleKind::Coin, 430.0, 50.0)
            .collectible(CollectibleKind::Power, 470.0, 75.0)
            .collectible(CollectibleKind::Coin, 560.0, 75.0)
            .build()
    }
}

// ── Flappy ────────────────────────────────────────────────────────────────────

const PIPE_COUNT: usize = 60;
const PIPE_SPACING: f32 = 35.0;

#[derive(Clone, Debug)]
pub struct Flappy {
    tuning: Tuning,
}

impl Flappy {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Ruleset for Flappy {
    fn name(&self) -> &'static str {
        "flappy"
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn roster(&self, rng: &mut dyn RngCore) -> Roster {
        let mut builder = RosterBuilder::new(10.0, 40.0);
        for i in 0..PIPE_COUNT {
            let x = 60.0 + i as f32 * PIPE_SPACING;
            let gap_y = rng.gen_range(25.0..70.0);
            builder = builder
                .hazard(HazardKind::Pipe, x, gap_y, 0.0, 0.0)
                .collectible(CollectibleKind::Coin, x, gap_y + self.tuning.body_offset);
        }
        builder.build()
    }

    fn jump_policy(&self) -> JumpPolicy {
        JumpPolicy::Flap
    }

    fn drive_speed(&self, _elapsed: Duration) -> Option<f32> {
        Some(self.tuning.run_speed)
    }

    /// Inside the pipe column and outside its gap.
    fn touches(&self, player: &Player, hazard: &Hazard) -> bool {
        let centre = player.y - self.tuning.body_offset;
        (player.x - hazard.x).abs() < self.tuning.hazard_reach_x
            && (centre - hazard.y).abs() > self.tuning.pipe_gap / 2.0
    }
}

// ── Lane runner ───────────────────────────────────────────────────────────────

const RUNNER_HAZARDS: usize = 80;

#[derive(Clone, Debug)]
pub struct LaneRunner {
    tuning: Tuning,
}

impl LaneRunner {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Ruleset for LaneRunner {
    fn name(&self) -> &'static str {
        "lane-runner"
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn roster(&self, rng: &mut dyn RngCore) -> Roster {
        let mut builder = RosterBuilder::new(10.0, GROUND).platform(0.0, GROUND, 100_000.0);
        let mut x = 70.0;
        for i in 0..RUNNER_HAZARDS {
            let patrol = if rng.gen_bool(0.3) { 5.0 } else { 0.0 };
            builder = builder
                .hazard(HazardKind::Ground, x, GROUND, patrol, 0.0)
                .collectible(CollectibleKind::Coin, x, GROUND - 14.0);
            if i % 10 == 9 {
                builder = builder.collectible(CollectibleKind::Power, x + 20.0, GROUND);
            }
            x += rng.gen_range(40.0..70.0);
        }
        builder.build()
    }

    /// Ramps from `run_speed` to `run_speed_max` as the run goes on.
    fn drive_speed(&self, elapsed: Duration) -> Option<f32> {
        let t = &self.tuning;
        Some((t.run_speed + t.run_speed_ramp * elapsed.as_secs_f32()).min(t.run_speed_max))
    }
}

// ── Variant selector ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Platformer,
    Flappy,
    LaneRunner,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Platformer, Variant::Flappy, Variant::LaneRunner];

    pub fn ruleset(self, config: &ArcadeConfig) -> Box<dyn Ruleset> {
        match self {
            Variant::Platformer => Box::new(Platformer::new(config.platformer.clone())),
            Variant::Flappy => Box::new(Flappy::new(config.flappy.clone())),
            Variant::LaneRunner => Box::new(LaneRunner::new(config.lane_runner.clone())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variant::Platformer => "Platformer",
            Variant::Flappy => "Flappy",
            Variant::LaneRunner => "Lane Runner",
        }
    }
}
