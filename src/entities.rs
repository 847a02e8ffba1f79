//! All game entity types — plain data, no per-frame logic.
//!
//! Coordinates are percentages of the viewport: `x` grows to the right and
//! is unbounded, `y` grows downward (larger = lower on screen).

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Feet position; platforms catch the player at this height.
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Airborne flag. Named after the jump because only a grounded player may
    /// start one.
    pub is_jumping: bool,
    pub facing: Facing,
    pub is_walking: bool,
    pub is_powered: bool,
    /// Absolute clock reading after which the power-up lapses.
    pub power_expiry: Option<Duration>,
    /// Jump input as seen on the previous frame (flap edge detection).
    pub jump_was_held: bool,
}

impl Player {
    pub fn spawn(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            is_jumping: false,
            facing: Facing::Right,
            is_walking: false,
            is_powered: false,
            power_expiry: None,
            jump_was_held: false,
        }
    }
}

// ── World geometry ────────────────────────────────────────────────────────────

/// A horizontal strip; only its top surface takes part in collision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, width }
    }

    /// True if the closed span `[left, right]` overlaps this platform.
    pub fn overlaps(&self, left: f32, right: f32) -> bool {
        right >= self.x && left <= self.x + self.width
    }
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Patrols back and forth along the ground.
    Ground,
    /// Patrols horizontally while bobbing on a sine wave.
    Flying,
    /// Static column with a gap centred on `y` (flappy ruleset).
    Pipe,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub range_radius: f32,
    pub origin_x: f32,
    /// +1.0 or -1.0.
    pub direction: f32,
    pub kind: HazardKind,
    /// Phase offset (radians) of the flight wave.
    pub phase: f32,
    /// Altitude the flight wave oscillates around.
    pub base_y: f32,
    pub alive: bool,
}

impl Hazard {
    pub fn new(id: u32, kind: HazardKind, x: f32, y: f32, range_radius: f32, phase: f32) -> Self {
        Self {
            id,
            x,
            y,
            range_radius,
            origin_x: x,
            direction: 1.0,
            kind,
            phase,
            base_y: y,
            alive: true,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.origin_x - self.range_radius
    }

    pub fn max_x(&self) -> f32 {
        self.origin_x + self.range_radius
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    /// Grants the timed power-up.
    Power,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
    pub kind: CollectibleKind,
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal scroll applied to the world; never negative.
    pub offset: f32,
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// Everything a run starts from: spawn point plus the full entity table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub spawn: (f32, f32),
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
}

/// Assigns stable ids as entities are added. Hazards and collectibles share
/// one id space so a renderer can key every sprite by id alone.
#[derive(Debug)]
pub struct RosterBuilder {
    next_id: u32,
    roster: Roster,
}

impl RosterBuilder {
    pub fn new(spawn_x: f32, spawn_y: f32) -> Self {
        Self {
            next_id: 1,
            roster: Roster {
                spawn: (spawn_x, spawn_y),
                platforms: Vec::new(),
                hazards: Vec::new(),
                collectibles: Vec::new(),
            },
        }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn platform(mut self, x: f32, y: f32, width: f32) -> Self {
        self.roster.platforms.push(Platform::new(x, y, width));
        self
    }

    pub fn hazard(mut self, kind: HazardKind, x: f32, y: f32, range: f32, phase: f32) -> Self {
        let id = self.take_id();
        self.roster.hazards.push(Hazard::new(id, kind, x, y, range, phase));
        self
    }

    pub fn collectible(mut self, kind: CollectibleKind, x: f32, y: f32) -> Self {
        let id = self.take_id();
        self.roster.collectibles.push(Collectible {
            id,
            x,
            y,
            collected: false,
            kind,
        });
        self
    }

    pub fn build(self) -> Roster {
        self.roster
    }
}

// ── Run state ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    Fell,
    Struck { hazard: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Over(EndCause),
}

/// The mutable state of one run.  Cloneable so the per-frame `tick` can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
    pub camera: Camera,
    pub score: u32,
    pub status: RunStatus,
    pub frame: u64,
    /// Clock reading when the run began; flight waves and difficulty are
    /// measured from here.
    pub started_at: Duration,
}

impl RunState {
    /// Fresh run from a pristine roster.
    pub fn from_roster(roster: &Roster, started_at: Duration) -> Self {
        let (x, y) = roster.spawn;
        Self {
            player: Player::spawn(x, y),
            platforms: roster.platforms.clone(),
            hazards: roster.hazards.clone(),
            collectibles: roster.collectibles.clone(),
            camera: Camera::default(),
            score: 0,
            status: RunStatus::Running,
            frame: 0,
            started_at,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}
