//! Read-only views published to the presentation layer.
//!
//! A [`FrameSnapshot`] carries everything a renderer needs to draw a frame
//! without touching game logic.  Snapshots are published at a throttled rate
//! (see [`SnapshotThrottle`]) rather than once per physics step.

use std::time::Duration;

use serde::Serialize;

use crate::entities::{CollectibleKind, Facing, HazardKind, Platform, RunState};
use crate::game::Phase;
use crate::leaderboard::ScoreEntry;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub walking: bool,
    pub airborne: bool,
    pub powered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Hazard(HazardKind),
    Collectible(CollectibleKind),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub phase: Phase,
    pub frame: u64,
    pub score: u32,
    pub player_name: Option<String>,
    pub camera_offset: f32,
    pub player: PlayerPose,
    pub platforms: Vec<Platform>,
    /// Ordered by id.
    pub entities: Vec<EntityView>,
    pub top_scores: Vec<ScoreEntry>,
}

impl FrameSnapshot {
    pub fn capture(
        phase: Phase,
        run: &RunState,
        player_name: Option<&str>,
        top_scores: &[ScoreEntry],
    ) -> Self {
        let p = &run.player;
        let hazards = run.hazards.iter().map(|h| EntityView {
            id: h.id,
            kind: EntityKind::Hazard(h.kind),
            x: h.x,
            y: h.y,
            visible: h.alive,
        });
        let items = run.collectibles.iter().map(|c| EntityView {
            id: c.id,
            kind: EntityKind::Collectible(c.kind),
            x: c.x,
            y: c.y,
            visible: !c.collected,
        });
        let mut entities: Vec<EntityView> = hazards.chain(items).collect();
        entities.sort_by_key(|e| e.id);

        Self {
            phase,
            frame: run.frame,
            score: run.score,
            player_name: player_name.map(str::to_string),
            camera_offset: run.camera.offset,
            player: PlayerPose {
                x: p.x,
                y: p.y,
                facing: p.facing,
                walking: p.is_walking,
                airborne: p.is_jumping,
                powered: p.is_powered,
            },
            platforms: run.platforms.clone(),
            entities,
            top_scores: top_scores.to_vec(),
        }
    }

    /// Ids whose view differs from `prev` (new ids included).
    pub fn changed_entities(&self, prev: &FrameSnapshot) -> Vec<u32> {
        self.entities
            .iter()
            .filter(|e| prev.entities.iter().find(|p| p.id == e.id) != Some(*e))
            .map(|e| e.id)
            .collect()
    }
}

/// Rate limiter for snapshot publication.
#[derive(Clone, Debug)]
pub struct SnapshotThrottle {
    interval: Duration,
    last: Option<Duration>,
}

impl SnapshotThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True (and records `now`) when a snapshot is due.  `force` bypasses
    /// the interval, e.g. on a phase change.
    pub fn ready(&mut self, now: Duration, force: bool) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => force || now.saturating_sub(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}
