//! Game state machine.
//!
//! ```text
//! START ──begin──▶ ENTER_NAME ──confirm_name──▶ PLAYING ──(death)──▶ GAME_OVER
//!   └────begin (name already known)────────────▶   ▲                    │
//!                                                  └──────restart───────┘
//! ```
//!
//! [`Game`] owns the authoritative [`RunState`].  The host loop asks for a
//! [`FrameTicket`] before each step; leaving `PLAYING` bumps the generation,
//! so tickets issued for an earlier run are ignored instead of stepping
//! reset state.

use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use serde::Serialize;

use crate::clock::Clock;
use crate::compute::{tick, FrameTime};
use crate::entities::{EndCause, Roster, RunState, RunStatus};
use crate::error::GameError;
use crate::input::HeldActions;
use crate::leaderboard::{merge_top_scores, ScoreEntry, ScoreReporter};
use crate::ruleset::Ruleset;
use crate::snapshot::{FrameSnapshot, SnapshotThrottle};

const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Start,
    EnterName,
    Playing,
    GameOver,
}

/// Permission to run one frame of a particular run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not playing, or the ticket was stale.  Nothing changed.
    Idle,
    Running,
    Ended { score: u32, cause: EndCause },
}

pub struct Game {
    ruleset: Box<dyn Ruleset>,
    clock: Arc<dyn Clock>,
    pristine: Roster,
    run: RunState,
    phase: Phase,
    player_name: Option<String>,
    generation: u64,
    top_scores: Vec<ScoreEntry>,
    reporter: Option<ScoreReporter>,
    throttle: SnapshotThrottle,
    published_phase: Option<Phase>,
}

impl Game {
    /// A game in `START`.  `player_name`, if non-blank, lets `begin` skip
    /// name entry.
    pub fn new(
        ruleset: Box<dyn Ruleset>,
        clock: Arc<dyn Clock>,
        player_name: Option<String>,
        rng: &mut dyn RngCore,
    ) -> Self {
        let pristine = ruleset.roster(rng);
        let run = RunState::from_roster(&pristine, clock.now());
        Self {
            ruleset,
            clock,
            pristine,
            run,
            phase: Phase::Start,
            player_name: player_name.as_deref().and_then(clean_name),
            generation: 0,
            top_scores: Vec::new(),
            reporter: None,
            throttle: SnapshotThrottle::new(DEFAULT_SNAPSHOT_INTERVAL),
            published_phase: None,
        }
    }

    pub fn with_reporter(mut self, reporter: ScoreReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_snapshot_interval(mut self, interval: Duration) -> Self {
        self.throttle = SnapshotThrottle::new(interval);
        self
    }

    /// Seed the displayed board, typically from `list_top_scores`.
    pub fn set_top_scores(&mut self, entries: Vec<ScoreEntry>) {
        self.top_scores = entries;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top_scores
    }

    pub fn ruleset(&self) -> &dyn Ruleset {
        self.ruleset.as_ref()
    }

    /// Detach the reporter, e.g. to drain it on shutdown.
    pub fn take_reporter(&mut self) -> Option<ScoreReporter> {
        self.reporter.take()
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn begin(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Start, "begin")?;
        if self.player_name.is_some() {
            self.start_run();
        } else {
            self.set_phase(Phase::EnterName);
        }
        Ok(())
    }

    /// Whether `input` would be accepted by [`Game::confirm_name`].
    pub fn can_confirm(input: &str) -> bool {
        clean_name(input).is_some()
    }

    pub fn confirm_name(&mut self, input: &str) -> Result<(), GameError> {
        self.expect_phase(Phase::EnterName, "confirm a name")?;
        let name = clean_name(input).ok_or(GameError::BlankName)?;
        self.player_name = Some(name);
        self.start_run();
        Ok(())
    }

    /// New run with the same player name.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::GameOver, "restart")?;
        self.start_run();
        Ok(())
    }

    // ── Frame loop ───────────────────────────────────────────────────────────

    pub fn request_frame(&self) -> Option<FrameTicket> {
        (self.phase == Phase::Playing).then_some(FrameTicket {
            generation: self.generation,
        })
    }

    pub fn step(&mut self, ticket: FrameTicket, held: HeldActions, dt: f32) -> StepOutcome {
        if self.phase != Phase::Playing || ticket.generation != self.generation {
            return StepOutcome::Idle;
        }
        let time = FrameTime::new(self.clock.now(), dt);
        self.run = tick(&self.run, self.ruleset.as_ref(), held, time);

        match self.run.status {
            RunStatus::Running => StepOutcome::Running,
            RunStatus::Over(cause) => {
                self.finish_run(cause);
                StepOutcome::Ended {
                    score: self.run.score,
                    cause,
                }
            }
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(
            self.phase,
            &self.run,
            self.player_name.as_deref(),
            &self.top_scores,
        )
    }

    /// A snapshot if the throttle interval has passed or the phase changed
    /// since the last one.
    pub fn publish(&mut self) -> Option<FrameSnapshot> {
        let phase_changed = self.published_phase != Some(self.phase);
        if !self.throttle.ready(self.clock.now(), phase_changed) {
            return None;
        }
        self.published_phase = Some(self.phase);
        Some(self.snapshot())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::IllegalTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::info!(from = ?self.phase, to = ?phase, ruleset = self.ruleset.name(), "phase change");
        self.phase = phase;
    }

    fn start_run(&mut self) {
        self.generation += 1;
        self.run = RunState::from_roster(&self.pristine, self.clock.now());
        self.set_phase(Phase::Playing);
    }

    fn finish_run(&mut self, cause: EndCause) {
        self.generation += 1;
        let score = self.run.score;
        tracing::info!(score, ?cause, frames = self.run.frame, "run over");

        if let Some(name) = &self.player_name {
            let entry = ScoreEntry::new(name.clone(), score);
            self.top_scores = merge_top_scores(&self.top_scores, entry.clone());
            if let Some(reporter) = &self.reporter {
                reporter.report(entry);
            }
        }
        self.set_phase(Phase::GameOver);
    }
}

fn clean_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
