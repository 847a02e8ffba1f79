use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use portfolio_arcade::clock::ManualClock;
use portfolio_arcade::config::{ArcadeConfig, Tuning};
use portfolio_arcade::entities::{CollectibleKind, EndCause, HazardKind, Roster, RosterBuilder};
use portfolio_arcade::error::{GameError, LeaderboardError};
use portfolio_arcade::game::{Game, Phase, StepOutcome};
use portfolio_arcade::input::HeldActions;
use portfolio_arcade::leaderboard::{
    Leaderboard, MemoryLeaderboard, ScoreEntry, ScoreReporter, TOP_N,
};
use portfolio_arcade::ruleset::{Ruleset, Variant};

const FRAME: Duration = Duration::from_millis(16);

/// Fixed level: a coin at the spawn point and a stationary hazard to the right.
struct Corridor {
    tuning: Tuning,
}

impl Ruleset for Corridor {
    fn name(&self) -> &'static str {
        "corridor"
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn roster(&self, _rng: &mut dyn RngCore) -> Roster {
        RosterBuilder::new(10.0, 80.0)
            .platform(0.0, 80.0, 200.0)
            .hazard(HazardKind::Ground, 40.0, 80.0, 0.0, 0.0)
            .collectible(CollectibleKind::Coin, 10.0, 75.0)
            .build()
    }
}

struct BrokenBoard;

impl Leaderboard for BrokenBoard {
    fn list_top_scores(&self, _limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Err(LeaderboardError::Poisoned)
    }

    fn submit_score(&self, _name: &str, _score: u32) -> Result<bool, LeaderboardError> {
        Err(LeaderboardError::Poisoned)
    }
}

fn corridor_game(clock: &Arc<ManualClock>, name: Option<&str>) -> Game {
    Game::new(
        Box::new(Corridor {
            tuning: Tuning::platformer(),
        }),
        clock.clone(),
        name.map(str::to_string),
        &mut StdRng::seed_from_u64(7),
    )
}

/// Step with `held` until the run ends or `max_frames` pass.
fn play_until_over(
    game: &mut Game,
    clock: &ManualClock,
    held: HeldActions,
    max_frames: usize,
) -> StepOutcome {
    let mut last = StepOutcome::Idle;
    for _ in 0..max_frames {
        let Some(ticket) = game.request_frame() else {
            break;
        };
        clock.advance(FRAME);
        last = game.step(ticket, held, 1.0);
        if matches!(last, StepOutcome::Ended { .. }) {
            break;
        }
    }
    last
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn new_game_starts_idle() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let game = corridor_game(&clock, None);
    assert_eq!(game.phase(), Phase::Start);
    assert!(game.request_frame().is_none());
    assert!(game.player_name().is_none());
}

#[test]
fn begin_asks_for_a_name_when_none_is_known() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, None);
    game.begin().unwrap();
    assert_eq!(game.phase(), Phase::EnterName);
    assert!(game.request_frame().is_none());
}

#[test]
fn blank_name_is_rejected_and_phase_kept() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, None);
    game.begin().unwrap();

    assert!(matches!(game.confirm_name("   "), Err(GameError::BlankName)));
    assert!(matches!(game.confirm_name(""), Err(GameError::BlankName)));
    assert_eq!(game.phase(), Phase::EnterName);
    assert!(!Game::can_confirm(" \t "));
    assert!(Game::can_confirm(" x "));
}

#[test]
fn confirmed_name_is_trimmed_and_starts_play() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, None);
    game.begin().unwrap();
    game.confirm_name("  ada  ").unwrap();

    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.player_name(), Some("ada"));
    assert!(game.request_frame().is_some());
}

#[test]
fn known_name_skips_name_entry() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.player_name(), Some("ACE"));
}

#[test]
fn blank_preset_name_counts_as_unknown() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("   "));
    assert!(game.player_name().is_none());
    game.begin().unwrap();
    assert_eq!(game.phase(), Phase::EnterName);
}

#[test]
fn transitions_outside_their_phase_are_errors() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));

    assert!(matches!(
        game.restart(),
        Err(GameError::IllegalTransition { phase: Phase::Start, .. })
    ));
    assert!(matches!(
        game.confirm_name("ACE"),
        Err(GameError::IllegalTransition { phase: Phase::Start, .. })
    ));

    game.begin().unwrap();
    assert!(matches!(
        game.begin(),
        Err(GameError::IllegalTransition { phase: Phase::Playing, .. })
    ));
    assert!(matches!(
        game.restart(),
        Err(GameError::IllegalTransition { phase: Phase::Playing, .. })
    ));
    assert_eq!(game.phase(), Phase::Playing);
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[test]
fn standing_still_keeps_running() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();

    let outcome = play_until_over(&mut game, &clock, HeldActions::NONE, 120);
    assert_eq!(outcome, StepOutcome::Running);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.run().frame, 120);
    assert_eq!(game.run().score, 100);
    assert_eq!(game.run().player.y, 80.0);
}

#[test]
fn walking_into_a_hazard_ends_the_run() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();

    let outcome = play_until_over(&mut game, &clock, HeldActions::right(), 200);
    assert_eq!(
        outcome,
        StepOutcome::Ended {
            score: 100,
            cause: EndCause::Struck { hazard: 1 },
        }
    );
    assert_eq!(game.phase(), Phase::GameOver);
    assert!(game.request_frame().is_none());
}

#[test]
fn stale_ticket_does_not_step_the_next_run() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();

    let Some(stale) = game.request_frame() else {
        panic!("playing game must hand out tickets");
    };
    play_until_over(&mut game, &clock, HeldActions::right(), 200);
    game.restart().unwrap();

    assert_eq!(game.step(stale, HeldActions::right(), 1.0), StepOutcome::Idle);
    assert_eq!(game.run().frame, 0);

    let Some(fresh) = game.request_frame() else {
        panic!("restarted game must hand out tickets");
    };
    assert_eq!(game.step(fresh, HeldActions::NONE, 1.0), StepOutcome::Running);
    assert_eq!(game.run().frame, 1);
}

#[test]
fn restart_resets_the_run_but_keeps_the_name() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();
    play_until_over(&mut game, &clock, HeldActions::right(), 200);

    game.restart().unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.player_name(), Some("ACE"));
    let run = game.run();
    assert_eq!(run.score, 0);
    assert_eq!(run.frame, 0);
    assert!(run.is_running());
    assert_eq!((run.player.x, run.player.y), (10.0, 80.0));
    assert!(run.collectibles.iter().all(|c| !c.collected));
    assert!(run.hazards.iter().all(|h| h.alive));
}

// ── Scores ────────────────────────────────────────────────────────────────────

#[test]
fn final_score_merges_into_top_scores_and_reaches_the_board() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let board = Arc::new(MemoryLeaderboard::with_entries(vec![ScoreEntry::new("ACE", 500)]));

    let mut game = corridor_game(&clock, Some("BOB"))
        .with_reporter(ScoreReporter::spawn(board.clone()));
    game.set_top_scores(board.list_top_scores(TOP_N).unwrap());
    game.begin().unwrap();
    play_until_over(&mut game, &clock, HeldActions::right(), 200);

    assert_eq!(
        game.top_scores(),
        &[ScoreEntry::new("ACE", 500), ScoreEntry::new("BOB", 100)]
    );

    if let Some(reporter) = game.take_reporter() {
        reporter.shutdown();
    }
    assert_eq!(
        board.list_top_scores(TOP_N).unwrap(),
        vec![ScoreEntry::new("ACE", 500), ScoreEntry::new("BOB", 100)]
    );
}

#[test]
fn failing_board_does_not_disturb_the_game() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game =
        corridor_game(&clock, Some("BOB")).with_reporter(ScoreReporter::spawn(Arc::new(BrokenBoard)));
    game.begin().unwrap();
    play_until_over(&mut game, &clock, HeldActions::right(), 200);

    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.top_scores(), &[ScoreEntry::new("BOB", 100)]);

    if let Some(reporter) = game.take_reporter() {
        reporter.shutdown();
    }
    game.restart().unwrap();
    assert_eq!(game.phase(), Phase::Playing);
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[test]
fn publish_is_throttled_except_on_phase_change() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game =
        corridor_game(&clock, Some("ACE")).with_snapshot_interval(Duration::from_millis(33));

    assert!(game.publish().is_some());
    assert!(game.publish().is_none());

    game.begin().unwrap();
    let snap = game.publish().expect("phase change forces a snapshot");
    assert_eq!(snap.phase, Phase::Playing);
    assert!(game.publish().is_none());

    clock.advance(Duration::from_millis(20));
    assert!(game.publish().is_none());
    clock.advance(Duration::from_millis(13));
    assert!(game.publish().is_some());
}

#[test]
fn snapshots_report_collected_items_as_changed() {
    let clock = Arc::new(ManualClock::new(Duration::ZERO));
    let mut game = corridor_game(&clock, Some("ACE"));
    game.begin().unwrap();
    let before = game.snapshot();

    let ticket = game.request_frame().unwrap();
    clock.advance(FRAME);
    game.step(ticket, HeldActions::NONE, 1.0);
    let after = game.snapshot();

    assert_eq!(after.score, 100);
    assert_eq!(after.player_name.as_deref(), Some("ACE"));
    let ids: Vec<u32> = after.entities.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(!after.entities[1].visible);
    assert!(after.changed_entities(&before).contains(&2));
    assert!(after.changed_entities(&after).is_empty());
}

// ── Shipped rulesets ──────────────────────────────────────────────────────────

#[test]
fn every_variant_runs_idle_frames() {
    let config = ArcadeConfig::default();
    for variant in Variant::ALL {
        let clock = Arc::new(ManualClock::new(Duration::ZERO));
        let mut game = Game::new(
            variant.ruleset(&config),
            clock.clone(),
            Some("ACE".to_string()),
            &mut StdRng::seed_from_u64(42),
        );
        game.begin().unwrap();
        let ticket = game.request_frame().unwrap();
        clock.advance(FRAME);
        assert_ne!(game.step(ticket, HeldActions::NONE, 1.0), StepOutcome::Idle);
        assert_eq!(game.run().frame, 1);
    }
}
