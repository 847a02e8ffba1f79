use std::time::Duration;

use portfolio_arcade::entities::*;

fn sample_roster() -> Roster {
    RosterBuilder::new(10.0, 80.0)
        .platform(0.0, 80.0, 60.0)
        .hazard(HazardKind::Ground, 40.0, 80.0, 10.0, 0.0)
        .collectible(CollectibleKind::Coin, 25.0, 75.0)
        .hazard(HazardKind::Flying, 100.0, 50.0, 12.0, 1.0)
        .collectible(CollectibleKind::Power, 175.0, 55.0)
        .build()
}

#[test]
fn entity_clone_and_eq() {
    assert_eq!(HazardKind::Ground, HazardKind::Ground);
    assert_ne!(HazardKind::Ground, HazardKind::Flying);
    assert_ne!(CollectibleKind::Coin, CollectibleKind::Power);
    assert_ne!(RunStatus::Running, RunStatus::Over(EndCause::Fell));
    assert_ne!(
        EndCause::Struck { hazard: 1 },
        EndCause::Struck { hazard: 2 }
    );
}

#[test]
fn roster_ids_are_unique_across_entity_kinds() {
    let roster = sample_roster();
    let hazard_ids: Vec<u32> = roster.hazards.iter().map(|h| h.id).collect();
    let item_ids: Vec<u32> = roster.collectibles.iter().map(|c| c.id).collect();
    assert_eq!(hazard_ids, vec![1, 3]);
    assert_eq!(item_ids, vec![2, 4]);
    assert_eq!(roster.platforms.len(), 1);
    assert_eq!(roster.spawn, (10.0, 80.0));
}

#[test]
fn new_hazard_starts_alive_at_its_origin() {
    let h = Hazard::new(9, HazardKind::Flying, 100.0, 50.0, 12.0, 0.5);
    assert!(h.alive);
    assert_eq!(h.origin_x, 100.0);
    assert_eq!(h.base_y, 50.0);
    assert_eq!(h.direction, 1.0);
    assert_eq!(h.min_x(), 88.0);
    assert_eq!(h.max_x(), 112.0);
}

#[test]
fn platform_overlap_is_inclusive() {
    let p = Platform::new(10.0, 60.0, 20.0);
    assert!(p.overlaps(28.0, 32.0));
    assert!(p.overlaps(30.0, 34.0));
    assert!(p.overlaps(6.0, 10.0));
    assert!(!p.overlaps(30.5, 34.0));
    assert!(!p.overlaps(5.0, 9.5));
}

#[test]
fn run_state_from_roster_is_fresh() {
    let roster = sample_roster();
    let run = RunState::from_roster(&roster, Duration::from_secs(3));
    assert_eq!(run.player, Player::spawn(10.0, 80.0));
    assert_eq!(run.score, 0);
    assert_eq!(run.frame, 0);
    assert_eq!(run.camera, Camera::default());
    assert!(run.is_running());
    assert!(run.hazards.iter().all(|h| h.alive));
    assert!(run.collectibles.iter().all(|c| !c.collected));
    assert_eq!(run.elapsed(Duration::from_secs(5)), Duration::from_secs(2));
    assert_eq!(run.elapsed(Duration::from_secs(1)), Duration::ZERO);
}

#[test]
fn run_state_clone_is_independent() {
    let original = RunState::from_roster(&sample_roster(), Duration::ZERO);
    let mut cloned = original.clone();

    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.hazards[0].alive = false;
    cloned.collectibles[0].collected = true;

    assert_eq!(original.player.x, 10.0);
    assert_eq!(original.score, 0);
    assert!(original.hazards[0].alive);
    assert!(!original.collectibles[0].collected);
}
