use portfolio_arcade::config::Tuning;
use portfolio_arcade::entities::Player;
use portfolio_arcade::input::*;
use portfolio_arcade::physics::integrate;
use portfolio_arcade::ruleset::JumpPolicy;

#[test]
fn nothing_held_by_default() {
    let input = InputState::new(Some(4));
    assert_eq!(input.held(0), HeldActions::NONE);
}

#[test]
fn any_binding_asserts_its_action() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::Key('d'), 1);
    input.press(Binding::Space, 1);
    assert_eq!(
        input.held(1),
        HeldActions {
            right: true,
            jump: true,
            ..HeldActions::NONE
        }
    );

    let mut touch = InputState::new(Some(4));
    touch.press(Binding::Touch(TouchButton::Left), 1);
    assert_eq!(touch.held(1), HeldActions::left());
}

#[test]
fn action_stays_held_while_another_binding_is_down() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::ArrowUp, 1);
    input.press(Binding::Key('w'), 1);
    input.release(Binding::ArrowUp);
    assert_eq!(input.held(1), HeldActions::jump());
    input.release(Binding::Key('w'));
    assert_eq!(input.held(1), HeldActions::NONE);
}

#[test]
fn letters_are_case_insensitive() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::Key('A'), 1);
    assert_eq!(input.held(1), HeldActions::left());
    input.release(Binding::Key('a'));
    assert_eq!(input.held(1), HeldActions::NONE);
}

#[test]
fn unbound_keys_are_ignored() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::Key('z'), 1);
    assert_eq!(input.held(1), HeldActions::NONE);

    input.bind(Binding::Key('Z'), Action::Jump);
    input.press(Binding::Key('z'), 2);
    assert_eq!(input.held(2), HeldActions::jump());
}

#[test]
fn unrefreshed_bindings_expire_after_the_hold_window() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::ArrowRight, 10);
    assert_eq!(input.held(14), HeldActions::right());
    assert_eq!(input.held(15), HeldActions::NONE);

    // Auto-repeat refreshes the binding.
    input.press(Binding::ArrowRight, 15);
    assert_eq!(input.held(18), HeldActions::right());
}

#[test]
fn clear_releases_everything() {
    let mut input = InputState::new(Some(4));
    input.press(Binding::ArrowLeft, 1);
    input.press(Binding::Space, 1);
    input.clear();
    assert_eq!(input.held(1), HeldActions::NONE);
}

#[test]
fn default_bindings_cover_all_actions() {
    let bindings = default_bindings();
    for action in [Action::MoveLeft, Action::MoveRight, Action::Jump] {
        assert!(bindings.values().any(|a| *a == action));
    }
    assert_eq!(bindings.get(&Binding::Space), Some(&Action::Jump));
}

#[test]
fn without_a_hold_window_bindings_last_until_released() {
    let mut input = InputState::new(None);
    input.press(Binding::Space, 1);
    assert_eq!(input.held(6), HeldActions::jump());
    assert_eq!(input.held(600), HeldActions::jump());
    input.release(Binding::Space);
    assert_eq!(input.held(601), HeldActions::NONE);
}

#[test]
fn held_jump_without_repeats_is_not_cut_short() {
    let tuning = Tuning::platformer();
    let mut input = InputState::new(None);
    input.press(Binding::Space, 1);

    let mut through_input = Player::spawn(10.0, 80.0);
    let mut held_throughout = Player::spawn(10.0, 80.0);
    for frame in 1..=30 {
        through_input = integrate(
            &through_input,
            input.held(frame),
            1.0,
            &tuning,
            JumpPolicy::Grounded,
            None,
        );
        held_throughout = integrate(
            &held_throughout,
            HeldActions::jump(),
            1.0,
            &tuning,
            JumpPolicy::Grounded,
            None,
        );
    }
    assert_eq!(through_input, held_throughout);
}
