//! Logical input: physical bindings fold into three actions.
//!
//! Event handlers only call [`InputState::press`] / [`InputState::release`];
//! the frame step reads [`InputState::held`] once per frame.  Any active
//! binding for an action asserts it.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

/// A physical source of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Printable key, stored lower-case.
    Key(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Space,
    Touch(TouchButton),
}

/// Actions asserted for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldActions {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl HeldActions {
    pub const NONE: HeldActions = HeldActions {
        left: false,
        right: false,
        jump: false,
    };

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::NONE
        }
    }
}

/// Held-binding map.
///
/// Records the frame each binding was last pressed (or repeated).  Bindings
/// leave the map on release.  Hosts that never report releases pass a
/// `hold_window`: bindings then also expire once that many frames pass
/// without a refresh.  With `None` a binding stays held until released.
#[derive(Clone, Debug)]
pub struct InputState {
    bindings: HashMap<Binding, Action>,
    last_seen: HashMap<Binding, u64>,
    hold_window: Option<u64>,
}

impl InputState {
    pub fn new(hold_window: Option<u64>) -> Self {
        Self {
            bindings: default_bindings(),
            last_seen: HashMap::new(),
            hold_window,
        }
    }

    pub fn bind(&mut self, binding: Binding, action: Action) {
        self.bindings.insert(normalize(binding), action);
    }

    /// Press or auto-repeat.  Unbound keys are ignored.
    pub fn press(&mut self, binding: Binding, frame: u64) {
        let binding = normalize(binding);
        if self.bindings.contains_key(&binding) {
            self.last_seen.insert(binding, frame);
        }
    }

    pub fn release(&mut self, binding: Binding) {
        self.last_seen.remove(&normalize(binding));
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn held(&self, frame: u64) -> HeldActions {
        let mut held = HeldActions::NONE;
        for (binding, &seen) in &self.last_seen {
            if self
                .hold_window
                .is_some_and(|window| frame.saturating_sub(seen) > window)
            {
                continue;
            }
            match self.bindings.get(binding) {
                Some(Action::MoveLeft) => held.left = true,
                Some(Action::MoveRight) => held.right = true,
                Some(Action::Jump) => held.jump = true,
                None => {}
            }
        }
        held
    }
}

fn normalize(binding: Binding) -> Binding {
    match binding {
        Binding::Key(c) => Binding::Key(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Arrows, WASD-style letters, space, and the on-screen touch buttons.
pub fn default_bindings() -> HashMap<Binding, Action> {
    HashMap::from([
        (Binding::ArrowLeft, Action::MoveLeft),
        (Binding::Key('a'), Action::MoveLeft),
        (Binding::Touch(TouchButton::Left), Action::MoveLeft),
        (Binding::ArrowRight, Action::MoveRight),
        (Binding::Key('d'), Action::MoveRight),
        (Binding::Touch(TouchButton::Right), Action::MoveRight),
        (Binding::ArrowUp, Action::Jump),
        (Binding::Space, Action::Jump),
        (Binding::Key('w'), Action::Jump),
        (Binding::Touch(TouchButton::Jump), Action::Jump),
    ])
}
