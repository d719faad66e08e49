//! Table-driven finite-state machine.
//!
//! A [`StateMachine`] holds a current state and an ordered table of
//! [`Transition`]s.  Each transition names the state it leaves, a guard
//! predicate over a caller-supplied snapshot `G`, the state it enters, and an
//! effect value `E` that the caller is responsible for applying.
//!
//! | Step | Who | What |
//! |------|-----|------|
//! | 1 | machine | [`StateMachine::next_transition`] finds the first matching row |
//! | 2 | caller  | applies the row's effect |
//! | 3 | caller  | [`StateMachine::enter`] commits the target state, only if the effect succeeded |
//!
//! Splitting evaluation from commit lets an effect fail without moving the
//! machine, so the same transition is retried on the next tick.
//!
//! # Example
//!
//! ```rust
//! use playbook_gameplay::state_machine::{StateMachine, Transition};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Light { Red, Green }
//!
//! let mut sm = StateMachine::new(Light::Red, vec![
//!     Transition::new(Light::Red, |go: &bool| *go, Light::Green, "lamp on", "go"),
//!     Transition::new(Light::Green, |go: &bool| !*go, Light::Red, "lamp off", "stop"),
//! ]);
//!
//! assert!(sm.next_transition(&false).is_none());
//! let t = *sm.next_transition(&true).unwrap();
//! assert_eq!(t.effect, "lamp on");
//! sm.enter(t.to);
//! assert_eq!(sm.state(), Light::Green);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Transition
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the transition table.
pub struct Transition<S, G, E> {
    pub from: S,
    pub guard: fn(&G) -> bool,
    pub to: S,
    pub effect: E,
    /// Human-readable reason, used in logs.
    pub label: &'static str,
}

impl<S, G, E> Transition<S, G, E> {
    pub fn new(from: S, guard: fn(&G) -> bool, to: S, effect: E, label: &'static str) -> Self {
        Self {
            from,
            guard,
            to,
            effect,
            label,
        }
    }
}

impl<S: Clone, G, E: Clone> Clone for Transition<S, G, E> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            guard: self.guard,
            to: self.to.clone(),
            effect: self.effect.clone(),
            label: self.label,
        }
    }
}

impl<S: Copy, G, E: Copy> Copy for Transition<S, G, E> {}

impl<S: std::fmt::Debug, G, E: std::fmt::Debug> std::fmt::Debug for Transition<S, G, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("effect", &self.effect)
            .field("label", &self.label)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StateMachine
// ─────────────────────────────────────────────────────────────────────────────

/// A current state plus its transition table.
pub struct StateMachine<S, G, E> {
    initial: S,
    state: S,
    transitions: Vec<Transition<S, G, E>>,
}

impl<S, G, E> StateMachine<S, G, E>
where
    S: Copy + PartialEq,
{
    /// Build a machine starting in `initial`.  Rows are evaluated in the
    /// order given.
    pub fn new(initial: S, transitions: Vec<Transition<S, G, E>>) -> Self {
        Self {
            initial,
            state: initial,
            transitions,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// The first transition out of the current state whose guard holds for
    /// `guards`, if any.
    pub fn next_transition(&self, guards: &G) -> Option<&Transition<S, G, E>> {
        self.transitions
            .iter()
            .find(|t| t.from == self.state && (t.guard)(guards))
    }

    /// Commit `state` as the current state.
    pub fn enter(&mut self, state: S) {
        self.state = state;
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    pub fn transitions(&self) -> &[Transition<S, G, E>] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Idle,
        Busy,
        Done,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Act {
        Begin,
        Finish,
        Again,
    }

    struct Snapshot {
        ready: bool,
        finished: bool,
        repeat: bool,
    }

    fn machine() -> StateMachine<Phase, Snapshot, Act> {
        StateMachine::new(
            Phase::Idle,
            vec![
                Transition::new(Phase::Idle, |s: &Snapshot| s.ready, Phase::Busy, Act::Begin, "ready"),
                Transition::new(
                    Phase::Busy,
                    |s: &Snapshot| s.finished && s.repeat,
                    Phase::Busy,
                    Act::Again,
                    "repeat",
                ),
                Transition::new(Phase::Busy, |s: &Snapshot| s.finished, Phase::Done, Act::Finish, "finished"),
            ],
        )
    }

    fn snap(ready: bool, finished: bool, repeat: bool) -> Snapshot {
        Snapshot {
            ready,
            finished,
            repeat,
        }
    }

    #[test]
    fn starts_in_initial_state() {
        assert_eq!(machine().state(), Phase::Idle);
    }

    #[test]
    fn no_transition_when_guard_fails() {
        let sm = machine();
        assert!(sm.next_transition(&snap(false, true, true)).is_none());
    }

    #[test]
    fn only_rows_leaving_current_state_match() {
        let sm = machine();
        let t = sm.next_transition(&snap(true, true, false)).unwrap();
        assert_eq!(t.effect, Act::Begin);
        assert_eq!(t.label, "ready");
    }

    #[test]
    fn next_transition_does_not_move_the_machine() {
        let sm = machine();
        let _ = sm.next_transition(&snap(true, false, false));
        assert_eq!(sm.state(), Phase::Idle);
    }

    #[test]
    fn first_matching_row_wins() {
        let mut sm = machine();
        sm.enter(Phase::Busy);
        let t = sm.next_transition(&snap(false, true, true)).unwrap();
        assert_eq!(t.effect, Act::Again);
        assert_eq!(t.to, Phase::Busy);

        let t = sm.next_transition(&snap(false, true, false)).unwrap();
        assert_eq!(t.effect, Act::Finish);
    }

    #[test]
    fn enter_and_reset() {
        let mut sm = machine();
        sm.enter(Phase::Done);
        assert_eq!(sm.state(), Phase::Done);
        assert!(sm.next_transition(&snap(true, true, true)).is_none());
        sm.reset();
        assert_eq!(sm.state(), Phase::Idle);
    }

    #[test]
    fn transitions_are_copyable() {
        let sm = machine();
        let t = *sm.next_transition(&snap(true, false, false)).unwrap();
        assert_eq!(t.to, Phase::Busy);
        assert_eq!(sm.transitions().len(), 3);
    }
}
