//! # BringIn Core
//!
//! Primitives shared by every BringIn flow: the reducer contract, effect
//! descriptions, injected environment traits and the step machine that each
//! multi-step screen (phone login, QR entry, booking, owner QR auth, owner
//! dashboard) instantiates.
//!
//! ## Core Concepts
//!
//! - **State**: everything a flow needs to render its current step
//! - **Action**: user gestures, timer callbacks and mocked collaborator replies
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`, synchronous
//! - **Effect**: a description of deferred work (a UX timer, a mocked lookup)
//! - **Environment**: clock, id generation and mocked collaborators
//!
//! All state transitions happen inside `reduce`. Effects never mutate state
//! directly; they only feed new actions back into the reducer.
//!
//! ## Example
//!
//! ```
//! use bringin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct PartyState {
//!     people: u32,
//! }
//!
//! enum PartyAction {
//!     Add,
//!     Remove,
//! }
//!
//! struct PartyReducer;
//!
//! impl Reducer for PartyReducer {
//!     type State = PartyState;
//!     type Action = PartyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PartyState,
//!         action: PartyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<PartyAction>; 4]> {
//!         match action {
//!             PartyAction::Add => state.people += 1,
//!             PartyAction::Remove => state.people = state.people.saturating_sub(1).max(1),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = PartyState { people: 1 };
//! PartyReducer.reduce(&mut state, PartyAction::Add, &());
//! assert_eq!(state.people, 2);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition helpers
pub mod composition;

/// Generic step machine used by every multi-step flow
pub mod flow;

/// Reducer module - the contract every flow implements
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Effects returned by a single `reduce` call.
    ///
    /// Almost every action yields zero or one effect, so four inline slots
    /// keep the common path allocation-free.
    pub type Effects<Action> = SmallVec<[Effect<Action>; 4]>;

    /// The Reducer trait - business logic for one flow
    ///
    /// # Type Parameters
    ///
    /// - `State`: what the flow owns (current step plus captured payload)
    /// - `Action`: every input the flow reacts to
    /// - `Environment`: injected clock, ids and mocked collaborators
    ///
    /// A reducer must be deterministic for a given environment: the same
    /// state and action always produce the same new state and effects.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply `action` to `state` in place and describe follow-up work.
        ///
        /// Invalid input must leave `state` unchanged apart from the
        /// rejection message the flow keeps for display.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Effect module - descriptions of deferred work
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// A boxed, sendable future resolving to an optional follow-up action
    pub type ActionFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes work the runtime performs after `reduce`
    ///
    /// Effects are values. Reducers return them; the runtime executes them
    /// and feeds any produced action back through the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another
        Sequential(Vec<Effect<Action>>),

        /// Dispatch `action` after `duration` (scan simulation, copy feedback)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation (mocked verifier calls)
        ///
        /// If it resolves to `Some`, the action is fed back into the reducer.
        Future(ActionFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Schedule `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// The action a `Delay` effect will dispatch, if this is one
        #[must_use]
        pub fn delayed_action(&self) -> Option<&Action> {
            match self {
                Effect::Delay { action, .. } => Some(action),
                _ => None,
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Lift this effect into a parent action type.
        ///
        /// Parent flows embed child flows by wrapping child actions in one of
        /// their own variants; `map` rewrites every action the effect can
        /// produce with `f` so feedback is routed back through the parent.
        #[must_use]
        pub fn map<Parent, F>(self, f: F) -> Effect<Parent>
        where
            F: Fn(Action) -> Parent + Clone + Send + Sync + 'static,
            Parent: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => {
                    Effect::Future(Box::pin(async move { fut.await.map(f) }))
                },
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// Time and identity are the only ambient inputs a flow reads. Both are
/// injected so tests can pin them.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by `Utc::now()`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of identifiers for seats, usage records, foods and seat types.
    ///
    /// Seat resync must assign identities deterministically in tests, so
    /// identifiers come from the environment rather than from wall-clock time.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier, prefixed with `kind` (e.g. `"seat"`)
        fn next_id(&self, kind: &str) -> String;
    }

    /// Random UUID identifiers for interactive use
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidIds;

    impl IdGenerator for UuidIds {
        fn next_id(&self, kind: &str) -> String {
            format!("{kind}-{}", uuid::Uuid::new_v4())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, IdGenerator, SystemClock, UuidIds};
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum Child {
        Tick,
    }

    #[derive(Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn map_rewrites_delayed_action() {
        let effect = Effect::delay(Duration::from_millis(5), Child::Tick).map(Parent::Child);
        assert_eq!(effect.delayed_action(), Some(&Parent::Child(Child::Tick)));
    }

    #[test]
    fn map_rewrites_nested_effects() {
        let effect = Effect::chain(vec![
            Effect::None,
            Effect::delay(Duration::from_millis(1), Child::Tick),
        ])
        .map(Parent::Child);

        let Effect::Sequential(inner) = effect else {
            unreachable!("map preserves the effect shape");
        };
        assert!(inner[0].is_none());
        assert_eq!(inner[1].delayed_action(), Some(&Parent::Child(Child::Tick)));
    }

    #[test]
    fn map_rewrites_future_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Tick) }));
        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map preserves the effect shape");
        };
        assert_eq!(tokio_test::block_on(fut), Some(Parent::Child(Child::Tick)));
    }

    #[test]
    fn uuid_ids_are_prefixed_and_unique() {
        let ids = UuidIds;
        let a = ids.next_id("seat");
        let b = ids.next_id("seat");
        assert!(a.starts_with("seat-"));
        assert_ne!(a, b);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
