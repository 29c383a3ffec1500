//! Reducer composition utilities
//!
//! The session controller owns several child flows. Each child keeps its own
//! state, action and reducer; the parent wraps child actions in one of its
//! own variants and routes them down with [`scope`].
//!
//! # Example
//!
//! ```
//! use bringin_core::composition::scope;
//! use bringin_core::{effect::Effect, reducer::{Effects, Reducer}, smallvec};
//!
//! #[derive(Default)]
//! struct CountState { people: u32 }
//! enum CountAction { Add }
//! struct CountReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = CountState;
//!     type Action = CountAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CountState, _: CountAction, _: &()) -> Effects<CountAction> {
//!         state.people += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AppState { count: CountState }
//! enum AppAction { Count(CountAction) }
//!
//! let mut app = AppState::default();
//! let effects: Effects<AppAction> =
//!     scope(&CountReducer, &mut app.count, CountAction::Add, &(), AppAction::Count);
//! assert_eq!(app.count.people, 1);
//! assert!(effects.is_empty());
//! ```

use crate::reducer::{Effects, Reducer};

/// Run a child reducer on a borrowed slice of parent state and lift the
/// resulting effects into the parent action type with `embed`.
pub fn scope<R, Parent, F>(
    reducer: &R,
    state: &mut R::State,
    action: R::Action,
    env: &R::Environment,
    embed: F,
) -> Effects<Parent>
where
    R: Reducer,
    R::Action: Send + 'static,
    Parent: Send + 'static,
    F: Fn(R::Action) -> Parent + Clone + Send + Sync + 'static,
{
    lift(reducer.reduce(state, action, env), embed)
}

/// Lift child effects into the parent action type, dropping no-ops.
pub fn lift<Child, Parent, F>(effects: Effects<Child>, embed: F) -> Effects<Parent>
where
    Child: Send + 'static,
    Parent: Send + 'static,
    F: Fn(Child) -> Parent + Clone + Send + Sync + 'static,
{
    effects
        .into_iter()
        .filter(|effect| !effect.is_none())
        .map(|effect| effect.map(embed.clone()))
        .collect()
}
