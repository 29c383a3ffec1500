//! "복사됨" feedback after copying a cafe address.
//!
//! Every copy bumps a generation counter and schedules a reset tagged with
//! it. A reset whose generation is stale is dropped, so a second copy keeps
//! the feedback visible for its own full period.

use crate::environment::AppEnvironment;
use bringin_core::effect::Effect;
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

/// Copy feedback state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyState {
    /// Feedback is showing
    pub copied: bool,
    /// Bumped on every copy
    pub generation: u64,
    /// Text handed to the clipboard last
    pub last_copied: Option<String>,
}

/// Copy feedback inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyAction {
    /// Copy `text` to the clipboard
    Copy(String),
    /// Feedback period for `generation` elapsed (delayed)
    Reset(u64),
}

/// Reducer for copy feedback
#[derive(Clone, Debug, Default)]
pub struct CopyReducer;

impl CopyReducer {
    /// Creates a new `CopyReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CopyReducer {
    type State = CopyState;
    type Action = CopyAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut CopyState, action: CopyAction, env: &AppEnvironment) -> Effects<CopyAction> {
        match action {
            CopyAction::Copy(text) => {
                state.generation = state.generation.wrapping_add(1);
                state.copied = true;
                tracing::debug!(generation = state.generation, "Copied to clipboard");
                state.last_copied = Some(text);
                smallvec![Effect::delay(env.config.copy_feedback, CopyAction::Reset(state.generation))]
            },
            CopyAction::Reset(generation) => {
                if generation == state.generation {
                    state.copied = false;
                }
                smallvec![Effect::None]
            },
        }
    }
}
