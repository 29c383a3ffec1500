//! Step machines for multi-step flows.
//!
//! Every screen sequence in the client (phone login, QR entry, walk-in,
//! booking, owner QR auth) is a finite set of steps plus a table of
//! `(step, event) → step` transitions. [`StepMachine`] is that table;
//! [`Flow`] holds the current step and refuses any pair the table does not
//! list.
//!
//! There is no history stack. A "back" gesture is an ordinary event whose
//! target step is spelled out in the table, so every reachable step is
//! visible in one `match`.
//!
//! # Example
//!
//! ```
//! use bringin_core::flow::{Flow, StepMachine};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Step { Phone, Verify }
//!
//! #[derive(Clone, Copy, Debug)]
//! enum Event { Submit, Back }
//!
//! struct Login;
//!
//! impl StepMachine for Login {
//!     type Step = Step;
//!     type Event = Event;
//!     const NAME: &'static str = "login";
//!     const INITIAL: Step = Step::Phone;
//!
//!     fn transition(from: Step, event: Event) -> Option<Step> {
//!         match (from, event) {
//!             (Step::Phone, Event::Submit) => Some(Step::Verify),
//!             (Step::Verify, Event::Back) => Some(Step::Phone),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut flow = Flow::<Login>::new();
//! assert!(flow.fire(Event::Back).is_err());
//! assert_eq!(flow.fire(Event::Submit).ok(), Some(Step::Verify));
//! ```

use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Error returned when an event has no entry in the transition table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{flow}: no transition from {from} on {event}")]
pub struct FlowError {
    /// Name of the flow that rejected the event
    pub flow: &'static str,
    /// Step the flow was in
    pub from: String,
    /// Event that was rejected
    pub event: String,
}

/// A transition table over a step enum.
pub trait StepMachine {
    /// The step enum
    type Step: Copy + Eq + fmt::Debug;

    /// The events that move the machine
    type Event: Copy + fmt::Debug;

    /// Flow name used in logs and errors
    const NAME: &'static str;

    /// Step a fresh flow starts in
    const INITIAL: Self::Step;

    /// Next step for `(from, event)`, or `None` if the pair is not allowed.
    fn transition(from: Self::Step, event: Self::Event) -> Option<Self::Step>;

    /// Whether `step` ends the flow. Terminal steps accept no events.
    fn is_terminal(_step: Self::Step) -> bool {
        false
    }
}

/// Current position inside a [`StepMachine`].
pub struct Flow<M: StepMachine> {
    step: M::Step,
    _machine: PhantomData<fn() -> M>,
}

impl<M: StepMachine> Flow<M> {
    /// A flow positioned at [`StepMachine::INITIAL`]
    #[must_use]
    pub const fn new() -> Self {
        Self::at(M::INITIAL)
    }

    /// A flow positioned at an arbitrary step (fixtures, resumed screens)
    #[must_use]
    pub const fn at(step: M::Step) -> Self {
        Self {
            step,
            _machine: PhantomData,
        }
    }

    /// The current step
    #[must_use]
    pub const fn step(&self) -> M::Step {
        self.step
    }

    /// Whether the flow is currently at `step`
    #[must_use]
    pub fn is(&self, step: M::Step) -> bool {
        self.step == step
    }

    /// Whether the current step is terminal
    #[must_use]
    pub fn is_finished(&self) -> bool {
        M::is_terminal(self.step)
    }

    /// Whether `event` would be accepted from the current step
    #[must_use]
    pub fn accepts(&self, event: M::Event) -> bool {
        !self.is_finished() && M::transition(self.step, event).is_some()
    }

    /// Check that `event` would be accepted, without moving.
    ///
    /// # Errors
    ///
    /// Returns the [`FlowError`] that [`Flow::fire`] would return.
    pub fn ensure(&self, event: M::Event) -> Result<(), FlowError> {
        if self.accepts(event) {
            Ok(())
        } else {
            Err(self.rejection(event))
        }
    }

    fn rejection(&self, event: M::Event) -> FlowError {
        FlowError {
            flow: M::NAME,
            from: format!("{:?}", self.step),
            event: format!("{event:?}"),
        }
    }

    /// Apply `event`, returning the new step.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] and leaves the step unchanged when the table has
    /// no entry for the current step and `event`, or the flow is finished.
    pub fn fire(&mut self, event: M::Event) -> Result<M::Step, FlowError> {
        let next = if self.is_finished() {
            None
        } else {
            M::transition(self.step, event)
        };

        let Some(next) = next else {
            tracing::warn!(flow = M::NAME, from = ?self.step, event = ?event, "Transition rejected");
            return Err(self.rejection(event));
        };

        tracing::debug!(flow = M::NAME, from = ?self.step, to = ?next, event = ?event, "Step transition");
        self.step = next;
        Ok(next)
    }

    /// Return to the initial step
    pub fn reset(&mut self) {
        self.step = M::INITIAL;
    }
}

impl<M: StepMachine> Default for Flow<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: StepMachine> Clone for Flow<M> {
    fn clone(&self) -> Self {
        Self::at(self.step)
    }
}

impl<M: StepMachine> fmt::Debug for Flow<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("machine", &M::NAME)
            .field("step", &self.step)
            .finish()
    }
}

impl<M: StepMachine> PartialEq for Flow<M> {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
    }
}

impl<M: StepMachine> Eq for Flow<M> {}
