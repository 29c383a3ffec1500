//! Multi-step flows.
//!
//! Each flow is a [`StepMachine`](bringin_core::flow::StepMachine) for its
//! step table, a state struct, an action enum and a reducer. A flow that
//! finishes leaves an `outcome` in its state; the parent takes it after
//! every child action it routes down and decides where to go next.

pub mod auth;
pub mod booking;
pub mod copy;
pub mod owner_dashboard;
pub mod owner_qr;
pub mod phone_login;
pub mod qr_entry;
pub mod role_switch;
pub mod walk_in;

use crate::error::Rejection;

/// Record the outcome of a validation step in a flow's `last_rejection`.
///
/// Successful steps clear the previous message; failed ones replace it and
/// return `None`.
pub(crate) fn settle<T, E>(last_rejection: &mut Option<Rejection>, result: Result<T, E>) -> Option<T>
where
    E: Into<Rejection>,
{
    match result {
        Ok(value) => {
            *last_rejection = None;
            Some(value)
        },
        Err(error) => {
            let rejection = error.into();
            tracing::debug!(%rejection, "Input rejected");
            *last_rejection = Some(rejection);
            None
        },
    }
}
