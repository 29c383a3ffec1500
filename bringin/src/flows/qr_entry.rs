//! Entry from a cafe QR code.
//!
//! The guest lands on a welcome screen for the scanned store. Accepting runs
//! phone login in QR mode and then the walk-in; declining shows what the
//! service is and offers a way out to the regular home screen.

use super::phone_login::{LoginMode, LoginOutcome, PhoneLoginAction, PhoneLoginReducer, PhoneLoginState};
use super::settle;
use super::walk_in::{WalkInAction, WalkInReducer, WalkInState};
use crate::environment::AppEnvironment;
use crate::error::Rejection;
use crate::types::{AuthCompleted, Role, StoreId};
use bringin_core::composition::scope;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

/// QR entry screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QrEntryStep {
    /// Store welcome with accept / decline
    Welcome,
    /// Service introduction for guests who declined
    DeclineInfo,
    /// Phone login
    Login,
    /// Walk-in seating
    WalkIn,
    /// Guest seated and logged in
    Done,
    /// Guest left for the regular home screen
    Exited,
}

/// QR entry transitions
#[derive(Clone, Copy, Debug)]
pub enum QrEntryEvent {
    /// "시작하기"
    Accept,
    /// "다음에 할게요"
    Decline,
    /// Back from the introduction
    Back,
    /// Leave QR entry
    Exit,
    /// Phone login finished
    LoggedIn,
    /// Walk-in finished
    Finished,
}

/// Step table for QR entry
pub struct QrEntryMachine;

impl StepMachine for QrEntryMachine {
    type Step = QrEntryStep;
    type Event = QrEntryEvent;
    const NAME: &'static str = "qr_entry";
    const INITIAL: QrEntryStep = QrEntryStep::Welcome;

    fn transition(from: QrEntryStep, event: QrEntryEvent) -> Option<QrEntryStep> {
        use QrEntryEvent as E;
        use QrEntryStep as S;
        match (from, event) {
            (S::Welcome, E::Accept) => Some(S::Login),
            (S::Welcome, E::Decline) => Some(S::DeclineInfo),
            (S::DeclineInfo, E::Back) => Some(S::Welcome),
            (S::DeclineInfo, E::Exit) => Some(S::Exited),
            (S::Login, E::LoggedIn) => Some(S::WalkIn),
            (S::WalkIn, E::Finished) => Some(S::Done),
            _ => None,
        }
    }

    fn is_terminal(step: QrEntryStep) -> bool {
        matches!(step, QrEntryStep::Done | QrEntryStep::Exited)
    }
}

/// How QR entry ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QrEntryOutcome {
    /// Logged in and seated
    Completed(AuthCompleted),
    /// Left for the regular home screen
    Exited,
}

/// QR entry state
#[derive(Clone, Debug, PartialEq)]
pub struct QrEntryState {
    /// Current screen
    pub flow: Flow<QrEntryMachine>,
    /// Store from the QR code
    pub store_id: StoreId,
    /// Phone login child
    pub login: PhoneLoginState,
    /// Walk-in child, mounted once the guest is logged in
    pub walk_in: Option<WalkInState>,
    /// Login result, held until the walk-in finishes
    pub login_result: Option<LoginOutcome>,
    /// Set when the flow ends
    pub outcome: Option<QrEntryOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl QrEntryState {
    /// Welcome screen for `store_id`
    #[must_use]
    pub const fn new(store_id: StoreId) -> Self {
        Self {
            flow: Flow::new(),
            store_id,
            login: PhoneLoginState::new(LoginMode::QrEntry),
            walk_in: None,
            login_result: None,
            outcome: None,
            last_rejection: None,
        }
    }

    /// Current screen
    #[must_use]
    pub const fn step(&self) -> QrEntryStep {
        self.flow.step()
    }
}

/// QR entry inputs
#[derive(Clone, Debug, PartialEq)]
pub enum QrEntryAction {
    /// Accept and log in
    Accept,
    /// Decline for now
    Decline,
    /// Back from the introduction
    Back,
    /// Leave QR entry
    Exit,
    /// Routed to phone login
    Login(PhoneLoginAction),
    /// Routed to the walk-in
    WalkIn(WalkInAction),
}

/// Reducer for QR entry
#[derive(Clone, Debug, Default)]
pub struct QrEntryReducer;

impl QrEntryReducer {
    /// Creates a new `QrEntryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for QrEntryReducer {
    type State = QrEntryState;
    type Action = QrEntryAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut QrEntryState, action: QrEntryAction, env: &AppEnvironment) -> Effects<QrEntryAction> {
        match action {
            QrEntryAction::Accept => {
                settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::Accept));
            },
            QrEntryAction::Decline => {
                settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::Decline));
            },
            QrEntryAction::Back => {
                settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::Back));
            },
            QrEntryAction::Exit => {
                if settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::Exit)).is_some() {
                    state.outcome = Some(QrEntryOutcome::Exited);
                }
            },
            QrEntryAction::Login(action) => {
                if !state.flow.is(QrEntryStep::Login) {
                    return smallvec![Effect::None];
                }
                let effects = scope(&PhoneLoginReducer::new(), &mut state.login, action, env, QrEntryAction::Login);
                if let Some(login) = state.login.outcome.take() {
                    if settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::LoggedIn)).is_some() {
                        tracing::info!(store = %state.store_id, user = %login.user_id, "QR guest logged in");
                        state.login_result = Some(login);
                        state.walk_in = Some(WalkInState::new(env));
                    }
                }
                return effects;
            },
            QrEntryAction::WalkIn(action) => {
                let Some(walk_in) = state.walk_in.as_mut() else {
                    return smallvec![Effect::None];
                };
                let effects = scope(&WalkInReducer::new(), walk_in, action, env, QrEntryAction::WalkIn);
                if let Some(visit) = walk_in.outcome.take() {
                    let Some(login) = state.login_result.take() else {
                        return effects;
                    };
                    if settle(&mut state.last_rejection, state.flow.fire(QrEntryEvent::Finished)).is_some() {
                        tracing::info!(cafe = %visit.cafe_name, seat = visit.seat.label(), "QR walk-in finished");
                        state.outcome = Some(QrEntryOutcome::Completed(AuthCompleted {
                            user_id: login.user_id,
                            role: Role::User,
                            store_id: None,
                            phone_number: login.phone_number,
                            auto_login: login.auto_login,
                        }));
                    }
                }
                return effects;
            },
        }

        smallvec![Effect::None]
    }
}
