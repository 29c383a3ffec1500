//! Login for both roles.
//!
//! [`AuthReducer`] shows phone login and offers "사장님으로 로그인", which
//! runs [`OwnerAuthReducer`]: an owner QR scan followed by phone login.
//! Either path ends with an [`AuthCompleted`] outcome for the session.

use super::owner_qr::{OwnerQrAction, OwnerQrOutcome, OwnerQrReducer, OwnerQrState};
use super::phone_login::{LoginMode, LoginOutcome, LoginStep, PhoneLoginAction, PhoneLoginReducer, PhoneLoginState};
use super::settle;
use crate::environment::{AppEnvironment, ScannedStore};
use crate::error::Rejection;
use crate::types::{AuthCompleted, Role};
use bringin_core::composition::scope;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

// ============================================================================
// Owner authentication
// ============================================================================

/// Owner authentication screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerAuthStep {
    /// Owner QR scan
    Qr,
    /// Phone login with the "사장님 인증 완료" badge
    Phone,
    /// Owner logged in
    Done,
    /// Backed out of the QR scan
    Cancelled,
}

/// Owner authentication transitions
#[derive(Clone, Copy, Debug)]
pub enum OwnerAuthEvent {
    /// Store verified by QR
    StoreVerified,
    /// Phone verified
    LoggedIn,
    /// QR scan cancelled
    Cancel,
}

/// Step table for owner authentication
pub struct OwnerAuthMachine;

impl StepMachine for OwnerAuthMachine {
    type Step = OwnerAuthStep;
    type Event = OwnerAuthEvent;
    const NAME: &'static str = "owner_auth";
    const INITIAL: OwnerAuthStep = OwnerAuthStep::Qr;

    fn transition(from: OwnerAuthStep, event: OwnerAuthEvent) -> Option<OwnerAuthStep> {
        use OwnerAuthEvent as E;
        use OwnerAuthStep as S;
        match (from, event) {
            (S::Qr, E::StoreVerified) => Some(S::Phone),
            (S::Phone, E::LoggedIn) => Some(S::Done),
            (S::Qr, E::Cancel) => Some(S::Cancelled),
            _ => None,
        }
    }

    fn is_terminal(step: OwnerAuthStep) -> bool {
        matches!(step, OwnerAuthStep::Done | OwnerAuthStep::Cancelled)
    }
}

/// How owner authentication ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerAuthOutcome {
    /// Logged in as the owner of the scanned store
    Completed(AuthCompleted),
    /// Backed out before scanning
    Cancelled,
}

/// Owner authentication state
#[derive(Clone, Debug, PartialEq)]
pub struct OwnerAuthState {
    /// Current screen
    pub flow: Flow<OwnerAuthMachine>,
    /// QR scan child
    pub qr: OwnerQrState,
    /// Phone login child
    pub login: PhoneLoginState,
    /// Store verified by the scan
    pub store: Option<ScannedStore>,
    /// Set when the flow ends
    pub outcome: Option<OwnerAuthOutcome>,
}

impl Default for OwnerAuthState {
    fn default() -> Self {
        Self {
            flow: Flow::new(),
            qr: OwnerQrState::default(),
            login: PhoneLoginState::new(LoginMode::OwnerAuthCompleted),
            store: None,
            outcome: None,
        }
    }
}

impl OwnerAuthState {
    /// Current screen
    #[must_use]
    pub const fn step(&self) -> OwnerAuthStep {
        self.flow.step()
    }
}

/// Owner authentication inputs
#[derive(Clone, Debug, PartialEq)]
pub enum OwnerAuthAction {
    /// Routed to the QR scan
    Qr(OwnerQrAction),
    /// Routed to phone login
    Login(PhoneLoginAction),
}

/// Reducer for owner authentication
#[derive(Clone, Debug, Default)]
pub struct OwnerAuthReducer;

impl OwnerAuthReducer {
    /// Creates a new `OwnerAuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for OwnerAuthReducer {
    type State = OwnerAuthState;
    type Action = OwnerAuthAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut OwnerAuthState,
        action: OwnerAuthAction,
        env: &AppEnvironment,
    ) -> Effects<OwnerAuthAction> {
        match action {
            OwnerAuthAction::Qr(action) => {
                if !state.flow.is(OwnerAuthStep::Qr) {
                    tracing::debug!(step = ?state.step(), "QR action outside the QR step");
                    return smallvec![Effect::None];
                }
                let effects = scope(&OwnerQrReducer::new(), &mut state.qr, action, env, OwnerAuthAction::Qr);
                match state.qr.outcome.take() {
                    Some(OwnerQrOutcome::Verified(store)) => {
                        if state.flow.fire(OwnerAuthEvent::StoreVerified).is_ok() {
                            state.store = Some(store);
                        }
                    },
                    Some(OwnerQrOutcome::Cancelled) => {
                        if state.flow.fire(OwnerAuthEvent::Cancel).is_ok() {
                            state.outcome = Some(OwnerAuthOutcome::Cancelled);
                        }
                    },
                    None => {},
                }
                effects
            },
            OwnerAuthAction::Login(action) => {
                if !state.flow.is(OwnerAuthStep::Phone) {
                    tracing::debug!(step = ?state.step(), "Login action outside the phone step");
                    return smallvec![Effect::None];
                }
                let effects = scope(&PhoneLoginReducer::new(), &mut state.login, action, env, OwnerAuthAction::Login);
                if let Some(login) = state.login.outcome.take() {
                    if let Some(store) = state.store.clone() {
                        if state.flow.fire(OwnerAuthEvent::LoggedIn).is_ok() {
                            tracing::info!(store = %store.store_id, "Owner authenticated");
                            state.outcome = Some(OwnerAuthOutcome::Completed(AuthCompleted {
                                user_id: login.user_id,
                                role: Role::Owner,
                                store_id: Some(store.store_id),
                                phone_number: login.phone_number,
                                auto_login: login.auto_login,
                            }));
                        }
                    }
                }
                effects
            },
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStep {
    /// Phone login
    Phone,
    /// Owner QR + phone login
    OwnerAuth,
    /// Logged in
    Done,
}

/// Login transitions
#[derive(Clone, Copy, Debug)]
pub enum AuthEvent {
    /// "사장님으로 로그인"
    OwnerLogin,
    /// Owner path abandoned
    OwnerCancelled,
    /// Either path finished
    Completed,
}

/// Step table for login
pub struct AuthMachine;

impl StepMachine for AuthMachine {
    type Step = AuthStep;
    type Event = AuthEvent;
    const NAME: &'static str = "auth";
    const INITIAL: AuthStep = AuthStep::Phone;

    fn transition(from: AuthStep, event: AuthEvent) -> Option<AuthStep> {
        use AuthEvent as E;
        use AuthStep as S;
        match (from, event) {
            (S::Phone, E::OwnerLogin) => Some(S::OwnerAuth),
            (S::OwnerAuth, E::OwnerCancelled) => Some(S::Phone),
            (S::Phone | S::OwnerAuth, E::Completed) => Some(S::Done),
            _ => None,
        }
    }

    fn is_terminal(step: AuthStep) -> bool {
        step == AuthStep::Done
    }
}

/// Login state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// Current screen
    pub flow: Flow<AuthMachine>,
    /// Phone login child
    pub login: PhoneLoginState,
    /// Owner authentication child
    pub owner: OwnerAuthState,
    /// Set when someone is logged in
    pub outcome: Option<AuthCompleted>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl AuthState {
    /// Current screen
    #[must_use]
    pub const fn step(&self) -> AuthStep {
        self.flow.step()
    }
}

/// Login inputs
#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    /// Routed to phone login
    Login(PhoneLoginAction),
    /// "사장님으로 로그인"
    OwnerLogin,
    /// Routed to owner authentication
    Owner(OwnerAuthAction),
}

/// Reducer for login
#[derive(Clone, Debug, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Role for a regular phone login
    fn completed(login: LoginOutcome) -> AuthCompleted {
        let role = if login.owner_store.is_some() { Role::Owner } else { Role::User };
        AuthCompleted {
            user_id: login.user_id,
            role,
            store_id: login.owner_store,
            phone_number: login.phone_number,
            auto_login: login.auto_login,
        }
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut AuthState, action: AuthAction, env: &AppEnvironment) -> Effects<AuthAction> {
        match action {
            AuthAction::Login(action) => {
                if !state.flow.is(AuthStep::Phone) {
                    return smallvec![Effect::None];
                }
                let effects = scope(&PhoneLoginReducer::new(), &mut state.login, action, env, AuthAction::Login);
                if let Some(login) = state.login.outcome.take() {
                    if settle(&mut state.last_rejection, state.flow.fire(AuthEvent::Completed)).is_some() {
                        let completed = Self::completed(login);
                        tracing::info!(user = %completed.user_id, role = ?completed.role, "Logged in");
                        state.outcome = Some(completed);
                    }
                }
                effects
            },
            AuthAction::OwnerLogin => {
                if !state.login.flow.is(LoginStep::Welcome) {
                    tracing::debug!("Owner login offered on the welcome screen only");
                    return smallvec![Effect::None];
                }
                if settle(&mut state.last_rejection, state.flow.fire(AuthEvent::OwnerLogin)).is_some() {
                    state.owner = OwnerAuthState::default();
                }
                smallvec![Effect::None]
            },
            AuthAction::Owner(action) => {
                if !state.flow.is(AuthStep::OwnerAuth) {
                    return smallvec![Effect::None];
                }
                let effects = scope(&OwnerAuthReducer::new(), &mut state.owner, action, env, AuthAction::Owner);
                match state.owner.outcome.take() {
                    Some(OwnerAuthOutcome::Completed(completed)) => {
                        if settle(&mut state.last_rejection, state.flow.fire(AuthEvent::Completed)).is_some() {
                            state.outcome = Some(completed);
                        }
                    },
                    Some(OwnerAuthOutcome::Cancelled) => {
                        settle(&mut state.last_rejection, state.flow.fire(AuthEvent::OwnerCancelled));
                    },
                    None => {},
                }
                effects
            },
        }
    }
}
