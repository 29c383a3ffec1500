//! Phone number login: `welcome → phone → verify`.
//!
//! The same flow is mounted in three places: the regular login screen, the
//! QR entry path and the second half of owner authentication. Only the
//! welcome copy differs between them ([`LoginMode`]).

use super::settle;
use crate::environment::{AppEnvironment, VerifiedPhone};
use crate::error::{InputRejection, Rejection, VerifyError};
use crate::types::{StoreId, UserId};
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

/// Digits in a Korean mobile number
pub const PHONE_DIGITS: usize = 11;

/// Digits in an SMS verification code
pub const CODE_DIGITS: usize = 6;

/// Keep ASCII digits only, at most `max` of them
#[must_use]
pub fn digits_only(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

// ============================================================================
// Steps
// ============================================================================

/// Login screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStep {
    /// Landing copy and the start button
    Welcome,
    /// Phone number entry
    Phone,
    /// Verification code entry
    Verify,
    /// Verified
    Done,
}

/// Login transitions
#[derive(Clone, Copy, Debug)]
pub enum LoginEvent {
    /// Start with a phone number
    Start,
    /// Phone number accepted, code sent
    SubmitPhone,
    /// Code verified
    Verified,
    /// Header back button
    Back,
}

/// Step table for phone login
pub struct PhoneLoginMachine;

impl StepMachine for PhoneLoginMachine {
    type Step = LoginStep;
    type Event = LoginEvent;
    const NAME: &'static str = "phone_login";
    const INITIAL: LoginStep = LoginStep::Welcome;

    fn transition(from: LoginStep, event: LoginEvent) -> Option<LoginStep> {
        use LoginEvent as E;
        use LoginStep as S;
        match (from, event) {
            (S::Welcome, E::Start) => Some(S::Phone),
            (S::Phone, E::SubmitPhone) => Some(S::Verify),
            (S::Verify, E::Verified) => Some(S::Done),
            (S::Phone, E::Back) => Some(S::Welcome),
            (S::Verify, E::Back) => Some(S::Phone),
            _ => None,
        }
    }

    fn is_terminal(step: LoginStep) -> bool {
        step == LoginStep::Done
    }
}

// ============================================================================
// State
// ============================================================================

/// Where the login screen is mounted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginMode {
    /// Regular login
    #[default]
    Standard,
    /// Opened from a cafe QR code
    QrEntry,
    /// Owner QR scan already succeeded
    OwnerAuthCompleted,
}

/// What a finished login hands to its parent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Verified account
    pub user_id: UserId,
    /// Eleven digits
    pub phone_number: String,
    /// Keep the session on this device
    pub auto_login: bool,
    /// First login with this number
    pub is_new_user: bool,
    /// Store the account already manages
    pub owner_store: Option<StoreId>,
}

/// Phone login state
#[derive(Clone, Debug, PartialEq)]
pub struct PhoneLoginState {
    /// Current screen
    pub flow: Flow<PhoneLoginMachine>,
    /// Welcome copy variant
    pub mode: LoginMode,
    /// Digits entered so far
    pub phone: String,
    /// Code digits entered so far
    pub code: String,
    /// Auto-login checkbox, on by default
    pub auto_login: bool,
    /// A verifier call is in flight
    pub verifying: bool,
    /// Set once the code is verified
    pub outcome: Option<LoginOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl PhoneLoginState {
    /// A fresh login screen
    #[must_use]
    pub const fn new(mode: LoginMode) -> Self {
        Self {
            flow: Flow::new(),
            mode,
            phone: String::new(),
            code: String::new(),
            auto_login: true,
            verifying: false,
            outcome: None,
            last_rejection: None,
        }
    }

    /// Current screen
    #[must_use]
    pub const fn step(&self) -> LoginStep {
        self.flow.step()
    }

    /// Welcome headline for the mode
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.mode {
            LoginMode::OwnerAuthCompleted => "매장 관리를 시작하려면",
            LoginMode::Standard | LoginMode::QrEntry => "브링인",
        }
    }

    /// Whether the phone step's submit button is enabled
    #[must_use]
    pub fn phone_complete(&self) -> bool {
        self.phone.len() == PHONE_DIGITS
    }

    /// Whether the verify step's submit button is enabled
    #[must_use]
    pub fn code_complete(&self) -> bool {
        self.code.len() == CODE_DIGITS && !self.verifying
    }
}

impl Default for PhoneLoginState {
    fn default() -> Self {
        Self::new(LoginMode::Standard)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Phone login inputs
#[derive(Clone, Debug, PartialEq)]
pub enum PhoneLoginAction {
    /// "휴대폰 번호로 시작하기"
    Start,
    /// Phone field edited (raw input)
    PhoneChanged(String),
    /// Request a code
    SubmitPhone,
    /// Code field edited (raw input)
    CodeChanged(String),
    /// Auto-login checkbox
    ToggleAutoLogin,
    /// Verify the entered code
    SubmitCode,
    /// Verifier reply
    Verified(Result<VerifiedPhone, VerifyError>),
    /// Header back button
    Back,
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for phone login
#[derive(Clone, Debug, Default)]
pub struct PhoneLoginReducer;

impl PhoneLoginReducer {
    /// Creates a new `PhoneLoginReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_phone(phone: &str) -> Result<(), InputRejection> {
        if phone.len() == PHONE_DIGITS {
            Ok(())
        } else {
            Err(InputRejection::PhoneLength { len: phone.len() })
        }
    }

    fn validate_code(code: &str) -> Result<(), InputRejection> {
        if code.len() == CODE_DIGITS {
            Ok(())
        } else {
            Err(InputRejection::CodeLength { len: code.len() })
        }
    }
}

impl Reducer for PhoneLoginReducer {
    type State = PhoneLoginState;
    type Action = PhoneLoginAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut PhoneLoginState,
        action: PhoneLoginAction,
        env: &AppEnvironment,
    ) -> Effects<PhoneLoginAction> {
        match action {
            PhoneLoginAction::Start => {
                settle(&mut state.last_rejection, state.flow.fire(LoginEvent::Start));
            },
            PhoneLoginAction::PhoneChanged(raw) => {
                state.phone = digits_only(&raw, PHONE_DIGITS);
            },
            PhoneLoginAction::SubmitPhone => {
                let result = Self::validate_phone(&state.phone)
                    .map_err(Rejection::from)
                    .and_then(|()| state.flow.fire(LoginEvent::SubmitPhone).map_err(Rejection::from));
                settle(&mut state.last_rejection, result);
            },
            PhoneLoginAction::CodeChanged(raw) => {
                state.code = digits_only(&raw, CODE_DIGITS);
            },
            PhoneLoginAction::ToggleAutoLogin => {
                state.auto_login = !state.auto_login;
            },
            PhoneLoginAction::SubmitCode => {
                if state.verifying {
                    return smallvec![Effect::None];
                }
                let result = Self::validate_code(&state.code)
                    .map_err(Rejection::from)
                    .and_then(|()| state.flow.ensure(LoginEvent::Verified).map_err(Rejection::from));
                if settle(&mut state.last_rejection, result).is_none() {
                    return smallvec![Effect::None];
                }

                state.verifying = true;
                tracing::debug!(flow = PhoneLoginMachine::NAME, "Verifying code");
                let verification = env.verifier.verify(&state.phone, &state.code);
                return smallvec![Effect::Future(Box::pin(async move {
                    Some(PhoneLoginAction::Verified(verification.await))
                }))];
            },
            PhoneLoginAction::Verified(result) => {
                state.verifying = false;
                let Some(verified) = settle(&mut state.last_rejection, result) else {
                    return smallvec![Effect::None];
                };
                if settle(&mut state.last_rejection, state.flow.fire(LoginEvent::Verified)).is_some() {
                    tracing::info!(user = %verified.user_id, new_user = verified.is_new_user, "Phone verified");
                    state.outcome = Some(LoginOutcome {
                        user_id: verified.user_id,
                        phone_number: state.phone.clone(),
                        auto_login: state.auto_login,
                        is_new_user: verified.is_new_user,
                        owner_store: verified.owner_store,
                    });
                }
            },
            PhoneLoginAction::Back => {
                settle(&mut state.last_rejection, state.flow.fire(LoginEvent::Back));
            },
        }

        smallvec![Effect::None]
    }
}
