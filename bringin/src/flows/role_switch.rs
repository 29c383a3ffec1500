//! Role switcher.
//!
//! Switching to the guest side is always allowed. Switching to the owner
//! side reuses the store the session already manages; without one the
//! owner QR scan runs first.

use super::owner_qr::{OwnerQrAction, OwnerQrOutcome, OwnerQrReducer, OwnerQrState};
use super::settle;
use crate::environment::AppEnvironment;
use crate::error::Rejection;
use crate::types::{Role, StoreId};
use bringin_core::composition::scope;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

/// Role switcher views
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleSwitchStep {
    /// Role menu
    Menu,
    /// Owner QR scan
    QrAuth,
    /// Role chosen or switcher closed
    Done,
}

/// Role switcher transitions
#[derive(Clone, Copy, Debug)]
pub enum RoleSwitchEvent {
    /// Owner role needs a store first
    NeedsStore,
    /// Scan abandoned
    ScanCancelled,
    /// Role chosen
    Switched,
    /// Header back button
    Back,
}

/// Step table for the role switcher
pub struct RoleSwitchMachine;

impl StepMachine for RoleSwitchMachine {
    type Step = RoleSwitchStep;
    type Event = RoleSwitchEvent;
    const NAME: &'static str = "role_switch";
    const INITIAL: RoleSwitchStep = RoleSwitchStep::Menu;

    fn transition(from: RoleSwitchStep, event: RoleSwitchEvent) -> Option<RoleSwitchStep> {
        use RoleSwitchEvent as E;
        use RoleSwitchStep as S;
        match (from, event) {
            (S::Menu, E::NeedsStore) => Some(S::QrAuth),
            (S::QrAuth, E::ScanCancelled) => Some(S::Menu),
            (S::Menu | S::QrAuth, E::Switched) => Some(S::Done),
            (S::Menu, E::Back) => Some(S::Done),
            _ => None,
        }
    }

    fn is_terminal(step: RoleSwitchStep) -> bool {
        step == RoleSwitchStep::Done
    }
}

/// How the switcher closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleSwitchOutcome {
    /// New role, with the store for the owner role
    Switched {
        /// Chosen role
        role: Role,
        /// Managed store
        store_id: Option<StoreId>,
    },
    /// Closed without switching
    Back,
}

/// Role switcher state
#[derive(Clone, Debug, PartialEq)]
pub struct RoleSwitchState {
    /// Current view
    pub flow: Flow<RoleSwitchMachine>,
    /// Role when the switcher opened
    pub current_role: Role,
    /// Store the session already manages
    pub store_id: Option<StoreId>,
    /// Owner QR child, mounted while scanning
    pub qr: Option<OwnerQrState>,
    /// Set when the switcher closes
    pub outcome: Option<RoleSwitchOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl RoleSwitchState {
    /// Switcher for a session in `current_role`
    #[must_use]
    pub const fn new(current_role: Role, store_id: Option<StoreId>) -> Self {
        Self {
            flow: Flow::new(),
            current_role,
            store_id,
            qr: None,
            outcome: None,
            last_rejection: None,
        }
    }

    /// Current view
    #[must_use]
    pub const fn step(&self) -> RoleSwitchStep {
        self.flow.step()
    }

    /// `"이용자 화면"` / `"사장님 화면"`
    #[must_use]
    pub const fn current_label(&self) -> &'static str {
        match self.current_role {
            Role::User => "이용자 화면",
            Role::Owner => "사장님 화면",
        }
    }

    fn switched(&mut self, role: Role, store_id: Option<StoreId>) {
        if settle(&mut self.last_rejection, self.flow.fire(RoleSwitchEvent::Switched)).is_some() {
            tracing::info!(?role, "Role switched");
            self.qr = None;
            self.outcome = Some(RoleSwitchOutcome::Switched { role, store_id });
        }
    }
}

/// Role switcher inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleSwitchAction {
    /// "이용자로 전환"
    SwitchToUser,
    /// "사장님으로 전환"
    SwitchToOwner,
    /// Routed to the owner QR scan
    Qr(OwnerQrAction),
    /// Header back button
    Back,
}

/// Reducer for the role switcher
#[derive(Clone, Debug, Default)]
pub struct RoleSwitchReducer;

impl RoleSwitchReducer {
    /// Creates a new `RoleSwitchReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for RoleSwitchReducer {
    type State = RoleSwitchState;
    type Action = RoleSwitchAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut RoleSwitchState,
        action: RoleSwitchAction,
        env: &AppEnvironment,
    ) -> Effects<RoleSwitchAction> {
        match action {
            RoleSwitchAction::SwitchToUser => state.switched(Role::User, state.store_id.clone()),
            RoleSwitchAction::SwitchToOwner => match state.store_id.clone() {
                Some(store) => state.switched(Role::Owner, Some(store)),
                None => {
                    if settle(&mut state.last_rejection, state.flow.fire(RoleSwitchEvent::NeedsStore)).is_some() {
                        state.qr = Some(OwnerQrState::default());
                    }
                },
            },
            RoleSwitchAction::Qr(action) => {
                let Some(qr) = state.qr.as_mut() else {
                    return smallvec![Effect::None];
                };
                let effects = scope(&OwnerQrReducer::new(), qr, action, env, RoleSwitchAction::Qr);
                match qr.outcome.take() {
                    Some(OwnerQrOutcome::Verified(store)) => {
                        state.store_id = Some(store.store_id.clone());
                        state.switched(Role::Owner, Some(store.store_id));
                    },
                    Some(OwnerQrOutcome::Cancelled) => {
                        if settle(&mut state.last_rejection, state.flow.fire(RoleSwitchEvent::ScanCancelled)).is_some() {
                            state.qr = None;
                        }
                    },
                    None => {},
                }
                return effects;
            },
            RoleSwitchAction::Back => {
                if settle(&mut state.last_rejection, state.flow.fire(RoleSwitchEvent::Back)).is_some() {
                    state.outcome = Some(RoleSwitchOutcome::Back);
                }
            },
        }

        smallvec![Effect::None]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::test_support::test_env;
    use crate::flows::owner_qr::OwnerQrStep;
    use crate::flows::test_support::drive;
    use bringin_testing::ReducerTest;
    use bringin_testing::assertions::{assert_has_delay_effect, assert_no_effects};
    use std::time::Duration;

    #[test]
    fn owner_with_store_switches_directly() {
        let (env, _) = test_env();
        ReducerTest::new(RoleSwitchReducer::new())
            .with_env(env)
            .given_state(RoleSwitchState::new(Role::User, Some(StoreId::from("store-brown"))))
            .when_action(RoleSwitchAction::SwitchToOwner)
            .then_state(|s| {
                assert_eq!(s.step(), RoleSwitchStep::Done);
                assert_eq!(
                    s.outcome,
                    Some(RoleSwitchOutcome::Switched {
                        role: Role::Owner,
                        store_id: Some(StoreId::from("store-brown")),
                    })
                );
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn owner_without_store_scans_first() {
        let (env, _) = test_env();
        ReducerTest::new(RoleSwitchReducer::new())
            .with_env(env)
            .given_state(RoleSwitchState::new(Role::User, None))
            .given_actions(vec![RoleSwitchAction::SwitchToOwner])
            .when_action(RoleSwitchAction::Qr(OwnerQrAction::Scan))
            .then_state(|s| {
                assert_eq!(s.step(), RoleSwitchStep::QrAuth);
                assert_eq!(s.qr.as_ref().unwrap().step(), OwnerQrStep::Scanning);
            })
            .then_effects(|effects| {
                let scanned = env_scan();
                assert_has_delay_effect(
                    effects,
                    Duration::from_millis(20),
                    &RoleSwitchAction::Qr(OwnerQrAction::ScanCompleted {
                        generation: 1,
                        store: scanned,
                    }),
                );
            })
            .run();
    }

    fn env_scan() -> crate::environment::ScannedStore {
        use crate::environment::StoreScanner;
        crate::environment::MockStoreScanner::default().scan()
    }

    #[test]
    fn completed_scan_grants_owner() {
        let (env, _) = test_env();
        let reducer = RoleSwitchReducer::new();
        let mut state = RoleSwitchState::new(Role::User, None);
        drive(&reducer, &mut state, RoleSwitchAction::SwitchToOwner, &env);
        drive(&reducer, &mut state, RoleSwitchAction::Qr(OwnerQrAction::Scan), &env);

        assert_eq!(state.step(), RoleSwitchStep::Done);
        assert_eq!(state.store_id, Some(StoreId::from("store-brown")));
        assert!(state.qr.is_none());
        assert!(matches!(
            state.outcome,
            Some(RoleSwitchOutcome::Switched { role: Role::Owner, .. })
        ));
    }

    #[test]
    fn cancelled_scan_returns_to_menu() {
        let (env, _) = test_env();
        let reducer = RoleSwitchReducer::new();
        let mut state = RoleSwitchState::new(Role::User, None);
        drive(&reducer, &mut state, RoleSwitchAction::SwitchToOwner, &env);
        drive(&reducer, &mut state, RoleSwitchAction::Qr(OwnerQrAction::Back), &env);

        assert_eq!(state.step(), RoleSwitchStep::Menu);
        assert!(state.qr.is_none());
        assert!(state.outcome.is_none());
    }

    #[test]
    fn user_switch_and_back() {
        let (env, _) = test_env();
        let reducer = RoleSwitchReducer::new();

        let mut switch = RoleSwitchState::new(Role::Owner, Some(StoreId::from("store-brown")));
        assert_eq!(switch.current_label(), "사장님 화면");
        drive(&reducer, &mut switch, RoleSwitchAction::SwitchToUser, &env);
        assert!(matches!(
            switch.outcome,
            Some(RoleSwitchOutcome::Switched { role: Role::User, .. })
        ));

        let mut back = RoleSwitchState::new(Role::User, None);
        drive(&reducer, &mut back, RoleSwitchAction::Back, &env);
        assert_eq!(back.outcome, Some(RoleSwitchOutcome::Back));
    }
}
