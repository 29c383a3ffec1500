//! Owner QR authentication: `intro → scanning → success → done`.
//!
//! Scanning and the success pause are paced by delayed actions, so the
//! runtime drives the whole sequence once `Scan` is sent. Each scan bumps a
//! generation counter that tags its reply; backing out of the viewfinder
//! bumps it too, so a reply from an abandoned scan is dropped.

use super::settle;
use crate::environment::{AppEnvironment, ScannedStore};
use crate::error::Rejection;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

/// Owner QR screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerQrStep {
    /// Explanation and the scan button
    Intro,
    /// Camera viewfinder
    Scanning,
    /// "관리자 권한이 부여되었습니다"
    Success,
    /// Store verified
    Done,
    /// Left from the intro screen
    Cancelled,
}

/// Owner QR transitions
#[derive(Clone, Copy, Debug)]
pub enum OwnerQrEvent {
    /// Open the camera
    Scan,
    /// A store code was read
    Scanned,
    /// Success pause elapsed
    Confirmed,
    /// Header back button
    Back,
}

/// Step table for owner QR authentication
pub struct OwnerQrMachine;

impl StepMachine for OwnerQrMachine {
    type Step = OwnerQrStep;
    type Event = OwnerQrEvent;
    const NAME: &'static str = "owner_qr";
    const INITIAL: OwnerQrStep = OwnerQrStep::Intro;

    fn transition(from: OwnerQrStep, event: OwnerQrEvent) -> Option<OwnerQrStep> {
        use OwnerQrEvent as E;
        use OwnerQrStep as S;
        match (from, event) {
            (S::Intro, E::Scan) => Some(S::Scanning),
            (S::Scanning, E::Scanned) => Some(S::Success),
            (S::Scanning, E::Back) => Some(S::Intro),
            (S::Success, E::Confirmed) => Some(S::Done),
            (S::Intro, E::Back) => Some(S::Cancelled),
            _ => None,
        }
    }

    fn is_terminal(step: OwnerQrStep) -> bool {
        matches!(step, OwnerQrStep::Done | OwnerQrStep::Cancelled)
    }
}

/// How owner QR authentication ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerQrOutcome {
    /// The scanned store grants the owner role
    Verified(ScannedStore),
    /// User backed out before scanning
    Cancelled,
}

/// Owner QR state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnerQrState {
    /// Current screen
    pub flow: Flow<OwnerQrMachine>,
    /// Store read by the scanner, shown on the success screen
    pub scanned: Option<ScannedStore>,
    /// Bumped on every scan and on leaving the viewfinder
    pub generation: u64,
    /// Set when the flow ends
    pub outcome: Option<OwnerQrOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl OwnerQrState {
    /// Current screen
    #[must_use]
    pub const fn step(&self) -> OwnerQrStep {
        self.flow.step()
    }
}

/// Owner QR inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerQrAction {
    /// "QR 스캔 시작하기"
    Scan,
    /// Scanner finished for scan `generation` (delayed)
    ScanCompleted {
        /// Scan this reply belongs to
        generation: u64,
        /// Store read from the code
        store: ScannedStore,
    },
    /// Success pause finished (delayed)
    Confirmed,
    /// Header back button
    Back,
}

/// Reducer for owner QR authentication
#[derive(Clone, Debug, Default)]
pub struct OwnerQrReducer;

impl OwnerQrReducer {
    /// Creates a new `OwnerQrReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for OwnerQrReducer {
    type State = OwnerQrState;
    type Action = OwnerQrAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut OwnerQrState,
        action: OwnerQrAction,
        env: &AppEnvironment,
    ) -> Effects<OwnerQrAction> {
        match action {
            OwnerQrAction::Scan => {
                if settle(&mut state.last_rejection, state.flow.fire(OwnerQrEvent::Scan)).is_some() {
                    state.generation = state.generation.wrapping_add(1);
                    let store = env.scanner.scan();
                    return smallvec![Effect::delay(
                        env.config.scan_delay,
                        OwnerQrAction::ScanCompleted {
                            generation: state.generation,
                            store,
                        }
                    )];
                }
            },
            OwnerQrAction::ScanCompleted { generation, store } => {
                if generation != state.generation {
                    tracing::debug!(generation, current = state.generation, "Stale scan reply dropped");
                    return smallvec![Effect::None];
                }
                if settle(&mut state.last_rejection, state.flow.fire(OwnerQrEvent::Scanned)).is_some() {
                    tracing::info!(store = %store.store_id, name = %store.store_name, "Owner QR scanned");
                    state.scanned = Some(store);
                    return smallvec![Effect::delay(env.config.scan_confirm, OwnerQrAction::Confirmed)];
                }
            },
            OwnerQrAction::Confirmed => {
                if settle(&mut state.last_rejection, state.flow.fire(OwnerQrEvent::Confirmed)).is_some() {
                    state.outcome = state.scanned.clone().map(OwnerQrOutcome::Verified);
                }
            },
            OwnerQrAction::Back => {
                if settle(&mut state.last_rejection, state.flow.fire(OwnerQrEvent::Back)).is_some() {
                    if state.step() == OwnerQrStep::Cancelled {
                        state.outcome = Some(OwnerQrOutcome::Cancelled);
                    } else {
                        state.generation = state.generation.wrapping_add(1);
                    }
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
    use bringin_testing::ReducerTest;
    use bringin_testing::assertions::{assert_has_delay_effect, assert_no_effects};
    use std::time::Duration;

    fn brown() -> ScannedStore {
        ScannedStore {
            store_id: "store-brown".into(),
            store_name: "브라운 카페".into(),
        }
    }

    fn completed(generation: u64) -> OwnerQrAction {
        OwnerQrAction::ScanCompleted {
            generation,
            store: brown(),
        }
    }

    #[test]
    fn scan_schedules_the_scanner_reply() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .when_action(OwnerQrAction::Scan)
            .then_state(|s| assert_eq!(s.step(), OwnerQrStep::Scanning))
            .then_effects(|effects| {
                assert_has_delay_effect(
                    effects,
                    Duration::from_millis(20),
                    &completed(1),
                );
            })
            .run();
    }

    #[test]
    fn scan_reply_shows_success_then_confirms() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .given_actions(vec![OwnerQrAction::Scan])
            .when_action(completed(1))
            .then_state(|s| {
                assert_eq!(s.step(), OwnerQrStep::Success);
                assert_eq!(s.scanned.as_ref().unwrap().store_name, "브라운 카페");
                assert!(s.outcome.is_none());
            })
            .then_effects(|effects| {
                assert_has_delay_effect(effects, Duration::from_millis(10), &OwnerQrAction::Confirmed);
            })
            .run();
    }

    #[test]
    fn confirmation_verifies_the_store() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .given_actions(vec![OwnerQrAction::Scan, completed(1)])
            .when_action(OwnerQrAction::Confirmed)
            .then_state(|s| {
                assert_eq!(s.step(), OwnerQrStep::Done);
                assert_eq!(s.outcome, Some(OwnerQrOutcome::Verified(brown())));
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn back_from_intro_cancels() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .when_action(OwnerQrAction::Back)
            .then_state(|s| {
                assert_eq!(s.step(), OwnerQrStep::Cancelled);
                assert_eq!(s.outcome, Some(OwnerQrOutcome::Cancelled));
            })
            .run();
    }

    #[test]
    fn stray_scan_reply_is_ignored() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .when_action(completed(0))
            .then_state(|s| {
                assert_eq!(s.step(), OwnerQrStep::Intro);
                assert!(s.scanned.is_none());
                assert!(matches!(s.last_rejection, Some(Rejection::Flow(_))));
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn back_from_scanning_returns_to_intro() {
        let (env, _) = test_env();
        ReducerTest::new(OwnerQrReducer::new())
            .with_env(env)
            .given_state(OwnerQrState::default())
            .given_actions(vec![OwnerQrAction::Scan])
            .when_action(OwnerQrAction::Back)
            .then_state(|s| {
                assert_eq!(s.step(), OwnerQrStep::Intro);
                assert!(s.outcome.is_none());
                assert!(s.last_rejection.is_none());
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn rescan_after_back_ignores_the_abandoned_reply() {
        let (env, _) = test_env();
        let reducer = OwnerQrReducer::new();
        let mut state = OwnerQrState::default();

        reducer.reduce(&mut state, OwnerQrAction::Scan, &env);
        reducer.reduce(&mut state, OwnerQrAction::Back, &env);
        let effects = reducer.reduce(&mut state, completed(1), &env);
        assert_no_effects(&effects);
        assert_eq!(state.step(), OwnerQrStep::Intro);
        assert!(state.scanned.is_none());
        assert!(state.last_rejection.is_none());

        let effects = reducer.reduce(&mut state, OwnerQrAction::Scan, &env);
        assert_eq!(state.step(), OwnerQrStep::Scanning);
        assert_has_delay_effect(&effects, Duration::from_millis(20), &completed(3));

        let effects = reducer.reduce(&mut state, completed(1), &env);
        assert_no_effects(&effects);
        assert_eq!(state.step(), OwnerQrStep::Scanning);

        reducer.reduce(&mut state, completed(3), &env);
        reducer.reduce(&mut state, OwnerQrAction::Confirmed, &env);
        assert_eq!(state.step(), OwnerQrStep::Done);
        assert_eq!(state.outcome, Some(OwnerQrOutcome::Verified(brown())));
    }
}
