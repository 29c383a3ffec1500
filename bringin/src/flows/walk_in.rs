//! QR walk-in: a guest who scanned the table code at the cafe.
//!
//! ```text
//! location → has-drink ─┬─ yes → drink-verify → seat-select → using
//!                       └─ no  → seat-select → drink-order → using
//! ```
//!
//! Guests who already hold a drink only show it to the camera. Everyone
//! else orders at least one drink from the walk-in menu.

use super::settle;
use crate::drinks::{DrinkOrder, OrderRule};
use crate::environment::AppEnvironment;
use crate::error::Rejection;
use crate::format::duration_label;
use crate::types::DrinkId;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;
use chrono::{DateTime, Utc};

/// Walk-in screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkInStep {
    /// "브라운 카페에 오셨군요"
    Location,
    /// "음료를 가지고 계신가요?"
    HasDrink,
    /// Camera check of a drink the guest brought
    DrinkVerify,
    /// 1인석 / 2인석
    SeatSelect,
    /// Walk-in menu
    DrinkOrder,
    /// Seated
    Using,
    /// Handed back to the entry flow
    Done,
}

/// Walk-in transitions
#[derive(Clone, Copy, Debug)]
pub enum WalkInEvent {
    /// Past the location screen
    Next,
    /// Guest has a drink
    HasDrink,
    /// Guest has no drink
    NoDrink,
    /// Drink check passed
    Verified,
    /// Seat picked by a guest with a drink
    SeatWithDrink,
    /// Seat picked by a guest without one
    SeatWithoutDrink,
    /// Order paid
    Ordered,
    /// Leave the using screen
    Finish,
    /// Back to the location screen
    BackToLocation,
    /// Back to the drink question
    BackToQuestion,
    /// Back to the drink check
    BackToVerify,
    /// Back to seat selection
    BackToSeat,
}

/// Step table for the walk-in
pub struct WalkInMachine;

impl StepMachine for WalkInMachine {
    type Step = WalkInStep;
    type Event = WalkInEvent;
    const NAME: &'static str = "walk_in";
    const INITIAL: WalkInStep = WalkInStep::Location;

    fn transition(from: WalkInStep, event: WalkInEvent) -> Option<WalkInStep> {
        use WalkInEvent as E;
        use WalkInStep as S;
        match (from, event) {
            (S::Location, E::Next) => Some(S::HasDrink),
            (S::HasDrink, E::HasDrink) => Some(S::DrinkVerify),
            (S::HasDrink, E::NoDrink) => Some(S::SeatSelect),
            (S::DrinkVerify, E::Verified) => Some(S::SeatSelect),
            (S::SeatSelect, E::SeatWithDrink) => Some(S::Using),
            (S::SeatSelect, E::SeatWithoutDrink) => Some(S::DrinkOrder),
            (S::DrinkOrder, E::Ordered) => Some(S::Using),
            (S::Using, E::Finish) => Some(S::Done),

            (S::HasDrink, E::BackToLocation) => Some(S::Location),
            (S::DrinkVerify, E::BackToQuestion) => Some(S::HasDrink),
            (S::SeatSelect, E::BackToVerify) => Some(S::DrinkVerify),
            (S::SeatSelect, E::BackToQuestion) => Some(S::HasDrink),
            (S::DrinkOrder, E::BackToSeat) => Some(S::SeatSelect),
            _ => None,
        }
    }

    fn is_terminal(step: WalkInStep) -> bool {
        step == WalkInStep::Done
    }
}

/// Seat sizes offered to walk-ins
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkInSeat {
    /// One person
    Single,
    /// Two people
    Pair,
}

impl WalkInSeat {
    /// `"1인석"` / `"2인석"`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "1인석",
            Self::Pair => "2인석",
        }
    }
}

/// What a finished walk-in hands to its parent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkInOutcome {
    /// Cafe the guest is sitting in
    pub cafe_name: String,
    /// Seat size
    pub seat: WalkInSeat,
    /// When the guest was seated
    pub start_time: DateTime<Utc>,
    /// Ordered drinks, empty when the guest brought one
    pub order_summary: String,
}

/// Walk-in state
#[derive(Clone, Debug, PartialEq)]
pub struct WalkInState {
    /// Current screen
    pub flow: Flow<WalkInMachine>,
    /// Cafe shown on the location screen
    pub cafe_name: String,
    /// Answer to the drink question
    pub has_drink: Option<bool>,
    /// Picked seat size
    pub seat: Option<WalkInSeat>,
    /// Walk-in order
    pub order: DrinkOrder,
    /// Stamped on entering `using`
    pub start_time: Option<DateTime<Utc>>,
    /// Seat session length shown on the using screen, e.g. `"2시간"`
    pub session_length: String,
    /// Set when the guest leaves the using screen
    pub outcome: Option<WalkInOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl WalkInState {
    /// A walk-in at the catalog's walk-in cafe
    #[must_use]
    pub fn new(env: &AppEnvironment) -> Self {
        Self {
            flow: Flow::new(),
            cafe_name: env.catalog.walk_in_cafe().to_string(),
            has_drink: None,
            seat: None,
            order: DrinkOrder::new(env.catalog.walk_in_menu().clone(), OrderRule::AtLeastOne),
            start_time: None,
            session_length: duration_label(env.config.session_minutes),
            outcome: None,
            last_rejection: None,
        }
    }

    /// Current screen
    #[must_use]
    pub const fn step(&self) -> WalkInStep {
        self.flow.step()
    }
}

/// Walk-in inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkInAction {
    /// Location screen "다음"
    Next,
    /// Drink question answer
    AnswerHasDrink(bool),
    /// Drink check passed
    ConfirmVerification,
    /// Seat picked
    SelectSeat(WalkInSeat),
    /// `+`/`-` on a drink
    AdjustDrink(DrinkId, i32),
    /// Pay for the order
    SubmitOrder,
    /// Leave the using screen
    Finish,
    /// Header back button
    Back,
}

/// Reducer for the walk-in
#[derive(Clone, Debug, Default)]
pub struct WalkInReducer;

impl WalkInReducer {
    /// Creates a new `WalkInReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn back_event(state: &WalkInState) -> Option<WalkInEvent> {
        match state.step() {
            WalkInStep::HasDrink => Some(WalkInEvent::BackToLocation),
            WalkInStep::DrinkVerify => Some(WalkInEvent::BackToQuestion),
            WalkInStep::SeatSelect if state.has_drink == Some(true) => Some(WalkInEvent::BackToVerify),
            WalkInStep::SeatSelect => Some(WalkInEvent::BackToQuestion),
            WalkInStep::DrinkOrder => Some(WalkInEvent::BackToSeat),
            WalkInStep::Using => Some(WalkInEvent::Finish),
            WalkInStep::Location | WalkInStep::Done => None,
        }
    }

    fn finish(state: &mut WalkInState) {
        let (Some(seat), Some(start_time)) = (state.seat, state.start_time) else {
            return;
        };
        if settle(&mut state.last_rejection, state.flow.fire(WalkInEvent::Finish)).is_some() {
            state.outcome = Some(WalkInOutcome {
                cafe_name: state.cafe_name.clone(),
                seat,
                start_time,
                order_summary: state.order.summary(),
            });
        }
    }
}

impl Reducer for WalkInReducer {
    type State = WalkInState;
    type Action = WalkInAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut WalkInState, action: WalkInAction, env: &AppEnvironment) -> Effects<WalkInAction> {
        match action {
            WalkInAction::Next => {
                settle(&mut state.last_rejection, state.flow.fire(WalkInEvent::Next));
            },
            WalkInAction::AnswerHasDrink(has_drink) => {
                let event = if has_drink { WalkInEvent::HasDrink } else { WalkInEvent::NoDrink };
                if settle(&mut state.last_rejection, state.flow.fire(event)).is_some() {
                    state.has_drink = Some(has_drink);
                }
            },
            WalkInAction::ConfirmVerification => {
                settle(&mut state.last_rejection, state.flow.fire(WalkInEvent::Verified));
            },
            WalkInAction::SelectSeat(seat) => {
                let event = if state.has_drink == Some(true) {
                    WalkInEvent::SeatWithDrink
                } else {
                    WalkInEvent::SeatWithoutDrink
                };
                if let Some(next) = settle(&mut state.last_rejection, state.flow.fire(event)) {
                    state.seat = Some(seat);
                    if next == WalkInStep::Using {
                        state.start_time = Some(env.clock.now());
                        tracing::info!(seat = seat.label(), "Walk-in seated with own drink");
                    }
                }
            },
            WalkInAction::AdjustDrink(id, delta) => {
                if !state.flow.is(WalkInStep::DrinkOrder) {
                    return smallvec![Effect::None];
                }
                settle(&mut state.last_rejection, state.order.adjust(id, delta));
            },
            WalkInAction::SubmitOrder => {
                let result = state
                    .order
                    .validate()
                    .map_err(Rejection::from)
                    .and_then(|()| state.flow.fire(WalkInEvent::Ordered).map_err(Rejection::from));
                if settle(&mut state.last_rejection, result).is_some() {
                    state.start_time = Some(env.clock.now());
                    tracing::info!(
                        order = %state.order.summary(),
                        total = state.order.total_price(),
                        "Walk-in order paid"
                    );
                }
            },
            WalkInAction::Finish => Self::finish(state),
            WalkInAction::Back => match Self::back_event(state) {
                Some(WalkInEvent::Finish) => Self::finish(state),
                Some(event) => {
                    settle(&mut state.last_rejection, state.flow.fire(event));
                },
                None => tracing::debug!(step = ?state.step(), "No back target"),
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
    use crate::error::OrderError;
    use crate::flows::test_support::drive;
    use bringin_testing::ReducerTest;
    use bringin_testing::assertions::assert_no_effects;
    use bringin_testing::test_clock;
    use bringin_core::environment::Clock;

    fn walk(state: &mut WalkInState, env: &AppEnvironment, actions: Vec<WalkInAction>) {
        let reducer = WalkInReducer::new();
        for action in actions {
            drive(&reducer, state, action, env);
        }
    }

    #[test]
    fn starts_at_the_walk_in_cafe() {
        let (env, _) = test_env();
        let state = WalkInState::new(&env);
        assert_eq!(state.cafe_name, "브라운 카페");
        assert_eq!(state.order.menu().drinks().len(), 3);
        assert_eq!(state.step(), WalkInStep::Location);
        assert_eq!(state.session_length, "2시간");
    }

    #[test]
    fn session_length_follows_config() {
        let (mut env, _) = test_env();
        env.config.session_minutes = 90;
        assert_eq!(WalkInState::new(&env).session_length, "1시간 30분");
    }

    #[test]
    fn guest_with_drink_skips_ordering() {
        let (env, _) = test_env();
        let mut state = WalkInState::new(&env);
        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(true),
                WalkInAction::ConfirmVerification,
                WalkInAction::SelectSeat(WalkInSeat::Pair),
            ],
        );

        assert_eq!(state.step(), WalkInStep::Using);
        assert_eq!(state.start_time, Some(test_clock().now()));
        assert_eq!(state.seat, Some(WalkInSeat::Pair));
    }

    #[test]
    fn guest_without_drink_must_order() {
        let (env, _) = test_env();
        let mut state = WalkInState::new(&env);
        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(false),
                WalkInAction::SelectSeat(WalkInSeat::Single),
                WalkInAction::SubmitOrder,
            ],
        );

        assert_eq!(state.step(), WalkInStep::DrinkOrder);
        assert_eq!(state.last_rejection, Some(Rejection::Order(OrderError::Empty)));
        assert!(state.start_time.is_none());

        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::AdjustDrink(DrinkId(1), 1),
                WalkInAction::AdjustDrink(DrinkId(1), 1),
                WalkInAction::AdjustDrink(DrinkId(1), 1),
                WalkInAction::SubmitOrder,
            ],
        );
        assert_eq!(state.step(), WalkInStep::Using);
        assert!(state.last_rejection.is_none());
        assert_eq!(state.order.summary(), "아메리카노 3잔");
    }

    #[test]
    fn oversized_order_is_refused_before_payment() {
        let (env, _) = test_env();
        let mut state = WalkInState::new(&env);
        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(false),
                WalkInAction::SelectSeat(WalkInSeat::Single),
                WalkInAction::AdjustDrink(DrinkId(1), i32::MAX),
            ],
        );
        assert_eq!(state.last_rejection, Some(Rejection::Order(OrderError::TooLarge)));
        assert_eq!(state.order.total_count(), 0);

        walk(&mut state, &env, vec![WalkInAction::SubmitOrder]);
        assert_eq!(state.step(), WalkInStep::DrinkOrder);
        assert_eq!(state.last_rejection, Some(Rejection::Order(OrderError::Empty)));
        assert_eq!(state.order.total_price(), 0);
    }

    #[test]
    fn finishing_reports_the_visit() {
        let (env, _) = test_env();
        let mut state = WalkInState::new(&env);
        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(false),
                WalkInAction::SelectSeat(WalkInSeat::Single),
                WalkInAction::AdjustDrink(DrinkId(2), 1),
                WalkInAction::SubmitOrder,
                WalkInAction::Back,
            ],
        );

        assert_eq!(state.step(), WalkInStep::Done);
        let outcome = state.outcome.unwrap();
        assert_eq!(outcome.cafe_name, "브라운 카페");
        assert_eq!(outcome.seat.label(), "1인석");
        assert_eq!(outcome.order_summary, "카페라떼 1잔");
    }

    #[test]
    fn seat_select_back_depends_on_the_answer() {
        let (env, _) = test_env();

        let mut with_drink = WalkInState::new(&env);
        walk(
            &mut with_drink,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(true),
                WalkInAction::ConfirmVerification,
                WalkInAction::Back,
            ],
        );
        assert_eq!(with_drink.step(), WalkInStep::DrinkVerify);

        let mut without = WalkInState::new(&env);
        walk(
            &mut without,
            &env,
            vec![WalkInAction::Next, WalkInAction::AnswerHasDrink(false), WalkInAction::Back],
        );
        assert_eq!(without.step(), WalkInStep::HasDrink);
    }

    #[test]
    fn order_back_returns_to_seat_select() {
        let (env, _) = test_env();
        let mut state = WalkInState::new(&env);
        walk(
            &mut state,
            &env,
            vec![
                WalkInAction::Next,
                WalkInAction::AnswerHasDrink(false),
                WalkInAction::SelectSeat(WalkInSeat::Pair),
            ],
        );

        ReducerTest::new(WalkInReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WalkInAction::Back)
            .then_state(|s| assert_eq!(s.step(), WalkInStep::SeatSelect))
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn drinks_only_change_on_the_order_screen() {
        let (env, _) = test_env();
        let state = WalkInState::new(&env);
        ReducerTest::new(WalkInReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(WalkInAction::AdjustDrink(DrinkId(1), 1))
            .then_state(|s| assert_eq!(s.order.total_count(), 0))
            .run();
    }
}
