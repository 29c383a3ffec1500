//! Party booking.
//!
//! ```text
//! people-count → seat-select → cafe-list → cafe-detail → drink-order → waiting
//! ```
//!
//! Back buttons name their target: the cafe list and the drink order both
//! return to seat selection, the detail page returns to the list. Parties at
//! or above the large-party size see a call-ahead advisory before the
//! detail page. Paying leaves a [`BookingOutcome::Paid`] for the session,
//! which records the waiting usage.

use super::copy::{CopyAction, CopyReducer, CopyState};
use super::settle;
use crate::catalog::{Cafe, CafeFilter, FoodCategory, Radius, SeatOption};
use crate::drinks::{DrinkOrder, OrderRule};
use crate::environment::AppEnvironment;
use crate::error::{InputRejection, Rejection};
use crate::types::{CafeId, DrinkId, PaidOrder, SeatTypeId, SeatTypeSetting};
use bringin_core::composition::scope;
use bringin_core::effect::Effect;
use bringin_core::flow::{Flow, StepMachine};
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;
use chrono::{DateTime, Utc};

// ============================================================================
// Steps
// ============================================================================

/// Booking screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingStep {
    /// 인원 선택
    PeopleCount,
    /// 좌석 선택
    SeatSelect,
    /// 이용 가능한 카페
    CafeList,
    /// Cafe detail
    CafeDetail,
    /// 음료 주문
    DrinkOrder,
    /// 결제 완료, waiting for the owner
    Waiting,
    /// Left the booking
    Exited,
}

/// Booking transitions
#[derive(Clone, Copy, Debug)]
pub enum BookingEvent {
    /// Party size confirmed
    ConfirmPeople,
    /// Seat type picked
    SelectSeat,
    /// Cafe opened
    SelectCafe,
    /// "음료 주문하기"
    StartOrder,
    /// Order paid
    Pay,
    /// Back to the party size
    BackToPeople,
    /// Back to seat selection
    BackToSeat,
    /// Back to the cafe list
    BackToList,
    /// Leave the booking
    Leave,
}

/// Step table for booking
pub struct BookingMachine;

impl StepMachine for BookingMachine {
    type Step = BookingStep;
    type Event = BookingEvent;
    const NAME: &'static str = "booking";
    const INITIAL: BookingStep = BookingStep::PeopleCount;

    fn transition(from: BookingStep, event: BookingEvent) -> Option<BookingStep> {
        use BookingEvent as E;
        use BookingStep as S;
        match (from, event) {
            (S::PeopleCount, E::ConfirmPeople) => Some(S::SeatSelect),
            (S::SeatSelect, E::SelectSeat) => Some(S::CafeList),
            (S::CafeList, E::SelectCafe) => Some(S::CafeDetail),
            (S::CafeDetail, E::StartOrder) => Some(S::DrinkOrder),
            (S::DrinkOrder, E::Pay) => Some(S::Waiting),

            (S::SeatSelect, E::BackToPeople) => Some(S::PeopleCount),
            (S::CafeList | S::DrinkOrder, E::BackToSeat) => Some(S::SeatSelect),
            (S::CafeDetail, E::BackToList) => Some(S::CafeList),
            (S::PeopleCount | S::Waiting, E::Leave) => Some(S::Exited),
            _ => None,
        }
    }

    fn is_terminal(step: BookingStep) -> bool {
        step == BookingStep::Exited
    }
}

// ============================================================================
// State
// ============================================================================

/// What a booking hands to the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Order paid; record a waiting usage
    Paid(PaidOrder),
    /// Left the booking
    Left,
}

/// Call-ahead advisory for large parties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LargePartyAdvisory {
    /// Cafe the user tapped
    pub cafe: CafeId,
    /// Cafe name
    pub cafe_name: String,
    /// Number to call
    pub phone: String,
}

/// Booking state
#[derive(Clone, Debug, PartialEq)]
pub struct BookingState {
    /// Current screen
    pub flow: Flow<BookingMachine>,
    /// Party size, at least 1
    pub people: u32,
    /// Owner seat types, captured when the booking opened
    pub owner_seat_types: Vec<SeatTypeSetting>,
    /// Picked seat type
    pub seat: Option<SeatOption>,
    /// Cafe-list filters
    pub filter: CafeFilter,
    /// Open cafe
    pub cafe: Option<CafeId>,
    /// Shown instead of the detail page for large parties
    pub advisory: Option<LargePartyAdvisory>,
    /// One drink per person
    pub order: DrinkOrder,
    /// Stamped when the order is paid
    pub paid_at: Option<DateTime<Utc>>,
    /// Address and phone copy feedback
    pub copy: CopyState,
    /// Set on payment and on leaving
    pub outcome: Option<BookingOutcome>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl BookingState {
    /// A booking for one person, seeing `owner_seat_types` as the owner's
    /// current configuration
    #[must_use]
    pub fn new(env: &AppEnvironment, owner_seat_types: Vec<SeatTypeSetting>) -> Self {
        Self {
            flow: Flow::new(),
            people: 1,
            owner_seat_types,
            seat: None,
            filter: CafeFilter::default(),
            cafe: None,
            advisory: None,
            order: DrinkOrder::new(env.catalog.menu().clone(), OrderRule::Party { people: 1 }),
            paid_at: None,
            copy: CopyState::default(),
            outcome: None,
            last_rejection: None,
        }
    }

    /// Current screen
    #[must_use]
    pub const fn step(&self) -> BookingStep {
        self.flow.step()
    }

    /// Seat-type choices for the current party size
    #[must_use]
    pub fn seat_options(&self, env: &AppEnvironment) -> Vec<SeatOption> {
        env.catalog.seat_options(&self.owner_seat_types, self.people)
    }

    /// Cafes on the list under the current filters
    #[must_use]
    pub fn cafes<'a>(&'a self, env: &'a AppEnvironment) -> Vec<&'a Cafe> {
        env.catalog.filter(&self.filter).collect()
    }

    /// The open cafe
    #[must_use]
    pub fn selected_cafe<'a>(&self, env: &'a AppEnvironment) -> Option<&'a Cafe> {
        self.cafe.and_then(|id| env.catalog.get(id))
    }

    /// Drink-order banner text
    #[must_use]
    pub fn order_notice(&self) -> String {
        let people = self.people;
        if self.order.is_valid() {
            format!("인원 {people}명 기준 음료 {}잔이 선택되었습니다.", self.order.total_count())
        } else {
            format!("인원 {people}명 기준으로 음료를 {people}잔 선택해주세요")
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Booking inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    /// `+`/`-` on the party size
    ChangePeople(i32),
    /// "다음" on the party size
    ConfirmPeople,
    /// Seat type tapped
    SelectSeat(SeatTypeId),
    /// Food chip
    SetCategory(FoodCategory),
    /// Radius dropdown
    SetRadius(Radius),
    /// Cafe tapped on the list
    SelectCafe(CafeId),
    /// "확인했어요." on the advisory
    ProceedAnyway,
    /// Advisory closed
    DismissAdvisory,
    /// "음료 주문하기"
    StartOrder,
    /// `+`/`-` on a drink
    AdjustDrink(DrinkId, i32),
    /// "음료 주문하고 자리 사용하기"
    SubmitOrder,
    /// Copy the open cafe's address
    CopyAddress,
    /// Copy the advisory's phone number
    CopyPhone,
    /// Routed to copy feedback
    Copy(CopyAction),
    /// Header back button
    Back,
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for party booking
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn change_people(state: &mut BookingState, delta: i32, env: &AppEnvironment) -> Result<(), Rejection> {
        state.flow.ensure(BookingEvent::ConfirmPeople)?;
        let people = state.people.saturating_add_signed(delta);
        if people < 1 {
            return Err(InputRejection::PartySize.into());
        }
        state.people = people;
        state.order = DrinkOrder::new(env.catalog.menu().clone(), OrderRule::Party { people });
        Ok(())
    }

    fn select_seat(state: &mut BookingState, id: &SeatTypeId, env: &AppEnvironment) -> Result<(), Rejection> {
        state.flow.ensure(BookingEvent::SelectSeat)?;
        let option = state
            .seat_options(env)
            .into_iter()
            .find(|option| &option.id == id)
            .ok_or(InputRejection::UnknownSeatType)?;
        state.flow.fire(BookingEvent::SelectSeat)?;
        state.filter.seat_capacity = Some(option.capacity);
        state.seat = Some(option);
        Ok(())
    }

    fn select_cafe(state: &mut BookingState, id: CafeId, env: &AppEnvironment) -> Result<(), Rejection> {
        state.flow.ensure(BookingEvent::SelectCafe)?;
        let cafe = env
            .catalog
            .get(id)
            .filter(|cafe| state.filter.accepts(cafe))
            .ok_or(InputRejection::CafeUnavailable)?;

        if state.people >= env.config.large_party {
            tracing::debug!(people = state.people, cafe = %cafe.name, "Large party advisory");
            state.advisory = Some(LargePartyAdvisory {
                cafe: cafe.id,
                cafe_name: cafe.name.clone(),
                phone: cafe.phone.clone(),
            });
            return Ok(());
        }

        state.flow.fire(BookingEvent::SelectCafe)?;
        state.cafe = Some(cafe.id);
        Ok(())
    }

    fn submit(state: &mut BookingState, env: &AppEnvironment) -> Result<PaidOrder, Rejection> {
        state.flow.ensure(BookingEvent::Pay)?;
        state.order.validate()?;
        let (Some(cafe), Some(seat)) = (state.selected_cafe(env), state.seat.as_ref()) else {
            return Err(InputRejection::CafeUnavailable.into());
        };
        let paid = PaidOrder {
            cafe_name: cafe.name.clone(),
            cafe_address: cafe.address.clone(),
            drink_ordered: state.order.summary(),
            seat_type: seat.label(),
        };
        state.flow.fire(BookingEvent::Pay)?;
        Ok(paid)
    }

    fn back_event(step: BookingStep) -> Option<BookingEvent> {
        match step {
            BookingStep::PeopleCount | BookingStep::Waiting => Some(BookingEvent::Leave),
            BookingStep::SeatSelect => Some(BookingEvent::BackToPeople),
            BookingStep::CafeList | BookingStep::DrinkOrder => Some(BookingEvent::BackToSeat),
            BookingStep::CafeDetail => Some(BookingEvent::BackToList),
            BookingStep::Exited => None,
        }
    }

    fn copy(state: &mut BookingState, text: String, env: &AppEnvironment) -> Effects<BookingAction> {
        scope(&CopyReducer::new(), &mut state.copy, CopyAction::Copy(text), env, BookingAction::Copy)
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut BookingState, action: BookingAction, env: &AppEnvironment) -> Effects<BookingAction> {
        match action {
            BookingAction::ChangePeople(delta) => {
                let result = Self::change_people(state, delta, env);
                settle(&mut state.last_rejection, result);
            },
            BookingAction::ConfirmPeople => {
                settle(&mut state.last_rejection, state.flow.fire(BookingEvent::ConfirmPeople));
            },
            BookingAction::SelectSeat(id) => {
                let result = Self::select_seat(state, &id, env);
                settle(&mut state.last_rejection, result);
            },
            BookingAction::SetCategory(category) => {
                state.filter.category = category;
            },
            BookingAction::SetRadius(radius) => {
                state.filter.radius = radius;
            },
            BookingAction::SelectCafe(id) => {
                let result = Self::select_cafe(state, id, env);
                settle(&mut state.last_rejection, result);
            },
            BookingAction::ProceedAnyway => {
                let Some(advisory) = state.advisory.take() else {
                    return smallvec![Effect::None];
                };
                if settle(&mut state.last_rejection, state.flow.fire(BookingEvent::SelectCafe)).is_some() {
                    state.cafe = Some(advisory.cafe);
                }
            },
            BookingAction::DismissAdvisory => {
                state.advisory = None;
            },
            BookingAction::StartOrder => {
                settle(&mut state.last_rejection, state.flow.fire(BookingEvent::StartOrder));
            },
            BookingAction::AdjustDrink(id, delta) => {
                if !state.flow.is(BookingStep::DrinkOrder) {
                    return smallvec![Effect::None];
                }
                settle(&mut state.last_rejection, state.order.adjust(id, delta));
            },
            BookingAction::SubmitOrder => {
                let result = Self::submit(state, env);
                if let Some(paid) = settle(&mut state.last_rejection, result) {
                    tracing::info!(
                        cafe = %paid.cafe_name,
                        seat = %paid.seat_type,
                        total = state.order.total_price(),
                        "Booking paid"
                    );
                    state.paid_at = Some(env.clock.now());
                    state.outcome = Some(BookingOutcome::Paid(paid));
                }
            },
            BookingAction::CopyAddress => {
                if let Some(address) = state.selected_cafe(env).map(|cafe| cafe.address.clone()) {
                    return Self::copy(state, address, env);
                }
            },
            BookingAction::CopyPhone => {
                if let Some(phone) = state.advisory.as_ref().map(|advisory| advisory.phone.clone()) {
                    return Self::copy(state, phone, env);
                }
            },
            BookingAction::Copy(action) => {
                return scope(&CopyReducer::new(), &mut state.copy, action, env, BookingAction::Copy);
            },
            BookingAction::Back => {
                let Some(event) = Self::back_event(state.step()) else {
                    return smallvec![Effect::None];
                };
                if settle(&mut state.last_rejection, state.flow.fire(event)).is_some() {
                    state.advisory = None;
                    if state.flow.is(BookingStep::Exited) {
                        state.outcome = Some(BookingOutcome::Left);
                    }
                }
            },
        }

        smallvec![Effect::None]
    }
}
