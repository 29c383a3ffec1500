//! Owner dashboard.
//!
//! Two tabs over the cafe's [`Venue`]: the live seat grid with the waiting
//! queue, and the settings editor (days and hours, allowed foods, seat
//! types). Ending a usage and confirming an arrival both go through an
//! explicit confirmation prompt. Seat-type edits only reach the seat grid
//! when the owner saves.

use super::settle;
use crate::environment::AppEnvironment;
use crate::error::{InputRejection, Rejection, SeatError};
use crate::format::elapsed_label;
use crate::seats::SeatStats;
use crate::types::{FoodId, RegisteredSeat, SeatId, SeatTypeId, SeatTypeSetting, UsageHistory, UsageId};
use crate::venue::Venue;
use bringin_core::effect::Effect;
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use std::collections::BTreeMap;

/// Notice shown after the seat layout is saved
pub const SEATS_SAVED: &str = "좌석 구성이 저장되었습니다";

/// Dashboard tabs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardTab {
    /// 현재 이용 현황
    Current,
    /// 운영 설정
    #[default]
    Settings,
}

/// An action waiting for the owner's yes/no
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingConfirm {
    /// Free an occupied seat
    EndUsage(SeatId),
    /// Guest arrived; start the usage
    StartUsage(UsageId),
}

impl PendingConfirm {
    /// Prompt text
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            Self::EndUsage(_) => "이용을 종료하시겠습니까?",
            Self::StartUsage(_) => "이용 시작을 확인하시겠습니까?",
        }
    }
}

/// Owner dashboard state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnerDashboardState {
    /// The cafe: seats, usage ledger, seat types, foods, hours
    pub venue: Venue,
    /// Visible tab
    pub tab: DashboardTab,
    /// Custom food text field
    pub custom_food_input: String,
    /// Occupied seat whose detail sheet is open
    pub detail: Option<SeatId>,
    /// Prompt on screen
    pub pending: Option<PendingConfirm>,
    /// Informational toast
    pub notice: Option<String>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl OwnerDashboardState {
    /// Dashboard over `venue`
    #[must_use]
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            ..Self::default()
        }
    }

    /// Seat grid, grouped by capacity ascending
    #[must_use]
    pub fn seat_groups(&self) -> BTreeMap<u32, Vec<&RegisteredSeat>> {
        self.venue.seats.grouped_by_capacity()
    }

    /// Header totals
    #[must_use]
    pub fn stats(&self) -> SeatStats {
        self.venue.seats.stats()
    }

    /// Reservations waiting for arrival confirmation
    pub fn waiting_queue(&self) -> impl Iterator<Item = &UsageHistory> {
        self.venue.ledger.waiting()
    }

    /// The seat on the detail sheet
    #[must_use]
    pub fn detail_seat(&self) -> Option<&RegisteredSeat> {
        self.detail.as_ref().and_then(|id| self.venue.seats.get(id))
    }

    /// `"1시간 5분"` since the occupant of `seat` sat down
    #[must_use]
    pub fn elapsed(seat: &RegisteredSeat, now: DateTime<Utc>) -> Option<String> {
        seat.usage
            .as_ref()
            .map(|usage| elapsed_label((now - usage.start_time).num_minutes()))
    }

    fn seat_type_mut(&mut self, id: &SeatTypeId) -> Result<&mut SeatTypeSetting, InputRejection> {
        self.venue
            .seat_types
            .iter_mut()
            .find(|setting| &setting.id == id)
            .ok_or(InputRejection::UnknownSeatType)
    }
}

/// Owner dashboard inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerDashboardAction {
    /// Switch tabs
    SelectTab(DashboardTab),
    /// Seat tapped on the grid
    TapSeat(SeatId),
    /// Detail sheet closed
    CloseDetail,
    /// "이용 종료" on the detail sheet
    RequestEndUsage,
    /// "이용 시작 확인" on a waiting reservation
    RequestStartUsage(UsageId),
    /// Prompt answered yes
    Confirm,
    /// Prompt answered no
    Cancel,
    /// Close a running usage record
    CompleteUsage(UsageId),
    /// Day chip
    ToggleDay(Weekday),
    /// Opening window
    SetHours {
        /// Opening time
        start: NaiveTime,
        /// Closing time
        end: NaiveTime,
    },
    /// Default food chip
    ToggleFood(String),
    /// Custom food field edited
    CustomFoodChanged(String),
    /// "추가"
    AddCustomFood,
    /// Custom food "x"
    RemoveCustomFood(FoodId),
    /// "좌석 유형 추가"
    AddSeatType,
    /// Seat type "x"
    RemoveSeatType(SeatTypeId),
    /// Capacity `+`/`-`
    AdjustCapacity(SeatTypeId, i32),
    /// Count `+`/`-`
    AdjustCount(SeatTypeId, i32),
    /// "저장하기"
    SaveSeats,
    /// Toast closed
    DismissNotice,
}

/// Reducer for the owner dashboard
#[derive(Clone, Debug, Default)]
pub struct OwnerDashboardReducer;

impl OwnerDashboardReducer {
    /// Creates a new `OwnerDashboardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn tap_seat(state: &mut OwnerDashboardState, id: SeatId) -> Result<(), Rejection> {
        let seat = state
            .venue
            .seats
            .get(&id)
            .ok_or_else(|| SeatError::UnknownSeat(id.clone()))?;
        if seat.in_use() {
            state.detail = Some(id);
        } else {
            state.venue.seats.toggle_open(&id)?;
        }
        Ok(())
    }

    fn confirm(state: &mut OwnerDashboardState, env: &AppEnvironment) -> Result<(), Rejection> {
        let Some(pending) = state.pending.take() else {
            return Ok(());
        };
        match pending {
            PendingConfirm::EndUsage(seat) => {
                state.venue.seats.end_usage(&seat)?;
                state.detail = None;
            },
            PendingConfirm::StartUsage(usage) => {
                state.venue.ledger.confirm_arrival(&usage, env.clock.now())?;
            },
        }
        Ok(())
    }

    fn adjust_capacity(state: &mut OwnerDashboardState, id: &SeatTypeId, delta: i32) -> Result<(), InputRejection> {
        let setting = state.seat_type_mut(id)?;
        let capacity = setting.capacity.saturating_add_signed(delta);
        if capacity < 1 {
            return Err(InputRejection::SeatCapacity);
        }
        setting.capacity = capacity;
        Ok(())
    }

    fn adjust_count(state: &mut OwnerDashboardState, id: &SeatTypeId, delta: i32) -> Result<(), InputRejection> {
        let setting = state.seat_type_mut(id)?;
        setting.count = setting.count.saturating_add_signed(delta);
        Ok(())
    }
}

impl Reducer for OwnerDashboardReducer {
    type State = OwnerDashboardState;
    type Action = OwnerDashboardAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut OwnerDashboardState,
        action: OwnerDashboardAction,
        env: &AppEnvironment,
    ) -> Effects<OwnerDashboardAction> {
        match action {
            OwnerDashboardAction::SelectTab(tab) => state.tab = tab,
            OwnerDashboardAction::TapSeat(id) => {
                let result = Self::tap_seat(state, id);
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::CloseDetail => state.detail = None,
            OwnerDashboardAction::RequestEndUsage => {
                let occupied = state.detail_seat().filter(|seat| seat.in_use()).map(|seat| seat.id.clone());
                if let Some(seat) = occupied {
                    state.pending = Some(PendingConfirm::EndUsage(seat));
                }
            },
            OwnerDashboardAction::RequestStartUsage(id) => {
                state.pending = Some(PendingConfirm::StartUsage(id));
            },
            OwnerDashboardAction::Confirm => {
                let result = Self::confirm(state, env);
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::Cancel => state.pending = None,
            OwnerDashboardAction::CompleteUsage(id) => {
                let result = state.venue.ledger.complete_usage(&id, env.clock.now());
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::ToggleDay(day) => {
                state.venue.hours.toggle_day(day);
            },
            OwnerDashboardAction::SetHours { start, end } => state.venue.hours.set_hours(start, end),
            OwnerDashboardAction::ToggleFood(name) => {
                let result = state.venue.foods.toggle_default(&name, env.ids.as_ref());
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::CustomFoodChanged(text) => state.custom_food_input = text,
            OwnerDashboardAction::AddCustomFood => {
                let result = state
                    .venue
                    .foods
                    .add_custom(&state.custom_food_input, env.ids.as_ref())
                    .map(|_| ());
                if settle(&mut state.last_rejection, result).is_some() {
                    state.custom_food_input.clear();
                }
            },
            OwnerDashboardAction::RemoveCustomFood(id) => {
                let result = state.venue.foods.remove_custom(&id);
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::AddSeatType => {
                let id = SeatTypeId::new(env.ids.next_id("seat-type"));
                state.venue.seat_types.push(SeatTypeSetting::new(id, 2, 1));
            },
            OwnerDashboardAction::RemoveSeatType(id) => {
                state.venue.seat_types.retain(|setting| setting.id != id);
            },
            OwnerDashboardAction::AdjustCapacity(id, delta) => {
                let result = Self::adjust_capacity(state, &id, delta);
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::AdjustCount(id, delta) => {
                let result = Self::adjust_count(state, &id, delta);
                settle(&mut state.last_rejection, result);
            },
            OwnerDashboardAction::SaveSeats => {
                state.venue.seats.resync(&state.venue.seat_types, env.ids.as_ref());
                if state.detail_seat().is_none() {
                    state.detail = None;
                }
                state.notice = Some(SEATS_SAVED.to_string());
            },
            OwnerDashboardAction::DismissNotice => state.notice = None,
        }

        smallvec![Effect::None]
    }
}
