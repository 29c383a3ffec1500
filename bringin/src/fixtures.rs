//! Sample data the client starts with.

use crate::seats::SeatInventory;
use crate::types::{
    AllowedFood, FoodId, OrderVerification, RegisteredSeat, SeatId, SeatTypeSetting, SeatUsage,
    UsageHistory, UsageId, UsageStatus,
};
use crate::usage::UsageLedger;
use crate::venue::{AllowedFoods, OperatingHours, Venue};
use chrono::{DateTime, Duration, Utc};

fn seat(id: &str, capacity: u32, is_open: bool, usage: Option<SeatUsage>) -> RegisteredSeat {
    RegisteredSeat {
        id: SeatId::from(id),
        capacity,
        is_open,
        usage,
    }
}

fn occupant(name: &str, since: DateTime<Utc>, people: u32, order: OrderVerification) -> SeatUsage {
    SeatUsage {
        user_name: name.to_string(),
        start_time: since,
        people,
        order,
    }
}

fn past_visit(
    id: &str,
    cafe: &str,
    address: &str,
    visited: DateTime<Utc>,
    drink: &str,
    minutes: u32,
) -> UsageHistory {
    UsageHistory {
        id: UsageId::from(id),
        cafe_name: cafe.to_string(),
        cafe_address: address.to_string(),
        visit_date: visited,
        drink_ordered: drink.to_string(),
        duration_minutes: minutes,
        status: UsageStatus::Completed,
        seat_type: None,
        start_time: None,
        payment_time: None,
    }
}

/// Two occupied seats, one open seat and one closed seat
#[must_use]
pub fn sample_seats(now: DateTime<Utc>) -> SeatInventory {
    SeatInventory::new(vec![
        seat(
            "1",
            2,
            true,
            Some(occupant("김OO", now - Duration::minutes(45), 2, OrderVerification::Payment)),
        ),
        seat(
            "2",
            1,
            true,
            Some(occupant("이OO", now - Duration::minutes(20), 1, OrderVerification::Verify)),
        ),
        seat("3", 2, true, None),
        seat("4", 1, false, None),
    ])
}

/// Two finished visits, most recent first
#[must_use]
pub fn sample_history(now: DateTime<Utc>) -> UsageLedger {
    UsageLedger::new(vec![
        past_visit(
            "2",
            "그린 카페",
            "서울시 서초구 서초대로 456",
            now - Duration::days(2),
            "카페라떼",
            90,
        ),
        past_visit(
            "3",
            "블루 커피",
            "서울시 송파구 올림픽로 789",
            now - Duration::days(5),
            "바닐라라떼",
            60,
        ),
    ])
}

/// Two single seats and three pairs
#[must_use]
pub fn sample_seat_types() -> Vec<SeatTypeSetting> {
    vec![SeatTypeSetting::new("1", 1, 2), SeatTypeSetting::new("2", 2, 3)]
}

/// Bread and desserts only
#[must_use]
pub fn sample_foods() -> AllowedFoods {
    AllowedFoods::new(vec![AllowedFood {
        id: FoodId::from("1"),
        name: "빵/디저트".to_string(),
        is_custom: false,
    }])
}

/// The full sample cafe, timestamps relative to `now`
#[must_use]
pub fn sample_venue(now: DateTime<Utc>) -> Venue {
    Venue {
        seats: sample_seats(now),
        ledger: sample_history(now),
        seat_types: sample_seat_types(),
        foods: sample_foods(),
        hours: OperatingHours::default(),
    }
}
