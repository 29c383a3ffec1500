//! Domain types shared by every BringIn flow.
//!
//! Seats, seat-type settings, usage records and foods are plain data. The
//! collections that hold them ([`crate::seats::SeatInventory`],
//! [`crate::usage::UsageLedger`], [`crate::venue::AllowedFoods`]) own the
//! rules for changing them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier string
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a concrete seat at the cafe
    SeatId
);
string_id!(
    /// Identifier of an owner seat-type setting row
    SeatTypeId
);
string_id!(
    /// Identifier of a usage history record
    UsageId
);
string_id!(
    /// Identifier of an allowed-food entry
    FoodId
);
string_id!(
    /// Identifier of a cafe (store) as encoded in QR codes
    StoreId
);
string_id!(
    /// Identifier of a logged-in user
    UserId
);

/// Identifier of a cafe in the nearby-cafe catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CafeId(pub u32);

impl fmt::Display for CafeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a drink on a menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrinkId(pub u32);

impl fmt::Display for DrinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Seats
// ============================================================================

/// Korean seat label for a capacity: `2` → `"2인석"`
#[must_use]
pub fn seat_label(capacity: u32) -> String {
    format!("{capacity}인석")
}

/// Owner-configured seat category: `count` tables seating `capacity` each
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTypeSetting {
    /// Row identifier in the owner's editor
    pub id: SeatTypeId,
    /// People per table, at least 1
    pub capacity: u32,
    /// Number of such tables
    pub count: u32,
}

impl SeatTypeSetting {
    /// Create a setting row
    #[must_use]
    pub fn new(id: impl Into<SeatTypeId>, capacity: u32, count: u32) -> Self {
        Self {
            id: id.into(),
            capacity: capacity.max(1),
            count,
        }
    }

    /// `"2인석"` style label
    #[must_use]
    pub fn label(&self) -> String {
        seat_label(self.capacity)
    }
}

/// How the occupant's drinks were settled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderVerification {
    /// Paid in the app
    Payment,
    /// Brought a drink and had it verified
    Verify,
}

impl OrderVerification {
    /// Owner-facing label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Payment => "결제 완료",
            Self::Verify => "주문 확인 대기",
        }
    }
}

/// Who is sitting at an occupied seat
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatUsage {
    /// Masked occupant name (`김OO`)
    pub user_name: String,
    /// When the occupant sat down
    pub start_time: DateTime<Utc>,
    /// Party size
    pub people: u32,
    /// Settlement mode
    pub order: OrderVerification,
}

/// Display class of a seat on the owner grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Not bookable (dark)
    Closed,
    /// Bookable and free (accent)
    Open,
    /// Someone is sitting there (neutral)
    Occupied,
}

/// A concrete physical seat.
///
/// Occupancy and usage details are one field, so a seat is in use exactly
/// when it carries [`SeatUsage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredSeat {
    /// Seat identifier, stable across resync
    pub id: SeatId,
    /// People the seat accommodates
    pub capacity: u32,
    /// Owner has made the seat bookable
    pub is_open: bool,
    /// Current occupant, if any
    pub usage: Option<SeatUsage>,
}

impl RegisteredSeat {
    /// A fresh seat: closed and free
    #[must_use]
    pub const fn new(id: SeatId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            is_open: false,
            usage: None,
        }
    }

    /// Whether someone is sitting here
    #[must_use]
    pub const fn in_use(&self) -> bool {
        self.usage.is_some()
    }

    /// Grid display class; occupancy wins over open/closed
    #[must_use]
    pub const fn status(&self) -> SeatStatus {
        if self.in_use() {
            SeatStatus::Occupied
        } else if self.is_open {
            SeatStatus::Open
        } else {
            SeatStatus::Closed
        }
    }
}

// ============================================================================
// Foods
// ============================================================================

/// A food the cafe lets guests bring in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedFood {
    /// Entry identifier
    pub id: FoodId,
    /// Display name, unique within the cafe's list
    pub name: String,
    /// Typed in by the owner rather than picked from the default list
    pub is_custom: bool,
}

// ============================================================================
// Usage history
// ============================================================================

/// Lifecycle state of a usage record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    /// Paid, waiting for the owner to confirm arrival
    Waiting,
    /// Occupying a seat
    Current,
    /// Finished
    Completed,
}

impl UsageStatus {
    /// Whether `self → next` is a lifecycle edge
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Current) | (Self::Current, Self::Completed)
        )
    }

    /// Badge text on the home screen
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Waiting => "이용 대기 중",
            Self::Current => "이용 중",
            Self::Completed => "이용 완료",
        }
    }
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Current => "current",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// One reservation's life from payment to completion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistory {
    /// Record identifier
    pub id: UsageId,
    /// Cafe name
    pub cafe_name: String,
    /// Cafe street address
    pub cafe_address: String,
    /// Payment instant for booked visits, visit day for seeded history
    pub visit_date: DateTime<Utc>,
    /// `"아메리카노 2잔, 카페라떼 1잔"`
    pub drink_ordered: String,
    /// Minutes spent, filled in on completion
    pub duration_minutes: u32,
    /// Lifecycle state
    pub status: UsageStatus,
    /// `"2인석"` style label of the booked seat type
    pub seat_type: Option<String>,
    /// Set when the owner confirms arrival
    pub start_time: Option<DateTime<Utc>>,
    /// Set when the order is paid
    pub payment_time: Option<DateTime<Utc>>,
}

/// Fields the booking flow hands over when an order is paid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidOrder {
    /// Cafe name
    pub cafe_name: String,
    /// Cafe street address
    pub cafe_address: String,
    /// Order summary string
    pub drink_ordered: String,
    /// `"2인석"` style label
    pub seat_type: String,
}

// ============================================================================
// Roles
// ============================================================================

/// Which side of the service the user is acting as
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Guest looking for a seat
    User,
    /// Cafe owner managing seats
    Owner,
}

/// Result of a finished login, handed to the session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCompleted {
    /// Logged-in user
    pub user_id: UserId,
    /// Role the user enters with
    pub role: Role,
    /// Store the user owns, for the owner role
    pub store_id: Option<StoreId>,
    /// Eleven-digit phone number
    pub phone_number: String,
    /// Keep the session on this device
    pub auto_login: bool,
}
