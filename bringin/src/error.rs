//! Error taxonomy.
//!
//! Every error here is a validation rejection or a precondition violation.
//! Their `Display` strings are the messages shown to the user, so flows keep
//! the last one in state as a [`Rejection`] instead of surfacing a fault.

use crate::types::{DrinkId, SeatId, UsageId, UsageStatus};
use bringin_core::flow::FlowError;
use thiserror::Error;

/// Malformed or incomplete user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    /// Phone number is not exactly eleven digits
    #[error("휴대폰 번호 11자리를 입력해주세요.")]
    PhoneLength {
        /// Digits entered so far
        len: usize,
    },

    /// Verification code is not exactly six digits
    #[error("인증번호 6자리를 입력해주세요.")]
    CodeLength {
        /// Digits entered so far
        len: usize,
    },

    /// Custom food name is blank after trimming
    #[error("음식 이름을 입력해주세요.")]
    EmptyFoodName,

    /// Food name already on the list
    #[error("이미 추가된 음식입니다.")]
    DuplicateFood {
        /// The duplicated name
        name: String,
    },

    /// Name is not one of the default food options
    #[error("기본 목록에 없는 음식입니다: {name}")]
    UnknownFoodOption {
        /// The name that was toggled
        name: String,
    },

    /// Default foods are removed by toggling, not deletion
    #[error("기본 음식은 선택을 해제해주세요.")]
    NotCustomFood,

    /// No food entry with that identifier
    #[error("등록되지 않은 음식입니다.")]
    UnknownFood,

    /// Party size would drop below one
    #[error("인원은 1명 이상이어야 합니다.")]
    PartySize,

    /// Seat-type capacity would drop below one
    #[error("좌석은 1인석 이상이어야 합니다.")]
    SeatCapacity,

    /// No seat-type row with that identifier
    #[error("등록되지 않은 좌석 유형입니다.")]
    UnknownSeatType,

    /// Seat type is not offered for this party size
    #[error("{capacity}인석은 선택할 수 없습니다.")]
    SeatOption {
        /// Capacity that was picked
        capacity: u32,
    },

    /// Cafe is not in the filtered list
    #[error("선택할 수 없는 카페입니다.")]
    CafeUnavailable,
}

/// Seat inventory precondition violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeatError {
    /// No seat with that identifier
    #[error("존재하지 않는 좌석입니다: {0}")]
    UnknownSeat(SeatId),

    /// Occupied seats cannot be closed
    #[error("이용 중인 좌석은 닫을 수 없습니다.")]
    Occupied(SeatId),

    /// Ending usage of a free seat
    #[error("이용 중인 좌석이 아닙니다.")]
    NotInUse(SeatId),
}

/// Usage lifecycle violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// No record with that identifier
    #[error("이용 내역을 찾을 수 없습니다: {0}")]
    UnknownRecord(UsageId),

    /// Transition outside `waiting → current → completed`
    #[error("{id}: {from} 상태에서 {to} 상태로 바꿀 수 없습니다.")]
    IllegalTransition {
        /// Record identifier
        id: UsageId,
        /// Current status
        from: UsageStatus,
        /// Requested status
        to: UsageStatus,
    },
}

/// Drink order violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Adding a drink would exceed one per person
    #[error("인원 {people}명 기준으로 {people}잔까지 선택할 수 있습니다.")]
    CapReached {
        /// Party size
        people: u32,
    },

    /// Party order total differs from party size
    #[error("인원 {people}명 기준으로 음료를 {people}잔 선택해주세요.")]
    PartyMismatch {
        /// Party size
        people: u32,
        /// Drinks selected
        selected: u32,
    },

    /// Walk-in order is empty
    #[error("최소 1잔 이상의 음료를 선택해주세요.")]
    Empty,

    /// Drink not on the menu
    #[error("메뉴에 없는 음료입니다: {0}")]
    UnknownDrink(DrinkId),

    /// Quantity or total price out of range
    #[error("주문 가능한 수량을 초과했습니다.")]
    TooLarge,
}

/// Phone verification failure reported by the verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("인증에 실패했습니다: {reason}")]
pub struct VerifyError {
    /// Verifier-provided reason
    pub reason: String,
}

/// Anything a flow can refuse, kept in state for display
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Bad input
    #[error(transparent)]
    Input(#[from] InputRejection),

    /// Seat precondition
    #[error(transparent)]
    Seat(#[from] SeatError),

    /// Usage lifecycle
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Drink order
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Phone verification
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Event not allowed at the current step
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Malformed configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    /// Environment variable name
    pub var: &'static str,
    /// Raw value
    pub value: String,
    /// What was wrong with it
    pub reason: String,
}
