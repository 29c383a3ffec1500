//! The cafe as its owner configures it.
//!
//! [`Venue`] holds every collection the session treats as canonical: the
//! concrete seats, the usage ledger, the seat-type settings those seats are
//! generated from, the allowed foods and the operating hours.

use crate::error::InputRejection;
use crate::seats::SeatInventory;
use crate::types::{AllowedFood, FoodId, SeatTypeSetting};
use crate::usage::UsageLedger;
use bringin_core::environment::IdGenerator;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Foods offered as one-tap choices in the owner settings
pub const DEFAULT_FOOD_OPTIONS: [&str; 5] = ["빵/디저트", "간단한 외부 음식", "도시락", "샌드위치", "샐러드"];

/// Message shown when a cafe allows no outside food
pub const NO_ALLOWED_FOODS: &str = "등록된 허용 음식이 없습니다";

// ============================================================================
// Allowed foods
// ============================================================================

/// Outside foods the cafe accepts. Names are unique (exact match).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedFoods {
    foods: Vec<AllowedFood>,
}

impl AllowedFoods {
    /// Wrap an existing list
    #[must_use]
    pub const fn new(foods: Vec<AllowedFood>) -> Self {
        Self { foods }
    }

    /// Entries in insertion order
    #[must_use]
    pub fn foods(&self) -> &[AllowedFood] {
        &self.foods
    }

    /// Whether an entry named `name` exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.foods.iter().any(|food| food.name == name)
    }

    /// Owner-typed entries
    pub fn custom(&self) -> impl Iterator<Item = &AllowedFood> {
        self.foods.iter().filter(|food| food.is_custom)
    }

    /// Display names, or `None` when the list is empty
    #[must_use]
    pub fn labels(&self) -> Option<Vec<&str>> {
        (!self.foods.is_empty()).then(|| self.foods.iter().map(|food| food.name.as_str()).collect())
    }

    /// Select or deselect one of [`DEFAULT_FOOD_OPTIONS`].
    ///
    /// Returns whether the option is now selected.
    ///
    /// # Errors
    ///
    /// [`InputRejection::UnknownFoodOption`] if `name` is not a default option.
    pub fn toggle_default(&mut self, name: &str, ids: &dyn IdGenerator) -> Result<bool, InputRejection> {
        if !DEFAULT_FOOD_OPTIONS.contains(&name) {
            return Err(InputRejection::UnknownFoodOption { name: name.to_string() });
        }
        if self.contains(name) {
            self.foods.retain(|food| food.name != name);
            return Ok(false);
        }
        self.foods.push(AllowedFood {
            id: FoodId::new(ids.next_id("food")),
            name: name.to_string(),
            is_custom: false,
        });
        Ok(true)
    }

    /// Add an owner-typed food; the name is trimmed first.
    ///
    /// # Errors
    ///
    /// - [`InputRejection::EmptyFoodName`] if nothing is left after trimming
    /// - [`InputRejection::DuplicateFood`] if the name is already listed
    pub fn add_custom(&mut self, name: &str, ids: &dyn IdGenerator) -> Result<&AllowedFood, InputRejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputRejection::EmptyFoodName);
        }
        if self.contains(name) {
            return Err(InputRejection::DuplicateFood { name: name.to_string() });
        }
        self.foods.push(AllowedFood {
            id: FoodId::new(ids.next_id("food")),
            name: name.to_string(),
            is_custom: true,
        });
        tracing::debug!(food = name, "Custom food added");
        let index = self.foods.len() - 1;
        Ok(&self.foods[index])
    }

    /// Delete an owner-typed food.
    ///
    /// # Errors
    ///
    /// - [`InputRejection::UnknownFood`] if no entry has `id`
    /// - [`InputRejection::NotCustomFood`] for default options
    pub fn remove_custom(&mut self, id: &FoodId) -> Result<AllowedFood, InputRejection> {
        let index = self
            .foods
            .iter()
            .position(|food| &food.id == id)
            .ok_or(InputRejection::UnknownFood)?;
        if !self.foods[index].is_custom {
            return Err(InputRejection::NotCustomFood);
        }
        Ok(self.foods.remove(index))
    }
}

// ============================================================================
// Operating hours
// ============================================================================

/// Korean one-letter label for a weekday
#[must_use]
pub const fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}

/// Every weekday, Monday first
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// When the owner intends to open seats. Not enforced against bookings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    days: Vec<Weekday>,
    /// Opening time
    pub start: NaiveTime,
    /// Closing time
    pub end: NaiveTime,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            days: WEEK[..5].to_vec(),
            start: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl OperatingHours {
    /// Selected days, Monday first
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Whether `day` is selected
    #[must_use]
    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Select or deselect `day`; returns whether it is now selected
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        if self.is_open_on(day) {
            self.days.retain(|d| *d != day);
            false
        } else {
            self.days.push(day);
            self.days.sort_by_key(Weekday::num_days_from_monday);
            true
        }
    }

    /// Replace the opening window
    pub fn set_hours(&mut self, start: NaiveTime, end: NaiveTime) {
        self.start = start;
        self.end = end;
    }

    /// `"월 화 수 목 금 14:00-17:00"`
    #[must_use]
    pub fn summary(&self) -> String {
        let days: Vec<&str> = self.days.iter().map(|day| day_label(*day)).collect();
        format!("{} {}-{}", days.join(" "), self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

// ============================================================================
// Venue
// ============================================================================

/// All owner-managed state of the cafe
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Concrete seats
    pub seats: SeatInventory,
    /// Usage records, most recent first
    pub ledger: UsageLedger,
    /// Seat-type settings the seats are generated from on save
    pub seat_types: Vec<SeatTypeSetting>,
    /// Accepted outside foods
    pub foods: AllowedFoods,
    /// Informational opening window
    pub hours: OperatingHours,
}
