//! Nearby cafes and the booking filters over them.

use crate::drinks::Menu;
use crate::format::{format_distance, walking_minutes};
use crate::types::{CafeId, SeatTypeSetting, SeatTypeId, seat_label};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Seat capacities a party of `people` may sit at.
///
/// `[people, people + 1]`, except a pair may also take a four-seat table.
#[must_use]
pub const fn capacity_window(people: u32) -> RangeInclusive<u32> {
    let upper = if people == 2 { 4 } else { people.saturating_add(1) };
    people..=upper
}

/// Outside-food categories a cafe accepts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodTags {
    /// Bread and desserts
    pub bread: bool,
    /// Cake
    pub cake: bool,
    /// Sandwiches
    pub sandwich: bool,
    /// Other food
    pub other: bool,
}

/// A cafe in the nearby list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cafe {
    /// Catalog identifier
    pub id: CafeId,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Phone number for the call-ahead advisory
    pub phone: String,
    /// Distance from the user in metres
    pub distance_m: u32,
    /// Accepted outside food
    pub foods: FoodTags,
    /// Seat types and how many are free
    pub seat_types: Vec<SeatTypeSetting>,
}

impl Cafe {
    /// Labels for the accepted food categories, in display order
    #[must_use]
    pub fn food_labels(&self) -> Vec<&'static str> {
        [
            (self.foods.bread, "빵/디저트"),
            (self.foods.cake, "케이크"),
            (self.foods.sandwich, "샌드위치"),
            (self.foods.other, "기타"),
        ]
        .into_iter()
        .filter_map(|(allowed, label)| allowed.then_some(label))
        .collect()
    }

    /// Free seats across all seat types
    #[must_use]
    pub fn available_seats(&self) -> u32 {
        self.seat_types.iter().map(|seat| seat.count).sum()
    }

    /// Minutes on foot
    #[must_use]
    pub const fn walking_minutes(&self) -> u32 {
        walking_minutes(self.distance_m)
    }

    /// `"380m"` / `"1.2km"`
    #[must_use]
    pub fn distance_label(&self) -> String {
        format_distance(self.distance_m)
    }

    /// Whether any free seat type fits a party choosing `capacity`
    #[must_use]
    pub fn fits_capacity(&self, capacity: u32) -> bool {
        let window = capacity_window(capacity);
        self.seat_types
            .iter()
            .any(|seat| seat.count > 0 && window.contains(&seat.capacity))
    }
}

/// Food category chip on the cafe list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodCategory {
    /// No filtering
    #[default]
    All,
    /// 빵/디저트
    Bread,
    /// 케이크
    Cake,
    /// 샌드위치
    Sandwich,
    /// 기타
    Etc,
}

impl FoodCategory {
    /// Every chip, in display order
    pub const ALL: [Self; 5] = [Self::All, Self::Bread, Self::Cake, Self::Sandwich, Self::Etc];

    /// Chip label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "전체",
            Self::Bread => "빵/디저트",
            Self::Cake => "케이크",
            Self::Sandwich => "샌드위치",
            Self::Etc => "기타",
        }
    }

    /// Whether `cafe` accepts this category
    #[must_use]
    pub const fn matches(self, cafe: &Cafe) -> bool {
        match self {
            Self::All => true,
            Self::Bread => cafe.foods.bread,
            Self::Cake => cafe.foods.cake,
            Self::Sandwich => cafe.foods.sandwich,
            Self::Etc => cafe.foods.other,
        }
    }
}

/// Search radius on the cafe list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radius {
    /// 반경 500m
    #[default]
    Near,
    /// 반경 1km
    Wide,
}

impl Radius {
    /// Radius in metres
    #[must_use]
    pub const fn metres(self) -> u32 {
        match self {
            Self::Near => 500,
            Self::Wide => 1000,
        }
    }

    /// Dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Near => "반경 500m",
            Self::Wide => "반경 1km",
        }
    }
}

/// Cafe-list filter state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CafeFilter {
    /// Capacity of the seat type the user picked
    pub seat_capacity: Option<u32>,
    /// Food chip
    pub category: FoodCategory,
    /// Radius
    pub radius: Radius,
}

impl CafeFilter {
    /// Whether `cafe` passes every criterion
    #[must_use]
    pub fn accepts(&self, cafe: &Cafe) -> bool {
        let has_free_seat = cafe.seat_types.iter().any(|seat| seat.count > 0);
        let fits = self.seat_capacity.is_none_or(|capacity| cafe.fits_capacity(capacity));
        has_free_seat
            && fits
            && self.category.matches(cafe)
            && cafe.distance_m <= self.radius.metres()
    }
}

/// A seat-type choice on the booking seat step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatOption {
    /// Source row (owner setting id, or `cafe-<capacity>`)
    pub id: SeatTypeId,
    /// People per table
    pub capacity: u32,
    /// How many are configured or free
    pub count: u32,
}

impl SeatOption {
    /// `"2인석"`
    #[must_use]
    pub fn label(&self) -> String {
        seat_label(self.capacity)
    }
}

/// The cafes and menus the client knows about
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    cafes: Vec<Cafe>,
    menu: Menu,
    walk_in_menu: Menu,
    walk_in_cafe: String,
}

impl Catalog {
    /// Build a catalog
    #[must_use]
    pub fn new(cafes: Vec<Cafe>, menu: Menu, walk_in_menu: Menu, walk_in_cafe: impl Into<String>) -> Self {
        Self {
            cafes,
            menu,
            walk_in_menu,
            walk_in_cafe: walk_in_cafe.into(),
        }
    }

    /// Cafes in catalog order
    #[must_use]
    pub fn cafes(&self) -> &[Cafe] {
        &self.cafes
    }

    /// Look up a cafe
    #[must_use]
    pub fn get(&self, id: CafeId) -> Option<&Cafe> {
        self.cafes.iter().find(|cafe| cafe.id == id)
    }

    /// Booking menu
    #[must_use]
    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Walk-in menu
    #[must_use]
    pub const fn walk_in_menu(&self) -> &Menu {
        &self.walk_in_menu
    }

    /// Name of the cafe a QR walk-in lands at
    #[must_use]
    pub fn walk_in_cafe(&self) -> &str {
        &self.walk_in_cafe
    }

    /// Cafes passing `filter`, in catalog order
    pub fn filter<'a>(&'a self, filter: &'a CafeFilter) -> impl Iterator<Item = &'a Cafe> + 'a {
        self.cafes.iter().filter(move |cafe| filter.accepts(cafe))
    }

    /// Seat-type choices for a party of `people`.
    ///
    /// Owner settings come first; catalog seat types fill in capacities the
    /// owner has not configured (first occurrence wins, empty ones skipped).
    /// The result keeps options with a free count inside the party's
    /// capacity window.
    #[must_use]
    pub fn seat_options(&self, owner: &[SeatTypeSetting], people: u32) -> Vec<SeatOption> {
        let mut options: Vec<SeatOption> = Vec::new();
        for setting in owner {
            if let Some(existing) = options.iter_mut().find(|o| o.capacity == setting.capacity) {
                existing.id = setting.id.clone();
                existing.count = setting.count;
            } else {
                options.push(SeatOption {
                    id: setting.id.clone(),
                    capacity: setting.capacity,
                    count: setting.count,
                });
            }
        }
        for seat in self.cafes.iter().flat_map(|cafe| &cafe.seat_types) {
            if seat.count == 0 || options.iter().any(|o| o.capacity == seat.capacity) {
                continue;
            }
            options.push(SeatOption {
                id: SeatTypeId::new(format!("cafe-{}", seat.capacity)),
                capacity: seat.capacity,
                count: seat.count,
            });
        }

        let window = capacity_window(people);
        options.retain(|o| o.count > 0 && window.contains(&o.capacity));
        options
    }

    /// The built-in sample catalog
    #[must_use]
    pub fn sample() -> Self {
        fn cafe(
            id: u32,
            name: &str,
            address: &str,
            phone: &str,
            distance_m: u32,
            foods: FoodTags,
            seats: &[(&str, u32, u32)],
        ) -> Cafe {
            Cafe {
                id: CafeId(id),
                name: name.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
                distance_m,
                foods,
                seat_types: seats
                    .iter()
                    .map(|(id, capacity, count)| SeatTypeSetting::new(*id, *capacity, *count))
                    .collect(),
            }
        }

        let cafes = vec![
            cafe(
                1,
                "브라운 카페",
                "서울시 강남구 테헤란로 123",
                "02-1234-5678",
                120,
                FoodTags { bread: true, cake: true, sandwich: true, other: false },
                &[("brown-2", 2, 1), ("brown-3", 3, 1), ("brown-4", 4, 1), ("brown-5", 5, 1)],
            ),
            cafe(
                2,
                "모닝 커피",
                "서울시 강남구 역삼로 210",
                "02-2345-6789",
                250,
                FoodTags { other: true, ..FoodTags::default() },
                &[("morning-2", 2, 2)],
            ),
            cafe(
                3,
                "카페 온",
                "서울시 강남구 논현로 455",
                "02-3456-7890",
                380,
                FoodTags { bread: true, other: true, ..FoodTags::default() },
                &[("on-1", 1, 1)],
            ),
            cafe(
                4,
                "스위트 커피",
                "서울시 강남구 봉은사로 77",
                "02-4567-8901",
                650,
                FoodTags { bread: true, sandwich: true, other: true, cake: false },
                &[("sweet-2", 2, 1), ("sweet-4", 4, 1)],
            ),
            cafe(
                5,
                "베이커리 카페",
                "서울시 강남구 선릉로 315",
                "02-5678-9012",
                850,
                FoodTags { bread: true, sandwich: true, ..FoodTags::default() },
                &[("bakery-4", 4, 1)],
            ),
        ];

        Self::new(cafes, Menu::standard(), Menu::walk_in(), "브라운 카페")
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sample()
    }
}
