//! Drink orders.
//!
//! A [`DrinkOrder`] is a quantity per drink on a fixed [`Menu`] plus the
//! [`OrderRule`] of the flow it belongs to. Party bookings need exactly one
//! drink per person and refuse to go past that; QR walk-ins need at least
//! one drink and have no cap.

use crate::error::OrderError;
use crate::types::DrinkId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A drink and its unit price in won
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    /// Menu identifier
    pub id: DrinkId,
    /// Display name
    pub name: String,
    /// Unit price in won
    pub price: u32,
}

impl Drink {
    /// Create a menu entry
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, price: u32) -> Self {
        Self {
            id: DrinkId(id),
            name: name.into(),
            price,
        }
    }
}

/// An ordered drink menu
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    drinks: Vec<Drink>,
}

impl Menu {
    /// Build a menu; order is display order
    #[must_use]
    pub const fn new(drinks: Vec<Drink>) -> Self {
        Self { drinks }
    }

    /// The booking menu
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Drink::new(1, "아메리카노", 4500),
            Drink::new(2, "카페라떼", 5000),
            Drink::new(3, "바닐라라떼", 5500),
            Drink::new(4, "아이스티", 4500),
        ])
    }

    /// The shorter menu offered to QR walk-ins
    #[must_use]
    pub fn walk_in() -> Self {
        let mut menu = Self::standard();
        menu.drinks.truncate(3);
        menu
    }

    /// Drinks in display order
    #[must_use]
    pub fn drinks(&self) -> &[Drink] {
        &self.drinks
    }

    /// Look up a drink
    #[must_use]
    pub fn get(&self, id: DrinkId) -> Option<&Drink> {
        self.drinks.iter().find(|drink| drink.id == id)
    }
}

/// What makes an order submittable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRule {
    /// One drink per person, exactly
    Party {
        /// Party size
        people: u32,
    },
    /// At least one drink, no cap
    AtLeastOne,
}

/// Quantities selected from a menu under a rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkOrder {
    menu: Menu,
    rule: OrderRule,
    quantities: BTreeMap<DrinkId, u32>,
}

impl DrinkOrder {
    /// An empty order
    #[must_use]
    pub const fn new(menu: Menu, rule: OrderRule) -> Self {
        Self {
            menu,
            rule,
            quantities: BTreeMap::new(),
        }
    }

    /// The menu this order draws from
    #[must_use]
    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The rule this order is checked against
    #[must_use]
    pub const fn rule(&self) -> OrderRule {
        self.rule
    }

    /// Selected quantity of one drink
    #[must_use]
    pub fn quantity(&self, id: DrinkId) -> u32 {
        self.quantities.get(&id).copied().unwrap_or(0)
    }

    /// Change one drink's quantity by `delta`, clamping at zero.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// - [`OrderError::UnknownDrink`] if `id` is not on the menu
    /// - [`OrderError::CapReached`] for an increment that would take a party
    ///   order past one drink per person; nothing changes
    /// - [`OrderError::TooLarge`] for an increment whose count or price total
    ///   no longer fits in a `u32`; nothing changes
    pub fn adjust(&mut self, id: DrinkId, delta: i32) -> Result<u32, OrderError> {
        if self.menu.get(id).is_none() {
            return Err(OrderError::UnknownDrink(id));
        }
        if let OrderRule::Party { people } = self.rule {
            if delta > 0 && self.total_count().saturating_add(delta.unsigned_abs()) > people {
                return Err(OrderError::CapReached { people });
            }
        }

        let current = self.quantity(id);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current
                .checked_add(delta.unsigned_abs())
                .ok_or(OrderError::TooLarge)?
        };
        if next > current && self.totals_with(id, next).is_none() {
            return Err(OrderError::TooLarge);
        }
        if next == 0 {
            self.quantities.remove(&id);
        } else {
            self.quantities.insert(id, next);
        }
        Ok(next)
    }

    /// Whether another drink can be added under the rule
    #[must_use]
    pub fn can_add(&self) -> bool {
        match self.rule {
            OrderRule::Party { people } => self.total_count() < people,
            OrderRule::AtLeastOne => true,
        }
    }

    /// Total drinks selected
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.quantities
            .values()
            .fold(0, |total, qty| total.saturating_add(*qty))
    }

    /// Total price in won
    #[must_use]
    pub fn total_price(&self) -> u32 {
        self.quantities
            .iter()
            .filter_map(|(id, qty)| self.menu.get(*id).map(|drink| drink.price.saturating_mul(*qty)))
            .fold(0, u32::saturating_add)
    }

    /// Count and price totals with one drink set to `qty`, `None` on overflow
    fn totals_with(&self, id: DrinkId, qty: u32) -> Option<(u32, u32)> {
        self.menu.drinks().iter().try_fold((0u32, 0u32), |(count, price), drink| {
            let n = if drink.id == id { qty } else { self.quantity(drink.id) };
            Some((
                count.checked_add(n)?,
                price.checked_add(drink.price.checked_mul(n)?)?,
            ))
        })
    }

    /// Check the order against its rule.
    ///
    /// # Errors
    ///
    /// - [`OrderError::PartyMismatch`] if a party order's total differs
    ///   from the party size
    /// - [`OrderError::Empty`] if a walk-in order has no drinks
    pub fn validate(&self) -> Result<(), OrderError> {
        let selected = self.total_count();
        match self.rule {
            OrderRule::Party { people } if selected != people => {
                Err(OrderError::PartyMismatch { people, selected })
            },
            OrderRule::AtLeastOne if selected == 0 => Err(OrderError::Empty),
            _ => Ok(()),
        }
    }

    /// Whether [`DrinkOrder::validate`] passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// `"아메리카노 2잔, 카페라떼 1잔"` in menu order
    #[must_use]
    pub fn summary(&self) -> String {
        self.menu
            .drinks()
            .iter()
            .filter_map(|drink| {
                let qty = self.quantity(drink.id);
                (qty > 0).then(|| format!("{} {qty}잔", drink.name))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const A: DrinkId = DrinkId(1);
    const B: DrinkId = DrinkId(2);

    fn two_item_menu() -> Menu {
        Menu::new(vec![Drink::new(1, "A", 4500), Drink::new(2, "B", 5000)])
    }

    #[test]
    fn party_order_must_match_party_size() {
        let mut order = DrinkOrder::new(Menu::standard(), OrderRule::Party { people: 3 });
        order.adjust(A, 1).unwrap();
        assert_eq!(
            order.validate(),
            Err(OrderError::PartyMismatch {
                people: 3,
                selected: 1
            })
        );

        order.adjust(A, 1).unwrap();
        order.adjust(B, 1).unwrap();
        assert_eq!(order.total_count(), 3);
        assert!(order.is_valid());
    }

    #[test]
    fn party_order_caps_increments() {
        let mut order = DrinkOrder::new(Menu::standard(), OrderRule::Party { people: 2 });
        order.adjust(A, 1).unwrap();
        order.adjust(B, 1).unwrap();

        assert_eq!(order.adjust(A, 1), Err(OrderError::CapReached { people: 2 }));
        assert!(!order.can_add());
        assert_eq!(order.quantity(A), 1);

        assert_eq!(order.adjust(A, -1).unwrap(), 0);
        assert!(order.can_add());
    }

    #[test]
    fn walk_in_order_needs_one_and_has_no_cap() {
        let mut order = DrinkOrder::new(Menu::walk_in(), OrderRule::AtLeastOne);
        assert_eq!(order.validate(), Err(OrderError::Empty));

        for _ in 0..10 {
            order.adjust(A, 1).unwrap();
        }
        assert_eq!(order.total_count(), 10);
        assert!(order.is_valid());
    }

    #[test]
    fn oversized_increment_is_refused() {
        let mut order = DrinkOrder::new(Menu::walk_in(), OrderRule::AtLeastOne);
        assert_eq!(order.adjust(A, i32::MAX), Err(OrderError::TooLarge));
        assert_eq!(order.total_count(), 0);

        assert_eq!(order.adjust(A, 100_000).unwrap(), 100_000);
        assert_eq!(order.total_price(), 450_000_000);

        let before = order.clone();
        assert_eq!(order.adjust(B, 1_000_000), Err(OrderError::TooLarge));
        assert_eq!(order, before);
        assert_eq!(order.adjust(A, i32::MIN).unwrap(), 0);
    }

    #[test]
    fn walk_in_menu_has_no_iced_tea() {
        let mut order = DrinkOrder::new(Menu::walk_in(), OrderRule::AtLeastOne);
        assert_eq!(order.adjust(DrinkId(4), 1), Err(OrderError::UnknownDrink(DrinkId(4))));
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut order = DrinkOrder::new(Menu::standard(), OrderRule::AtLeastOne);
        assert_eq!(order.adjust(A, -1).unwrap(), 0);
        assert_eq!(order.total_count(), 0);
    }

    #[test]
    fn price_is_sum_of_lines() {
        let mut order = DrinkOrder::new(two_item_menu(), OrderRule::Party { people: 3 });
        order.adjust(A, 2).unwrap();
        order.adjust(B, 1).unwrap();
        assert_eq!(order.total_price(), 14000);
    }

    #[test]
    fn summary_follows_menu_order() {
        let mut order = DrinkOrder::new(Menu::standard(), OrderRule::AtLeastOne);
        order.adjust(B, 1).unwrap();
        order.adjust(A, 2).unwrap();
        order.adjust(DrinkId(3), 1).unwrap();
        order.adjust(DrinkId(3), -1).unwrap();
        assert_eq!(order.summary(), "아메리카노 2잔, 카페라떼 1잔");
    }

    proptest! {
        #[test]
        fn party_total_never_exceeds_party_size(
            people in 1u32..8,
            steps in proptest::collection::vec((1u32..=4, prop_oneof![Just(1i32), Just(-1i32)]), 0..40),
        ) {
            let mut order = DrinkOrder::new(Menu::standard(), OrderRule::Party { people });
            for (drink, delta) in steps {
                let before = order.clone();
                match order.adjust(DrinkId(drink), delta) {
                    Ok(_) => {},
                    Err(_) => prop_assert_eq!(&order, &before),
                }
                prop_assert!(order.total_count() <= people);
                prop_assert_eq!(order.is_valid(), order.total_count() == people);
            }
        }

        #[test]
        fn price_matches_quantities(qty in proptest::collection::vec(0u32..5, 4)) {
            let menu = Menu::standard();
            let mut order = DrinkOrder::new(menu.clone(), OrderRule::AtLeastOne);
            for (drink, n) in menu.drinks().iter().zip(&qty) {
                for _ in 0..*n {
                    order.adjust(drink.id, 1).unwrap();
                }
            }
            let expected: u32 = menu.drinks().iter().zip(&qty).map(|(d, n)| d.price * n).sum();
            prop_assert_eq!(order.total_price(), expected);
            prop_assert_eq!(order.total_count(), qty.iter().sum::<u32>());
        }
    }
}
