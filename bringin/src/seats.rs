//! Seat inventory.
//!
//! The concrete seats at the cafe. Seats are regenerated from the owner's
//! seat-type settings on save ([`resync`]); everything else flips the open
//! flag or the occupancy of a single seat. An occupied seat can never be
//! closed.

use crate::error::SeatError;
use crate::types::{RegisteredSeat, SeatId, SeatTypeSetting, SeatUsage};
use bringin_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seat totals shown above the owner grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStats {
    /// All registered seats
    pub total: usize,
    /// Seats the owner has opened
    pub open: usize,
    /// Seats currently occupied
    pub in_use: usize,
}

/// Regenerate the seat list from seat-type settings.
///
/// Walks settings in order and, for each of a setting's `count` slots,
/// claims the first not-yet-claimed seat in `existing` with the same
/// capacity. Claimed seats keep their identity, open flag and occupancy.
/// Unfilled slots get a fresh closed seat from `ids`. Unclaimed existing
/// seats are dropped along with any occupancy they held.
#[must_use]
pub fn resync(
    settings: &[SeatTypeSetting],
    existing: &[RegisteredSeat],
    ids: &dyn IdGenerator,
) -> Vec<RegisteredSeat> {
    let mut claimed = vec![false; existing.len()];
    let mut seats = Vec::with_capacity(settings.iter().map(|s| s.count as usize).sum());

    for setting in settings {
        for _ in 0..setting.count {
            let reuse = existing
                .iter()
                .zip(&claimed)
                .position(|(seat, taken)| !taken && seat.capacity == setting.capacity);

            if let Some(index) = reuse {
                claimed[index] = true;
                seats.push(existing[index].clone());
            } else {
                seats.push(RegisteredSeat::new(
                    SeatId::new(ids.next_id("seat")),
                    setting.capacity,
                ));
            }
        }
    }

    let kept = claimed.iter().filter(|claimed| **claimed).count();
    let dropped_occupied = existing
        .iter()
        .zip(&claimed)
        .filter(|(seat, claimed)| !**claimed && seat.in_use())
        .count();
    if dropped_occupied > 0 {
        tracing::warn!(dropped_occupied, "Resync dropped occupied seats");
    }
    tracing::debug!(
        kept,
        dropped = existing.len() - kept,
        total = seats.len(),
        "Seats resynced"
    );

    seats
}

/// The cafe's registered seats
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInventory {
    seats: Vec<RegisteredSeat>,
}

impl SeatInventory {
    /// Wrap an existing seat list
    #[must_use]
    pub const fn new(seats: Vec<RegisteredSeat>) -> Self {
        Self { seats }
    }

    /// All seats in registration order
    #[must_use]
    pub fn seats(&self) -> &[RegisteredSeat] {
        &self.seats
    }

    /// Look up a seat
    #[must_use]
    pub fn get(&self, id: &SeatId) -> Option<&RegisteredSeat> {
        self.seats.iter().find(|seat| &seat.id == id)
    }

    fn get_mut(&mut self, id: &SeatId) -> Result<&mut RegisteredSeat, SeatError> {
        self.seats
            .iter_mut()
            .find(|seat| &seat.id == id)
            .ok_or_else(|| SeatError::UnknownSeat(id.clone()))
    }

    /// Flip a seat between open and closed, returning the new open flag.
    ///
    /// # Errors
    ///
    /// - [`SeatError::UnknownSeat`] if no seat has `id`
    /// - [`SeatError::Occupied`] if the seat is in use; the flag is unchanged
    pub fn toggle_open(&mut self, id: &SeatId) -> Result<bool, SeatError> {
        let seat = self.get_mut(id)?;
        if seat.in_use() {
            tracing::warn!(seat = %id, "Refused to toggle an occupied seat");
            return Err(SeatError::Occupied(id.clone()));
        }
        seat.is_open = !seat.is_open;
        tracing::debug!(seat = %id, open = seat.is_open, "Seat toggled");
        Ok(seat.is_open)
    }

    /// Free an occupied seat, returning who was sitting there.
    ///
    /// Elapsed time is not checked. The seat keeps its open flag.
    ///
    /// # Errors
    ///
    /// - [`SeatError::UnknownSeat`] if no seat has `id`
    /// - [`SeatError::NotInUse`] if the seat is already free
    pub fn end_usage(&mut self, id: &SeatId) -> Result<SeatUsage, SeatError> {
        let seat = self.get_mut(id)?;
        let usage = seat
            .usage
            .take()
            .ok_or_else(|| SeatError::NotInUse(id.clone()))?;
        tracing::info!(seat = %id, "Seat usage ended");
        Ok(usage)
    }

    /// Replace the seat list with the result of [`resync`]
    pub fn resync(&mut self, settings: &[SeatTypeSetting], ids: &dyn IdGenerator) {
        self.seats = resync(settings, &self.seats, ids);
        tracing::info!(seats = self.seats.len(), "Seat layout saved");
    }

    /// Seats grouped by capacity, smallest first
    #[must_use]
    pub fn grouped_by_capacity(&self) -> BTreeMap<u32, Vec<&RegisteredSeat>> {
        let mut groups: BTreeMap<u32, Vec<&RegisteredSeat>> = BTreeMap::new();
        for seat in &self.seats {
            groups.entry(seat.capacity).or_default().push(seat);
        }
        groups
    }

    /// Totals for the owner header
    #[must_use]
    pub fn stats(&self) -> SeatStats {
        SeatStats {
            total: self.seats.len(),
            open: self.seats.iter().filter(|seat| seat.is_open).count(),
            in_use: self.seats.iter().filter(|seat| seat.in_use()).count(),
        }
    }
}
