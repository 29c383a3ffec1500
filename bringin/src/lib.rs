//! # BringIn
//!
//! Client core of BringIn, a service for finding a cafe seat, ordering
//! drinks for the party up front and having the owner confirm arrival.
//!
//! The crate is built from reducers on top of [`bringin_core`]:
//!
//! - [`seats`], [`usage`], [`drinks`] and [`venue`] hold the cafe's data and
//!   the rules for changing it (seat occupancy, the usage lifecycle, drink
//!   totals, allowed foods and opening hours)
//! - [`flows`] contains one reducer per multi-step screen
//! - [`session`] is the root reducer: it routes actions to the mounted flow,
//!   owns the [`venue::Venue`] and applies what finished flows hand back
//!
//! Collaborators that would be remote in a full deployment (SMS
//! verification, QR scanning, the nearby-cafe catalog) are injected through
//! [`environment::AppEnvironment`] and mocked deterministically.
//!
//! ## Example
//!
//! ```
//! use bringin::entry;
//! use bringin::fixtures::sample_venue;
//! use bringin::session::{Screen, SessionState};
//! use chrono::Utc;
//!
//! let state = SessionState::new(entry::detect("https://bringin.app/qr/store-brown"), sample_venue(Utc::now()));
//! assert_eq!(state.screen(), Screen::QrEntry);
//! ```

pub mod catalog;
pub mod config;
pub mod drinks;
pub mod entry;
pub mod environment;
pub mod error;
pub mod fixtures;
pub mod flows;
pub mod format;
pub mod seats;
pub mod session;
pub mod types;
pub mod usage;
pub mod venue;

pub use config::Config;
pub use environment::AppEnvironment;
pub use error::Rejection;
pub use session::{SessionAction, SessionReducer, SessionState};
