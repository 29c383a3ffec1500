//! # BringIn Testing
//!
//! Deterministic stand-ins for the environment and a Given-When-Then harness
//! for reducers.
//!
//! - [`FixedClock`] / [`test_clock`]: time that only moves when told to
//! - [`SequentialIds`]: `seat-1`, `seat-2`, ... so seat resync is reproducible
//! - [`ReducerTest`]: fluent reducer assertions
//!
//! ## Example
//!
//! ```ignore
//! use bringin_testing::{test_clock, SequentialIds, ReducerTest};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(env.clone())
//!     .given_state(BookingState::new(&env, sample_seat_types()))
//!     .when_action(BookingAction::ChangePeople(1))
//!     .then_state(|s| assert_eq!(s.people, 2))
//!     .run();
//! ```

use bringin_core::environment::{Clock, IdGenerator};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, HashMap, IdGenerator, Mutex, Utc};

    /// Clock for deterministic tests
    ///
    /// Returns the same instant until [`FixedClock::advance`] moves it.
    ///
    /// # Example
    ///
    /// ```
    /// use bringin_testing::mocks::FixedClock;
    /// use bringin_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let before = clock.now();
    /// clock.advance(Duration::minutes(45));
    /// assert_eq!(clock.now() - before, Duration::minutes(45));
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a clock pinned at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }

        /// Pin the clock to a new instant
        pub fn set(&self, to: DateTime<Utc>) {
            if let Ok(mut time) = self.time.lock() {
                *time = to;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 09:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_722_000, 0).unwrap_or_default())
    }

    /// Identifiers numbered per kind: `seat-1`, `seat-2`, `usage-1`, ...
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        counters: Mutex<HashMap<String, u64>>,
    }

    impl SequentialIds {
        /// Start every kind at 1
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self, kind: &str) -> String {
            let next = self.counters.lock().map_or(0, |mut counters| {
                let counter = counters.entry(kind.to_string()).or_insert(0);
                *counter += 1;
                *counter
            });
            format!("{kind}-{next}")
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIds, test_clock};
