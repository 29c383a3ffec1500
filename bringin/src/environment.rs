//! Injected dependencies for every BringIn reducer.
//!
//! Phone verification and QR scanning are collaborators the client only
//! talks to; both are traits so the mocks used in demos and tests can be
//! swapped for real lookups without touching a reducer.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::VerifyError;
use crate::types::{StoreId, UserId};
use bringin_core::environment::{Clock, IdGenerator, SystemClock, UuidIds};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Phone verification
// ============================================================================

/// What the verifier knows about a phone number after a successful check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedPhone {
    /// Account bound to the number
    pub user_id: UserId,
    /// First login with this number
    pub is_new_user: bool,
    /// Store the account already manages, if any
    pub owner_store: Option<StoreId>,
}

/// Checks an SMS verification code
pub trait PhoneVerifier: Send + Sync {
    /// Verify `code` for `phone` (both digits only)
    fn verify(&self, phone: &str, code: &str) -> BoxFuture<'static, Result<VerifiedPhone, VerifyError>>;
}

/// Deterministic in-memory verifier.
///
/// Accepts any code except [`MockPhoneVerifier::REJECTED_CODE`]. The user id
/// is derived from the phone number; numbers not registered with
/// [`MockPhoneVerifier::with_user`] are reported as new users.
#[derive(Clone, Debug, Default)]
pub struct MockPhoneVerifier {
    known: HashMap<String, Option<StoreId>>,
}

impl MockPhoneVerifier {
    /// Code the mock always rejects
    pub const REJECTED_CODE: &'static str = "000000";

    /// A verifier that knows nobody
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing user
    #[must_use]
    pub fn with_user(mut self, phone: impl Into<String>) -> Self {
        self.known.insert(phone.into(), None);
        self
    }

    /// Register an existing owner of `store`
    #[must_use]
    pub fn with_owner(mut self, phone: impl Into<String>, store: impl Into<StoreId>) -> Self {
        self.known.insert(phone.into(), Some(store.into()));
        self
    }

    /// The accounts shipped with the demo data
    #[must_use]
    pub fn sample() -> Self {
        Self::new()
            .with_user("01012345678")
            .with_owner("01055556666", "store-brown")
    }
}

impl PhoneVerifier for MockPhoneVerifier {
    fn verify(&self, phone: &str, code: &str) -> BoxFuture<'static, Result<VerifiedPhone, VerifyError>> {
        let result = if code == Self::REJECTED_CODE {
            Err(VerifyError {
                reason: "인증번호가 일치하지 않습니다.".to_string(),
            })
        } else {
            let known = self.known.get(phone);
            Ok(VerifiedPhone {
                user_id: UserId::new(format!("user-{phone}")),
                is_new_user: known.is_none(),
                owner_store: known.cloned().flatten(),
            })
        };
        futures::future::ready(result).boxed()
    }
}

// ============================================================================
// QR scanning
// ============================================================================

/// A store identified from its owner QR code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedStore {
    /// Store identifier
    pub store_id: StoreId,
    /// Store display name
    pub store_name: String,
}

/// Reads the owner QR code
pub trait StoreScanner: Send + Sync {
    /// The store the camera is pointed at
    fn scan(&self) -> ScannedStore;
}

/// Scanner that always sees the same store
#[derive(Clone, Debug)]
pub struct MockStoreScanner {
    store: ScannedStore,
}

impl MockStoreScanner {
    /// Always scan `store_id` / `store_name`
    #[must_use]
    pub fn new(store_id: impl Into<StoreId>, store_name: impl Into<String>) -> Self {
        Self {
            store: ScannedStore {
                store_id: store_id.into(),
                store_name: store_name.into(),
            },
        }
    }
}

impl Default for MockStoreScanner {
    fn default() -> Self {
        Self::new("store-brown", "브라운 카페")
    }
}

impl StoreScanner for MockStoreScanner {
    fn scan(&self) -> ScannedStore {
        self.store.clone()
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Dependencies shared by the session and every child flow
#[derive(Clone)]
pub struct AppEnvironment {
    /// Time source for payment, arrival and seating timestamps
    pub clock: Arc<dyn Clock>,
    /// Identifiers for seats, usage records, foods and seat types
    pub ids: Arc<dyn IdGenerator>,
    /// SMS code verification
    pub verifier: Arc<dyn PhoneVerifier>,
    /// Owner QR scanning
    pub scanner: Arc<dyn StoreScanner>,
    /// Nearby cafes and menus
    pub catalog: Arc<Catalog>,
    /// Timings and thresholds
    pub config: Config,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        verifier: Arc<dyn PhoneVerifier>,
        scanner: Arc<dyn StoreScanner>,
        catalog: Arc<Catalog>,
        config: Config,
    ) -> Self {
        Self {
            clock,
            ids,
            verifier,
            scanner,
            catalog,
            config,
        }
    }

    /// System clock, UUIDs, the sample mocks and `config`
    #[must_use]
    pub fn live(config: Config) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(UuidIds),
            Arc::new(MockPhoneVerifier::sample()),
            Arc::new(MockStoreScanner::default()),
            Arc::new(Catalog::sample()),
            config,
        )
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the verifier
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn PhoneVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bringin_testing::{FixedClock, SequentialIds, test_clock};
    use std::time::Duration;

    /// Pinned clock, sequential ids, sample mocks and short timers
    pub(crate) fn test_env() -> (AppEnvironment, Arc<FixedClock>) {
        let clock = Arc::new(test_clock());
        let config = Config {
            scan_delay: Duration::from_millis(20),
            scan_confirm: Duration::from_millis(10),
            copy_feedback: Duration::from_millis(10),
            ..Config::default()
        };
        let env = AppEnvironment::live(config)
            .with_clock(clock.clone())
            .with_ids(Arc::new(SequentialIds::new()));
        (env, clock)
    }
}
