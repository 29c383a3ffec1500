//! Session controller.
//!
//! The root of the client. [`SessionState`] holds who is logged in, how the
//! client was opened and which main view is up, mounts child flows on demand
//! and owns the cafe: seats, usage ledger, seat types and allowed foods all
//! live in the owner dashboard's [`Venue`], and every other flow reaches them
//! through the session.
//!
//! Finished children report through their `outcome`; the session takes it
//! after each routed action and applies it (log the user in, record a paid
//! order as waiting, switch roles, leave QR entry).

use crate::entry::EntryMode;
use crate::environment::AppEnvironment;
use crate::error::{Rejection, UsageError};
use crate::flows::auth::{AuthAction, AuthReducer, AuthState};
use crate::flows::booking::{BookingAction, BookingOutcome, BookingReducer, BookingState};
use crate::flows::owner_dashboard::{OwnerDashboardAction, OwnerDashboardReducer, OwnerDashboardState};
use crate::flows::qr_entry::{QrEntryAction, QrEntryOutcome, QrEntryReducer, QrEntryState};
use crate::flows::role_switch::{RoleSwitchAction, RoleSwitchOutcome, RoleSwitchReducer, RoleSwitchState};
use crate::flows::settle;
use crate::format::mask_phone;
use crate::types::{AuthCompleted, Role, StoreId, UsageHistory, UsageId, UsageStatus, UserId};
use crate::usage::RECENT_COMPLETED;
use crate::venue::{NO_ALLOWED_FOODS, Venue};
use bringin_core::composition::scope;
use bringin_core::effect::Effect;
use bringin_core::reducer::{Effects, Reducer};
use bringin_core::smallvec;

// ============================================================================
// State
// ============================================================================

/// Main view selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MainView {
    /// Guest home
    #[default]
    Home,
    /// Party booking
    Booking,
    /// QR entry
    QrEntry,
    /// Owner dashboard
    Owner,
    /// Role switcher
    RoleSwitcher,
    /// My page
    MyPage,
}

/// What is actually on screen, after login and role are applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// QR entry flow
    QrEntry,
    /// Login
    Auth,
    /// Role switcher
    RoleSwitcher,
    /// My page
    MyPage,
    /// Owner dashboard
    OwnerDashboard,
    /// Party booking
    Booking,
    /// Guest home
    Home,
}

/// Who is logged in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    /// Whether anyone is logged in
    pub logged_in: bool,
    /// Logged-in user
    pub user_id: Option<UserId>,
    /// Eleven-digit phone number
    pub phone: Option<String>,
    /// Active role
    pub role: Role,
    /// Store the user manages
    pub store_id: Option<StoreId>,
    /// Keep the session on this device
    pub auto_login: bool,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self {
            logged_in: false,
            user_id: None,
            phone: None,
            role: Role::User,
            store_id: None,
            auto_login: false,
        }
    }
}

impl AuthSession {
    fn log_in(&mut self, completed: AuthCompleted) {
        self.logged_in = true;
        self.user_id = Some(completed.user_id);
        self.phone = Some(completed.phone_number);
        self.role = completed.role;
        self.store_id = completed.store_id;
        self.auto_login = completed.auto_login;
    }
}

/// Modal opened from a home-screen usage card
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeModal {
    /// Waiting record: the owner confirms the guest arrived
    OwnerConfirm(UsageId),
    /// Current record: seat and allowed foods
    CurrentUsage(UsageId),
}

/// Root state of the client
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    /// How the client was opened
    pub entry: EntryMode,
    /// Selected main view
    pub view: MainView,
    /// Who is logged in
    pub auth: AuthSession,
    /// Login flow, mounted while logged out
    pub login: Option<AuthState>,
    /// QR entry flow
    pub qr_entry: Option<QrEntryState>,
    /// Party booking flow
    pub booking: Option<BookingState>,
    /// Role switcher
    pub role_switch: Option<RoleSwitchState>,
    /// Owner dashboard, which also owns the venue
    pub owner: OwnerDashboardState,
    /// Home-screen modal
    pub home_modal: Option<HomeModal>,
    /// Message for the last refused input
    pub last_rejection: Option<Rejection>,
}

impl SessionState {
    /// Logged-out session opened as `entry`, managing `venue`
    #[must_use]
    pub fn new(entry: EntryMode, venue: Venue) -> Self {
        let (view, qr_entry) = match entry.store_id() {
            Some(store) => (MainView::QrEntry, Some(QrEntryState::new(store.clone()))),
            None => (MainView::Home, None),
        };
        Self {
            entry,
            view,
            auth: AuthSession::default(),
            login: Some(AuthState::default()),
            qr_entry,
            booking: None,
            role_switch: None,
            owner: OwnerDashboardState::new(venue),
            home_modal: None,
            last_rejection: None,
        }
    }

    /// The screen to render
    #[must_use]
    pub const fn screen(&self) -> Screen {
        if matches!(self.view, MainView::QrEntry) && self.entry.is_qr() && self.qr_entry.is_some() {
            return Screen::QrEntry;
        }
        if !self.auth.logged_in {
            return Screen::Auth;
        }
        match (self.view, self.auth.role) {
            (MainView::RoleSwitcher, _) => Screen::RoleSwitcher,
            (MainView::MyPage, _) => Screen::MyPage,
            (_, Role::Owner) => Screen::OwnerDashboard,
            (MainView::Booking, Role::User) => Screen::Booking,
            _ => Screen::Home,
        }
    }

    /// Seats, usage ledger, seat types, foods and hours
    #[must_use]
    pub const fn venue(&self) -> &Venue {
        &self.owner.venue
    }

    /// Mutable venue, for seeding and tests
    pub const fn venue_mut(&mut self) -> &mut Venue {
        &mut self.owner.venue
    }

    /// `010-****-5678` for the header
    #[must_use]
    pub fn masked_phone(&self) -> Option<String> {
        self.auth.phone.as_deref().map(mask_phone)
    }

    /// Waiting and current records on the home screen
    pub fn home_active(&self) -> impl Iterator<Item = &UsageHistory> {
        self.venue().ledger.active()
    }

    /// Completed records previewed on the home screen
    pub fn home_recent(&self) -> impl Iterator<Item = &UsageHistory> {
        self.venue().ledger.recent_completed(RECENT_COMPLETED)
    }

    /// Allowed foods line in the current-usage modal
    #[must_use]
    pub fn allowed_foods_text(&self) -> String {
        self.venue()
            .foods
            .labels()
            .map_or_else(|| NO_ALLOWED_FOODS.to_string(), |labels| labels.join(", "))
    }

    /// Record behind the open home modal
    #[must_use]
    pub fn modal_record(&self) -> Option<&UsageHistory> {
        let id = match self.home_modal.as_ref()? {
            HomeModal::OwnerConfirm(id) | HomeModal::CurrentUsage(id) => id,
        };
        self.venue().ledger.get(id)
    }

    const fn role_home(&self) -> MainView {
        match self.auth.role {
            Role::User => MainView::Home,
            Role::Owner => MainView::Owner,
        }
    }

    fn log_in(&mut self, completed: AuthCompleted) {
        tracing::info!(user = %completed.user_id, role = ?completed.role, "Session started");
        self.auth.log_in(completed);
        self.login = None;
        self.view = self.role_home();
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Session inputs
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Routed to login
    Auth(AuthAction),
    /// Return to QR entry from the login screen of a QR launch
    OpenQrEntry,
    /// Routed to QR entry
    QrEntry(QrEntryAction),
    /// "자리 찾기" on the guest home
    StartBooking,
    /// Routed to the booking
    Booking(BookingAction),
    /// Open the role switcher
    OpenRoleSwitcher,
    /// Routed to the role switcher
    RoleSwitch(RoleSwitchAction),
    /// Open my page
    OpenMyPage,
    /// Back from my page
    CloseMyPage,
    /// Routed to the owner dashboard
    Owner(OwnerDashboardAction),
    /// Usage card tapped on the home screen
    SelectUsage(UsageId),
    /// "확인" in the owner confirm modal
    ConfirmArrival,
    /// Home modal closed
    CloseModal,
    /// Log out
    Logout,
}

// ============================================================================
// Reducer
// ============================================================================

/// Root reducer
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Creates a new `SessionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn auth(state: &mut SessionState, action: AuthAction, env: &AppEnvironment) -> Effects<SessionAction> {
        let Some(login) = state.login.as_mut() else {
            return smallvec![Effect::None];
        };
        let effects = scope(&AuthReducer::new(), login, action, env, SessionAction::Auth);
        if let Some(completed) = login.outcome.take() {
            state.log_in(completed);
        }
        effects
    }

    fn qr_entry(state: &mut SessionState, action: QrEntryAction, env: &AppEnvironment) -> Effects<SessionAction> {
        let Some(entry) = state.qr_entry.as_mut() else {
            return smallvec![Effect::None];
        };
        let effects = scope(&QrEntryReducer::new(), entry, action, env, SessionAction::QrEntry);
        match entry.outcome.take() {
            Some(QrEntryOutcome::Completed(completed)) => {
                state.qr_entry = None;
                state.log_in(completed);
            },
            Some(QrEntryOutcome::Exited) => {
                tracing::info!("Left QR entry");
                state.qr_entry = None;
                state.entry = EntryMode::Normal;
                state.view = MainView::Home;
            },
            None => {},
        }
        effects
    }

    fn booking(state: &mut SessionState, action: BookingAction, env: &AppEnvironment) -> Effects<SessionAction> {
        let Some(booking) = state.booking.as_mut() else {
            return smallvec![Effect::None];
        };
        let effects = scope(&BookingReducer::new(), booking, action, env, SessionAction::Booking);
        match booking.outcome.take() {
            Some(BookingOutcome::Paid(order)) => {
                state
                    .owner
                    .venue
                    .ledger
                    .create_waiting(order, env.clock.now(), env.ids.as_ref());
            },
            Some(BookingOutcome::Left) => {
                state.booking = None;
                state.view = MainView::Home;
            },
            None => {},
        }
        effects
    }

    fn role_switch(state: &mut SessionState, action: RoleSwitchAction, env: &AppEnvironment) -> Effects<SessionAction> {
        let Some(switch) = state.role_switch.as_mut() else {
            return smallvec![Effect::None];
        };
        let effects = scope(&RoleSwitchReducer::new(), switch, action, env, SessionAction::RoleSwitch);
        match switch.outcome.take() {
            Some(RoleSwitchOutcome::Switched { role, store_id }) => {
                state.role_switch = None;
                state.auth.role = role;
                if store_id.is_some() {
                    state.auth.store_id = store_id;
                }
                state.view = state.role_home();
            },
            Some(RoleSwitchOutcome::Back) => {
                state.role_switch = None;
                state.view = state.role_home();
            },
            None => {},
        }
        effects
    }

    fn select_usage(state: &mut SessionState, id: UsageId) -> Result<(), UsageError> {
        let record = state
            .venue()
            .ledger
            .get(&id)
            .ok_or_else(|| UsageError::UnknownRecord(id.clone()))?;
        state.home_modal = match record.status {
            UsageStatus::Waiting => Some(HomeModal::OwnerConfirm(id)),
            UsageStatus::Current => Some(HomeModal::CurrentUsage(id)),
            UsageStatus::Completed => None,
        };
        Ok(())
    }

    fn confirm_arrival(state: &mut SessionState, env: &AppEnvironment) -> Result<(), UsageError> {
        let Some(HomeModal::OwnerConfirm(id)) = state.home_modal.take() else {
            return Ok(());
        };
        state.owner.venue.ledger.confirm_arrival(&id, env.clock.now())
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut SessionState, action: SessionAction, env: &AppEnvironment) -> Effects<SessionAction> {
        match action {
            SessionAction::Auth(action) => return Self::auth(state, action, env),
            SessionAction::OpenQrEntry => {
                if let Some(store) = state.entry.store_id() {
                    if state.qr_entry.is_none() {
                        state.qr_entry = Some(QrEntryState::new(store.clone()));
                    }
                    state.view = MainView::QrEntry;
                }
            },
            SessionAction::QrEntry(action) => return Self::qr_entry(state, action, env),
            SessionAction::StartBooking => {
                if state.auth.logged_in && state.auth.role == Role::User {
                    state.booking = Some(BookingState::new(env, state.venue().seat_types.clone()));
                    state.view = MainView::Booking;
                }
            },
            SessionAction::Booking(action) => return Self::booking(state, action, env),
            SessionAction::OpenRoleSwitcher => {
                if state.auth.logged_in {
                    state.role_switch = Some(RoleSwitchState::new(state.auth.role, state.auth.store_id.clone()));
                    state.view = MainView::RoleSwitcher;
                }
            },
            SessionAction::RoleSwitch(action) => return Self::role_switch(state, action, env),
            SessionAction::OpenMyPage => {
                if state.auth.logged_in {
                    state.view = MainView::MyPage;
                }
            },
            SessionAction::CloseMyPage => state.view = state.role_home(),
            SessionAction::Owner(action) => {
                if state.auth.role != Role::Owner {
                    return smallvec![Effect::None];
                }
                return scope(&OwnerDashboardReducer::new(), &mut state.owner, action, env, SessionAction::Owner);
            },
            SessionAction::SelectUsage(id) => {
                let result = Self::select_usage(state, id);
                settle(&mut state.last_rejection, result);
            },
            SessionAction::ConfirmArrival => {
                let result = Self::confirm_arrival(state, env);
                settle(&mut state.last_rejection, result);
            },
            SessionAction::CloseModal => state.home_modal = None,
            SessionAction::Logout => {
                tracing::info!("Logged out");
                state.auth = AuthSession::default();
                state.login = Some(AuthState::default());
                state.booking = None;
                state.role_switch = None;
                state.home_modal = None;
                state.view = MainView::Home;
            },
        }

        smallvec![Effect::None]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entry;
    use crate::environment::test_support::test_env;
    use crate::fixtures::sample_venue;
    use crate::flows::owner_qr::OwnerQrAction;
    use crate::flows::phone_login::PhoneLoginAction;
    use crate::flows::qr_entry::QrEntryStep;
    use crate::flows::test_support::drive;
    use crate::types::{CafeId, DrinkId, PaidOrder, SeatTypeId};
    use crate::venue::AllowedFoods;
    use bringin_core::environment::Clock;
    use bringin_testing::ReducerTest;
    use chrono::Duration;

    fn run(state: &mut SessionState, env: &AppEnvironment, actions: Vec<SessionAction>) {
        let reducer = SessionReducer::new();
        for action in actions {
            drive(&reducer, state, action, env);
        }
    }

    fn login(phone: &str) -> Vec<SessionAction> {
        [
            PhoneLoginAction::Start,
            PhoneLoginAction::PhoneChanged(phone.into()),
            PhoneLoginAction::SubmitPhone,
            PhoneLoginAction::CodeChanged("123456".into()),
            PhoneLoginAction::SubmitCode,
        ]
        .into_iter()
        .map(|action| SessionAction::Auth(AuthAction::Login(action)))
        .collect()
    }

    fn seed_waiting(state: &mut SessionState, env: &AppEnvironment) -> UsageId {
        let order = PaidOrder {
            cafe_name: "브라운 카페".into(),
            cafe_address: "서울시 강남구 테헤란로 123".into(),
            drink_ordered: "아메리카노 1잔".into(),
            seat_type: "1인석".into(),
        };
        let now = env.clock.now();
        state.venue_mut().ledger.create_waiting(order, now, env.ids.as_ref()).id.clone()
    }

    fn logged_in_user(env: &AppEnvironment) -> SessionState {
        let mut state = SessionState::new(EntryMode::Normal, sample_venue(env.clock.now()));
        run(&mut state, env, login("01012345678"));
        state
    }

    #[test]
    fn logged_out_sessions_show_login() {
        let (env, _) = test_env();
        let state = SessionState::new(EntryMode::Normal, sample_venue(env.clock.now()));
        assert_eq!(state.screen(), Screen::Auth);
        assert!(state.login.is_some());
    }

    #[test]
    fn qr_launch_shows_qr_entry_first() {
        let (env, _) = test_env();
        let state = SessionState::new(entry::detect("/qr/store-brown"), sample_venue(env.clock.now()));
        assert_eq!(state.screen(), Screen::QrEntry);
        assert_eq!(state.qr_entry.as_ref().unwrap().step(), QrEntryStep::Welcome);
    }

    #[test]
    fn user_login_lands_on_home() {
        let (env, _) = test_env();
        let state = logged_in_user(&env);

        assert_eq!(state.screen(), Screen::Home);
        assert!(state.login.is_none());
        assert_eq!(state.auth.role, Role::User);
        assert_eq!(state.masked_phone().as_deref(), Some("010-****-5678"));
    }

    #[test]
    fn owner_phone_lands_on_dashboard() {
        let (env, _) = test_env();
        let mut state = SessionState::new(EntryMode::Normal, sample_venue(env.clock.now()));
        run(&mut state, &env, login("01055556666"));

        assert_eq!(state.auth.role, Role::Owner);
        assert_eq!(state.auth.store_id, Some(StoreId::from("store-brown")));
        assert_eq!(state.screen(), Screen::OwnerDashboard);
    }

    #[test]
    fn exiting_qr_entry_falls_back_to_normal_login() {
        let (env, _) = test_env();
        let mut state = SessionState::new(entry::detect("/?store_id=store-brown"), sample_venue(env.clock.now()));
        run(
            &mut state,
            &env,
            vec![
                SessionAction::QrEntry(QrEntryAction::Decline),
                SessionAction::QrEntry(QrEntryAction::Exit),
            ],
        );

        assert_eq!(state.entry, EntryMode::Normal);
        assert!(state.qr_entry.is_none());
        assert_eq!(state.screen(), Screen::Auth);

        run(&mut state, &env, vec![SessionAction::OpenQrEntry]);
        assert_eq!(state.screen(), Screen::Auth);
    }

    #[test]
    fn paid_booking_records_waiting_usage() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        let before = state.venue().ledger.records().len();
        run(&mut state, &env, vec![SessionAction::StartBooking]);
        assert_eq!(state.screen(), Screen::Booking);

        run(
            &mut state,
            &env,
            [
                BookingAction::ChangePeople(1),
                BookingAction::ConfirmPeople,
                BookingAction::SelectSeat(SeatTypeId::from("2")),
                BookingAction::SelectCafe(CafeId(2)),
                BookingAction::StartOrder,
                BookingAction::AdjustDrink(DrinkId(1), 2),
                BookingAction::SubmitOrder,
            ]
            .into_iter()
            .map(SessionAction::Booking)
            .collect(),
        );

        let ledger = &state.venue().ledger;
        assert_eq!(ledger.records().len(), before + 1);
        let record = &ledger.records()[0];
        assert_eq!(record.status, UsageStatus::Waiting);
        assert_eq!(record.cafe_name, "모닝 커피");
        assert_eq!(record.seat_type.as_deref(), Some("2인석"));
        assert_eq!(record.payment_time, Some(env.clock.now()));
        assert_eq!(state.screen(), Screen::Booking);

        run(&mut state, &env, vec![SessionAction::Booking(BookingAction::Back)]);
        assert!(state.booking.is_none());
        assert_eq!(state.screen(), Screen::Home);
        assert_eq!(state.home_active().count(), 1);
    }

    #[test]
    fn home_modal_confirms_arrival() {
        let (env, clock) = test_env();
        let mut state = logged_in_user(&env);
        let waiting = seed_waiting(&mut state, &env);

        clock.advance(Duration::minutes(3));
        run(&mut state, &env, vec![SessionAction::SelectUsage(waiting.clone())]);
        assert_eq!(state.home_modal, Some(HomeModal::OwnerConfirm(waiting.clone())));

        run(&mut state, &env, vec![SessionAction::ConfirmArrival]);
        let record = state.venue().ledger.get(&waiting).unwrap();
        assert_eq!(record.status, UsageStatus::Current);
        assert_eq!(record.start_time, Some(clock.now()));
        assert!(state.home_modal.is_none());
    }

    #[test]
    fn current_usage_modal_lists_foods() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        let current = seed_waiting(&mut state, &env);
        let now = env.clock.now();
        state.venue_mut().ledger.confirm_arrival(&current, now).unwrap();

        ReducerTest::new(SessionReducer::new())
            .with_env(env)
            .given_state(state.clone())
            .when_action(SessionAction::SelectUsage(current.clone()))
            .then_state(move |s| {
                assert_eq!(s.home_modal, Some(HomeModal::CurrentUsage(current.clone())));
                assert_eq!(s.allowed_foods_text(), "빵/디저트");
                assert_eq!(s.modal_record().unwrap().id, current);
            })
            .run();

        state.venue_mut().foods = AllowedFoods::default();
        assert_eq!(state.allowed_foods_text(), NO_ALLOWED_FOODS);
    }

    #[test]
    fn home_previews_the_latest_completed_visits() {
        let (env, clock) = test_env();
        let mut state = logged_in_user(&env);
        assert_eq!(state.home_recent().count(), RECENT_COMPLETED);

        let id = seed_waiting(&mut state, &env);
        assert!(state.home_recent().all(|record| record.id != id));
        assert_eq!(state.home_active().next().map(|record| &record.id), Some(&id));

        let ledger = &mut state.venue_mut().ledger;
        ledger.confirm_arrival(&id, clock.now()).unwrap();
        ledger.complete_usage(&id, clock.now() + Duration::minutes(30)).unwrap();

        let recent: Vec<_> = state.home_recent().collect();
        assert_eq!(recent.len(), RECENT_COMPLETED);
        assert_eq!(recent[0].id, id);
        assert_eq!(recent[0].duration_minutes, 30);
        assert!(state.home_active().next().is_none());
    }

    #[test]
    fn completed_records_open_nothing() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        let completed = state.venue().ledger.completed().next().unwrap().id.clone();
        run(&mut state, &env, vec![SessionAction::SelectUsage(completed)]);
        assert!(state.home_modal.is_none());

        run(&mut state, &env, vec![SessionAction::SelectUsage(UsageId::from("missing"))]);
        assert!(matches!(state.last_rejection, Some(Rejection::Usage(UsageError::UnknownRecord(_)))));
    }

    #[test]
    fn role_switch_with_scan_enters_dashboard() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        run(
            &mut state,
            &env,
            vec![
                SessionAction::OpenRoleSwitcher,
                SessionAction::RoleSwitch(RoleSwitchAction::SwitchToOwner),
                SessionAction::RoleSwitch(RoleSwitchAction::Qr(OwnerQrAction::Scan)),
            ],
        );

        assert!(state.role_switch.is_none());
        assert_eq!(state.auth.role, Role::Owner);
        assert_eq!(state.auth.store_id, Some(StoreId::from("store-brown")));
        assert_eq!(state.screen(), Screen::OwnerDashboard);

        run(
            &mut state,
            &env,
            vec![
                SessionAction::OpenRoleSwitcher,
                SessionAction::RoleSwitch(RoleSwitchAction::SwitchToUser),
            ],
        );
        assert_eq!(state.screen(), Screen::Home);
        assert_eq!(state.auth.store_id, Some(StoreId::from("store-brown")));
    }

    #[test]
    fn owner_actions_need_the_owner_role() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        let seat_types = state.venue().seat_types.len();
        run(&mut state, &env, vec![SessionAction::Owner(OwnerDashboardAction::AddSeatType)]);
        assert_eq!(state.venue().seat_types.len(), seat_types);
    }

    #[test]
    fn logout_resets_auth_but_keeps_the_venue() {
        let (env, _) = test_env();
        let mut state = logged_in_user(&env);
        let records = state.venue().ledger.records().len();
        run(&mut state, &env, vec![SessionAction::OpenMyPage, SessionAction::Logout]);

        assert_eq!(state.auth, AuthSession::default());
        assert_eq!(state.screen(), Screen::Auth);
        assert_eq!(state.venue().ledger.records().len(), records);
    }
}
