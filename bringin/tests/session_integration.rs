//! Integration tests for the session running in a Store
//!
//! These drive the root reducer the way the client does: actions go through
//! `Store::send`, timers and the mocked verifier run as real effects.

#![allow(clippy::unwrap_used)]

use bringin::catalog::Catalog;
use bringin::entry;
use bringin::environment::{MockPhoneVerifier, MockStoreScanner};
use bringin::fixtures::sample_venue;
use bringin::flows::auth::{AuthAction, OwnerAuthAction};
use bringin::flows::booking::{BookingAction, BookingStep};
use bringin::flows::owner_qr::OwnerQrAction;
use bringin::flows::phone_login::PhoneLoginAction;
use bringin::flows::qr_entry::QrEntryAction;
use bringin::flows::walk_in::{WalkInAction, WalkInSeat};
use bringin::session::{HomeModal, Screen};
use bringin::types::{CafeId, DrinkId, Role, SeatTypeId, StoreId, UsageStatus};
use bringin::{AppEnvironment, Config, SessionAction, SessionReducer, SessionState};
use bringin_core::environment::Clock;
use bringin_runtime::Store;
use bringin_testing::{FixedClock, SequentialIds, test_clock};
use std::sync::Arc;
use std::time::Duration;

type SessionStore = Store<SessionState, SessionAction, AppEnvironment, SessionReducer>;

const BROWN: CafeId = CafeId(1);
const MORNING: CafeId = CafeId(2);

fn environment() -> (AppEnvironment, Arc<FixedClock>) {
    let clock = Arc::new(test_clock());
    let config = Config {
        scan_delay: Duration::from_millis(20),
        scan_confirm: Duration::from_millis(10),
        copy_feedback: Duration::from_millis(10),
        ..Config::default()
    };
    let env = AppEnvironment::new(
        clock.clone(),
        Arc::new(SequentialIds::new()),
        Arc::new(MockPhoneVerifier::sample()),
        Arc::new(MockStoreScanner::default()),
        Arc::new(Catalog::sample()),
        config,
    );
    (env, clock)
}

fn store_at(url: &str) -> (SessionStore, AppEnvironment, Arc<FixedClock>) {
    let (env, clock) = environment();
    let state = SessionState::new(entry::detect(url), sample_venue(clock.now()));
    let store = Store::new(state, SessionReducer::new(), env.clone());
    (store, env, clock)
}

/// Wait until every effect in the store, including chained timers, is done
async fn settle(store: &SessionStore) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while store.pending_effects() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

async fn send_all(store: &SessionStore, actions: impl IntoIterator<Item = SessionAction>) {
    for action in actions {
        store.send(action).await.unwrap();
        settle(store).await;
    }
}

fn phone_login(phone: &str) -> Vec<PhoneLoginAction> {
    vec![
        PhoneLoginAction::Start,
        PhoneLoginAction::PhoneChanged(phone.into()),
        PhoneLoginAction::SubmitPhone,
        PhoneLoginAction::CodeChanged("123456".into()),
        PhoneLoginAction::SubmitCode,
    ]
}

fn guest_login() -> Vec<SessionAction> {
    phone_login("01012345678")
        .into_iter()
        .map(|action| SessionAction::Auth(AuthAction::Login(action)))
        .collect()
}

fn booking(actions: Vec<BookingAction>) -> Vec<SessionAction> {
    actions.into_iter().map(SessionAction::Booking).collect()
}

#[tokio::test]
async fn test_booking_then_owner_confirms_arrival() {
    let (store, _env, clock) = store_at("https://bringin.app/");
    send_all(&store, guest_login()).await;
    assert_eq!(store.state(SessionState::screen).await, Screen::Home);

    send_all(&store, [SessionAction::StartBooking]).await;
    send_all(
        &store,
        booking(vec![
            BookingAction::ChangePeople(1),
            BookingAction::ConfirmPeople,
            BookingAction::SelectSeat(SeatTypeId::from("2")),
            BookingAction::SelectCafe(MORNING),
            BookingAction::StartOrder,
            BookingAction::AdjustDrink(DrinkId(1), 2),
            BookingAction::SubmitOrder,
        ]),
    )
    .await;

    let paid_at = clock.now();
    let record = store
        .state(|s| s.venue().ledger.records()[0].clone())
        .await;
    assert_eq!(record.status, UsageStatus::Waiting);
    assert_eq!(record.payment_time, Some(paid_at));
    assert_eq!(record.drink_ordered, "아메리카노 2잔");
    assert_eq!(
        store.state(|s| s.booking.as_ref().map(|b| b.step())).await,
        Some(BookingStep::Waiting)
    );

    send_all(&store, booking(vec![BookingAction::Back])).await;
    clock.advance(chrono::Duration::minutes(7));

    send_all(
        &store,
        [
            SessionAction::SelectUsage(record.id.clone()),
            SessionAction::ConfirmArrival,
        ],
    )
    .await;

    let confirmed = store
        .state(|s| s.venue().ledger.get(&record.id).cloned())
        .await
        .unwrap();
    assert_eq!(confirmed.status, UsageStatus::Current);
    assert_eq!(confirmed.start_time, Some(clock.now()));

    send_all(&store, [SessionAction::SelectUsage(record.id.clone())]).await;
    assert_eq!(
        store.state(|s| s.home_modal.clone()).await,
        Some(HomeModal::CurrentUsage(record.id.clone()))
    );
}

#[tokio::test]
async fn test_large_party_is_asked_to_call_ahead() {
    let (store, env, _clock) = store_at("https://bringin.app/");
    send_all(&store, guest_login()).await;
    send_all(&store, [SessionAction::StartBooking]).await;
    send_all(
        &store,
        booking(vec![BookingAction::ChangePeople(4), BookingAction::ConfirmPeople]),
    )
    .await;

    let option = store
        .state(move |s| s.booking.as_ref().unwrap().seat_options(&env).into_iter().next())
        .await
        .unwrap();
    send_all(
        &store,
        booking(vec![BookingAction::SelectSeat(option.id), BookingAction::SelectCafe(BROWN)]),
    )
    .await;

    let (step, advisory) = store
        .state(|s| {
            let booking = s.booking.as_ref().unwrap();
            (booking.step(), booking.advisory.clone())
        })
        .await;
    assert_eq!(step, BookingStep::CafeList);
    assert_eq!(advisory.unwrap().cafe, BROWN);

    send_all(&store, booking(vec![BookingAction::ProceedAnyway])).await;
    let (step, cafe) = store
        .state(|s| {
            let booking = s.booking.as_ref().unwrap();
            (booking.step(), booking.cafe)
        })
        .await;
    assert_eq!(step, BookingStep::CafeDetail);
    assert_eq!(cafe, Some(BROWN));
}

#[tokio::test]
async fn test_owner_login_runs_the_timed_qr_scan() {
    let (store, _env, _clock) = store_at("https://bringin.app/");
    send_all(
        &store,
        [
            SessionAction::Auth(AuthAction::OwnerLogin),
            SessionAction::Auth(AuthAction::Owner(OwnerAuthAction::Qr(OwnerQrAction::Scan))),
        ],
    )
    .await;

    let owner_login = phone_login("01077778888")
        .into_iter()
        .map(|action| SessionAction::Auth(AuthAction::Owner(OwnerAuthAction::Login(action))));
    send_all(&store, owner_login).await;

    let (screen, role, store_id) = store
        .state(|s| (s.screen(), s.auth.role, s.auth.store_id.clone()))
        .await;
    assert_eq!(screen, Screen::OwnerDashboard);
    assert_eq!(role, Role::Owner);
    assert_eq!(store_id, Some(StoreId::from("store-brown")));
}

#[tokio::test]
async fn test_copy_feedback_clears_itself() {
    let (store, _env, _clock) = store_at("https://bringin.app/");
    send_all(&store, guest_login()).await;
    send_all(&store, [SessionAction::StartBooking]).await;
    send_all(
        &store,
        booking(vec![
            BookingAction::ChangePeople(1),
            BookingAction::ConfirmPeople,
            BookingAction::SelectSeat(SeatTypeId::from("2")),
            BookingAction::SelectCafe(BROWN),
        ]),
    )
    .await;

    store
        .send(SessionAction::Booking(BookingAction::CopyAddress))
        .await
        .unwrap();
    assert!(store.state(|s| s.booking.as_ref().unwrap().copy.copied).await);

    settle(&store).await;
    assert!(!store.state(|s| s.booking.as_ref().unwrap().copy.copied).await);
}

#[tokio::test]
async fn test_qr_guest_walks_in_and_lands_home() {
    let (store, _env, _clock) = store_at("https://bringin.app/?qr_id=store-brown");
    assert_eq!(store.state(SessionState::screen).await, Screen::QrEntry);

    send_all(&store, [SessionAction::QrEntry(QrEntryAction::Accept)]).await;
    send_all(
        &store,
        phone_login("01012345678")
            .into_iter()
            .map(|action| SessionAction::QrEntry(QrEntryAction::Login(action))),
    )
    .await;
    send_all(
        &store,
        [
            WalkInAction::Next,
            WalkInAction::AnswerHasDrink(false),
            WalkInAction::SelectSeat(WalkInSeat::Pair),
            WalkInAction::AdjustDrink(DrinkId(1), 1),
            WalkInAction::SubmitOrder,
            WalkInAction::Finish,
        ]
        .into_iter()
        .map(|action| SessionAction::QrEntry(QrEntryAction::WalkIn(action))),
    )
    .await;

    let (screen, logged_in, qr_entry) = store
        .state(|s| (s.screen(), s.auth.logged_in, s.qr_entry.is_some()))
        .await;
    assert_eq!(screen, Screen::Home);
    assert!(logged_in);
    assert!(!qr_entry);
}
