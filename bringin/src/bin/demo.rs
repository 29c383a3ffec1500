//! BringIn demo binary
//!
//! Drives a full session through the store: a guest books a pair seat and
//! pays for two drinks, then the owner logs in, confirms the arrival and
//! closes the visit. The final usage ledger is printed as JSON.

use bringin::catalog::Radius;
use bringin::entry;
use bringin::fixtures::sample_venue;
use bringin::flows::auth::AuthAction;
use bringin::flows::booking::BookingAction;
use bringin::flows::owner_dashboard::{DashboardTab, OwnerDashboardAction};
use bringin::flows::phone_login::PhoneLoginAction;
use bringin::format::{format_datetime, mask_phone};
use bringin::session::Screen;
use bringin::types::{CafeId, DrinkId, SeatTypeId};
use bringin::{AppEnvironment, Config, SessionAction, SessionReducer, SessionState};
use bringin_core::environment::Clock;
use bringin_runtime::Store;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type SessionStore = Store<SessionState, SessionAction, AppEnvironment, SessionReducer>;

const GUEST_PHONE: &str = "01012345678";
const OWNER_PHONE: &str = "01055556666";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== BringIn: booking to arrival ===\n");

    let env = AppEnvironment::live(config);
    let venue = sample_venue(env.clock.now());
    let state = SessionState::new(entry::detect("https://bringin.app/"), venue);
    let store: SessionStore = Store::new(state, SessionReducer::new(), env);

    println!(">>> Guest logs in as {}", mask_phone(GUEST_PHONE));
    log_in(&store, GUEST_PHONE).await?;
    println!("Screen: {:?}", store.state(SessionState::screen).await);

    println!("\n>>> Guest books a pair seat at 모닝 커피");
    store.send(SessionAction::StartBooking).await?;
    for action in [
        BookingAction::ChangePeople(1),
        BookingAction::ConfirmPeople,
        BookingAction::SelectSeat(SeatTypeId::from("2")),
        BookingAction::SetRadius(Radius::Near),
        BookingAction::SelectCafe(CafeId(2)),
        BookingAction::StartOrder,
        BookingAction::AdjustDrink(DrinkId(1), 1),
        BookingAction::AdjustDrink(DrinkId(2), 1),
        BookingAction::SubmitOrder,
    ] {
        store.send(SessionAction::Booking(action)).await?;
    }
    if let Some(rejection) = store
        .state(|s| s.booking.as_ref().and_then(|booking| booking.last_rejection.clone()))
        .await
    {
        anyhow::bail!("booking refused: {rejection}");
    }

    let waiting = store
        .state(|s| s.venue().ledger.waiting().next().cloned())
        .await
        .ok_or_else(|| anyhow::anyhow!("paid booking left no waiting record"))?;
    println!(
        "Waiting: {} / {} / {} (paid {})",
        waiting.cafe_name,
        waiting.seat_type.as_deref().unwrap_or("-"),
        waiting.drink_ordered,
        waiting.payment_time.as_ref().map_or_else(String::new, format_datetime),
    );

    store.send(SessionAction::Booking(BookingAction::Back)).await?;
    store.send(SessionAction::Logout).await?;

    println!("\n>>> Owner logs in as {}", mask_phone(OWNER_PHONE));
    log_in(&store, OWNER_PHONE).await?;
    println!("Screen: {:?}", store.state(SessionState::screen).await);

    println!("\n>>> Owner confirms the arrival");
    for action in [
        OwnerDashboardAction::SelectTab(DashboardTab::Current),
        OwnerDashboardAction::RequestStartUsage(waiting.id.clone()),
        OwnerDashboardAction::Confirm,
    ] {
        store.send(SessionAction::Owner(action)).await?;
    }
    let status = store
        .state(|s| s.venue().ledger.get(&waiting.id).map(|record| record.status))
        .await;
    println!("Status: {status:?}");

    println!("\n>>> Owner closes the visit");
    store
        .send(SessionAction::Owner(OwnerDashboardAction::CompleteUsage(waiting.id.clone())))
        .await?;

    let (stats, ledger) = store
        .state(|s| (s.owner.stats(), serde_json::to_string_pretty(&s.venue().ledger)))
        .await;
    println!("Seats: {stats:?}");
    let recent = store
        .state(|s| {
            s.home_recent()
                .map(|record| format!("{} ({}분)", record.cafe_name, record.duration_minutes))
                .collect::<Vec<_>>()
        })
        .await;
    println!("Recent visits: {}", recent.join(", "));
    println!("\nUsage ledger:\n{}", ledger?);

    store.shutdown(Duration::from_secs(5)).await?;
    println!("\n=== Demo complete ===");
    Ok(())
}

/// Phone login, waiting for the mocked verifier to answer
async fn log_in(store: &SessionStore, phone: &str) -> anyhow::Result<()> {
    for action in [
        PhoneLoginAction::Start,
        PhoneLoginAction::PhoneChanged(phone.to_string()),
        PhoneLoginAction::SubmitPhone,
        PhoneLoginAction::CodeChanged("123456".to_string()),
    ] {
        store.send(SessionAction::Auth(AuthAction::Login(action))).await?;
    }
    let mut handle = store
        .send(SessionAction::Auth(AuthAction::Login(PhoneLoginAction::SubmitCode)))
        .await?;
    handle.wait_with_timeout(Duration::from_secs(5)).await?;

    if store.state(|s| s.screen() == Screen::Auth).await {
        anyhow::bail!("login for {} did not complete", mask_phone(phone));
    }
    Ok(())
}
