//! Availability preview: loads the service catalog, pulls the appointment
//! list from the store, and prints per-day availability for the coming two
//! weeks.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use yoyaku_core::config::load_config;
use yoyaku_engine::AvailabilityResolver;
use yoyaku_service::store::AppointmentStore;
use yoyaku_service::{HttpStore, Session};

const PREVIEW_DAYS: usize = 14;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting yoyaku availability preview");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let session = config
        .store
        .session_token
        .clone()
        .map_or_else(Session::anonymous, Session::bearer);
    let store = HttpStore::new(config.store.base_url.clone(), session);

    let provider = store.provider_profile(config.provider.id).await?;
    tracing::info!(provider = %provider.name, "Provider profile loaded");

    let appointments = store.list_appointments().await?;
    tracing::info!(count = appointments.len(), "Appointment list fetched");

    let today = chrono::Local::now().date_naive();
    let resolver = AvailabilityResolver::new(today);

    println!("Availability for {} ({})", provider.name, provider.email);
    for service in &config.services {
        println!(
            "\n{} ({} min, {}-{})",
            service.name,
            service.duration_minutes,
            service.shift_start.format("%H:%M"),
            service.shift_end.format("%H:%M"),
        );

        for day in today.iter_days().take(PREVIEW_DAYS) {
            let availability = resolver.day_availability(day, service, &appointments);
            let open = availability.slots.iter().filter(|s| !s.booked).count();
            let marker = if availability.bookable {
                "bookable"
            } else {
                "blocked "
            };
            println!("  {day} {} {marker} ({open} open slots)", day.format("%a"));
        }
    }

    Ok(())
}
