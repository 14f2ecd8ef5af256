//! Customer order and booking history.

use bistro_client::ClientConfig;
use bistro_client::history::{HistoryOutcome, fetch_customer_data};
use bistro_client::transport::HttpTransport;
use bistro_core::api::CustomerData;
use bistro_core::{CurrencyCode, Price};
use chrono::{DateTime, Utc};

use super::CommandError;

/// Fetch and print the signed-in customer's history.
#[allow(clippy::print_stdout)]
pub async fn show(config: &ClientConfig) -> Result<(), CommandError> {
    let transport = HttpTransport::new(config)?;
    match fetch_customer_data(&transport).await? {
        HistoryOutcome::LoginRequired => {
            println!(
                "Login required. Log in at {}, then set BISTRO_SESSION_COOKIE.",
                config.login_url()
            );
        }
        HistoryOutcome::Loaded(data) => println!("{}", format_history(&data)),
    }
    Ok(())
}

fn format_when(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn format_history(data: &CustomerData) -> String {
    let mut out = vec![format!("History for {}", data.email)];

    out.push(format!("\nOrders ({})", data.orders.len()));
    for order in &data.orders {
        let total = Price::new(order.total, CurrencyCode::USD)
            .map_or_else(|_| order.total.to_string(), |p| p.to_string());
        out.push(format!(
            "  #{}  {}  {}  {}",
            order.id,
            format_when(order.created_at.as_ref()),
            order.status,
            total
        ));
        for item in &order.items {
            out.push(format!(
                "      {} × {}  {}",
                item.quantity,
                item.name,
                item.unit_price()
            ));
        }
    }

    out.push(format!("\nPrivate rooms ({})", data.private_rooms.len()));
    for room in &data.private_rooms {
        out.push(format!(
            "  #{}  {} {}",
            room.id,
            room.date.as_deref().unwrap_or("-"),
            room.time.as_deref().unwrap_or(""),
        ));
    }

    out.push(format!("\nEvents ({})", data.events.len()));
    for event in &data.events {
        out.push(format!(
            "  #{}  {}  {}  {} guests",
            event.id,
            event.date.as_deref().unwrap_or("-"),
            event.event_type.as_deref().unwrap_or("event"),
            event.guests.unwrap_or_default(),
        ));
    }

    out.join("\n")
}
