//! Request and response bodies for the customer API.
//!
//! Field names follow the server's JSON exactly; see the `serde` attributes
//! for the few places where the Rust name differs.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cart::{Cart, LineItem};
use crate::types::{BookingId, DeliveryMethod, OrderId, OrderStatus, ReservationId};

// =============================================================================
// Request bodies
// =============================================================================

/// Who is placing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// How and where an order is handed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub method: DeliveryMethod,
    pub address: String,
    #[serde(rename = "specialRequests")]
    pub special_requests: String,
}

/// Body of `POST /customer/api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub customer: CustomerInfo,
    pub delivery: DeliveryInfo,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderPayload {
    /// Snapshot the cart together with the collected form fields.
    #[must_use]
    pub fn from_cart(customer: CustomerInfo, delivery: DeliveryInfo, cart: &Cart) -> Self {
        Self {
            customer,
            delivery,
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }
}

/// Body of `POST /customer/api/private-room`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateRoomPayload {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub message: String,
}

/// Body of `POST /customer/api/event-reservation`.
///
/// `guests` is sent as the raw text of the input field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub name: String,
    pub email: String,
    pub event_type: String,
    pub guests: String,
    pub date: String,
    pub message: String,
}

// =============================================================================
// Response bodies
// =============================================================================

/// Response body shared by the three submit endpoints.
///
/// Every field is optional on the wire; absent flags read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
    pub success: bool,
    pub login_required: bool,
    pub order_id: Option<OrderId>,
    pub booking_id: Option<BookingId>,
    pub event_id: Option<ReservationId>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Body of `GET /customer/api/customer-data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomerData {
    pub email: String,
    pub orders: Vec<OrderRecord>,
    pub private_rooms: Vec<PrivateRoomRecord>,
    pub events: Vec<EventRecord>,
}

/// A past order as stored by the restaurant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A past private-room booking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrivateRoomRecord {
    pub id: BookingId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A past event reservation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventRecord {
    pub id: ReservationId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    /// Stored from free text, so it may come back as a string.
    #[serde(default, deserialize_with = "deserialize_guests")]
    pub guests: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accept RFC 3339, RFC 2822 (`Sun, 18 Oct 2026 10:00:00 GMT`) or a naive
/// ISO timestamp taken as UTC. Anything else reads as `None`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Accept an integer or integer text. Anything else (empty text, words,
/// fractions) reads as `None`.
fn deserialize_guests<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
