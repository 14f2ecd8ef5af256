//! Signed-in customer's past orders and bookings.

use bistro_core::api::CustomerData;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::transport::{Transport, TransportError};

/// Endpoint returning the customer's history.
pub const CUSTOMER_DATA_PATH: &str = "/customer/api/customer-data";

/// Failures loading customer history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Server answered with a non-success status other than 401.
    #[error("customer data request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Body was JSON but not customer data.
    #[error("unexpected customer data shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the history request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    Loaded(CustomerData),
    /// No session; the user has to log in first.
    LoginRequired,
}

/// Fetch the customer's orders, private-room bookings and event
/// reservations.
///
/// # Errors
///
/// Returns error if the request fails, the server answers with an error
/// status other than 401, or the body is not customer data.
#[instrument(skip(transport))]
pub async fn fetch_customer_data<T: Transport>(
    transport: &T,
) -> Result<HistoryOutcome, HistoryError> {
    let response = transport.get_json(CUSTOMER_DATA_PATH).await?;

    if response.status == 401 {
        debug!("customer data requires login");
        return Ok(HistoryOutcome::LoginRequired);
    }
    if !response.is_success() {
        let message = response
            .body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        warn!(status = response.status, %message, "customer data request failed");
        return Err(HistoryError::Api {
            status: response.status,
            message,
        });
    }

    let data: CustomerData = serde_json::from_value(response.body)?;
    debug!(
        orders = data.orders.len(),
        private_rooms = data.private_rooms.len(),
        events = data.events.len(),
        "loaded customer data"
    );
    Ok(HistoryOutcome::Loaded(data))
}
