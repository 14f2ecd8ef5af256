//! Status and choice enums shared by forms and history records.

use serde::{Deserialize, Serialize};

/// Lifecycle of an order on the restaurant side.
///
/// Staff mark orders `Completed`; anything the client does not recognise
/// deserializes as `Other` rather than failing the whole history response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// How the customer receives an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
}

impl DeliveryMethod {
    /// Whether this method needs a delivery address.
    #[must_use]
    pub const fn needs_address(self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("invalid delivery method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_unknown_value() {
        let status: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Other);
    }

    #[test]
    fn test_order_status_known_values() {
        let status: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_delivery_method_parse() {
        assert_eq!("Delivery".parse::<DeliveryMethod>(), Ok(DeliveryMethod::Delivery));
        assert_eq!(" pickup ".parse::<DeliveryMethod>(), Ok(DeliveryMethod::Pickup));
        assert!("drone".parse::<DeliveryMethod>().is_err());
    }

    #[test]
    fn test_delivery_method_wire_format() {
        let json = serde_json::to_string(&DeliveryMethod::Delivery).unwrap();
        assert_eq!(json, "\"delivery\"");
        assert!(DeliveryMethod::Delivery.needs_address());
        assert!(!DeliveryMethod::Pickup.needs_address());
    }
}
