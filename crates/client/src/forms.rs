//! Field state of the three forms on the page.
//!
//! Each form knows how to turn its fields into the request body the server
//! expects and how to reset itself after a successful submit.

use bistro_core::api::{CustomerInfo, DeliveryInfo, EventPayload, OrderPayload, PrivateRoomPayload};
use bistro_core::{Cart, DeliveryMethod};

/// Message shown when the order form is submitted with an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Please add items to your order.";

/// The order (checkout) form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub method: DeliveryMethod,
    pub address: String,
    pub special_requests: String,
    /// Whether the address panel is shown.
    pub address_visible: bool,
}

impl OrderForm {
    /// Switch delivery method. Leaving `delivery` hides the address panel
    /// and clears the address.
    pub fn set_method(&mut self, method: DeliveryMethod) {
        self.method = method;
        if method.needs_address() {
            self.address_visible = true;
        } else {
            self.address_visible = false;
            self.address.clear();
        }
    }

    /// Collect the request body, snapshotting `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`EMPTY_CART_MESSAGE`] if the cart has no items.
    pub fn collect(&self, cart: &Cart) -> Result<OrderPayload, String> {
        if cart.is_empty() {
            return Err(EMPTY_CART_MESSAGE.to_string());
        }
        Ok(OrderPayload::from_cart(
            CustomerInfo {
                name: self.name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
            },
            DeliveryInfo {
                method: self.method,
                address: self.address.clone(),
                special_requests: self.special_requests.clone(),
            },
            cart,
        ))
    }

    /// Clear every field and hide the address panel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The private-room booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivateRoomForm {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub message: String,
}

impl PrivateRoomForm {
    /// Collect the request body with surrounding whitespace trimmed.
    #[must_use]
    pub fn collect(&self) -> PrivateRoomPayload {
        PrivateRoomPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// The event reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub name: String,
    pub email: String,
    pub event_type: String,
    pub guests: String,
    pub date: String,
    pub message: String,
}

impl EventForm {
    /// Collect the request body with surrounding whitespace trimmed.
    #[must_use]
    pub fn collect(&self) -> EventPayload {
        EventPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            event_type: self.event_type.trim().to_string(),
            guests: self.guests.trim().to_string(),
            date: self.date.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// A form that lives in a collapsible panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel<F> {
    pub form: F,
    pub visible: bool,
}

impl<F: Default> Panel<F> {
    /// Flip visibility. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Clear the form and collapse the panel.
    pub fn reset(&mut self) {
        self.form = F::default();
        self.visible = false;
    }
}
