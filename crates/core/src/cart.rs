//! The cart store.
//!
//! A [`Cart`] is the ordered list of dishes a customer intends to order. It
//! lives for one page session and is never persisted. Item names are the key:
//! adding a name already in the cart grows its quantity instead of adding a
//! second line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price};

/// Errors produced by cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantity was zero, negative, or not a number.
    #[error("Please enter a valid quantity.")]
    InvalidQuantity,
    /// Merging would overflow the line quantity.
    #[error("quantity for {0} is too large")]
    QuantityOverflow(String),
    /// The order total would no longer fit in a decimal.
    #[error("adding {0} makes the order total too large")]
    TotalOverflow(String),
}

/// A positive item quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// The quantity a fresh quantity field starts at.
    pub const ONE: Self = Self(1);

    /// Validate a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `n < 1` or does not fit.
    pub fn new(n: i64) -> Result<Self, CartError> {
        u32::try_from(n)
            .ok()
            .filter(|&q| q >= 1)
            .map(Self)
            .ok_or(CartError::InvalidQuantity)
    }

    /// Parse the text of a quantity input.
    ///
    /// An empty field counts as 1. Otherwise leading whitespace is skipped and
    /// the leading integer is read, ignoring whatever follows it, so `"1.5"`
    /// reads as 1 and `"2 plates"` as 2.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when no digits lead the input
    /// (including whitespace-only input) or the value is below 1.
    pub fn parse(input: &str) -> Result<Self, CartError> {
        if input.is_empty() {
            return Ok(Self::ONE);
        }
        let rest = input.trim_start();
        let (negative, rest) = match rest.strip_prefix('-') {
            Some(unsigned) => (true, unsigned),
            None => (false, rest.strip_prefix('+').unwrap_or(rest)),
        };
        let digits = rest
            .split(|c: char| !c.is_ascii_digit())
            .next()
            .unwrap_or_default();
        if digits.is_empty() || negative {
            return Err(CartError::InvalidQuantity);
        }
        let n = digits
            .parse::<i64>()
            .map_err(|_| CartError::InvalidQuantity)?;
        Self::new(n)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// One named dish in the cart.
///
/// Serializes to the `{name, price, quantity}` shape the order endpoint
/// expects, with `price` as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price {
            amount: self.price,
            currency_code: CurrencyCode::USD,
        }
    }

    /// `price * quantity`, or `None` if it does not fit.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// `price * quantity`.
    ///
    /// Items held by a [`Cart`] always fit; a standalone item saturates.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered, name-keyed collection of [`LineItem`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` of `name` at `price`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity < 1`, leaving the
    /// cart untouched.
    pub fn add(&mut self, name: &str, price: Price, quantity: i64) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity)?;
        self.add_quantity(name, price, quantity)
    }

    /// Add an already-validated quantity.
    ///
    /// If `name` is already in the cart its quantity is increased and the
    /// original unit price is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the merged quantity does
    /// not fit in a `u32`, or [`CartError::TotalOverflow`] if the cart total
    /// would no longer fit in a decimal. The cart is left untouched.
    pub fn add_quantity(
        &mut self,
        name: &str,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), CartError> {
        let candidate = match self.get(name) {
            Some(existing) => LineItem {
                quantity: existing
                    .quantity
                    .checked_add(quantity.get())
                    .ok_or_else(|| CartError::QuantityOverflow(name.to_owned()))?,
                ..existing.clone()
            },
            None => LineItem {
                name: name.to_owned(),
                price: price.amount,
                quantity: quantity.get(),
            },
        };

        self.items
            .iter()
            .filter(|i| i.name != name)
            .chain(std::iter::once(&candidate))
            .try_fold(Decimal::ZERO, |sum, item| {
                item.checked_line_total()
                    .and_then(|line| sum.checked_add(line))
            })
            .ok_or_else(|| CartError::TotalOverflow(name.to_owned()))?;

        match self.items.iter_mut().find(|i| i.name == name) {
            Some(existing) => *existing = candidate,
            None => self.items.push(candidate),
        }
        Ok(())
    }

    /// Remove the item called `name`. Returns the removed item, if any.
    pub fn remove(&mut self, name: &str) -> Option<LineItem> {
        let idx = self.items.iter().position(|i| i.name == name)?;
        Some(self.items.remove(idx))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all items.
    ///
    /// Never overflows: [`Cart::add_quantity`] refuses items that would.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The total as a displayable [`Price`].
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price {
            amount: self.total(),
            currency_code: CurrencyCode::USD,
        }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
