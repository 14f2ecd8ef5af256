//! Order summary rendering.
//!
//! Pure projection of a [`Cart`] into the summary panel: one row per item
//! with a remove control keyed by item name, or an empty-state placeholder,
//! followed by the total line.

use askama::Template;
use bistro_core::Cart;

/// Text shown when the cart has no items.
pub const EMPTY_PLACEHOLDER: &str = "No items yet. Please add something from the menu.";

/// One summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Item name, also the key its remove control carries.
    pub name: String,
    /// Unit price, e.g. `$12.50`.
    pub unit_price: String,
    pub quantity: u32,
}

/// Display data for the summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub rows: Vec<SummaryRow>,
    /// Cart total, e.g. `$25.00`.
    pub total: String,
}

impl SummaryView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The total line as displayed.
    #[must_use]
    pub fn total_line(&self) -> String {
        format!("Total: {}", self.total)
    }

    /// Plain-text rendering for terminals and logs.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = if self.rows.is_empty() {
            vec![EMPTY_PLACEHOLDER.to_string()]
        } else {
            self.rows
                .iter()
                .map(|r| format!("{}  {} × {}", r.name, r.unit_price, r.quantity))
                .collect()
        };
        lines.push(self.total_line());
        lines.join("\n")
    }
}

impl From<&Cart> for SummaryView {
    fn from(cart: &Cart) -> Self {
        Self {
            rows: cart
                .items()
                .iter()
                .map(|item| SummaryRow {
                    name: item.name.clone(),
                    unit_price: item.unit_price().to_string(),
                    quantity: item.quantity,
                })
                .collect(),
            total: cart.total_price().to_string(),
        }
    }
}

/// Summary fragment template.
#[derive(Template)]
#[template(path = "partials/order_summary.html")]
pub struct OrderSummaryTemplate<'a> {
    pub rows: &'a [SummaryRow],
    pub total: &'a str,
}

/// Error rendering the summary fragment.
#[derive(Debug, thiserror::Error)]
#[error("failed to render order summary: {0}")]
pub struct RenderError(#[from] askama::Error);

/// Render the summary panel HTML for `view`.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render(view: &SummaryView) -> Result<String, RenderError> {
    let template = OrderSummaryTemplate {
        rows: &view.rows,
        total: &view.total,
    };
    Ok(template.render()?)
}
