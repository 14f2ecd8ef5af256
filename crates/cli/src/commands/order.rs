//! Placing orders and previewing the summary.
//!
//! Items come from the command line as `NAME=PRICE` or `NAME=PRICExQTY`.
//! Each becomes its own dish card on an ad-hoc menu and is added through the
//! page, so quantity validation and merging behave as they do in the browser:
//! repeating a name adds a second card, and the cart merges both into one line.

use std::collections::HashMap;

use bistro_client::menu::{Dish, Menu};
use bistro_client::summary::{self, SummaryView};
use bistro_client::transport::Transport;
use bistro_client::{ClientConfig, OrderPage, PageError};
use bistro_core::{Cart, DeliveryMethod, DishId, Price, Quantity};
use clap::Args;
use tracing::info;

use super::{CommandError, Terminal};

/// Customer contact fields.
#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, default_value = "")]
    pub phone: String,
}

/// Everything on the order form except the items.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub contact: ContactArgs,
    pub method: String,
    pub address: String,
    pub requests: String,
}

/// One parsed `--item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub dish: Dish,
    /// Raw quantity text, validated by the page.
    pub quantity: String,
}

/// Parse `NAME=PRICE` or `NAME=PRICExQTY`.
pub fn parse_item(spec: &str) -> Result<ItemSpec, CommandError> {
    let (name, rest) = spec
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CommandError::InvalidItem(spec.to_string()))?;
    let (price, quantity) = rest.rsplit_once('x').unwrap_or((rest, "1"));
    let price = Price::parse(price).map_err(|e| CommandError::InvalidPrice(spec.to_string(), e))?;
    let name = name.trim();

    Ok(ItemSpec {
        dish: Dish {
            id: dish_id(name),
            name: name.to_string(),
            price,
            category: "menu".to_string(),
        },
        quantity: quantity.trim().to_string(),
    })
}

fn dish_id(name: &str) -> DishId {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    DishId::new(slug)
}

/// Parse every `--item`. A repeated name gets a numbered card id
/// (`margherita`, `margherita-2`, ...).
fn parse_items(items: &[String]) -> Result<Vec<ItemSpec>, CommandError> {
    let mut seen: HashMap<DishId, usize> = HashMap::new();
    items
        .iter()
        .map(String::as_str)
        .map(parse_item)
        .map(|spec| {
            let mut spec = spec?;
            let count = seen.entry(spec.dish.id.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                spec.dish.id = DishId::new(format!("{}-{count}", spec.dish.id));
            }
            Ok(spec)
        })
        .collect()
}

/// Add each spec through its card, stopping at the first refusal.
fn add_items<T: Transport>(page: &OrderPage<T>, specs: &[ItemSpec]) -> Result<(), PageError> {
    for spec in specs {
        page.set_quantity_input(&spec.dish.id, &spec.quantity);
        page.add_to_order(&spec.dish.id)?;
    }
    Ok(())
}

/// Add `items` to the cart and place the order.
pub async fn place(
    config: &ClientConfig,
    items: &[String],
    details: OrderDetails,
) -> Result<(), CommandError> {
    let specs = parse_items(items)?;
    let method: DeliveryMethod = details
        .method
        .parse()
        .map_err(|_| CommandError::InvalidMethod(details.method.clone()))?;

    let menu = Menu::new(specs.iter().map(|s| s.dish.clone()).collect());
    let terminal = Terminal::open(config, menu)?;
    let page = terminal.page();
    page.on_load();

    if let Err(e) = add_items(page, &specs) {
        terminal.flush_alerts();
        return Err(e.into());
    }

    page.set_delivery_method(method);
    page.edit_order_form(|form| {
        form.name = details.contact.name;
        form.email = details.contact.email;
        form.phone = details.contact.phone;
        if method.needs_address() {
            form.address = details.address;
        }
        form.special_requests = details.requests;
    });

    let summary = page.summary();
    info!(items = summary.rows.len(), total = %summary.total, %method, "placing order");
    print_summary(&summary);

    let outcome = page.submit_order().await;
    terminal.finish(&outcome)
}

/// Print the summary for `items` without contacting the server.
pub fn summary(items: &[String], html: bool) -> Result<(), CommandError> {
    let mut cart = Cart::new();
    for spec in parse_items(items)? {
        let quantity = Quantity::parse(&spec.quantity)?;
        cart.add_quantity(&spec.dish.name, spec.dish.price, quantity)?;
    }

    let view = SummaryView::from(&cart);
    if html {
        print_html(&summary::render(&view)?);
    } else {
        print_summary(&view);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_summary(view: &SummaryView) {
    println!("{}", view.to_text());
}

#[allow(clippy::print_stdout)]
fn print_html(html: &str) {
    println!("{html}");
}
