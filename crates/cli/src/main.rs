//! Bistro CLI - drive the ordering page from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Place an order for pickup
//! bistro order --item "Margherita=12.50x2" --item "Tiramisu=6" \
//!     --name "Ada" --email ada@example.com --phone 555-0100
//!
//! # Book the private room
//! bistro private-room --name Ada --email ada@example.com --date 2026-11-01 --time 19:00
//!
//! # Reserve an event
//! bistro event --name Ada --email ada@example.com --event-type birthday --guests 12 --date 2026-11-02
//!
//! # After logging in, pick up where the redirect left off
//! bistro resume
//! ```
//!
//! # Commands
//!
//! - `order` - Add dishes to the cart and place the order
//! - `private-room` - Book the private dining room
//! - `event` - Reserve an event
//! - `history` - List past orders and bookings
//! - `resume` - Consume the stored post-login redirect
//! - `summary` - Render the order summary for a set of items

#![cfg_attr(not(test), forbid(unsafe_code))]

use bistro_client::ClientConfig;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bistro")]
#[command(author, version, about = "Bistro ordering client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add dishes to the cart and place the order
    Order {
        /// Dish as `NAME=PRICE` or `NAME=PRICExQTY` (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        #[command(flatten)]
        contact: commands::order::ContactArgs,

        /// `pickup` or `delivery`
        #[arg(short, long, default_value = "pickup")]
        method: String,

        /// Delivery address (delivery only)
        #[arg(short, long, default_value = "")]
        address: String,

        /// Special requests for the kitchen
        #[arg(short, long, default_value = "")]
        requests: String,
    },
    /// Book the private dining room
    PrivateRoom {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Booking date (`YYYY-MM-DD`)
        #[arg(short, long)]
        date: String,

        /// Booking time (`HH:MM`)
        #[arg(short, long)]
        time: String,

        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Reserve an event
    Event {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Kind of event (birthday, corporate, ...)
        #[arg(short = 't', long)]
        event_type: String,

        /// Number of guests
        #[arg(short, long)]
        guests: String,

        /// Event date (`YYYY-MM-DD`)
        #[arg(short, long)]
        date: String,

        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// List past orders and bookings
    History,
    /// Consume the stored post-login redirect
    Resume,
    /// Render the order summary for a set of items
    Summary {
        /// Dish as `NAME=PRICE` or `NAME=PRICExQTY` (repeatable)
        #[arg(short, long = "item")]
        items: Vec<String>,

        /// Print the HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = ClientConfig::from_env();

    // Sentry before the subscriber so the tracing layer has a client
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bistro=info,bistro_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(Cli::parse(), &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Order {
            items,
            contact,
            method,
            address,
            requests,
        } => {
            let details = commands::order::OrderDetails {
                contact,
                method,
                address,
                requests,
            };
            commands::order::place(config, &items, details).await?;
        }
        Commands::PrivateRoom {
            name,
            email,
            date,
            time,
            message,
        } => {
            commands::booking::private_room(config, |form| {
                form.name = name;
                form.email = email;
                form.date = date;
                form.time = time;
                form.message = message;
            })
            .await?;
        }
        Commands::Event {
            name,
            email,
            event_type,
            guests,
            date,
            message,
        } => {
            commands::booking::event(config, |form| {
                form.name = name;
                form.email = email;
                form.event_type = event_type;
                form.guests = guests;
                form.date = date;
                form.message = message;
            })
            .await?;
        }
        Commands::History => commands::history::show(config).await?,
        Commands::Resume => commands::session::resume(config)?,
        Commands::Summary { items, html } => commands::order::summary(&items, html)?,
    }
    Ok(())
}
