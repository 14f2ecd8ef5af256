//! Subcommand implementations and the page setup they share.

pub mod booking;
pub mod history;
pub mod order;
pub mod session;

use bistro_client::history::HistoryError;
use bistro_client::menu::Menu;
use bistro_client::platform::{Host, RecordingNavigator, RecordingNotifier};
use bistro_client::storage::{FileSessionStorage, StorageError};
use bistro_client::summary::RenderError;
use bistro_client::transport::{HttpTransport, TransportError};
use bistro_client::{ClientConfig, OrderPage, PageError, SubmitOutcome};
use bistro_core::{CartError, PriceError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `--item` value not in `NAME=PRICE[xQTY]` form.
    #[error("Invalid item {0:?}: expected NAME=PRICE or NAME=PRICExQTY")]
    InvalidItem(String),

    #[error("Invalid price in {0:?}: {1}")]
    InvalidPrice(String, PriceError),

    #[error("Invalid delivery method: {0}. Valid methods: pickup, delivery")]
    InvalidMethod(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The server or the form refused the submission.
    #[error("Submission not accepted: {0}")]
    NotAccepted(String),
}

/// An ordering page wired to the terminal.
///
/// Alerts are collected and printed; a navigation to the login page is
/// reported as instructions.
pub struct Terminal {
    page: OrderPage<HttpTransport>,
    navigator: RecordingNavigator,
    notifier: RecordingNotifier,
}

impl Terminal {
    /// Open the page for `menu` with session storage from `config`.
    ///
    /// The page counts as signed in when a session cookie is configured.
    pub fn open(config: &ClientConfig, menu: Menu) -> Result<Self, CommandError> {
        let storage = FileSessionStorage::open(config.session_file.clone())?;
        let transport = HttpTransport::new(config)?;
        let navigator = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let host = Host::new(
            storage,
            navigator.clone(),
            notifier.clone(),
            config.login_url(),
        );
        let page = OrderPage::new(menu, host, transport, config.session_cookie.is_some());

        Ok(Self {
            page,
            navigator,
            notifier,
        })
    }

    pub const fn page(&self) -> &OrderPage<HttpTransport> {
        &self.page
    }

    /// Print and drain the alerts shown so far.
    #[allow(clippy::print_stdout)]
    pub fn flush_alerts(&self) {
        for alert in self.notifier.take() {
            println!("{alert}");
        }
    }

    /// Report a submit outcome to the user.
    ///
    /// A login redirect is not an error: the body is parked in the session
    /// file and the user is told where to log in.
    #[allow(clippy::print_stdout)]
    pub fn finish(&self, outcome: &SubmitOutcome) -> Result<(), CommandError> {
        self.flush_alerts();
        match outcome {
            SubmitOutcome::Succeeded(_) => Ok(()),
            SubmitOutcome::LoginRequired => {
                if let Some(url) = self.navigator.last_navigation() {
                    println!("Login required. Log in at {url}, set BISTRO_SESSION_COOKIE,");
                    println!("then run `bistro resume` and submit again.");
                }
                Ok(())
            }
            SubmitOutcome::Failed(message) | SubmitOutcome::Rejected(message) => {
                Err(CommandError::NotAccepted(message.clone()))
            }
            SubmitOutcome::Busy => Err(CommandError::NotAccepted(
                "a submission is already in progress".to_string(),
            )),
        }
    }
}
