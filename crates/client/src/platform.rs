//! Page-level collaborators: navigation and blocking user messages.
//!
//! A browser host implements these over `window.location` and `alert`. The
//! recording implementations below serve headless hosts (the CLI, tests):
//! they remember what the page asked for so the caller can act on it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::storage::SessionStorage;

/// Moves the user around the site.
pub trait Navigator {
    /// Leave the page for `url`.
    fn navigate(&self, url: &str);

    /// Set the page's location fragment (without the `#`).
    fn set_hash(&self, fragment: &str);

    /// Scroll the section with id `section` into view.
    fn scroll_to(&self, section: &str);
}

/// Shows blocking feedback to the user.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// One navigation request made by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Navigate(String),
    SetHash(String),
    ScrollTo(String),
}

/// Navigator that records every request. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    log: Rc<RefCell<Vec<Navigation>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Navigation> {
        self.log.borrow().clone()
    }

    /// The last page the user was sent away to, if any.
    #[must_use]
    pub fn last_navigation(&self) -> Option<String> {
        self.log.borrow().iter().rev().find_map(|n| match n {
            Navigation::Navigate(url) => Some(url.clone()),
            _ => None,
        })
    }

    /// The current location fragment, if one was set.
    #[must_use]
    pub fn hash(&self) -> Option<String> {
        self.log.borrow().iter().rev().find_map(|n| match n {
            Navigation::SetHash(fragment) => Some(fragment.clone()),
            _ => None,
        })
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        tracing::debug!(url, "navigate");
        self.log.borrow_mut().push(Navigation::Navigate(url.to_owned()));
    }

    fn set_hash(&self, fragment: &str) {
        tracing::debug!(fragment, "set location hash");
        self.log
            .borrow_mut()
            .push(Navigation::SetHash(fragment.to_owned()));
    }

    fn scroll_to(&self, section: &str) {
        self.log
            .borrow_mut()
            .push(Navigation::ScrollTo(section.to_owned()));
    }
}

/// Notifier that records alerts. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    #[must_use]
    pub fn last_alert(&self) -> Option<String> {
        self.alerts.borrow().last().cloned()
    }

    /// Drain the recorded alerts.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        tracing::info!(message, "alert");
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

/// Everything the page needs from its surroundings.
pub struct Host {
    pub storage: Box<dyn SessionStorage>,
    pub navigator: Box<dyn Navigator>,
    pub notifier: Box<dyn Notifier>,
    /// Where to send the user when the server asks for a login.
    pub login_url: String,
}

impl Host {
    #[must_use]
    pub fn new(
        storage: impl SessionStorage + 'static,
        navigator: impl Navigator + 'static,
        notifier: impl Notifier + 'static,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            navigator: Box::new(navigator),
            notifier: Box::new(notifier),
            login_url: login_url.into(),
        }
    }

    /// Show `message` to the user.
    pub fn alert(&self, message: &str) {
        self.notifier.alert(message);
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}
