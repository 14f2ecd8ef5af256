//! Carrying the user's place across the login redirect.
//!
//! Before sending the user to log in, the page stores where they were
//! (`redirectAfterLogin`). On the next load [`resume`] consumes that value and
//! moves the page back to the section.
//!
//! Pending payloads stored next to it are written but never read here:
//! replaying a submission after login is an open product decision.

use tracing::{error, info};

use crate::platform::Navigator;
use crate::storage::{SessionStorage, keys};

/// Remember `fragment` (e.g. `#order`) and leave for `login_url`.
///
/// A storage failure is logged and the redirect still happens.
pub fn redirect_to_login(
    storage: &dyn SessionStorage,
    navigator: &dyn Navigator,
    login_url: &str,
    fragment: &str,
) {
    if let Err(e) = storage.set(keys::REDIRECT_AFTER_LOGIN, fragment) {
        error!(error = %e, fragment, "failed to store redirect target");
    }
    info!(fragment, login_url, "login required, redirecting");
    navigator.navigate(login_url);
}

/// Consume the stored redirect target and restore the page position.
///
/// Accepts both `#menu` and `/#menu`. Returns the fragment applied, if any.
pub fn resume(storage: &dyn SessionStorage, navigator: &dyn Navigator) -> Option<String> {
    let target = storage.get(keys::REDIRECT_AFTER_LOGIN)?;
    if let Err(e) = storage.remove(keys::REDIRECT_AFTER_LOGIN) {
        error!(error = %e, "failed to clear redirect target");
    }

    let fragment = target
        .split_once('#')
        .map_or("", |(_, fragment)| fragment)
        .to_string();
    info!(fragment = %fragment, "resuming after login");
    navigator.set_hash(&fragment);
    Some(fragment)
}
