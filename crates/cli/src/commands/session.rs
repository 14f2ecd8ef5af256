//! Post-login resume.

use bistro_client::ClientConfig;
use bistro_client::platform::RecordingNavigator;
use bistro_client::storage::{FileSessionStorage, SessionStorage, keys};
use tracing::info;

use super::CommandError;

/// Consume the stored redirect target and report where the page resumes.
///
/// Parked submissions stay in the session file untouched.
#[allow(clippy::print_stdout)]
pub fn resume(config: &ClientConfig) -> Result<(), CommandError> {
    let storage = FileSessionStorage::open(config.session_file.clone())?;
    let navigator = RecordingNavigator::new();

    match bistro_client::resume::resume(&storage, &navigator) {
        Some(fragment) if !fragment.is_empty() => println!("Resuming at #{fragment}"),
        Some(_) => println!("Resuming at the top of the page"),
        None => println!("Nothing to resume"),
    }

    for key in [keys::PENDING_ORDER, keys::PENDING_PRIVATE_ROOM, keys::PENDING_EVENT] {
        if storage.get(key).is_some() {
            info!(key, "parked submission kept, submit again to send it");
        }
    }
    Ok(())
}
