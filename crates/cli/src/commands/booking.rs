//! Private-room bookings and event reservations.

use bistro_client::ClientConfig;
use bistro_client::forms::{EventForm, PrivateRoomForm};
use bistro_client::menu::Menu;

use super::{CommandError, Terminal};

/// Book the private dining room with the fields `fill` sets.
pub async fn private_room(
    config: &ClientConfig,
    fill: impl FnOnce(&mut PrivateRoomForm),
) -> Result<(), CommandError> {
    let terminal = Terminal::open(config, Menu::default())?;
    let page = terminal.page();
    page.toggle_private_room_panel();
    page.edit_private_room(fill);

    let outcome = page.submit_private_room().await;
    terminal.finish(&outcome)
}

/// Reserve an event with the fields `fill` sets.
pub async fn event(
    config: &ClientConfig,
    fill: impl FnOnce(&mut EventForm),
) -> Result<(), CommandError> {
    let terminal = Terminal::open(config, Menu::default())?;
    let page = terminal.page();
    page.toggle_event_panel();
    page.edit_event(fill);

    let outcome = page.submit_event().await;
    terminal.finish(&outcome)
}
