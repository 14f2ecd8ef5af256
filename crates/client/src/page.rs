//! The ordering page: menu, cart, summary panel and the three forms.
//!
//! Handlers run one at a time on a single thread, the way a browser page
//! does. Page state sits behind a `RefCell` and every handler takes `&self`,
//! so a second click while a request is out reaches the submitter and gets
//! `Busy`. No borrow is held across an await.

use std::cell::RefCell;

use bistro_core::{Cart, CartError, DeliveryMethod, DishId, Quantity};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::forms::{EventForm, OrderForm, Panel, PrivateRoomForm};
use crate::menu::{ALL_CATEGORIES, AddControl, Menu, MenuControls};
use crate::platform::Host;
use crate::resume::{redirect_to_login, resume};
use crate::submit::{FormKind, SubmitOutcome, Submitter};
use crate::summary::{self, SummaryView};
use crate::transport::Transport;

/// Page section holding the dishes.
pub const MENU_SECTION: &str = "menu";

/// Page section holding the order summary and form.
pub const ORDER_SECTION: &str = "order";

/// Errors from page handlers that change the cart.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no dish with id {0}")]
    UnknownDish(DishId),

    /// The dish's Add control is disabled because it is already ordered.
    #[error("{0} is already in the order")]
    AlreadyAdded(DishId),

    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Debug)]
struct PageState {
    controls: MenuControls,
    cart: Cart,
    summary_html: String,
    order_form: OrderForm,
    private_room: Panel<PrivateRoomForm>,
    event: Panel<EventForm>,
    category: String,
}

impl PageState {
    fn rerender(&mut self) {
        let view = SummaryView::from(&self.cart);
        self.summary_html = match summary::render(&view) {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "falling back to plain-text summary");
                view.to_text()
            }
        };
    }
}

/// Controller for the ordering page.
pub struct OrderPage<T> {
    menu: Menu,
    is_authenticated: bool,
    host: Host,
    transport: T,
    state: RefCell<PageState>,
    order: Submitter,
    private_room: Submitter,
    event: Submitter,
}

impl<T: Transport> OrderPage<T> {
    /// Build the page for `menu`. `is_authenticated` is the page's auth
    /// marker as rendered by the server.
    #[must_use]
    pub fn new(menu: Menu, host: Host, transport: T, is_authenticated: bool) -> Self {
        let mut state = PageState {
            controls: MenuControls::for_menu(&menu),
            cart: Cart::new(),
            summary_html: String::new(),
            order_form: OrderForm::default(),
            private_room: Panel::default(),
            event: Panel::default(),
            category: ALL_CATEGORIES.to_string(),
        };
        state.rerender();

        Self {
            menu,
            is_authenticated,
            host,
            transport,
            state: RefCell::new(state),
            order: Submitter::new(FormKind::Order),
            private_room: Submitter::new(FormKind::PrivateRoom),
            event: Submitter::new(FormKind::EventReservation),
        }
    }

    /// Page load: come back to where the user was before logging in and
    /// draw the summary. Returns the fragment restored, if any.
    pub fn on_load(&self) -> Option<String> {
        let restored = resume(self.host.storage.as_ref(), self.host.navigator.as_ref());
        self.state.borrow_mut().rerender();
        restored
    }

    // =========================================================================
    // Menu and cart
    // =========================================================================

    /// Replace the text in a dish's quantity field.
    pub fn set_quantity_input(&self, dish: &DishId, text: &str) -> bool {
        self.state.borrow_mut().controls.set_quantity_input(dish, text)
    }

    /// Add the dish in the quantity its card shows.
    ///
    /// An invalid quantity is reported to the user and leaves the cart as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns error if the dish is unknown or already added, or if the
    /// quantity is invalid.
    #[instrument(skip_all, fields(dish = %dish))]
    pub fn add_to_order(&self, dish: &DishId) -> Result<(), PageError> {
        let item = self
            .menu
            .get(dish)
            .ok_or_else(|| PageError::UnknownDish(dish.clone()))?;

        let added = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let control = state
                .controls
                .get(dish)
                .ok_or_else(|| PageError::UnknownDish(dish.clone()))?;
            if !control.enabled {
                debug!("add control disabled");
                return Err(PageError::AlreadyAdded(dish.clone()));
            }

            let added = Quantity::parse(&control.quantity_input)
                .and_then(|quantity| state.cart.add_quantity(&item.name, item.price, quantity));
            if added.is_ok() {
                state.controls.mark_added(dish, &item.name);
                state.rerender();
            }
            added
        };

        if let Err(e) = added {
            warn!(error = %e, "rejected add to order");
            self.host.alert(&e.to_string());
            return Err(e.into());
        }

        info!(item = %item.name, "added to order");
        self.host.navigator.scroll_to(ORDER_SECTION);
        Ok(())
    }

    /// Remove an item from the summary and restore the card it came from.
    /// Returns `false` if the item was not in the cart.
    pub fn remove_item(&self, name: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if state.cart.remove(name).is_none() {
            return false;
        }
        if state.controls.release(name).is_none() {
            debug!(item = name, "removed item had no recorded card");
        }
        state.rerender();
        true
    }

    /// Empty the cart and restore every card.
    pub fn clear_cart(&self) {
        let mut state = self.state.borrow_mut();
        state.cart.clear();
        state.controls.reset_all();
        state.rerender();
    }

    /// Show only dishes in `category` (`all` shows every dish).
    pub fn select_category(&self, category: &str) {
        let mut state = self.state.borrow_mut();
        state.controls.apply_filter(&self.menu, category);
        state.category = category.to_string();
    }

    /// "Order Now": jump to the menu, or log in first.
    pub fn order_now(&self) {
        if self.is_authenticated {
            self.host.navigator.scroll_to(MENU_SECTION);
        } else {
            redirect_to_login(
                self.host.storage.as_ref(),
                self.host.navigator.as_ref(),
                &self.host.login_url,
                "#menu",
            );
        }
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn set_delivery_method(&self, method: DeliveryMethod) {
        self.state.borrow_mut().order_form.set_method(method);
    }

    /// Edit order form fields.
    pub fn edit_order_form(&self, edit: impl FnOnce(&mut OrderForm)) {
        edit(&mut self.state.borrow_mut().order_form);
    }

    /// Edit private-room form fields.
    pub fn edit_private_room(&self, edit: impl FnOnce(&mut PrivateRoomForm)) {
        edit(&mut self.state.borrow_mut().private_room.form);
    }

    /// Edit event form fields.
    pub fn edit_event(&self, edit: impl FnOnce(&mut EventForm)) {
        edit(&mut self.state.borrow_mut().event.form);
    }

    /// Show or hide the private-room panel. Returns the new visibility.
    pub fn toggle_private_room_panel(&self) -> bool {
        self.state.borrow_mut().private_room.toggle()
    }

    /// Show or hide the event panel. Returns the new visibility.
    pub fn toggle_event_panel(&self) -> bool {
        self.state.borrow_mut().event.toggle()
    }

    /// Place the order.
    ///
    /// On success the cart is emptied, every card restored and the form
    /// cleared.
    pub async fn submit_order(&self) -> SubmitOutcome {
        let outcome = self
            .order
            .submit(&self.transport, &self.host, || {
                let state = self.state.borrow();
                state.order_form.collect(&state.cart)
            })
            .await;

        if outcome.is_success() {
            let mut state = self.state.borrow_mut();
            state.cart.clear();
            state.controls.reset_all();
            state.order_form.reset();
            state.rerender();
        }
        outcome
    }

    /// Book the private room. On success the panel is cleared and hidden.
    pub async fn submit_private_room(&self) -> SubmitOutcome {
        let outcome = self
            .private_room
            .submit(&self.transport, &self.host, || {
                Ok(self.state.borrow().private_room.form.collect())
            })
            .await;

        if outcome.is_success() {
            self.state.borrow_mut().private_room.reset();
        }
        outcome
    }

    /// Reserve the event. On success the panel is cleared and hidden.
    pub async fn submit_event(&self) -> SubmitOutcome {
        let outcome = self
            .event
            .submit(&self.transport, &self.host, || {
                Ok(self.state.borrow().event.form.collect())
            })
            .await;

        if outcome.is_success() {
            self.state.borrow_mut().event.reset();
        }
        outcome
    }

    /// Whether the form's submit trigger is enabled.
    #[must_use]
    pub fn submit_enabled(&self, kind: FormKind) -> bool {
        !self.submitter(kind).is_busy()
    }

    #[must_use]
    pub fn submitter(&self, kind: FormKind) -> &Submitter {
        match kind {
            FormKind::Order => &self.order,
            FormKind::PrivateRoom => &self.private_room,
            FormKind::EventReservation => &self.event,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[must_use]
    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().cart.clone()
    }

    /// Current summary panel HTML.
    #[must_use]
    pub fn summary_html(&self) -> String {
        self.state.borrow().summary_html.clone()
    }

    #[must_use]
    pub fn summary(&self) -> SummaryView {
        SummaryView::from(&self.state.borrow().cart)
    }

    #[must_use]
    pub fn control(&self, dish: &DishId) -> Option<AddControl> {
        self.state.borrow().controls.get(dish).cloned()
    }

    #[must_use]
    pub fn order_form(&self) -> OrderForm {
        self.state.borrow().order_form.clone()
    }

    #[must_use]
    pub fn private_room_panel(&self) -> Panel<PrivateRoomForm> {
        self.state.borrow().private_room.clone()
    }

    #[must_use]
    pub fn event_panel(&self) -> Panel<EventForm> {
        self.state.borrow().event.clone()
    }

    #[must_use]
    pub fn category(&self) -> String {
        self.state.borrow().category.clone()
    }
}

impl<T> std::fmt::Debug for OrderPage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderPage")
            .field("menu", &self.menu)
            .field("is_authenticated", &self.is_authenticated)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bistro_core::Price;
    use serde_json::json;

    use super::*;
    use crate::menu::{ADD_LABEL, ADDED_LABEL, Dish};
    use crate::platform::{Navigation, RecordingNavigator, RecordingNotifier};
    use crate::storage::{MemorySessionStorage, SessionStorage, keys};
    use crate::summary::EMPTY_PLACEHOLDER;
    use crate::transport::testing::ScriptedTransport;

    struct Fixture {
        storage: MemorySessionStorage,
        nav: RecordingNavigator,
        notifier: RecordingNotifier,
        transport: ScriptedTransport,
        page: OrderPage<ScriptedTransport>,
    }

    fn menu() -> Menu {
        Menu::new(vec![
            Dish {
                id: DishId::new("margherita"),
                name: "Margherita".into(),
                price: Price::parse("$12.50").unwrap(),
                category: "pizza".into(),
            },
            Dish {
                id: DishId::new("tiramisu"),
                name: "Tiramisu".into(),
                price: Price::parse("$6.00").unwrap(),
                category: "dessert".into(),
            },
        ])
    }

    fn fixture(is_authenticated: bool) -> Fixture {
        let storage = MemorySessionStorage::new();
        let nav = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let transport = ScriptedTransport::new();
        let host = Host::new(storage.clone(), nav.clone(), notifier.clone(), "/otp_login");
        let page = OrderPage::new(menu(), host, transport.clone(), is_authenticated);
        Fixture {
            storage,
            nav,
            notifier,
            transport,
            page,
        }
    }

    fn pizza() -> DishId {
        DishId::new("margherita")
    }

    fn dessert() -> DishId {
        DishId::new("tiramisu")
    }

    #[test]
    fn test_fresh_page_shows_empty_summary() {
        let f = fixture(true);
        assert!(f.page.summary_html().contains(EMPTY_PLACEHOLDER));
        assert!(f.page.summary_html().contains("Total: $0.00"));
        assert!(f.page.submit_enabled(FormKind::Order));
    }

    #[test]
    fn test_add_to_order_updates_everything() {
        let f = fixture(true);
        f.page.set_quantity_input(&pizza(), "2");
        f.page.add_to_order(&pizza()).unwrap();

        assert_eq!(f.page.cart().get("Margherita").unwrap().quantity, 2);
        let control = f.page.control(&pizza()).unwrap();
        assert!(!control.enabled);
        assert_eq!(control.label, ADDED_LABEL);
        assert!(f.page.summary_html().contains("Total: $25.00"));
        assert_eq!(
            f.nav.history(),
            vec![Navigation::ScrollTo(ORDER_SECTION.to_string())]
        );
    }

    #[test]
    fn test_invalid_quantity_alerts_and_leaves_cart() {
        let f = fixture(true);
        f.page.set_quantity_input(&pizza(), "0");

        assert!(matches!(
            f.page.add_to_order(&pizza()),
            Err(PageError::Cart(CartError::InvalidQuantity))
        ));
        assert!(f.page.cart().is_empty());
        assert!(f.page.control(&pizza()).unwrap().enabled);
        assert_eq!(
            f.notifier.last_alert().as_deref(),
            Some("Please enter a valid quantity.")
        );
    }

    #[test]
    fn test_total_overflow_alerts_and_leaves_cart() {
        let notifier = RecordingNotifier::new();
        let host = Host::new(
            MemorySessionStorage::new(),
            RecordingNavigator::new(),
            notifier.clone(),
            "/otp_login",
        );
        let truffle = DishId::new("truffle");
        let menu = Menu::new(vec![Dish {
            id: truffle.clone(),
            name: "Truffle".into(),
            price: Price::parse("79228162514264337593543950335").unwrap(),
            category: "special".into(),
        }]);
        let page = OrderPage::new(menu, host, ScriptedTransport::new(), true);
        page.set_quantity_input(&truffle, "2");

        assert!(matches!(
            page.add_to_order(&truffle),
            Err(PageError::Cart(CartError::TotalOverflow(_)))
        ));
        assert!(page.cart().is_empty());
        assert!(page.control(&truffle).unwrap().enabled);
        assert!(page.summary_html().contains(EMPTY_PLACEHOLDER));
        assert_eq!(
            notifier.last_alert().as_deref(),
            Some("adding Truffle makes the order total too large")
        );
    }

    #[test]
    fn test_added_dish_cannot_be_added_again() {
        let f = fixture(true);
        f.page.add_to_order(&pizza()).unwrap();
        assert!(matches!(
            f.page.add_to_order(&pizza()),
            Err(PageError::AlreadyAdded(_))
        ));
        assert!(matches!(
            f.page.add_to_order(&DishId::new("calzone")),
            Err(PageError::UnknownDish(_))
        ));
        assert_eq!(f.page.cart().get("Margherita").unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_restores_origin_card_only() {
        let f = fixture(true);
        f.page.set_quantity_input(&pizza(), "3");
        f.page.add_to_order(&pizza()).unwrap();
        f.page.add_to_order(&dessert()).unwrap();

        assert!(f.page.remove_item("Margherita"));
        let restored = f.page.control(&pizza()).unwrap();
        assert!(restored.enabled);
        assert_eq!(restored.label, ADD_LABEL);
        assert_eq!(restored.quantity_input, "1");
        assert!(!f.page.control(&dessert()).unwrap().enabled);
        assert!(!f.page.summary_html().contains("Margherita"));

        assert!(!f.page.remove_item("Margherita"));
    }

    #[test]
    fn test_clear_cart_resets_cards() {
        let f = fixture(true);
        f.page.add_to_order(&pizza()).unwrap();
        f.page.add_to_order(&dessert()).unwrap();
        f.page.clear_cart();

        assert!(f.page.cart().is_empty());
        assert!(f.page.control(&pizza()).unwrap().enabled);
        assert!(f.page.control(&dessert()).unwrap().enabled);
        assert!(f.page.summary_html().contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn test_category_filter() {
        let f = fixture(true);
        f.page.select_category("pizza");
        assert_eq!(f.page.category(), "pizza");
        assert!(f.page.control(&pizza()).unwrap().visible);
        assert!(!f.page.control(&dessert()).unwrap().visible);

        f.page.select_category(ALL_CATEGORIES);
        assert!(f.page.control(&dessert()).unwrap().visible);
    }

    #[test]
    fn test_order_now_when_signed_in_scrolls() {
        let f = fixture(true);
        f.page.order_now();
        assert_eq!(
            f.nav.history(),
            vec![Navigation::ScrollTo(MENU_SECTION.to_string())]
        );
    }

    #[test]
    fn test_order_now_when_signed_out_goes_to_login() {
        let f = fixture(false);
        f.page.order_now();
        assert_eq!(
            f.storage.get(keys::REDIRECT_AFTER_LOGIN).as_deref(),
            Some("#menu")
        );
        assert_eq!(f.nav.last_navigation().as_deref(), Some("/otp_login"));
    }

    #[test]
    fn test_on_load_resumes_and_consumes_target() {
        let f = fixture(true);
        f.storage.set(keys::REDIRECT_AFTER_LOGIN, "/#order").unwrap();

        assert_eq!(f.page.on_load().as_deref(), Some("order"));
        assert_eq!(f.nav.hash().as_deref(), Some("order"));
        assert!(f.page.on_load().is_none());
    }

    #[test]
    fn test_delivery_method_toggles_address_panel() {
        let f = fixture(true);
        f.page.set_delivery_method(DeliveryMethod::Delivery);
        f.page.edit_order_form(|form| form.address = "1 Main St".into());
        assert!(f.page.order_form().address_visible);

        f.page.set_delivery_method(DeliveryMethod::Pickup);
        let form = f.page.order_form();
        assert!(!form.address_visible);
        assert!(form.address.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_order_is_rejected_without_request() {
        let f = fixture(true);
        let outcome = f.page.submit_order().await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(f.transport.requests().is_empty());
        assert_eq!(
            f.notifier.last_alert().as_deref(),
            Some("Please add items to your order.")
        );
    }

    #[tokio::test]
    async fn test_successful_order_resets_page() {
        let f = fixture(true);
        f.transport.respond(200, json!({"success": true, "order_id": 42}));
        f.page.set_quantity_input(&pizza(), "2");
        f.page.add_to_order(&pizza()).unwrap();
        f.page.set_delivery_method(DeliveryMethod::Delivery);
        f.page.edit_order_form(|form| {
            form.name = "Ada".into();
            form.address = "1 Main St".into();
        });

        let outcome = f.page.submit_order().await;

        assert!(outcome.is_success());
        assert_eq!(
            f.notifier.last_alert().as_deref(),
            Some("✅ Order confirmed! ID: 42")
        );
        let body = f.transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["delivery"]["method"], "delivery");
        assert_eq!(body["delivery"]["address"], "1 Main St");
        assert_eq!(body["items"][0]["quantity"], 2);
        assert_eq!(body["total"], 25.0);

        assert!(f.page.cart().is_empty());
        assert!(f.page.control(&pizza()).unwrap().enabled);
        assert_eq!(f.page.order_form(), OrderForm::default());
        assert!(f.page.summary_html().contains(EMPTY_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_failed_order_keeps_form_and_cart() {
        let f = fixture(true);
        f.transport.respond(400, json!({"error": "Kitchen closed"}));
        f.page.add_to_order(&pizza()).unwrap();
        f.page.edit_order_form(|form| form.name = "Ada".into());

        let outcome = f.page.submit_order().await;

        assert_eq!(outcome, SubmitOutcome::Failed("⚠️ Kitchen closed".into()));
        assert_eq!(f.page.cart().len(), 1);
        assert_eq!(f.page.order_form().name, "Ada");
    }

    #[tokio::test]
    async fn test_order_login_required_parks_cart_snapshot() {
        let f = fixture(false);
        f.transport.respond(401, json!({"login_required": true}));
        f.page.add_to_order(&dessert()).unwrap();

        assert_eq!(f.page.submit_order().await, SubmitOutcome::LoginRequired);

        let parked: serde_json::Value =
            serde_json::from_str(&f.storage.get(keys::PENDING_ORDER).unwrap()).unwrap();
        assert_eq!(parked["items"][0]["name"], "Tiramisu");
        assert_eq!(
            f.storage.get(keys::REDIRECT_AFTER_LOGIN).as_deref(),
            Some("#order")
        );
        assert_eq!(f.page.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_double_submit_sends_one_request() {
        let f = fixture(true);
        f.transport.respond(200, json!({"success": true, "order_id": "A1"}));
        f.page.add_to_order(&pizza()).unwrap();

        let (first, second) = tokio::join!(f.page.submit_order(), f.page.submit_order());

        assert!(first.is_success());
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(f.transport.requests().len(), 1);
        assert!(f.page.submit_enabled(FormKind::Order));
    }

    #[tokio::test]
    async fn test_private_room_success_hides_panel() {
        let f = fixture(true);
        f.transport.respond(200, json!({"success": true}));
        assert!(f.page.toggle_private_room_panel());
        f.page.edit_private_room(|form| {
            form.name = " Ada ".into();
            form.time = "19:00".into();
        });

        let outcome = f.page.submit_private_room().await;

        assert!(outcome.is_success());
        assert_eq!(f.transport.requests()[0].body.as_ref().unwrap()["name"], "Ada");
        assert_eq!(f.page.private_room_panel(), Panel::default());
        assert_eq!(
            f.notifier.last_alert().as_deref(),
            Some("✅ Private room booked!")
        );
    }

    #[tokio::test]
    async fn test_event_network_error_keeps_panel() {
        let f = fixture(true);
        f.page.toggle_event_panel();
        f.page.edit_event(|form| form.guests = "40".into());

        let outcome = f.page.submit_event().await;

        assert_eq!(outcome, SubmitOutcome::Failed("⚠️ Network error.".into()));
        let panel = f.page.event_panel();
        assert!(panel.visible);
        assert_eq!(panel.form.guests, "40");
    }
}
