//! Menu dishes and the state of their "Add" controls.
//!
//! Each dish card carries an Add button and a quantity field. Once a dish is
//! in the cart its button is disabled and relabelled; removing the item must
//! restore exactly that card. [`MenuControls`] keeps the item → card link
//! recorded when the item was added, so removal never has to search cards by
//! their visible text.

use std::collections::{BTreeMap, HashMap};

use bistro_core::{DishId, Price};

/// Category chip that shows every dish.
pub const ALL_CATEGORIES: &str = "all";

/// Label of an Add button that can be used.
pub const ADD_LABEL: &str = "Add";

/// Label of an Add button whose dish is in the cart.
pub const ADDED_LABEL: &str = "✔ Added";

/// A dish on the menu page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub price: Price,
    pub category: String,
}

impl Dish {
    /// Whether the dish shows under `category`.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category == category
    }
}

/// The dishes shown on the page, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    dishes: Vec<Dish>,
}

impl Menu {
    #[must_use]
    pub const fn new(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    #[must_use]
    pub fn get(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| &d.id == id)
    }

    #[must_use]
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    /// Dishes visible under `category`.
    pub fn visible<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Dish> + 'a {
        self.dishes.iter().filter(move |d| d.in_category(category))
    }
}

/// Controls on one dish card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddControl {
    pub enabled: bool,
    pub label: &'static str,
    /// Raw text of the quantity field.
    pub quantity_input: String,
    /// Whether the card passes the current category filter.
    pub visible: bool,
}

impl Default for AddControl {
    fn default() -> Self {
        Self {
            enabled: true,
            label: ADD_LABEL,
            quantity_input: "1".to_string(),
            visible: true,
        }
    }
}

impl AddControl {
    fn reset(&mut self) {
        self.enabled = true;
        self.label = ADD_LABEL;
        self.quantity_input = "1".to_string();
    }

    fn mark_added(&mut self) {
        self.enabled = false;
        self.label = ADDED_LABEL;
    }
}

/// Control state for every card plus the item → card links.
#[derive(Debug, Clone, Default)]
pub struct MenuControls {
    controls: BTreeMap<DishId, AddControl>,
    origins: HashMap<String, DishId>,
}

impl MenuControls {
    /// Fresh controls for every dish on `menu`.
    #[must_use]
    pub fn for_menu(menu: &Menu) -> Self {
        Self {
            controls: menu
                .dishes()
                .iter()
                .map(|d| (d.id.clone(), AddControl::default()))
                .collect(),
            origins: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &DishId) -> Option<&AddControl> {
        self.controls.get(id)
    }

    /// Replace the text of a card's quantity field. Returns `false` for an
    /// unknown card.
    pub fn set_quantity_input(&mut self, id: &DishId, text: &str) -> bool {
        self.controls
            .get_mut(id)
            .map(|c| c.quantity_input = text.to_string())
            .is_some()
    }

    /// Disable the card's button and remember it as the origin of `item_name`.
    pub fn mark_added(&mut self, id: &DishId, item_name: &str) {
        if let Some(control) = self.controls.get_mut(id) {
            control.mark_added();
            self.origins.insert(item_name.to_string(), id.clone());
        }
    }

    /// Restore the card `item_name` was added from. Returns that card's id.
    pub fn release(&mut self, item_name: &str) -> Option<DishId> {
        let id = self.origins.remove(item_name)?;
        if let Some(control) = self.controls.get_mut(&id) {
            control.reset();
        }
        Some(id)
    }

    /// Restore every card and forget all links.
    pub fn reset_all(&mut self) {
        self.origins.clear();
        self.controls.values_mut().for_each(AddControl::reset);
    }

    /// Show only cards in `category`.
    pub fn apply_filter(&mut self, menu: &Menu, category: &str) {
        for dish in menu.dishes() {
            if let Some(control) = self.controls.get_mut(&dish.id) {
                control.visible = dish.in_category(category);
            }
        }
    }

    /// The card `item_name` was added from, if it is still in the cart.
    #[must_use]
    pub fn origin_of(&self, item_name: &str) -> Option<&DishId> {
        self.origins.get(item_name)
    }
}
