//! Menu

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::items::{ItemKind, MenuItem, MenuItemError};

new_key_type! {
    /// Menu Item Key
    pub struct MenuItemKey;
}

/// Errors raised while building a menu.
#[derive(Debug, Error, PartialEq)]
pub enum MenuError {
    /// An entry of the catalog was invalid.
    #[error(transparent)]
    Item(#[from] MenuItemError),

    /// Two entries share a name (names are compared case-insensitively).
    #[error("duplicate menu item name: {0}")]
    DuplicateName(String),

    /// An item's currency differs from the menu currency (item name, item currency, menu currency).
    #[error("Item {0} has currency {1}, but menu has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// The built-in catalog: name, price in cents, kind.
const STANDARD_CATALOG: [(&str, i64, ItemKind); 12] = [
    ("Soda", 2_00, ItemKind::BEVERAGE),
    ("Tea", 3_00, ItemKind::BEVERAGE),
    ("Coffee", 5_00, ItemKind::BEVERAGE),
    ("Juice", 4_00, ItemKind::BEVERAGE),
    ("Water", 4_00, ItemKind::BEVERAGE),
    ("Fruit", 2_00, ItemKind::APPETIZER),
    ("Cookies", 4_00, ItemKind::APPETIZER),
    ("Popcorn", 4_00, ItemKind::APPETIZER),
    ("Pizza", 10_00, ItemKind::MAIN_COURSE),
    ("Burger", 12_00, ItemKind::MAIN_COURSE),
    ("Spaghetti", 14_00, ItemKind::MAIN_COURSE),
    ("Salad", 8_00, ItemKind::MAIN_COURSE),
];

/// An ordered catalog of menu items with case-insensitive name lookup.
#[derive(Debug, Clone)]
pub struct Menu<'a> {
    items: SlotMap<MenuItemKey, MenuItem<'a>>,
    names: FxHashMap<String, MenuItemKey>,
    currency: &'static Currency,
}

impl Menu<'static> {
    /// The restaurant's fixed twelve-item catalog, priced in USD.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in catalog itself is invalid.
    pub fn standard() -> Result<Self, MenuError> {
        let items = STANDARD_CATALOG
            .into_iter()
            .map(|(name, cents, kind)| {
                MenuItem::new(name, Money::from_minor(cents, iso::USD), kind)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_items(items, iso::USD)
    }
}

impl<'a> Menu<'a> {
    /// Build a menu from the given items, keeping their order.
    ///
    /// # Errors
    ///
    /// - [`MenuError::DuplicateName`]: two items have the same name, ignoring case.
    /// - [`MenuError::CurrencyMismatch`]: an item is not priced in `currency`.
    pub fn with_items(
        items: impl IntoIterator<Item = MenuItem<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, MenuError> {
        let mut menu = Menu {
            items: SlotMap::with_key(),
            names: FxHashMap::default(),
            currency,
        };

        for item in items {
            let item_currency = item.price().currency();

            if item_currency != currency {
                return Err(MenuError::CurrencyMismatch(
                    item.name().to_string(),
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            let normalized = normalize(item.name());

            if menu.names.contains_key(&normalized) {
                return Err(MenuError::DuplicateName(item.name().to_string()));
            }

            let key = menu.items.insert(item);
            menu.names.insert(normalized, key);
        }

        Ok(menu)
    }

    /// Find an item by name, ignoring case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Option<(MenuItemKey, &MenuItem<'a>)> {
        let key = *self.names.get(&normalize(name))?;

        self.items.get(key).map(|item| (key, item))
    }

    /// Get an item by key.
    pub fn get(&self, key: MenuItemKey) -> Option<&MenuItem<'a>> {
        self.items.get(key)
    }

    /// Get an item by key, mutably, so its variant attributes can be set.
    pub fn item_mut(&mut self, key: MenuItemKey) -> Option<&mut MenuItem<'a>> {
        self.items.get_mut(key)
    }

    /// Iterate the catalog in order.
    pub fn iter(&self) -> impl Iterator<Item = (MenuItemKey, &MenuItem<'a>)> {
        self.items.iter()
    }

    /// Number of items on the menu.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the menu is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency every price on the menu is in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
