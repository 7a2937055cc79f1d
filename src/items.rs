//! Items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised while building or customising a menu item.
#[derive(Debug, Error, PartialEq)]
pub enum MenuItemError {
    /// The item name was empty or only whitespace.
    #[error("menu item name must not be empty")]
    EmptyName,

    /// The item price was below zero (item name, price in minor units).
    #[error("menu item {0} has a negative price ({1} minor units)")]
    NegativePrice(String, i64),

    /// An attribute value was not finite, or was negative where that is not allowed.
    #[error("invalid value {value} for {attribute}")]
    InvalidAttribute {
        /// Attribute being set
        attribute: &'static str,
        /// Rejected value
        value: f64,
    },

    /// The attribute does not exist on this kind of item.
    #[error("{attribute} cannot be set on {category} item {name}")]
    WrongKind {
        /// Attribute being set
        attribute: &'static str,
        /// Category of the item
        category: Category,
        /// Item name
        name: String,
    },
}

/// The category an item counts towards when discounts are worked out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Drinks
    Beverage,

    /// Starters and snacks
    Appetizer,

    /// Mains
    MainCourse,

    /// Anything that belongs to none of the above.
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Beverage => "beverage",
            Category::Appetizer => "appetizer",
            Category::MainCourse => "main course",
            Category::Other => "other",
        })
    }
}

/// Variant-specific attributes of a menu item.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ItemKind {
    /// A drink, served at some temperature and optionally sugared.
    Beverage {
        /// Serving temperature
        temperature: f64,
        /// Whether sugar was requested
        is_sugared: bool,
    },

    /// A starter.
    Appetizer {
        /// Energy content, never negative
        calories: f64,
    },

    /// A main dish.
    MainCourse {
        /// Whether the vegetarian option was requested
        is_vegetarian: bool,
        /// Preparation time, never negative
        prep_time: f64,
    },

    /// A plain item with no extra attributes.
    Other,
}

impl ItemKind {
    /// Beverage with default attributes.
    pub const BEVERAGE: ItemKind = ItemKind::Beverage {
        temperature: 0.0,
        is_sugared: false,
    };

    /// Appetizer with default attributes.
    pub const APPETIZER: ItemKind = ItemKind::Appetizer { calories: 0.0 };

    /// Main course with default attributes.
    pub const MAIN_COURSE: ItemKind = ItemKind::MainCourse {
        is_vegetarian: false,
        prep_time: 0.0,
    };

    /// Returns the discount category of this kind.
    pub fn category(&self) -> Category {
        match self {
            ItemKind::Beverage { .. } => Category::Beverage,
            ItemKind::Appetizer { .. } => Category::Appetizer,
            ItemKind::MainCourse { .. } => Category::MainCourse,
            ItemKind::Other => Category::Other,
        }
    }
}

/// A catalog entry with a name, a price and variant-specific attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem<'a> {
    name: String,
    price: Money<'a, Currency>,
    kind: ItemKind,
}

impl<'a> MenuItem<'a> {
    /// Creates a new item of the given kind.
    ///
    /// # Errors
    ///
    /// - [`MenuItemError::EmptyName`]: the name is blank.
    /// - [`MenuItemError::NegativePrice`]: the price is below zero.
    pub fn new(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        kind: ItemKind,
    ) -> Result<Self, MenuItemError> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(MenuItemError::EmptyName);
        }

        let minor = price.to_minor_units();

        if minor < 0 {
            return Err(MenuItemError::NegativePrice(name, minor));
        }

        Ok(Self { name, price, kind })
    }

    /// Creates a beverage with default temperature and no sugar.
    ///
    /// # Errors
    ///
    /// See [`MenuItem::new`].
    pub fn beverage(
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, MenuItemError> {
        Self::new(name, price, ItemKind::BEVERAGE)
    }

    /// Creates an appetizer with zero calories.
    ///
    /// # Errors
    ///
    /// See [`MenuItem::new`].
    pub fn appetizer(
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, MenuItemError> {
        Self::new(name, price, ItemKind::APPETIZER)
    }

    /// Creates a non-vegetarian main course with zero prep time.
    ///
    /// # Errors
    ///
    /// See [`MenuItem::new`].
    pub fn main_course(
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, MenuItemError> {
        Self::new(name, price, ItemKind::MAIN_COURSE)
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of the item.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the variant attributes.
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Returns the discount category.
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Sets the serving temperature of a beverage.
    ///
    /// # Errors
    ///
    /// Returns [`MenuItemError::WrongKind`] for anything but a beverage, or
    /// [`MenuItemError::InvalidAttribute`] when the value is not finite.
    pub fn set_temperature(&mut self, value: f64) -> Result<(), MenuItemError> {
        let value = finite("temperature", value)?;
        let ItemKind::Beverage { temperature, .. } = &mut self.kind else {
            return Err(self.wrong_kind("temperature"));
        };

        *temperature = value;

        Ok(())
    }

    /// Sets the sugar preference of a beverage.
    ///
    /// # Errors
    ///
    /// Returns [`MenuItemError::WrongKind`] for anything but a beverage.
    pub fn set_sugared(&mut self, value: bool) -> Result<(), MenuItemError> {
        let ItemKind::Beverage { is_sugared, .. } = &mut self.kind else {
            return Err(self.wrong_kind("sugar"));
        };

        *is_sugared = value;

        Ok(())
    }

    /// Sets the calories of an appetizer.
    ///
    /// # Errors
    ///
    /// Returns [`MenuItemError::WrongKind`] for anything but an appetizer, or
    /// [`MenuItemError::InvalidAttribute`] for negative or non-finite values.
    pub fn set_calories(&mut self, value: f64) -> Result<(), MenuItemError> {
        let value = non_negative("calories", value)?;
        let ItemKind::Appetizer { calories } = &mut self.kind else {
            return Err(self.wrong_kind("calories"));
        };

        *calories = value;

        Ok(())
    }

    /// Sets the vegetarian preference of a main course.
    ///
    /// # Errors
    ///
    /// Returns [`MenuItemError::WrongKind`] for anything but a main course.
    pub fn set_vegetarian(&mut self, value: bool) -> Result<(), MenuItemError> {
        let ItemKind::MainCourse { is_vegetarian, .. } = &mut self.kind else {
            return Err(self.wrong_kind("vegetarian"));
        };

        *is_vegetarian = value;

        Ok(())
    }

    /// Sets the preparation time of a main course.
    ///
    /// # Errors
    ///
    /// Returns [`MenuItemError::WrongKind`] for anything but a main course, or
    /// [`MenuItemError::InvalidAttribute`] for negative or non-finite values.
    pub fn set_prep_time(&mut self, value: f64) -> Result<(), MenuItemError> {
        let value = non_negative("prep time", value)?;
        let ItemKind::MainCourse { prep_time, .. } = &mut self.kind else {
            return Err(self.wrong_kind("prep time"));
        };

        *prep_time = value;

        Ok(())
    }

    fn wrong_kind(&self, attribute: &'static str) -> MenuItemError {
        MenuItemError::WrongKind {
            attribute,
            category: self.category(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for MenuItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.price)
    }
}

fn finite(attribute: &'static str, value: f64) -> Result<f64, MenuItemError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MenuItemError::InvalidAttribute { attribute, value })
    }
}

fn non_negative(attribute: &'static str, value: f64) -> Result<f64, MenuItemError> {
    let value = finite(attribute, value)?;

    if value < 0.0 {
        return Err(MenuItemError::InvalidAttribute { attribute, value });
    }

    Ok(value)
}
