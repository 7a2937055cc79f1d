//! Order

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    discounts::{CategoryCounts, DiscountBreakdown, DiscountPolicy},
    items::MenuItem,
    menu::{Menu, MenuItemKey},
    pricing::{TotalPriceError, apply_discount, total_price},
};

/// Errors raised while building or pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// The requested name is not on the menu. The order is left unchanged.
    #[error("Item '{0}' is not in the menu.")]
    ItemNotFound(String),

    /// Errors bubbled up from price calculation.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// A spend threshold of the discount policy is not in the menu currency.
    #[error("Discount threshold {0} is in {1}, but the menu is priced in {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Items selected from a menu, in the order they were added.
///
/// Items can only be appended; the same item may appear several times.
#[derive(Debug, Clone)]
pub struct Order<'m, 'a> {
    menu: &'m Menu<'a>,
    policy: DiscountPolicy<'a>,
    items: Vec<MenuItemKey>,
}

impl<'m, 'a> Order<'m, 'a> {
    /// Create an empty order priced with the house discount rules.
    pub fn new(menu: &'m Menu<'a>) -> Self {
        Self {
            menu,
            policy: DiscountPolicy::standard(menu.currency()),
            items: Vec::new(),
        }
    }

    /// Create an empty order priced with the given discount rules.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CurrencyMismatch`] if any spend threshold of
    /// `policy` is in a different currency from the menu.
    pub fn with_policy(
        menu: &'m Menu<'a>,
        policy: DiscountPolicy<'a>,
    ) -> Result<Self, OrderError> {
        if let Some(tier) = policy.mismatched_tier(menu.currency()) {
            return Err(OrderError::CurrencyMismatch(
                tier.threshold().to_string(),
                tier.threshold().currency().iso_alpha_code,
                menu.currency().iso_alpha_code,
            ));
        }

        Ok(Self {
            menu,
            policy,
            items: Vec::new(),
        })
    }

    /// Look up `name` on the menu and append it to the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::ItemNotFound`] if the menu has no such item; the
    /// order is not modified and more items can still be added.
    pub fn add_item(&mut self, name: &str) -> Result<MenuItemKey, OrderError> {
        let Some((key, item)) = self.menu.lookup(name) else {
            warn!(name, "item not in menu");

            return Err(OrderError::ItemNotFound(name.to_string()));
        };

        self.items.push(key);

        debug!(item = item.name(), count = self.items.len(), "added item to order");

        Ok(key)
    }

    /// Keys of the ordered items, in order.
    pub fn items(&self) -> &[MenuItemKey] {
        &self.items
    }

    /// The ordered items, in order.
    pub fn menu_items(&self) -> impl Iterator<Item = &'m MenuItem<'a>> + '_ {
        let menu = self.menu;

        self.items.iter().filter_map(move |key| menu.get(*key))
    }

    /// Number of items in the order.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the order is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The menu this order draws from.
    pub fn menu(&self) -> &'m Menu<'a> {
        self.menu
    }

    /// The discount rules used to price this order.
    pub fn policy(&self) -> &DiscountPolicy<'a> {
        &self.policy
    }

    /// Currency of the order.
    pub fn currency(&self) -> &'static Currency {
        self.menu.currency()
    }

    /// Sum of item prices before any discount; zero for an empty order.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the money arithmetic fails.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(self.menu_items(), self.menu.currency())
    }

    /// Number of ordered items per category.
    pub fn category_counts(&self) -> CategoryCounts {
        CategoryCounts::from_items(self.menu_items())
    }

    /// The discount rules this order currently qualifies for.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the subtotal cannot be calculated.
    pub fn discount_breakdown(&self) -> Result<DiscountBreakdown<'a>, TotalPriceError> {
        let subtotal = self.subtotal()?;

        Ok(self.policy.evaluate(&subtotal, self.category_counts())?)
    }

    /// The discount fraction for the current items. Recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the subtotal cannot be calculated.
    pub fn compute_discount(&self) -> Result<Decimal, TotalPriceError> {
        Ok(self.discount_breakdown()?.fraction())
    }

    /// `subtotal * (1 - discount)`, rounded to whole minor units. Recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the money arithmetic fails.
    pub fn compute_total(&self) -> Result<Money<'a, Currency>, OrderError> {
        let subtotal = self.subtotal()?;
        let discount = self
            .policy
            .evaluate(&subtotal, self.category_counts())
            .map_err(TotalPriceError::from)?
            .fraction();

        let total = apply_discount(&subtotal, discount)?;

        debug!(%subtotal, %discount, %total, "priced order");

        Ok(total)
    }

    /// Release the menu and return the ordered keys.
    pub fn into_items(self) -> Vec<MenuItemKey> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::discounts::{CompositionRates, DiscountCap, SpendTier};

    use super::*;

    fn order_with<'m>(
        menu: &'m Menu<'static>,
        names: &[&str],
    ) -> Result<Order<'m, 'static>, OrderError> {
        let mut order = Order::new(menu);

        for name in names {
            order.add_item(name)?;
        }

        Ok(order)
    }

    #[test]
    fn empty_order_totals_zero() -> TestResult {
        let menu = Menu::standard()?;
        let order = Order::new(&menu);

        assert!(order.is_empty());
        assert_eq!(order.subtotal()?, Money::from_minor(0, USD));
        assert_eq!(order.compute_discount()?, Decimal::ZERO);
        assert_eq!(order.compute_total()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn add_item_appends_in_order_and_allows_duplicates() -> TestResult {
        let menu = Menu::standard()?;
        let order = order_with(&menu, &["tea", "Soda", "TEA"])?;

        let names: Vec<&str> = order.menu_items().map(MenuItem::name).collect();

        assert_eq!(names, ["Tea", "Soda", "Tea"]);
        assert_eq!(order.len(), 3);
        assert_eq!(order.items().first(), order.items().get(2));

        Ok(())
    }

    #[test]
    fn add_unknown_item_leaves_order_unchanged() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = order_with(&menu, &["Pizza"])?;

        let result = order.add_item("Lasagne");

        assert_eq!(result, Err(OrderError::ItemNotFound("Lasagne".to_string())));
        assert_eq!(order.len(), 1);

        order.add_item("Fruit")?;

        assert_eq!(order.len(), 2);

        Ok(())
    }

    #[test]
    fn item_not_found_message_matches_menu_prompt() {
        let error = OrderError::ItemNotFound("Lasagne".to_string());

        assert_eq!(error.to_string(), "Item 'Lasagne' is not in the menu.");
    }

    #[test]
    fn two_beverages_get_five_percent() -> TestResult {
        let menu = Menu::standard()?;
        let order = order_with(&menu, &["Soda", "Tea"])?;

        assert_eq!(order.subtotal()?, Money::from_minor(5_00, USD));
        assert_eq!(order.compute_discount()?, Decimal::new(5, 2));
        assert_eq!(order.compute_total()?, Money::from_minor(4_75, USD));

        Ok(())
    }

    #[test]
    fn main_with_appetizer_gets_combo() -> TestResult {
        let menu = Menu::standard()?;
        let order = order_with(&menu, &["Pizza", "Fruit"])?;

        assert_eq!(order.subtotal()?, Money::from_minor(12_00, USD));
        assert_eq!(order.compute_discount()?, Decimal::new(10, 2));
        assert_eq!(order.compute_total()?, Money::from_minor(10_80, USD));

        Ok(())
    }

    #[test]
    fn large_order_stacks_tier_and_bonuses() -> TestResult {
        let menu = Menu::standard()?;
        let order = order_with(
            &menu,
            &["Pizza", "Burger", "Spaghetti", "Salad", "Cookies", "Popcorn"],
        )?;

        assert_eq!(order.subtotal()?, Money::from_minor(52_00, USD));
        assert_eq!(order.compute_discount()?, Decimal::new(40, 2));
        assert_eq!(order.compute_total()?, Money::from_minor(31_20, USD));

        Ok(())
    }

    #[test]
    fn total_reflects_items_added_after_pricing() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = order_with(&menu, &["Soda"])?;

        assert_eq!(order.compute_total()?, Money::from_minor(2_00, USD));

        order.add_item("Tea")?;

        assert_eq!(order.compute_total()?, Money::from_minor(4_75, USD));

        Ok(())
    }

    #[test]
    fn category_counts_follow_items() -> TestResult {
        let menu = Menu::standard()?;
        let order = order_with(&menu, &["Soda", "Water", "Fruit", "Salad"])?;

        let counts = order.category_counts();

        assert_eq!(counts.beverages, 2);
        assert_eq!(counts.appetizers, 1);
        assert_eq!(counts.main_courses, 1);
        assert_eq!(counts.other, 0);

        Ok(())
    }

    #[test]
    fn custom_policy_can_push_total_negative() -> TestResult {
        let menu = Menu::standard()?;
        let policy = DiscountPolicy::new(
            [SpendTier::new(Money::from_minor(1_00, USD), Decimal::new(80, 2))],
            CompositionRates {
                beverages: Decimal::new(40, 2),
                appetizers: Decimal::ZERO,
                combo: Decimal::ZERO,
            },
            DiscountCap::Uncapped,
        );
        let mut order = Order::with_policy(&menu, policy)?;

        order.add_item("Soda")?;
        order.add_item("Tea")?;

        assert_eq!(order.compute_discount()?, Decimal::new(120, 2));
        assert_eq!(order.compute_total()?, Money::from_minor(-1_00, USD));

        Ok(())
    }

    #[test]
    fn capped_policy_never_goes_below_zero() -> TestResult {
        let menu = Menu::standard()?;
        let policy = DiscountPolicy::new(
            [SpendTier::new(Money::from_minor(1_00, USD), Decimal::new(80, 2))],
            CompositionRates {
                beverages: Decimal::new(40, 2),
                appetizers: Decimal::ZERO,
                combo: Decimal::ZERO,
            },
            DiscountCap::Full,
        );
        let mut order = Order::with_policy(&menu, policy)?;

        order.add_item("Soda")?;
        order.add_item("Tea")?;

        assert_eq!(order.compute_total()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn policy_in_another_currency_is_rejected() -> TestResult {
        let menu = Menu::standard()?;

        let result = Order::with_policy(&menu, DiscountPolicy::standard(GBP));

        assert!(matches!(
            result,
            Err(OrderError::CurrencyMismatch(_, "GBP", "USD"))
        ));

        Ok(())
    }

    #[test]
    fn policy_without_tiers_is_accepted_for_any_menu() -> TestResult {
        let menu = Menu::standard()?;
        let policy = DiscountPolicy::new(
            [],
            CompositionRates {
                beverages: Decimal::new(5, 2),
                appetizers: Decimal::ZERO,
                combo: Decimal::ZERO,
            },
            DiscountCap::Uncapped,
        );
        let mut order = Order::with_policy(&menu, policy)?;

        order.add_item("Soda")?;
        order.add_item("Tea")?;

        assert_eq!(order.compute_total()?, Money::from_minor(4_75, USD));

        Ok(())
    }

    #[test]
    fn into_items_releases_menu_for_customisation() -> TestResult {
        let mut menu = Menu::standard()?;
        let keys = order_with(&menu, &["Coffee"])?.into_items();

        for key in keys {
            let item = menu.item_mut(key).ok_or("missing item")?;

            item.set_temperature(65.0)?;
            item.set_sugared(true)?;
        }

        let (_, coffee) = menu.lookup("coffee").ok_or("missing coffee")?;

        assert_eq!(
            coffee.kind(),
            &crate::items::ItemKind::Beverage {
                temperature: 65.0,
                is_sugared: true
            }
        );

        Ok(())
    }
}
