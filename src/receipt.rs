//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    discounts::DiscountBreakdown,
    items::Category,
    order::Order,
    pricing::{TotalPriceError, apply_discount},
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating prices for the order.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One ordered item as printed on the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Item name
    pub name: String,

    /// Item category
    pub category: Category,

    /// Item price
    pub price: Money<'a, Currency>,
}

/// Summary of a priced, and optionally paid, order.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    subtotal: Money<'a, Currency>,
    discounts: DiscountBreakdown<'a>,
    total: Money<'a, Currency>,
    paid_with: Option<String>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current state of an order.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the order cannot be priced.
    pub fn from_order(order: &Order<'_, 'a>) -> Result<Self, ReceiptError> {
        let lines = order
            .menu_items()
            .map(|item| ReceiptLine {
                name: item.name().to_string(),
                category: item.category(),
                price: *item.price(),
            })
            .collect();

        let subtotal = order.subtotal()?;
        let discounts = order.discount_breakdown()?;
        let total = apply_discount(&subtotal, discounts.fraction())?;

        Ok(Receipt {
            lines,
            subtotal,
            discounts,
            total,
            paid_with: None,
        })
    }

    /// Record how the order was paid.
    #[must_use]
    pub fn paid_with(mut self, label: impl Into<String>) -> Self {
        self.paid_with = Some(label.into());
        self
    }

    /// The ordered items.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total before discounts.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// The discount rules applied.
    pub fn discounts(&self) -> &DiscountBreakdown<'a> {
        &self.discounts
    }

    /// Amount due after discounts.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Payment method label, once paid.
    pub fn payment(&self) -> Option<&str> {
        self.paid_with.as_deref()
    }

    /// Amount taken off the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal; zero for an empty order.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction or division overflows.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        if self.subtotal.is_zero() {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        savings
            .amount()
            .checked_div(*self.subtotal.amount())
            .map(Percentage::from)
            .ok_or(MoneyError::Overflow)
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Price"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.category.to_string(),
                format!("{}", line.price),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::rounded());
        table.modify(Columns::new(3..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        write_line(&mut out, "Subtotal", &self.subtotal.to_string())?;

        for applied in self.discounts.applied() {
            write_line(
                &mut out,
                &applied.rule.to_string(),
                &format!("-{:.2}%", rate_points(applied.rate)),
            )?;
        }

        write_line(
            &mut out,
            "Discount",
            &format!(
                "{:.2}% ({})",
                percent_points(self.savings_percent()?),
                self.savings()?
            ),
        )?;

        write_line(&mut out, "Total", &self.total.to_string())?;

        if let Some(paid_with) = &self.paid_with {
            write_line(&mut out, "Paid with", paid_with)?;
        }

        Ok(())
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    (percentage * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Converts a discount rate to percent points for display.
fn rate_points(rate: Decimal) -> Decimal {
    rate.saturating_mul(Decimal::ONE_HUNDRED).round_dp(2)
}

fn write_line(out: &mut impl io::Write, label: &str, value: &str) -> Result<(), ReceiptError> {
    writeln!(out, " {:<24} {value:>14}", format!("{label}:")).map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::menu::Menu;

    use super::*;

    #[test]
    fn from_order_captures_lines_and_totals() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = Order::new(&menu);

        order.add_item("Pizza")?;
        order.add_item("Fruit")?;

        let receipt = Receipt::from_order(&order)?;

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(
            receipt.lines().first().map(|line| line.category),
            Some(Category::MainCourse)
        );
        assert_eq!(receipt.subtotal(), Money::from_minor(12_00, USD));
        assert_eq!(receipt.total(), Money::from_minor(10_80, USD));
        assert_eq!(receipt.savings()?, Money::from_minor(1_20, USD));
        assert_eq!(receipt.payment(), None);

        Ok(())
    }

    #[test]
    fn total_matches_order_total() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = Order::new(&menu);

        for name in ["Soda", "Tea", "Coffee", "Burger", "Spaghetti", "Cookies"] {
            order.add_item(name)?;
        }

        let receipt = Receipt::from_order(&order)?;

        assert_eq!(receipt.total(), order.compute_total()?);

        Ok(())
    }

    #[test]
    fn write_to_renders_items_discounts_and_payment() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = Order::new(&menu);

        order.add_item("Soda")?;
        order.add_item("Tea")?;

        let receipt = Receipt::from_order(&order)?.paid_with("cash");

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Soda"));
        assert!(rendered.contains("Tea"));
        assert!(rendered.contains("beverage"));
        assert!(rendered.contains("2+ beverages"));
        assert!(rendered.contains("5.00%"));
        assert!(rendered.contains("4.75"));
        assert!(rendered.contains("Paid with:"));
        assert!(rendered.contains("cash"));

        Ok(())
    }

    #[test]
    fn write_to_empty_order() -> TestResult {
        let menu = Menu::standard()?;
        let order = Order::new(&menu);

        let mut out = Vec::new();
        Receipt::from_order(&order)?.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Subtotal:"));
        assert!(rendered.contains("0.00%"));
        assert!(!rendered.contains("Paid with:"));

        Ok(())
    }

    #[test]
    fn percent_points_scales_fraction() {
        assert_eq!(
            percent_points(Percentage::from(Decimal::new(45, 2))),
            Decimal::new(4500, 2)
        );
        assert_eq!(rate_points(Decimal::new(5, 2)), Decimal::new(500, 2));
    }

    #[test]
    fn savings_percent_is_relative_to_subtotal() -> TestResult {
        let menu = Menu::standard()?;
        let mut order = Order::new(&menu);

        for name in ["Pizza", "Burger", "Spaghetti", "Salad", "Cookies", "Popcorn"] {
            order.add_item(name)?;
        }

        let receipt = Receipt::from_order(&order)?;

        assert_eq!(receipt.savings_percent()?, Percentage::from(Decimal::new(40, 2)));
        assert_eq!(
            Receipt::from_order(&Order::new(&menu))?.savings_percent()?,
            Percentage::from(Decimal::ZERO)
        );

        Ok(())
    }
}
