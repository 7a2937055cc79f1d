//! Discounts
//!
//! Order discounts are a fraction of the subtotal built by adding up every rule
//! the order qualifies for:
//!
//! 1. a spend tier picked by subtotal (the highest threshold reached),
//! 2. a bonus for ordering enough beverages,
//! 3. a bonus for ordering enough appetizers,
//! 4. a combo bonus for a main course ordered with an appetizer.
//!
//! Rates are summed, never compounded.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::items::{Category, MenuItem};

/// Number of ordered items per category.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Beverages ordered
    pub beverages: usize,

    /// Appetizers ordered
    pub appetizers: usize,

    /// Main courses ordered
    pub main_courses: usize,

    /// Items in no discount category
    pub other: usize,
}

impl CategoryCounts {
    /// Count the items by category. Each item counts towards exactly one category.
    pub fn from_items<'a, 'i>(items: impl IntoIterator<Item = &'i MenuItem<'a>>) -> Self
    where
        'a: 'i,
    {
        items.into_iter().fold(Self::default(), |mut counts, item| {
            match item.category() {
                Category::Beverage => counts.beverages += 1,
                Category::Appetizer => counts.appetizers += 1,
                Category::MainCourse => counts.main_courses += 1,
                Category::Other => counts.other += 1,
            }

            counts
        })
    }

    /// Return the count for a single category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Beverage => self.beverages,
            Category::Appetizer => self.appetizers,
            Category::MainCourse => self.main_courses,
            Category::Other => self.other,
        }
    }
}

/// Whether the summed discount fraction is limited.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DiscountCap {
    /// The fraction is the plain sum of every applied rate and may exceed one.
    #[default]
    Uncapped,

    /// The fraction never exceeds one, so totals never go below zero.
    Full,
}

/// A discount rate unlocked once the subtotal reaches a threshold.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpendTier<'a> {
    threshold: Money<'a, Currency>,
    rate: Decimal,
}

impl<'a> SpendTier<'a> {
    /// Create a new spend tier.
    pub fn new(threshold: Money<'a, Currency>, rate: Decimal) -> Self {
        Self { threshold, rate }
    }

    /// Return the spend threshold.
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Return the rate granted by this tier.
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Bonus rates for the composition of an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompositionRates {
    /// Granted for two or more beverages
    pub beverages: Decimal,

    /// Granted for two or more appetizers
    pub appetizers: Decimal,

    /// Granted for at least one main course together with at least one appetizer
    pub combo: Decimal,
}

/// A rule an order qualified for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DiscountRule<'a> {
    /// The subtotal reached the given spend threshold.
    SpendTier(Money<'a, Currency>),

    /// Two or more beverages.
    Beverages,

    /// Two or more appetizers.
    Appetizers,

    /// A main course ordered with an appetizer.
    MainWithAppetizer,
}

impl fmt::Display for DiscountRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountRule::SpendTier(threshold) => write!(f, "Spend {threshold} or more"),
            DiscountRule::Beverages => f.write_str("2+ beverages"),
            DiscountRule::Appetizers => f.write_str("2+ appetizers"),
            DiscountRule::MainWithAppetizer => f.write_str("Main course + appetizer"),
        }
    }
}

/// A qualifying rule and the rate it contributes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AppliedDiscount<'a> {
    /// Rule the order qualified for
    pub rule: DiscountRule<'a>,

    /// Fraction of the subtotal contributed by the rule
    pub rate: Decimal,
}

/// Every rule an order qualified for, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountBreakdown<'a> {
    applied: SmallVec<[AppliedDiscount<'a>; 4]>,
    cap: DiscountCap,
}

impl<'a> DiscountBreakdown<'a> {
    /// The applied rules.
    pub fn applied(&self) -> &[AppliedDiscount<'a>] {
        &self.applied
    }

    /// Check if no rule applied.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// The discount fraction: the sum of the applied rates, limited by the cap.
    ///
    /// The sum saturates at the bounds of [`Decimal`].
    pub fn fraction(&self) -> Decimal {
        let sum = self
            .applied
            .iter()
            .fold(Decimal::ZERO, |acc, applied| acc.saturating_add(applied.rate));

        match self.cap {
            DiscountCap::Uncapped => sum,
            DiscountCap::Full => sum.min(Decimal::ONE),
        }
    }
}

/// Thresholds and rates used to work out an order discount.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountPolicy<'a> {
    tiers: SmallVec<[SpendTier<'a>; 2]>,
    rates: CompositionRates,
    cap: DiscountCap,
}

impl<'a> DiscountPolicy<'a> {
    /// Create a policy. Tiers may be given in any order; the highest reached wins.
    pub fn new(
        tiers: impl IntoIterator<Item = SpendTier<'a>>,
        rates: CompositionRates,
        cap: DiscountCap,
    ) -> Self {
        let mut tiers: SmallVec<[SpendTier<'a>; 2]> = tiers.into_iter().collect();

        tiers.sort_by(|a, b| b.threshold.amount().cmp(a.threshold.amount()));

        Self { tiers, rates, cap }
    }

    /// The restaurant's house rules, with thresholds in `currency`:
    /// 20% from 50, 10% from 30, +5% for 2+ beverages, +10% for 2+ appetizers
    /// and +10% for a main course with an appetizer. Uncapped.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new(
            [
                SpendTier::new(Money::from_minor(50_00, currency), Decimal::new(20, 2)),
                SpendTier::new(Money::from_minor(30_00, currency), Decimal::new(10, 2)),
            ],
            CompositionRates {
                beverages: Decimal::new(5, 2),
                appetizers: Decimal::new(10, 2),
                combo: Decimal::new(10, 2),
            },
            DiscountCap::Uncapped,
        )
    }

    /// Return a copy of this policy with a different cap.
    #[must_use]
    pub fn with_cap(mut self, cap: DiscountCap) -> Self {
        self.cap = cap;
        self
    }

    /// Spend tiers, highest threshold first.
    pub fn tiers(&self) -> &[SpendTier<'a>] {
        &self.tiers
    }

    /// Composition bonus rates.
    pub fn rates(&self) -> &CompositionRates {
        &self.rates
    }

    /// The cap applied to the summed fraction.
    pub fn cap(&self) -> DiscountCap {
        self.cap
    }

    /// The first spend tier not priced in `currency`, if any.
    pub fn mismatched_tier(&self, currency: &Currency) -> Option<&SpendTier<'a>> {
        self.tiers
            .iter()
            .find(|tier| tier.threshold.currency() != currency)
    }

    /// Work out which rules apply to an order with this subtotal and composition.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if a spend threshold is in a
    /// different currency from `subtotal`.
    pub fn evaluate(
        &self,
        subtotal: &Money<'a, Currency>,
        counts: CategoryCounts,
    ) -> Result<DiscountBreakdown<'a>, MoneyError> {
        let mut applied = SmallVec::new();
        let mut reached = None;

        for tier in &self.tiers {
            if subtotal.gte(&tier.threshold)? {
                reached = Some(tier);
                break;
            }
        }

        if let Some(tier) = reached {
            applied.push(AppliedDiscount {
                rule: DiscountRule::SpendTier(tier.threshold),
                rate: tier.rate,
            });
        }

        if counts.beverages >= 2 {
            applied.push(AppliedDiscount {
                rule: DiscountRule::Beverages,
                rate: self.rates.beverages,
            });
        }

        if counts.appetizers >= 2 {
            applied.push(AppliedDiscount {
                rule: DiscountRule::Appetizers,
                rate: self.rates.appetizers,
            });
        }

        if counts.main_courses >= 1 && counts.appetizers >= 1 {
            applied.push(AppliedDiscount {
                rule: DiscountRule::MainWithAppetizer,
                rate: self.rates.combo,
            });
        }

        Ok(DiscountBreakdown {
            applied,
            cap: self.cap,
        })
    }
}
