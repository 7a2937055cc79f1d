//! Pricing

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::MenuItem;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Applying a discount could not be represented in minor units.
    #[error("discounted amount overflowed or was not representable in minor units")]
    Conversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total price of a list of items, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`TotalPriceError::Money`] if an item is priced in another currency.
pub fn total_price<'a, 'i>(
    items: impl IntoIterator<Item = &'i MenuItem<'a>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError>
where
    'a: 'i,
{
    let total = items
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| acc.add(*item.price()))?;

    Ok(total)
}

/// Applies a discount fraction to an amount: `amount * (1 - discount)`.
///
/// The result is rounded half away from zero to whole minor units. A fraction
/// above one yields a negative amount.
///
/// # Errors
///
/// Returns [`TotalPriceError::Conversion`] if the arithmetic overflows.
pub fn apply_discount<'a>(
    amount: &Money<'a, Currency>,
    discount: Decimal,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let minor = Decimal::from_i64(amount.to_minor_units()).ok_or(TotalPriceError::Conversion)?;

    let factor = Decimal::ONE
        .checked_sub(discount)
        .ok_or(TotalPriceError::Conversion)?;

    let discounted = minor
        .checked_mul(factor)
        .ok_or(TotalPriceError::Conversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(TotalPriceError::Conversion)?;

    Ok(Money::from_minor(discounted, amount.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn total_price_sums_items() -> TestResult {
        let items = [
            MenuItem::beverage("Soda", Money::from_minor(200, USD))?,
            MenuItem::beverage("Tea", Money::from_minor(300, USD))?,
        ];

        assert_eq!(total_price(&items, USD)?, Money::from_minor(500, USD));

        Ok(())
    }

    #[test]
    fn total_price_empty_is_zero() -> TestResult {
        let items: [MenuItem<'static>; 0] = [];

        assert_eq!(total_price(&items, USD)?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn total_price_currency_mismatch_errors() -> TestResult {
        let items = [MenuItem::beverage("Tea", Money::from_minor(300, GBP))?];

        assert!(matches!(
            total_price(&items, USD),
            Err(TotalPriceError::Money(_))
        ));

        Ok(())
    }

    #[test]
    fn apply_discount_scales_amount() -> TestResult {
        let amount = Money::from_minor(500, USD);

        assert_eq!(
            apply_discount(&amount, Decimal::new(5, 2))?,
            Money::from_minor(475, USD)
        );
        assert_eq!(
            apply_discount(&amount, Decimal::ZERO)?,
            Money::from_minor(500, USD)
        );

        Ok(())
    }

    #[test]
    fn apply_discount_rounds_half_away_from_zero() -> TestResult {
        // 0.15 off 0.50 is 0.425
        let amount = Money::from_minor(50, USD);

        assert_eq!(
            apply_discount(&amount, Decimal::new(15, 2))?,
            Money::from_minor(43, USD)
        );

        Ok(())
    }

    #[test]
    fn apply_discount_above_one_goes_negative() -> TestResult {
        let amount = Money::from_minor(1000, USD);

        assert_eq!(
            apply_discount(&amount, Decimal::new(125, 2))?,
            Money::from_minor(-250, USD)
        );

        Ok(())
    }

    #[test]
    fn apply_discount_overflow_returns_error() {
        let amount = Money::from_minor(i64::MAX, USD);

        assert_eq!(
            apply_discount(&amount, Decimal::new(-1, 0)),
            Err(TotalPriceError::Conversion)
        );
    }
}
