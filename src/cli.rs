//! Command line arguments for the `diner` binary

use std::io;

use clap::Parser;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use crate::order::{Order, OrderError};

/// Command line errors.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The amount was not a non-negative decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Building the order failed for a reason other than an unknown item.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Price an order from the menu and pay for it.
#[derive(Debug, Parser)]
#[command(name = "diner", version)]
pub struct OrderArgs {
    /// Item to order, by menu name (repeat for more items)
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// Payment method (cash or credit)
    #[arg(short, long, default_value = "cash")]
    pub pay: String,

    /// Cash in hand, in dollars
    #[arg(long, env = "DINER_CASH", default_value = "100", value_parser = parse_amount)]
    pub cash: i64,

    /// Credit available on the card, in dollars
    #[arg(long, env = "DINER_CARD_BALANCE", default_value = "500", value_parser = parse_amount)]
    pub card_balance: i64,

    /// Card number
    #[arg(long, env = "DINER_CARD_NUMBER", default_value = "1234567890123456")]
    pub card_number: String,

    /// Card security code
    #[arg(long, env = "DINER_CARD_CVV", default_value = "123")]
    pub card_cvv: String,

    /// Print the menu before the receipt
    #[arg(short, long)]
    pub menu: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

/// Parse a dollar amount such as `4.75` into cents.
///
/// # Errors
///
/// Returns [`CliError::InvalidAmount`] if the string is not a decimal number,
/// is negative, or does not fit in minor units.
pub fn parse_amount(s: &str) -> Result<i64, CliError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| CliError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CliError::InvalidAmount(s.to_string()));
    }

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CliError::InvalidAmount(s.to_string()))
}

/// Add each named item to `order`, in order.
///
/// Unknown names are reported on `errors` and skipped. Returns how many items
/// were added.
///
/// # Errors
///
/// Returns a [`CliError`] if the report cannot be written or the order fails
/// for another reason.
pub fn add_items(
    order: &mut Order<'_, '_>,
    names: &[String],
    mut errors: impl io::Write,
) -> Result<usize, CliError> {
    let mut added = 0;

    for name in names {
        match order.add_item(name) {
            Ok(_) => added += 1,
            Err(err @ OrderError::ItemNotFound(_)) => {
                writeln!(errors, "{err}").map_err(|_err| CliError::IO)?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(added)
}
