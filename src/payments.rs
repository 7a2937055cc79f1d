//! Payments
//!
//! Cash and credit cards both settle an amount against a balance they hold.
//! A payment either succeeds and deducts the full amount, or fails and leaves
//! the balance untouched. Nothing stops the same instrument being charged
//! twice; callers guard against double charging.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while settling a payment.
#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    /// The balance does not cover the amount. Nothing was deducted.
    #[error("Insufficient balance: {required} required, {available} available")]
    InsufficientFunds {
        /// Amount that was asked for
        required: Decimal,
        /// Balance at the time
        available: Decimal,
    },

    /// A negative amount was asked for.
    #[error("cannot pay a negative amount ({0})")]
    NegativeAmount(Decimal),

    /// The payment method name was not recognised.
    #[error("Invalid payment method: {0}")]
    UnknownMethod(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl PaymentError {
    /// How much was missing for an insufficient funds failure.
    pub fn shortfall(&self) -> Option<Decimal> {
        match self {
            PaymentError::InsufficientFunds {
                required,
                available,
            } => required.checked_sub(*available),
            _ => None,
        }
    }
}

/// Something an order can be paid with.
pub trait PaymentMethod<'a> {
    /// Settle `amount` against the balance.
    ///
    /// On success the balance drops by exactly `amount`. On failure the
    /// balance is unchanged.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NegativeAmount`]: `amount` is below zero.
    /// - [`PaymentError::InsufficientFunds`]: the balance is lower than `amount`.
    /// - [`PaymentError::Money`]: `amount` is in a different currency.
    fn pay(&mut self, amount: Money<'a, Currency>) -> Result<(), PaymentError>;

    /// Remaining balance.
    fn balance(&self) -> &Money<'a, Currency>;

    /// Short human readable name, safe to print.
    fn label(&self) -> String;
}

/// Deduct `amount` from `balance` if it is covered.
fn settle<'a>(
    balance: &mut Money<'a, Currency>,
    amount: Money<'a, Currency>,
) -> Result<(), PaymentError> {
    let short = balance.lt(&amount)?;

    if amount.is_negative() {
        return Err(PaymentError::NegativeAmount(*amount.amount()));
    }

    if short {
        return Err(PaymentError::InsufficientFunds {
            required: *amount.amount(),
            available: *balance.amount(),
        });
    }

    *balance = balance.sub(amount)?;

    Ok(())
}

/// Cash in hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Cash<'a> {
    balance: Money<'a, Currency>,
}

impl<'a> Cash<'a> {
    /// Create a cash payment holding `balance`.
    pub fn new(balance: Money<'a, Currency>) -> Self {
        Self { balance }
    }
}

impl<'a> PaymentMethod<'a> for Cash<'a> {
    fn pay(&mut self, amount: Money<'a, Currency>) -> Result<(), PaymentError> {
        match settle(&mut self.balance, amount) {
            Ok(()) => {
                debug!(%amount, balance = %self.balance, "paid with cash");

                Ok(())
            }
            Err(err) => {
                warn!(%amount, balance = %self.balance, error = %err, "cash payment declined");

                Err(err)
            }
        }
    }

    fn balance(&self) -> &Money<'a, Currency> {
        &self.balance
    }

    fn label(&self) -> String {
        "cash".to_string()
    }
}

/// A credit card with a credit line to draw on.
#[derive(Clone, PartialEq)]
pub struct CreditCard<'a> {
    number: String,
    cvv: String,
    balance: Money<'a, Currency>,
}

impl<'a> CreditCard<'a> {
    /// Create a card with the given number, security code and available credit.
    pub fn new(
        number: impl Into<String>,
        cvv: impl Into<String>,
        balance: Money<'a, Currency>,
    ) -> Self {
        Self {
            number: number.into(),
            cvv: cvv.into(),
            balance,
        }
    }

    /// The last four characters of the card number (all of it if shorter).
    pub fn last_four(&self) -> &str {
        let start = self
            .number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(idx, _)| idx);

        self.number.get(start..).unwrap_or_default()
    }

    /// Check the security code.
    pub fn verify_cvv(&self, cvv: &str) -> bool {
        self.cvv == cvv
    }
}

impl fmt::Debug for CreditCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("last_four", &self.last_four())
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}

impl<'a> PaymentMethod<'a> for CreditCard<'a> {
    fn pay(&mut self, amount: Money<'a, Currency>) -> Result<(), PaymentError> {
        match settle(&mut self.balance, amount) {
            Ok(()) => {
                debug!(%amount, card = self.last_four(), "paid with card");

                Ok(())
            }
            Err(err) => {
                warn!(%amount, card = self.last_four(), error = %err, "card payment declined");

                Err(err)
            }
        }
    }

    fn balance(&self) -> &Money<'a, Currency> {
        &self.balance
    }

    fn label(&self) -> String {
        format!("card ending {}", self.last_four())
    }
}

/// Which payment method the customer picked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PaymentChoice {
    /// Pay with cash.
    Cash,

    /// Pay with the credit card.
    CreditCard,
}

impl FromStr for PaymentChoice {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentChoice::Cash),
            "credit" | "card" => Ok(PaymentChoice::CreditCard),
            _ => Err(PaymentError::UnknownMethod(s.trim().to_string())),
        }
    }
}

impl fmt::Display for PaymentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentChoice::Cash => "cash",
            PaymentChoice::CreditCard => "credit",
        })
    }
}
