//! Diner
//!
//! Diner is the ordering core of a small restaurant: a fixed menu, orders that
//! accumulate items and earn discounts from their composition, and cash or
//! credit card payments.
//!
//! ```
//! use diner::prelude::*;
//! use rusty_money::{Money, iso::USD};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let menu = Menu::standard()?;
//! let mut order = Order::new(&menu);
//!
//! order.add_item("soda")?;
//! order.add_item("Tea")?;
//!
//! let total = order.compute_total()?;
//! assert_eq!(total, Money::from_minor(4_75, USD));
//!
//! let mut cash = Cash::new(Money::from_minor(5_00, USD));
//! cash.pay(total)?;
//! assert_eq!(cash.balance(), &Money::from_minor(25, USD));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod discounts;
pub mod items;
pub mod menu;
pub mod order;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod receipt;
