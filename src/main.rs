//! Diner
//!
//! Prices an order from the house menu and pays for it with cash or a credit card.
//!
//! ```text
//! diner --item soda --item tea --pay cash
//! diner -i pizza -i fruit --pay credit --card-balance 20
//! ```

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use rusty_money::Money;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diner::{
    cli::{OrderArgs, add_items},
    menu::Menu,
    order::Order,
    payments::{Cash, CreditCard, PaymentChoice, PaymentMethod},
    receipt::Receipt,
};

/// Diner entry point
pub fn main() -> Result<()> {
    let args = OrderArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let menu = Menu::standard()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.menu {
        writeln!(handle, "\nMenu:")?;

        for (_, item) in menu.iter() {
            writeln!(handle, "{item}")?;
        }
    }

    let mut order = Order::new(&menu);

    add_items(&mut order, &args.items, io::stderr().lock())?;

    let total = order.compute_total()?;
    let choice: PaymentChoice = args.pay.parse()?;

    info!(items = order.len(), %total, %choice, "paying for order");

    let mut method: Box<dyn PaymentMethod<'static>> = match choice {
        PaymentChoice::Cash => Box::new(Cash::new(Money::from_minor(args.cash, menu.currency()))),
        PaymentChoice::CreditCard => Box::new(CreditCard::new(
            args.card_number,
            args.card_cvv,
            Money::from_minor(args.card_balance, menu.currency()),
        )),
    };

    method
        .pay(total)
        .with_context(|| format!("payment of {total} with {} failed", method.label()))?;

    Receipt::from_order(&order)?
        .paid_with(method.label())
        .write_to(&mut handle)?;

    writeln!(handle, "Order confirmed and paid with {}.", method.label())?;

    Ok(())
}
