//! Diner prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{
        AppliedDiscount, CategoryCounts, CompositionRates, DiscountBreakdown, DiscountCap,
        DiscountPolicy, DiscountRule, SpendTier,
    },
    items::{Category, ItemKind, MenuItem, MenuItemError},
    menu::{Menu, MenuError, MenuItemKey},
    order::{Order, OrderError},
    payments::{Cash, CreditCard, PaymentChoice, PaymentError, PaymentMethod},
    pricing::TotalPriceError,
    receipt::{Receipt, ReceiptError, ReceiptLine},
};
