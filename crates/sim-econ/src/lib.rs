#![deny(warnings)]

//! Economic rules for Farm Sim.
//!
//! This crate provides:
//! - Harvest, product and sale valuations for crops and animals
//! - The cash [`Ledger`] with running totals
//!
//! Valuations are computed as a single exact quotient in [`Decimal`] and then
//! floored, so integer results never fall one short from binary rounding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sim_core::AnimalKindSpec;
use thiserror::Error;
use tracing::{debug, info};

/// Errors produced by the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconError {
    /// A debit larger than the current balance.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    /// Debits and credits take non-negative amounts.
    #[error("invalid transaction amount: {0}")]
    InvalidAmount(i64),
}

/// Floor of `num / den` for non-negative operands, saturating at `i64::MAX`.
fn floor_ratio(num: Decimal, den: Decimal) -> i64 {
    if den.is_zero() || num <= Decimal::ZERO {
        return 0;
    }
    (num / den).floor().to_i64().unwrap_or(i64::MAX)
}

/// Value of a single crop harvest.
///
/// Crop quality is `1 + watered_days / days_to_grow`, so the yield
/// `floor(yield_count * base_value * quality)` is evaluated as
/// `yield_count * base_value * (days_to_grow + watered_days) / days_to_grow`.
///
/// Example:
/// assert_eq!(crop_yield_value(4, 5, 5, 0), 20);
pub fn crop_yield_value(yield_count: u32, base_value: u32, days_to_grow: u32, watered_days: u32) -> i64 {
    let num = Decimal::from(yield_count)
        * Decimal::from(base_value)
        * (Decimal::from(days_to_grow) + Decimal::from(watered_days));
    floor_ratio(num, Decimal::from(days_to_grow))
}

/// Value of one collected animal product.
///
/// Unhappy animals (`happiness < 25`) yield the base value; otherwise the
/// value scales with `happiness / 25`.
///
/// Example:
/// assert_eq!(product_value(10, 30), 12);
pub fn product_value(base_product_value: u32, happiness: i32) -> i64 {
    if happiness < 25 {
        return i64::from(base_product_value);
    }
    floor_ratio(
        Decimal::from(happiness) * Decimal::from(base_product_value),
        Decimal::from(25),
    )
}

/// Base resale value of an animal: a quarter of its purchase price.
pub fn animal_base_value(purchase_price: u32) -> i64 {
    i64::from(purchase_price / 4)
}

/// Sale value of an animal.
///
/// Youngsters sell for the base value. For adults the base is scaled by age:
/// with `half = age_max / 2`, the factor `age * 2 / half` applies while the
/// animal is at most half its lifespan and the factor exceeds one, the factor
/// `(age_max - age) * 2 / half` applies past the midpoint under the same
/// condition. Adults happier than 50 are further scaled by `happiness / 50`.
pub fn animal_sale_value(spec: &AnimalKindSpec, age: u32, adult: bool, happiness: i32) -> i64 {
    let base = animal_base_value(spec.purchase_price);
    if !adult || spec.age_max == 0 {
        return base;
    }
    let age = u64::from(age);
    let max = u64::from(spec.age_max);
    let remaining = max.saturating_sub(age);

    // age * 2 / (max / 2) == 4 * age / max
    let (mut num, mut den) = if 4 * age > max && 2 * age <= max {
        (Decimal::from(base) * Decimal::from(4 * age), Decimal::from(max))
    } else if 4 * remaining > max && 2 * age >= max {
        (Decimal::from(base) * Decimal::from(4 * remaining), Decimal::from(max))
    } else {
        (Decimal::from(base), Decimal::ONE)
    };
    if happiness > 50 {
        num *= Decimal::from(happiness);
        den *= Decimal::from(50);
    }
    floor_ratio(num, den)
}

/// Player cash account.
///
/// Balance changes only through [`Ledger::debit`] and [`Ledger::credit`]; the
/// last signed delta is kept for feedback display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    balance: i64,
    last_delta: i64,
    total_earned: u64,
    total_spent: u64,
    transactions: u64,
}

impl Ledger {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            balance: opening_balance,
            last_delta: 0,
            total_earned: 0,
            total_spent: 0,
            transactions: 0,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Signed amount of the most recent transaction.
    pub fn last_transaction_delta(&self) -> i64 {
        self.last_delta
    }

    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn transactions(&self) -> u64 {
        self.transactions
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Remove `amount` from the balance. Fails without side effects when the
    /// balance does not cover it.
    pub fn debit(&mut self, amount: i64, reason: &str) -> Result<i64, EconError> {
        if amount < 0 {
            return Err(EconError::InvalidAmount(amount));
        }
        if !self.can_afford(amount) {
            debug!(amount, balance = self.balance, reason, "debit rejected");
            return Err(EconError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.last_delta = -amount;
        self.total_spent = self.total_spent.saturating_add(amount as u64);
        self.transactions += 1;
        info!("-{}: {}. New balance: {}", amount, reason, self.balance);
        Ok(self.balance)
    }

    /// Add `amount` to the balance.
    pub fn credit(&mut self, amount: i64, reason: &str) -> Result<i64, EconError> {
        if amount < 0 {
            return Err(EconError::InvalidAmount(amount));
        }
        self.balance = self.balance.saturating_add(amount);
        self.last_delta = amount;
        self.total_earned = self.total_earned.saturating_add(amount as u64);
        self.transactions += 1;
        info!("+{}: {}. New balance: {}", amount, reason, self.balance);
        Ok(self.balance)
    }
}
