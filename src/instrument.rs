//! Immutable trading rules for the instrument a book is created for.
//!
//! Grounded on `original_source/lobsim/instruments.py::Instrument` and its
//! `LotSize`/`PriceDetails`/`Precision` dataclasses. Fees, margin and
//! liquidation fields from the original are intentionally not carried: the
//! matching core never consults them (`spec.md` Non-goals).

use crate::error::EngineError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub min_qty: Decimal,
    pub max_qty: Decimal,
    pub step_size: Decimal,
    pub price_precision: u32,
    pub quantity_precision: u32,
}

impl Instrument {
    /// Validates construction-time invariants the original dataclass does
    /// not enforce: positive tick/step sizes and a non-inverted price/qty
    /// range. Rejecting these up front keeps every later divisibility check
    /// well-defined.
    pub fn new(
        symbol: impl Into<String>,
        tick_size: Decimal,
        min_price: Decimal,
        max_price: Decimal,
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
        price_precision: u32,
        quantity_precision: u32,
    ) -> Result<Self, EngineError> {
        if tick_size <= Decimal::ZERO {
            return Err(EngineError::InvalidInstrument("tick_size must be positive"));
        }
        if step_size <= Decimal::ZERO {
            return Err(EngineError::InvalidInstrument("step_size must be positive"));
        }
        if min_price > max_price {
            return Err(EngineError::InvalidInstrument("min_price must not exceed max_price"));
        }
        if min_qty > max_qty {
            return Err(EngineError::InvalidInstrument("min_qty must not exceed max_qty"));
        }
        Ok(Self {
            symbol: symbol.into(),
            tick_size,
            min_price,
            max_price,
            min_qty,
            max_qty,
            step_size,
            price_precision,
            quantity_precision,
        })
    }

    fn is_divisible(value: Decimal, step: Decimal) -> bool {
        step != Decimal::ZERO && value % step == Decimal::ZERO
    }

    pub fn is_valid_price(&self, price: Decimal) -> bool {
        price >= self.min_price && price <= self.max_price && Self::is_divisible(price, self.tick_size)
    }

    pub fn is_valid_quantity(&self, quantity: Decimal) -> bool {
        quantity >= self.min_qty && quantity <= self.max_qty && Self::is_divisible(quantity, self.step_size)
    }

    pub fn adjust_price(&self, price: Decimal) -> Decimal {
        price.round_dp_with_strategy(self.price_precision, RoundingStrategy::MidpointNearestEven)
    }

    pub fn adjust_quantity(&self, quantity: Decimal) -> Decimal {
        quantity.round_dp_with_strategy(self.quantity_precision, RoundingStrategy::MidpointNearestEven)
    }

    /// Convenience constructor matching the fixture used across
    /// `original_source/tests/lobsim/orderbook_test.py`.
    pub fn test_instrument() -> Self {
        Self::new(
            "TEST",
            dec(tick_str()),
            dec("0.1"),
            dec("10000"),
            dec("1"),
            dec("100"),
            dec("1"),
            4,
            5,
        )
        .expect("test fixture instrument is always valid")
    }
}

fn tick_str() -> &'static str {
    "0.001"
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("fixture literal parses")
}
