//! Typed errors for hard-failure paths.
//!
//! Insufficient liquidity is not an error: it is reported to the submitting
//! client as a `PrivateEvent { status: Rejected, .. }` through the injected
//! [`crate::notify::PrivateNotifier`] (see `SPEC_FULL.md` §7). `EngineError`
//! covers only the paths that must abort the operation before it mutates
//! anything.

use crate::types::OrderId;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("price {price} is not valid for this instrument (must lie in [{min}, {max}] and be a multiple of the tick size)")]
    InvalidPrice {
        price: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("quantity {quantity} is not valid for this instrument (must lie in [{min}, {max}] and be a multiple of the step size)")]
    InvalidQuantity {
        quantity: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("no resting order with id {0}")]
    UnknownOrder(OrderId),

    #[error("invalid instrument configuration: {0}")]
    InvalidInstrument(&'static str),
}
