//! Core identifiers and the signed-side multiplier trick.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Which side of the book an order rests on.
///
/// `Side` doubles as a signed multiplier: `BID == +1`, `ASK == -1`. Every
/// "is this price better than that one" check in the book is phrased as
/// `side * price >= side * other_price` so the same comparison works for
/// both sides without a branch. See `original_source/lobsim/orders.py::Side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "bid")]
    Bid,
    #[serde(rename = "ask")]
    Ask,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    fn sign(self) -> Decimal {
        match self {
            Side::Bid => Decimal::ONE,
            Side::Ask => -Decimal::ONE,
        }
    }
}

impl Mul<Decimal> for Side {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        self.sign() * rhs
    }
}

impl Mul<Side> for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Side) -> Decimal {
        rhs.sign() * self
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// Identity of the client that owns an order, used to route private
/// notifications (see [`crate::notify::PrivateNotifier`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        ClientId(s.to_string())
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        ClientId(s)
    }
}

/// Fresh, unique identifier minted by a monotonic counter on [`crate::orderbook::Orderbook`].
///
/// The original implementation mints a random UUID per order; this crate uses
/// a counter instead so that replaying the same operation stream twice yields
/// identical ids, which the determinism law (`SPEC_FULL.md` §8) depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine-internal timestamp, stamped by an injectable [`crate::orderbook::Clock`]
/// rather than read from the wall clock directly, so tests and replay stay
/// deterministic. A plain alias over `u64`, matching `original_source/lobsim/utils.py`'s
/// `Timestamp: TypeAlias = float`.
pub type Timestamp = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_sign_flips_comparisons() {
        let p: Decimal = "10.5".parse().unwrap();
        assert_eq!(Side::Bid * p, p);
        assert_eq!(Side::Ask * p, -p);
    }

    #[test]
    fn opposite_is_involutive() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
        assert_eq!(Side::Bid.opposite().opposite(), Side::Bid);
    }
}
