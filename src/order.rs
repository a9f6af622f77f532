//! A single resting order. Grounded on `original_source/lobsim/orders.py::Order`.

use crate::arena::Index;
use crate::types::{ClientId, OrderId, Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub owner: ClientId,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub remaining: Decimal,
    pub last_filled_quantity: Decimal,
    pub created_ts: Timestamp,
    pub updated_ts: Timestamp,

    /// Queue this order currently resides in. `None` only during the brief
    /// window between construction and insertion.
    #[serde(skip)]
    pub queue: Option<Index>,
    #[serde(skip)]
    pub oprev: Option<Index>,
    #[serde(skip)]
    pub onext: Option<Index>,
}

impl Order {
    pub fn new(order_id: OrderId, owner: ClientId, side: Side, price: Decimal, quantity: Decimal, ts: Timestamp) -> Self {
        Self {
            order_id,
            owner,
            side,
            price,
            quantity,
            remaining: quantity,
            last_filled_quantity: Decimal::ZERO,
            created_ts: ts,
            updated_ts: ts,
            queue: None,
            oprev: None,
            onext: None,
        }
    }

    pub fn filled(&self) -> bool {
        self.remaining == Decimal::ZERO
    }

    /// Subtracts `qty` from `remaining`, rounded to `quantity_precision`
    /// (`SPEC_FULL.md` §4.2; `original_source/lobsim/orders.py::add_fill`
    /// rounds the same way), and records it as the last fill. Does not touch
    /// the owning queue's aggregate volume; callers go through
    /// `crate::queue::queue_fill` for that.
    pub fn add_fill(&mut self, qty: Decimal, quantity_precision: u32, ts: Timestamp) {
        self.remaining = (self.remaining - qty).round_dp(quantity_precision);
        self.last_filled_quantity = qty;
        self.updated_ts = ts;
    }

    /// Replaces price and/or quantity. A quantity change resets `remaining`
    /// to the new quantity, discarding any prior partial fills — preserved
    /// literally per `spec.md` §9 ambiguity #2.
    pub fn update(&mut self, price: Option<Decimal>, quantity: Option<Decimal>, ts: Timestamp) {
        let mut changed = false;
        if let Some(p) = price {
            if p != self.price {
                self.price = p;
                changed = true;
            }
        }
        if let Some(q) = quantity {
            if q != self.quantity {
                self.quantity = q;
                self.remaining = q;
                changed = true;
            }
        }
        if changed {
            self.updated_ts = ts;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new(
            OrderId(1),
            ClientId::from("alice"),
            Side::Bid,
            "2.002".parse().unwrap(),
            "10".parse().unwrap(),
            1000,
        )
    }

    #[test]
    fn new_order_starts_unfilled_with_remaining_equal_quantity() {
        let o = order();
        assert_eq!(o.remaining, o.quantity);
        assert!(!o.filled());
    }

    #[test]
    fn add_fill_decrements_remaining_and_records_last_fill() {
        let mut o = order();
        o.add_fill("4".parse().unwrap(), 5, 1001);
        assert_eq!(o.remaining, "6".parse().unwrap());
        assert_eq!(o.last_filled_quantity, "4".parse().unwrap());
        assert!(!o.filled());
        o.add_fill("6".parse().unwrap(), 5, 1002);
        assert!(o.filled());
    }

    #[test]
    fn add_fill_rounds_remaining_to_quantity_precision() {
        let mut o = order();
        o.add_fill("3.12345".parse().unwrap(), 3, 1001);
        assert_eq!(o.remaining, "6.877".parse().unwrap());
    }

    #[test]
    fn update_quantity_resets_remaining_discarding_partial_fills() {
        let mut o = order();
        o.add_fill("4".parse().unwrap(), 5, 1001);
        assert_eq!(o.remaining, "6".parse().unwrap());
        o.update(None, Some("20".parse().unwrap()), 1002);
        assert_eq!(o.quantity, "20".parse().unwrap());
        assert_eq!(o.remaining, "20".parse().unwrap());
    }

    #[test]
    fn update_with_unchanged_values_does_not_bump_updated_ts() {
        let mut o = order();
        let before = o.updated_ts;
        o.update(Some(o.price), Some(o.quantity), 9999);
        assert_eq!(o.updated_ts, before);
    }
}
