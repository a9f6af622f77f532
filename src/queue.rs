//! FIFO of resting orders at one exact price on one side of the book.
//!
//! Grounded on `original_source/src/queue.py::Queue`. `Queue` cannot own
//! `&mut Order` the way the Python version holds object references, since
//! orders and queues live in separate arenas (`spec.md` §9 DESIGN NOTES);
//! `queue_add`/`queue_remove`/`queue_fill` are free functions operating on
//! the two arenas plus the queue's own slot, which is the idiomatic Rust
//! shape for a split-borrow intrusive structure.

use crate::arena::{Arena, Index};
use crate::notify::{EventStatus, PrivateEvent, PrivateNotifier};
use crate::order::Order;
use crate::types::{Side, Timestamp};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Queue {
    pub limit: Decimal,
    pub side: Side,
    pub volume: Decimal,
    pub nb_orders: u32,
    pub ohead: Option<Index>,
    pub otail: Option<Index>,
    pub qprev: Option<Index>,
    pub qnext: Option<Index>,
}

impl Queue {
    pub fn new(limit: Decimal, side: Side) -> Self {
        Self {
            limit,
            side,
            volume: Decimal::ZERO,
            nb_orders: 0,
            ohead: None,
            otail: None,
            qprev: None,
            qnext: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.volume == Decimal::ZERO
    }
}

/// Appends `order_idx` at the tail of `queue_idx` and emits `"New order"`.
pub fn queue_add(
    queues: &mut Arena<Queue>,
    orders: &mut Arena<Order>,
    queue_idx: Index,
    order_idx: Index,
    notifier: &mut dyn PrivateNotifier,
) {
    let quantity = orders.expect(order_idx).quantity;
    let ts = orders.expect(order_idx).updated_ts;
    let old_tail = {
        let queue = queues.expect_mut(queue_idx);
        let old_tail = queue.otail;
        if old_tail.is_none() {
            queue.ohead = Some(order_idx);
        }
        queue.otail = Some(order_idx);
        queue.nb_orders += 1;
        queue.volume += quantity;
        old_tail
    };
    {
        let order = orders.expect_mut(order_idx);
        order.queue = Some(queue_idx);
        order.oprev = old_tail;
        order.onext = None;
    }
    if let Some(tail_idx) = old_tail {
        orders.expect_mut(tail_idx).onext = Some(order_idx);
    }

    let order = orders.expect(order_idx);
    let mut event = PrivateEvent::new(EventStatus::NewOrder, ts);
    event.order_id = Some(order.order_id);
    event.side = Some(order.side);
    event.quantity = Some(order.quantity);
    event.remaining = Some(order.remaining);
    event.price = Some(order.price);
    event.created = Some(order.created_ts);
    event.updated = Some(order.updated_ts);
    notifier.notify(&order.owner.clone(), event);
}

/// Unlinks `order_idx` from `queue_idx`'s chain and reconciles `volume`.
///
/// Subtracts `last_filled_quantity` if the order is fully filled (the fill
/// already subtracted everything else via [`queue_fill`]) or `remaining`
/// otherwise (a cancellation of a still-live order).
pub fn queue_remove(queues: &mut Arena<Queue>, orders: &mut Arena<Order>, queue_idx: Index, order_idx: Index) {
    let (oprev, onext, deduction) = {
        let order = orders.expect(order_idx);
        let deduction = if order.filled() {
            order.last_filled_quantity
        } else {
            order.remaining
        };
        (order.oprev, order.onext, deduction)
    };

    match oprev {
        Some(p) => orders.expect_mut(p).onext = onext,
        None => queues.expect_mut(queue_idx).ohead = onext,
    }
    match onext {
        Some(n) => orders.expect_mut(n).oprev = oprev,
        None => queues.expect_mut(queue_idx).otail = oprev,
    }

    let queue = queues.expect_mut(queue_idx);
    queue.nb_orders -= 1;
    queue.volume -= deduction;

    let order = orders.expect_mut(order_idx);
    order.queue = None;
    order.oprev = None;
    order.onext = None;
}

/// Applies a fill of `qty` to the order at the head of `queue_idx`, emitting
/// `"New Fill"` followed by `"Partial fill"` or `"Filled"`. On a partial
/// fill, `qty` is subtracted from `volume` here; on a full fill the final
/// chunk is left for the caller's subsequent [`queue_remove`] to subtract.
pub fn queue_fill(
    queues: &mut Arena<Queue>,
    orders: &mut Arena<Order>,
    queue_idx: Index,
    order_idx: Index,
    qty: Decimal,
    ts: Timestamp,
    quote_precision: u32,
    notifier: &mut dyn PrivateNotifier,
) {
    let qty = qty.round_dp(quote_precision);
    orders.expect_mut(order_idx).add_fill(qty, quote_precision, ts);

    let order = orders.expect(order_idx).clone();
    let mut fill_event = PrivateEvent::new(EventStatus::NewFill, ts);
    fill_event.order_id = Some(order.order_id);
    fill_event.side = Some(order.side);
    fill_event.price = Some(order.price);
    fill_event.quantity = Some(qty);
    fill_event.remaining = Some(order.remaining);
    notifier.notify(&order.owner, fill_event);

    if order.filled() {
        let mut filled_event = PrivateEvent::new(EventStatus::Filled, ts);
        filled_event.order_id = Some(order.order_id);
        filled_event.side = Some(order.side);
        filled_event.price = Some(order.price);
        filled_event.quantity = Some(order.quantity);
        filled_event.remaining = Some(order.remaining);
        notifier.notify(&order.owner, filled_event);
    } else {
        let queue = queues.expect_mut(queue_idx);
        queue.volume = (queue.volume - qty).round_dp(quote_precision);
        let mut partial_event = PrivateEvent::new(EventStatus::PartialFill, ts);
        partial_event.order_id = Some(order.order_id);
        partial_event.side = Some(order.side);
        partial_event.price = Some(order.price);
        partial_event.quantity = Some(qty);
        partial_event.remaining = Some(order.remaining);
        notifier.notify(&order.owner, partial_event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::InMemoryNotifier;
    use crate::types::{ClientId, OrderId};

    fn mk_order(id: u64, qty: &str) -> Order {
        Order::new(
            OrderId(id),
            ClientId::from("alice"),
            Side::Bid,
            "10".parse().unwrap(),
            qty.parse().unwrap(),
            1,
        )
    }

    #[test]
    fn add_links_multiple_orders_fifo() {
        let mut queues = Arena::new();
        let mut orders = Arena::new();
        let mut notifier = InMemoryNotifier::new();
        let q = queues.insert(Queue::new("10".parse().unwrap(), Side::Bid));

        let o1 = orders.insert(mk_order(1, "5"));
        let o2 = orders.insert(mk_order(2, "7"));
        queue_add(&mut queues, &mut orders, q, o1, &mut notifier);
        queue_add(&mut queues, &mut orders, q, o2, &mut notifier);

        let queue = queues.get(q).unwrap();
        assert_eq!(queue.nb_orders, 2);
        assert_eq!(queue.volume, "12".parse().unwrap());
        assert_eq!(queue.ohead, Some(o1));
        assert_eq!(queue.otail, Some(o2));
        assert_eq!(orders.get(o1).unwrap().onext, Some(o2));
        assert_eq!(orders.get(o2).unwrap().oprev, Some(o1));
    }

    #[test]
    fn remove_middle_order_relinks_neighbours() {
        let mut queues = Arena::new();
        let mut orders = Arena::new();
        let mut notifier = InMemoryNotifier::new();
        let q = queues.insert(Queue::new("10".parse().unwrap(), Side::Bid));

        let o1 = orders.insert(mk_order(1, "1"));
        let o2 = orders.insert(mk_order(2, "2"));
        let o3 = orders.insert(mk_order(3, "3"));
        queue_add(&mut queues, &mut orders, q, o1, &mut notifier);
        queue_add(&mut queues, &mut orders, q, o2, &mut notifier);
        queue_add(&mut queues, &mut orders, q, o3, &mut notifier);

        queue_remove(&mut queues, &mut orders, q, o2);

        let queue = queues.get(q).unwrap();
        assert_eq!(queue.nb_orders, 2);
        assert_eq!(queue.volume, "4".parse().unwrap());
        assert_eq!(orders.get(o1).unwrap().onext, Some(o3));
        assert_eq!(orders.get(o3).unwrap().oprev, Some(o1));
    }

    #[test]
    fn fill_then_remove_on_full_fill_does_not_double_count() {
        let mut queues = Arena::new();
        let mut orders = Arena::new();
        let mut notifier = InMemoryNotifier::new();
        let q = queues.insert(Queue::new("10".parse().unwrap(), Side::Bid));
        let o1 = orders.insert(mk_order(1, "5"));
        queue_add(&mut queues, &mut orders, q, o1, &mut notifier);

        queue_fill(&mut queues, &mut orders, q, o1, "5".parse().unwrap(), 2, 3, &mut notifier);
        assert!(orders.get(o1).unwrap().filled());
        // volume still reflects the unfilled order until queue_remove runs
        assert_eq!(queues.get(q).unwrap().volume, "5".parse().unwrap());

        queue_remove(&mut queues, &mut orders, q, o1);
        assert_eq!(queues.get(q).unwrap().volume, Decimal::ZERO);
        assert_eq!(queues.get(q).unwrap().nb_orders, 0);
    }

    #[test]
    fn partial_fill_subtracts_from_volume_immediately() {
        let mut queues = Arena::new();
        let mut orders = Arena::new();
        let mut notifier = InMemoryNotifier::new();
        let q = queues.insert(Queue::new("10".parse().unwrap(), Side::Bid));
        let o1 = orders.insert(mk_order(1, "5"));
        queue_add(&mut queues, &mut orders, q, o1, &mut notifier);

        queue_fill(&mut queues, &mut orders, q, o1, "2".parse().unwrap(), 2, 3, &mut notifier);
        assert!(!orders.get(o1).unwrap().filled());
        assert_eq!(queues.get(q).unwrap().volume, "3".parse().unwrap());
    }
}
