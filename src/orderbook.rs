//! The book: both ladders, the price and order indices, and the five
//! order operations. Grounded line-for-line on
//! `original_source/lobsim/orderbook.py::Orderbook` for the algorithms;
//! surface style (public method naming, `log::debug!` density, inline
//! `#[cfg(test)] mod tests`) follows the teacher's `src/order_book.rs` and
//! `src/engine.rs`.

use crate::arena::{Arena, Index};
use crate::error::EngineError;
use crate::instrument::Instrument;
use crate::notify::{EventStatus, PrivateEvent, PrivateNotifier};
use crate::order::Order;
use crate::queue::{queue_add, queue_fill, queue_remove, Queue};
use crate::types::{ClientId, OrderId, Side, Timestamp};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// How much volume `on_cancel` deducts from `best_volumes` for a partially
/// filled order. `spec.md` §9 ambiguity #1: the original always deducts the
/// original quantity, double-counting the already-filled portion. Exposed
/// here as an explicit policy rather than silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAccounting {
    /// Deduct `order.quantity`, matching the original implementation.
    OriginalQuantity,
    /// Deduct `order.remaining`, the corrected behavior.
    Remaining,
}

impl Default for CancelAccounting {
    fn default() -> Self {
        CancelAccounting::OriginalQuantity
    }
}

/// Source of engine timestamps. Defaults to the system clock; tests and
/// deterministic replay supply their own so two runs of the same operation
/// stream produce byte-identical notifications.
pub type Clock = Box<dyn FnMut() -> Timestamp>;

fn system_clock() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Snapshot returned by [`Orderbook::get_state`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BookState {
    pub ts: Timestamp,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

pub struct Orderbook {
    instrument: Instrument,
    cancel_accounting: CancelAccounting,
    clock: Clock,

    orders: Arena<Order>,
    queues: Arena<Queue>,
    order_index: HashMap<OrderId, Index>,
    price_index: HashMap<Decimal, Index>,

    best_bid: Option<Index>,
    best_ask: Option<Index>,
    bid_volume: Decimal,
    ask_volume: Decimal,

    min_bid: Option<Decimal>,
    max_ask: Option<Decimal>,
    prev_mid: Option<Decimal>,
    curr_mid: Option<Decimal>,

    next_order_id: u64,
}

impl Orderbook {
    pub fn new(instrument: Instrument) -> Self {
        Self::with_clock(instrument, CancelAccounting::default(), Box::new(system_clock))
    }

    pub fn with_clock(instrument: Instrument, cancel_accounting: CancelAccounting, clock: Clock) -> Self {
        Self {
            instrument,
            cancel_accounting,
            clock,
            orders: Arena::new(),
            queues: Arena::new(),
            order_index: HashMap::new(),
            price_index: HashMap::new(),
            best_bid: None,
            best_ask: None,
            bid_volume: Decimal::ZERO,
            ask_volume: Decimal::ZERO,
            min_bid: None,
            max_ask: None,
            prev_mid: None,
            curr_mid: None,
            next_order_id: 1,
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    fn best(&self, side: Side) -> Option<Index> {
        match side {
            Side::Bid => self.best_bid,
            Side::Ask => self.best_ask,
        }
    }

    fn set_best(&mut self, side: Side, idx: Option<Index>) {
        match side {
            Side::Bid => self.best_bid = idx,
            Side::Ask => self.best_ask = idx,
        }
    }

    fn volume(&self, side: Side) -> Decimal {
        match side {
            Side::Bid => self.bid_volume,
            Side::Ask => self.ask_volume,
        }
    }

    fn add_volume(&mut self, side: Side, delta: Decimal) {
        let q = self.instrument.quantity_precision;
        match side {
            Side::Bid => self.bid_volume = (self.bid_volume + delta).round_dp(q),
            Side::Ask => self.ask_volume = (self.ask_volume + delta).round_dp(q),
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.best_bid.map(|i| self.queues.expect(i).limit)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.best_ask.map(|i| self.queues.expect(i).limit)
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        self.curr_mid
    }

    pub fn best_volumes(&self, side: Side) -> Decimal {
        self.volume(side)
    }

    /// Ticks between the extreme resting price on `side` and its current
    /// best. `None` if that side is empty. See `original_source`'s
    /// `Orderbook.depth`.
    pub fn depth(&self, side: Side) -> Option<i64> {
        let best_idx = self.best(side)?;
        let extreme = match side {
            Side::Bid => self.min_bid?,
            Side::Ask => self.max_ask?,
        };
        let best_limit = self.queues.expect(best_idx).limit;
        let ticks = (side * (best_limit - extreme)) / self.instrument.tick_size;
        Some(ticks.trunc().to_i64().unwrap_or(0))
    }

    fn now(&mut self) -> Timestamp {
        (self.clock)()
    }

    fn validate_price(&self, price: Decimal) -> Result<(), EngineError> {
        if self.instrument.is_valid_price(price) {
            Ok(())
        } else {
            Err(EngineError::InvalidPrice {
                price,
                min: self.instrument.min_price,
                max: self.instrument.max_price,
            })
        }
    }

    fn validate_quantity(&self, quantity: Decimal) -> Result<(), EngineError> {
        if self.instrument.is_valid_quantity(quantity) {
            Ok(())
        } else {
            Err(EngineError::InvalidQuantity {
                quantity,
                min: self.instrument.min_qty,
                max: self.instrument.max_qty,
            })
        }
    }

    fn reject(&mut self, notifier: &mut dyn PrivateNotifier, client_id: &ClientId, side: Side, quantity: Decimal, reason: String) {
        log::error!("{reason}");
        let ts = self.now();
        let mut event = PrivateEvent::new(EventStatus::Rejected, ts);
        event.side = Some(side);
        event.quantity = Some(quantity);
        event.reason = Some(reason);
        notifier.notify(client_id, event);
    }

    /// `_update_mid` from the source. Both-sides branch is the only one
    /// that touches `prev_mid`; single-side transitions leave it stale —
    /// this is intentional, not a bug (`spec.md` §9 ambiguity #4).
    fn update_mid(&mut self) {
        let (bid, ask) = (self.best_bid, self.best_ask);
        match (bid, ask) {
            (None, None) => {
                self.prev_mid = None;
                self.curr_mid = None;
            }
            (Some(b), None) => {
                let limit = self.queues.expect(b).limit;
                self.curr_mid = Some(self.instrument.adjust_price(limit + self.instrument.tick_size / Decimal::TWO));
            }
            (None, Some(a)) => {
                let limit = self.queues.expect(a).limit;
                self.curr_mid = Some(self.instrument.adjust_price(limit - self.instrument.tick_size / Decimal::TWO));
            }
            (Some(b), Some(a)) => {
                let best_bid = self.queues.expect(b).limit;
                let best_ask = self.queues.expect(a).limit;
                let prev_mid = self.curr_mid;
                self.prev_mid = prev_mid;
                let half_tick = self.instrument.tick_size / Decimal::TWO;
                let mut mid = self.instrument.adjust_price((best_bid + best_ask) / Decimal::TWO);
                if mid % self.instrument.tick_size == Decimal::ZERO {
                    // Lands exactly on the tick grid; nudge half a tick away
                    // from prev_mid so mid always sits strictly between ticks.
                    let nudge_up = match prev_mid {
                        Some(p) => mid < p,
                        // No prior two-sided mid to compare against: an
                        // arbitrary but deterministic tie-break (see
                        // SPEC_FULL.md §4.5 / DESIGN.md item 6).
                        None => false,
                    };
                    if nudge_up {
                        mid += half_tick;
                    } else {
                        mid -= half_tick;
                    }
                }
                self.curr_mid = Some(self.instrument.adjust_price(mid));
            }
        }
    }

    fn next_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    /// `_find_prev_queue`: walks toward more aggressive prices from `price`
    /// one tick at a time until an existing queue is found.
    fn find_prev_queue(&self, price: Decimal, side: Side) -> Index {
        let mut current = price;
        loop {
            current = self.instrument.adjust_price(current + self.instrument.tick_size * side);
            if let Some(&idx) = self.price_index.get(&current) {
                return idx;
            }
        }
    }

    /// `_create_queue`: allocates a queue at `price` and splices it into the
    /// ladder for `side`.
    fn create_queue(&mut self, side: Side, price: Decimal) -> Index {
        match side {
            Side::Bid => {
                self.min_bid = Some(match self.min_bid {
                    Some(m) => m.min(price),
                    None => price,
                });
            }
            Side::Ask => {
                self.max_ask = Some(match self.max_ask {
                    Some(m) => m.max(price),
                    None => price,
                });
            }
        }

        let idx = self.queues.insert(Queue::new(price, side));

        match self.best(side) {
            None => {
                self.set_best(side, Some(idx));
                self.update_mid();
            }
            Some(best_idx) => {
                let best_limit = self.queues.expect(best_idx).limit;
                if side * price > side * best_limit {
                    {
                        let q = self.queues.expect_mut(idx);
                        q.qprev = None;
                        q.qnext = Some(best_idx);
                    }
                    self.queues.expect_mut(best_idx).qprev = Some(idx);
                    self.set_best(side, Some(idx));
                    self.update_mid();
                } else {
                    let prev_idx = self.find_prev_queue(price, side);
                    let prev_next = self.queues.expect(prev_idx).qnext;
                    {
                        let q = self.queues.expect_mut(idx);
                        q.qprev = Some(prev_idx);
                        q.qnext = prev_next;
                    }
                    if let Some(next_idx) = prev_next {
                        self.queues.expect_mut(next_idx).qprev = Some(idx);
                    }
                    self.queues.expect_mut(prev_idx).qnext = Some(idx);
                }
            }
        }

        self.price_index.insert(price, idx);
        idx
    }

    /// `_delete_queue`: splices an emptied queue out of its ladder and
    /// maintains the `min_bid`/`max_ask` extremum.
    fn delete_queue(&mut self, side: Side, idx: Index) {
        let (qprev, qnext, limit) = {
            let q = self.queues.expect(idx);
            (q.qprev, q.qnext, q.limit)
        };

        if self.best(side) == Some(idx) {
            self.set_best(side, qnext);
            if let Some(n) = qnext {
                self.queues.expect_mut(n).qprev = None;
            }
            self.update_mid();
        } else {
            if let Some(p) = qprev {
                self.queues.expect_mut(p).qnext = qnext;
            }
            if let Some(n) = qnext {
                self.queues.expect_mut(n).qprev = qprev;
            }
        }

        match side {
            Side::Bid => {
                if self.min_bid == Some(limit) {
                    self.min_bid = qprev.map(|p| self.queues.expect(p).limit);
                }
            }
            Side::Ask => {
                if self.max_ask == Some(limit) {
                    self.max_ask = qprev.map(|p| self.queues.expect(p).limit);
                }
            }
        }

        self.price_index.remove(&limit);
        self.queues.remove(idx);
    }

    /// Gets the existing queue at `price` on `side`, creating one if absent.
    fn queue_for(&mut self, side: Side, price: Decimal) -> Index {
        match self.price_index.get(&price) {
            Some(&idx) => idx,
            None => self.create_queue(side, price),
        }
    }

    /// `_insert_order`: records a brand-new order in the book at its own price.
    fn insert_order(
        &mut self,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        owner: ClientId,
        ts: Timestamp,
        notifier: &mut dyn PrivateNotifier,
    ) -> OrderId {
        let order_id = self.next_order_id();
        let order = Order::new(order_id, owner, side, price, quantity, ts);
        let order_idx = self.orders.insert(order);
        self.order_index.insert(order_id, order_idx);

        let queue_idx = self.queue_for(side, price);
        queue_add(&mut self.queues, &mut self.orders, queue_idx, order_idx, notifier);
        self.add_volume(side, quantity);
        order_id
    }

    /// Places a resting limit order, or delegates to [`Orderbook::on_marketable`]
    /// if it would cross or touch the opposite best (`spec.md` §4.4.1).
    pub fn on_limit(
        &mut self,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        client_id: ClientId,
        notifier: &mut dyn PrivateNotifier,
    ) -> Result<Option<OrderId>, EngineError> {
        self.validate_price(price)?;
        self.validate_quantity(quantity)?;
        let price = self.instrument.adjust_price(price);
        let quantity = self.instrument.adjust_quantity(quantity);

        if let Some(opp_idx) = self.best(side.opposite()) {
            let opp_limit = self.queues.expect(opp_idx).limit;
            if side * price >= side * opp_limit {
                log::warn!("crossing the spread, sending a marketable order instead");
                return self.on_marketable(side, quantity, price, client_id, notifier);
            }
        }

        let ts = self.now();
        Ok(Some(self.insert_order(side, quantity, price, client_id, ts, notifier)))
    }

    /// Walks the opposite side consuming liquidity up to `price`, resting
    /// any leftover quantity (`spec.md` §4.4.2). Returns the id of the
    /// resting remainder, or `None` if the order was fully filled by the walk.
    pub fn on_marketable(
        &mut self,
        side: Side,
        mut quantity: Decimal,
        price: Decimal,
        client_id: ClientId,
        notifier: &mut dyn PrivateNotifier,
    ) -> Result<Option<OrderId>, EngineError> {
        self.validate_price(price)?;
        self.validate_quantity(quantity)?;
        let price = self.instrument.adjust_price(price);
        quantity = self.instrument.adjust_quantity(quantity);
        let opp_side = side.opposite();

        if self.best(opp_side).is_none() {
            self.reject(notifier, &client_id, side, quantity, "no available liquidity in market".to_string());
            return Ok(None);
        }

        loop {
            let opp_idx = match self.best(opp_side) {
                Some(i) => i,
                None => break,
            };
            let opp_limit = self.queues.expect(opp_idx).limit;
            if quantity == Decimal::ZERO || !(side * opp_limit <= side * price) {
                break;
            }

            let head_idx = match self.queues.expect(opp_idx).ohead {
                Some(h) => h,
                None => break,
            };
            let head_order_id = self.orders.expect(head_idx).order_id;
            let head_remaining = self.orders.expect(head_idx).remaining;
            let fill_qty = quantity.min(head_remaining);

            let ts = self.now();
            queue_fill(
                &mut self.queues,
                &mut self.orders,
                opp_idx,
                head_idx,
                fill_qty,
                ts,
                self.instrument.quantity_precision,
                notifier,
            );
            self.add_volume(opp_side, -fill_qty);

            if self.orders.expect(head_idx).filled() {
                queue_remove(&mut self.queues, &mut self.orders, opp_idx, head_idx);
                self.order_index.remove(&head_order_id);
                self.orders.remove(head_idx);
            }

            quantity = self.instrument.adjust_quantity(quantity - fill_qty);
            if self.queues.expect(opp_idx).is_empty() {
                self.delete_queue(opp_side, opp_idx);
            }
        }

        if quantity != Decimal::ZERO {
            log::warn!("no more liquidity on best limits, placing a resting order for the remainder");
            let ts = self.now();
            Ok(Some(self.insert_order(side, quantity, price, client_id, ts, notifier)))
        } else {
            Ok(None)
        }
    }

    /// Consumes up to `quantity` from `side`'s aggregate liquidity with no
    /// price ceiling, rejecting up front if there isn't enough
    /// (`spec.md` §4.4.3). `side` names the side whose liquidity is
    /// consumed: a buy market order passes [`Side::Ask`] (`spec.md` §9
    /// ambiguity #5) — callers, not this method, flip the sign.
    pub fn on_market(
        &mut self,
        side: Side,
        quantity: Decimal,
        client_id: ClientId,
        notifier: &mut dyn PrivateNotifier,
    ) -> Result<(), EngineError> {
        self.validate_quantity(quantity)?;
        let quantity = self.instrument.adjust_quantity(quantity);
        let available = self.volume(side);
        if quantity > available {
            self.reject(
                notifier,
                &client_id,
                side,
                quantity,
                format!("quantity {quantity} is greater than available liquidity {available}"),
            );
            return Ok(());
        }

        let mut remaining = quantity;
        while remaining != Decimal::ZERO {
            let idx = match self.best(side) {
                Some(i) => i,
                None => {
                    self.reject(notifier, &client_id, side, quantity, "no available liquidity in market".to_string());
                    return Ok(());
                }
            };
            let head_idx = match self.queues.expect(idx).ohead {
                Some(h) => h,
                None => break,
            };
            let head_order_id = self.orders.expect(head_idx).order_id;
            let head_remaining = self.orders.expect(head_idx).remaining;
            let fill_qty = remaining.min(head_remaining);

            let ts = self.now();
            queue_fill(
                &mut self.queues,
                &mut self.orders,
                idx,
                head_idx,
                fill_qty,
                ts,
                self.instrument.quantity_precision,
                notifier,
            );
            self.add_volume(side, -fill_qty);

            if self.orders.expect(head_idx).filled() {
                queue_remove(&mut self.queues, &mut self.orders, idx, head_idx);
                self.order_index.remove(&head_order_id);
                self.orders.remove(head_idx);
            }
            if self.queues.expect(idx).is_empty() {
                self.delete_queue(side, idx);
            }
            remaining = self.instrument.adjust_quantity(remaining - fill_qty);
        }
        log::info!("market order executed for {client_id}: {side} {quantity}");
        Ok(())
    }

    /// Cancels a resting order (`spec.md` §4.4.4). The volume deducted from
    /// `best_volumes` is governed by `cancel_accounting`.
    pub fn on_cancel(&mut self, order_id: OrderId, notifier: &mut dyn PrivateNotifier) -> Result<(), EngineError> {
        let order_idx = *self.order_index.get(&order_id).ok_or(EngineError::UnknownOrder(order_id))?;
        let order = self.orders.expect(order_idx).clone();
        let queue_idx = order.queue.expect("resting order always has a queue");

        log::debug!("order {order_id} is being cancelled");
        let ts = self.now();

        queue_remove(&mut self.queues, &mut self.orders, queue_idx, order_idx);
        let deduction = match self.cancel_accounting {
            CancelAccounting::OriginalQuantity => order.quantity,
            CancelAccounting::Remaining => order.remaining,
        };
        self.add_volume(order.side, -deduction);

        if self.queues.expect(queue_idx).is_empty() {
            self.delete_queue(order.side, queue_idx);
        }
        self.order_index.remove(&order_id);
        self.orders.remove(order_idx);

        let mut event = PrivateEvent::new(EventStatus::Cancelled, ts);
        event.order_id = Some(order_id);
        event.side = Some(order.side);
        event.price = Some(order.price);
        event.quantity = Some(order.quantity);
        event.remaining = Some(order.remaining);
        event.created = Some(order.created_ts);
        event.updated = Some(order.updated_ts);
        notifier.notify(&order.owner, event);
        Ok(())
    }

    /// Amends a resting order's price and/or quantity (`spec.md` §4.4.5).
    /// If the new price would cross the mid, the original order is
    /// discarded with no notification and the amendment is resubmitted as
    /// a fresh [`Orderbook::on_marketable`] — preserved literally from the
    /// source, including the lack of a "Cancelled" notification for the
    /// discarded original.
    pub fn on_amend(
        &mut self,
        order_id: OrderId,
        quantity: Decimal,
        price: Decimal,
        notifier: &mut dyn PrivateNotifier,
    ) -> Result<Option<OrderId>, EngineError> {
        self.validate_price(price)?;
        self.validate_quantity(quantity)?;
        let price = self.instrument.adjust_price(price);
        let quantity = self.instrument.adjust_quantity(quantity);

        let order_idx = *self.order_index.get(&order_id).ok_or(EngineError::UnknownOrder(order_id))?;
        let mut order = self.orders.expect(order_idx).clone();
        let side = order.side;
        let old_queue_idx = order.queue.expect("resting order always has a queue");
        let old_price = order.price;
        let old_quantity = order.quantity;

        log::warn!("amending order {order_id}: quantity={quantity}, price={price}");

        queue_remove(&mut self.queues, &mut self.orders, old_queue_idx, order_idx);
        self.add_volume(side, -old_quantity);

        let old_queue_now_empty = self.queues.expect(old_queue_idx).is_empty();
        if old_queue_now_empty && old_price != price {
            self.delete_queue(side, old_queue_idx);
        }

        let crosses_mid = match self.curr_mid {
            Some(mid) => side * price >= side * mid,
            // No mid to compare against (this was the book's last order on
            // both sides): nothing to cross, so it cannot be marketable.
            None => false,
        };
        if crosses_mid {
            log::warn!("modifying a limit order to a marketable limit order");
            self.order_index.remove(&order_id);
            self.orders.remove(order_idx);
            return self.on_marketable(side, quantity, price, order.owner.clone(), notifier);
        }

        let new_queue_idx = if old_price == price && !old_queue_now_empty {
            old_queue_idx
        } else {
            self.queue_for(side, price)
        };

        let ts = self.now();
        order.update(Some(price), Some(quantity), ts);
        *self.orders.expect_mut(order_idx) = order.clone();
        // queue_add always emits "New order"; the amend path instead emits a
        // single "Amended" notification below, so route queue_add's own
        // notification to a null sink and emit the real one ourselves.
        queue_add(&mut self.queues, &mut self.orders, new_queue_idx, order_idx, &mut crate::notify::NullNotifier::default());
        self.add_volume(side, quantity);

        let order = self.orders.expect(order_idx).clone();
        log::info!("amended order {order_id}");
        let mut event = PrivateEvent::new(EventStatus::Amended, ts);
        event.order_id = Some(order.order_id);
        event.side = Some(order.side);
        event.price = Some(order.price);
        event.quantity = Some(order.quantity);
        event.remaining = Some(order.remaining);
        event.created = Some(order.created_ts);
        event.updated = Some(order.updated_ts);
        notifier.notify(&order.owner, event);
        Ok(Some(order_id))
    }

    /// Bootstraps the book from aggregate `(price, volume)` pairs, splitting
    /// each into `volume / unit_size` synthetic orders owned by `"system"`
    /// (`spec.md` §4.7).
    pub fn init_state(
        &mut self,
        unit_size: Decimal,
        bid_state: &[(Decimal, Decimal)],
        ask_state: &[(Decimal, Decimal)],
    ) {
        log::debug!("initializing the book state");
        let owner = ClientId::from("system");
        let mut sink = crate::notify::LoggingNotifier::default();
        for &(side, state) in &[(Side::Bid, bid_state), (Side::Ask, ask_state)] {
            for &(price, volume) in state {
                let count = (volume / unit_size).trunc();
                let mut n = Decimal::ZERO;
                while n < count {
                    let ts = self.now();
                    self.insert_order(side, unit_size, price, owner.clone(), ts, &mut sink);
                    n += Decimal::ONE;
                }
            }
        }
    }

    /// Snapshot both ladders best-first (`spec.md` §4.6).
    pub fn get_state(&mut self) -> BookState {
        let ts = self.now();
        let mut bids = Vec::new();
        let mut asks = Vec::new();
        let mut qb = self.best_bid;
        let mut qa = self.best_ask;
        while qb.is_some() || qa.is_some() {
            if let Some(b) = qb {
                let q = self.queues.expect(b);
                bids.push((q.limit, q.volume));
                qb = q.qnext;
            }
            if let Some(a) = qa {
                let q = self.queues.expect(a);
                asks.push((q.limit, q.volume));
                qa = q.qnext;
            }
        }
        BookState { ts, bids, asks }
    }
}

impl fmt::Display for Orderbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orderbook for symbol {}:", self.instrument.symbol)?;
        writeln!(f, "Total bid volume {}\tTotal ask volume {}\n", self.bid_volume, self.ask_volume)?;

        match self.best_bid {
            None => writeln!(f, "|")?,
            Some(best) => {
                let best_limit = self.queues.expect(best).limit;
                let mut price = self.min_bid.unwrap_or(best_limit);
                while price <= best_limit {
                    match self.price_index.get(&price) {
                        None => write!(f, "[V=0 N=0]\tP={price} |")?,
                        Some(&idx) => {
                            let q = self.queues.expect(idx);
                            write!(f, "[V={} N={}]\tP={price} |", q.volume, q.nb_orders)?;
                        }
                    }
                    writeln!(f)?;
                    price = self.instrument.adjust_price(price + self.instrument.tick_size);
                }
            }
        }

        match self.curr_mid {
            Some(mid) => writeln!(f, "                   \tP={mid} |==================== Mid-price")?,
            None => writeln!(f, "====================")?,
        }

        if let Some(best) = self.best_ask {
            let best_limit = self.queues.expect(best).limit;
            let mut price = best_limit;
            let max_ask = self.max_ask.unwrap_or(best_limit);
            while price <= max_ask {
                match self.price_index.get(&price) {
                    None => write!(f, "[V=0 N=0]\tP={price} |")?,
                    Some(&idx) => {
                        let q = self.queues.expect(idx);
                        write!(f, "[V={} N={}]\tP={price} |", q.volume, q.nb_orders)?;
                    }
                }
                writeln!(f)?;
                price = self.instrument.adjust_price(price + self.instrument.tick_size);
            }
        } else {
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
