//! # Single-instrument limit order book matching core
//!
//! Deterministic, single-writer matching engine for one instrument: a
//! price/time-priority book with five order operations (new limit,
//! marketable limit, market, cancel, amend), exact decimal tick/lot
//! arithmetic, and an injectable private-notification callback.
//!
//! The network transport, client SDK, configuration plumbing, demo driver,
//! and market-data fan-out that would sit around this core are out of scope
//! here; they are expected to drive the book through [`Orderbook`]'s public
//! operations and consume notifications through a [`notify::PrivateNotifier`]
//! implementation of their own.
//!
//! ## Example
//!
//! ```rust
//! use lob_matching_core::instrument::Instrument;
//! use lob_matching_core::notify::InMemoryNotifier;
//! use lob_matching_core::orderbook::Orderbook;
//! use lob_matching_core::types::{ClientId, Side};
//!
//! let instrument = Instrument::test_instrument();
//! let mut book = Orderbook::new(instrument);
//! let mut notifier = InMemoryNotifier::new();
//!
//! book.on_limit(Side::Bid, "10".parse().unwrap(), "2.002".parse().unwrap(), ClientId::from("alice"), &mut notifier).unwrap();
//! assert_eq!(book.best_bid(), Some("2.002".parse().unwrap()));
//! ```

pub mod arena;
pub mod error;
pub mod instrument;
pub mod notify;
pub mod order;
pub mod orderbook;
pub mod queue;
pub mod types;

pub use error::EngineError;
pub use instrument::Instrument;
pub use notify::{EventStatus, InMemoryNotifier, LoggingNotifier, PrivateEvent, PrivateNotifier};
pub use order::Order;
pub use orderbook::{BookState, CancelAccounting, Orderbook};
pub use queue::Queue;
pub use types::{ClientId, OrderId, Side, Timestamp};
