//! Core data types for reconstructed trading-activity records.
//!
//! All records carry timestamps as `i64` microseconds since an arbitrary
//! fixed base midnight. The log format only provides a time of day, so
//! absolute dates are meaningless — only differences (and the ordering the
//! clock reconstruction produces) matter. See [`crate::parser::clock`].
//!
//! Records are immutable once produced, with one exception: [`OrderRecord`]
//! is mutated in place by the lifecycle tracker while the order is open, and
//! frozen once emitted into [`ParsedDataset::orders`].

use serde::{Deserialize, Serialize};

/// Order/trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order or buy-side fill.
    Buy,
    /// Sell order or sell-side fill.
    Sell,
}

impl Side {
    /// Parse a side token case-insensitively (`buy` / `sell`).
    ///
    /// Returns `None` for anything else, including empty/whitespace tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("buy") {
            Some(Side::Buy)
        } else if raw.eq_ignore_ascii_case("sell") {
            Some(Side::Sell)
        } else {
            None
        }
    }

    /// Check if this is a buy.
    #[inline(always)]
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// Order status, as it appears in the log plus the two synthesized
/// terminal states ([`Replaced`](OrderStatus::Replaced) and
/// [`ActiveAtEnd`](OrderStatus::ActiveAtEnd)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order was just placed.
    New,
    /// Order was partially filled.
    PartiallyFilled,
    /// Conditional order waiting for its trigger.
    Untriggered,
    /// Conditional order whose trigger fired.
    Triggered,
    /// Order was fully filled.
    Filled,
    /// Order was cancelled (the log spells this both `Cancelled` and
    /// `Canceled`; both map here).
    Cancelled,
    /// Order was rejected by the venue.
    Rejected,
    /// Synthesized: a newer order took over this order's (symbol, side)
    /// slot before a terminal event arrived.
    Replaced,
    /// Synthesized: the order was still open when the log ended.
    ActiveAtEnd,
}

impl OrderStatus {
    /// Parse a status token from the log.
    ///
    /// Only statuses the log can legitimately carry are recognized;
    /// `Replaced` and `ActiveAtEnd` are synthesized by the lifecycle
    /// tracker and never parsed. Unknown tokens yield `None` and the
    /// event is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "New" => Some(OrderStatus::New),
            "PartiallyFilled" => Some(OrderStatus::PartiallyFilled),
            "Untriggered" => Some(OrderStatus::Untriggered),
            "Triggered" => Some(OrderStatus::Triggered),
            "Filled" => Some(OrderStatus::Filled),
            "Cancelled" | "Canceled" => Some(OrderStatus::Cancelled),
            "Rejected" => Some(OrderStatus::Rejected),
            _ => None,
        }
    }

    /// Whether this status closes the order.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Rejected
                | OrderStatus::Replaced
                | OrderStatus::ActiveAtEnd
        )
    }

    /// Whether this is a non-terminal progress update (resolved by order
    /// id only).
    #[inline]
    pub fn is_progress(self) -> bool {
        matches!(
            self,
            OrderStatus::PartiallyFilled | OrderStatus::Untriggered | OrderStatus::Triggered
        )
    }
}

/// A top-of-book price quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Reconstructed timestamp (µs since base midnight).
    pub time: i64,
    /// Best ask price.
    pub ask: f64,
    /// Best bid price.
    pub bid: f64,
}

/// An executed user fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Reconstructed timestamp (µs since base midnight).
    pub time: i64,
    /// Fill price.
    pub price: f64,
    /// Fill side.
    pub side: Side,
    /// Instrument symbol.
    pub symbol: String,
}

/// A spread observation. `s2` equals `s1` when the log omitted the
/// second value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    /// Reconstructed timestamp (µs since base midnight).
    pub time: i64,
    /// First spread value.
    pub s1: f64,
    /// Second spread value (defaults to `s1`).
    pub s2: f64,
}

/// A border/band observation with four required values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Reconstructed timestamp (µs since base midnight).
    pub time: i64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub b4: f64,
}

/// A complete order record: opened by a `New` event, optionally updated by
/// progress events, and closed by a terminal event, a replacement, or the
/// end-of-stream flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// When the `New` event was seen (µs since base midnight).
    pub start_time: i64,
    /// When the order closed. Equals `start_time` while the order is open.
    pub end_time: i64,
    /// Order price (0.0 when the log carried an unparseable price).
    pub price: f64,
    /// Order side.
    pub side: Side,
    /// Instrument symbol.
    pub symbol: String,
    /// Venue order identifier. May be empty or `"0"` for orders the log
    /// never identified.
    pub order_id: String,
    /// Last observed non-terminal status.
    pub status: OrderStatus,
    /// Terminal status the order closed with.
    pub final_status: OrderStatus,
}

impl OrderRecord {
    /// Create a freshly opened order. `end_time` starts equal to
    /// `start_time` and both status fields start at `New`, matching the
    /// state right after the opening event.
    pub fn open(
        start_time: i64,
        price: f64,
        side: Side,
        symbol: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: start_time,
            price,
            side,
            symbol: symbol.into(),
            order_id: order_id.into(),
            status: OrderStatus::New,
            final_status: OrderStatus::New,
        }
    }

    /// Lifetime of the order in microseconds.
    pub fn duration_us(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Whether the order closed with a legitimate terminal status (as
    /// opposed to still carrying `New`, which only happens while open).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.final_status.is_terminal()
    }
}

/// The root output aggregate: six independently owned record sequences.
///
/// After [`crate::LogParser::finish`] each sequence is stably sorted
/// ascending by its own timestamp field (`start_time` for orders). The
/// sequences are never merged or cross-referenced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDataset {
    /// Quotes whose symbol matched the spot marker.
    pub spot_quotes: Vec<Quote>,
    /// Quotes whose symbol matched the linear (perpetual) marker.
    pub linear_quotes: Vec<Quote>,
    /// Completed order records.
    pub orders: Vec<OrderRecord>,
    /// Executed user fills.
    pub trades: Vec<Trade>,
    /// Spread observations.
    pub spreads: Vec<Spread>,
    /// Border/band observations.
    pub borders: Vec<Border>,
}

impl ParsedDataset {
    /// Create a new empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all six sequences.
    pub fn total_records(&self) -> usize {
        self.spot_quotes.len()
            + self.linear_quotes.len()
            + self.orders.len()
            + self.trades.len()
            + self.spreads.len()
            + self.borders.len()
    }

    /// Whether all six sequences are empty.
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Stably sort each sequence ascending by its own timestamp field.
    ///
    /// Small backward jumps inside the clock's untreated noise band are
    /// possible in the raw accumulation order; sorting masks them for
    /// charting purposes without implying event causality for ties.
    pub fn sort(&mut self) {
        self.spot_quotes.sort_by_key(|q| q.time);
        self.linear_quotes.sort_by_key(|q| q.time);
        self.orders.sort_by_key(|o| o.start_time);
        self.trades.sort_by_key(|t| t.time);
        self.spreads.sort_by_key(|s| s.time);
        self.borders.sort_by_key(|b| b.time);
    }

    /// Save the dataset to a JSON file (pretty-printed).
    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }

    /// Load a dataset from a JSON file.
    pub fn load_json(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
