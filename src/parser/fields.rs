//! Per-event-type field extraction.
//!
//! Each parser takes the tokenized field slice (timestamp and discriminator
//! included, so payload starts at index 2) plus the reconstructed event
//! time, and produces an immutable record — or `None` when the line is
//! short or a required token fails to parse. `None` means "skip the line";
//! there is no error path here.

use crate::types::{Border, OrderStatus, Quote, Side, Spread, Trade};

/// Minimum field count for a `Top` line.
pub const MIN_TOP_FIELDS: usize = 5;
/// Minimum field count for a `UserTrade` line.
pub const MIN_TRADE_FIELDS: usize = 6;
/// Minimum field count for a `Border` line.
pub const MIN_BORDER_FIELDS: usize = 6;
/// Minimum field count for a `Spreads` line.
pub const MIN_SPREAD_FIELDS: usize = 3;
/// Minimum field count for a `UserOrder` line.
pub const MIN_ORDER_FIELDS: usize = 9;

/// Parse a float token. Fields arrive pre-trimmed from the tokenizer.
#[inline]
fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Parse a `Top` line: symbol at field 2, ask at 3, bid at 4.
///
/// Returns the symbol alongside the quote; the caller routes the quote to
/// the spot or linear sequence based on the symbol.
pub fn parse_top(fields: &[&str], time: i64) -> Option<(String, Quote)> {
    if fields.len() < MIN_TOP_FIELDS {
        return None;
    }
    let symbol = fields[2].to_string();
    let ask = parse_float(fields[3])?;
    let bid = parse_float(fields[4])?;
    Some((symbol, Quote { time, ask, bid }))
}

/// Parse a `UserTrade` line: symbol at 2, price at 3, side at 5.
pub fn parse_trade(fields: &[&str], time: i64) -> Option<Trade> {
    if fields.len() < MIN_TRADE_FIELDS {
        return None;
    }
    let symbol = fields[2].to_string();
    let price = parse_float(fields[3])?;
    let side = Side::parse(fields[5])?;
    Some(Trade {
        time,
        price,
        side,
        symbol,
    })
}

/// Parse a `Border` line: four required floats at fields 2–5.
pub fn parse_border(fields: &[&str], time: i64) -> Option<Border> {
    if fields.len() < MIN_BORDER_FIELDS {
        return None;
    }
    Some(Border {
        time,
        b1: parse_float(fields[2])?,
        b2: parse_float(fields[3])?,
        b3: parse_float(fields[4])?,
        b4: parse_float(fields[5])?,
    })
}

/// Parse a `Spreads` line: required float at field 2, optional float at
/// field 3 defaulting to the first value when absent or unparseable.
pub fn parse_spread(fields: &[&str], time: i64) -> Option<Spread> {
    if fields.len() < MIN_SPREAD_FIELDS {
        return None;
    }
    let s1 = parse_float(fields[2])?;
    let s2 = fields
        .get(3)
        .and_then(|raw| parse_float(raw))
        .unwrap_or(s1);
    Some(Spread { time, s1, s2 })
}

/// A structured `UserOrder` event, handed to the lifecycle tracker.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    /// Reconstructed event time (µs since base midnight).
    pub time: i64,
    /// Instrument symbol (field 2).
    pub symbol: String,
    /// Order price (field 3), or 0.0 when unparseable — close events in
    /// particular often carry empty prices.
    pub price: f64,
    /// Parsed side (field 6), if the token was a valid side. Close events
    /// with malformed sides can still resolve by order id.
    pub side: Option<Side>,
    /// Venue order identifier (field 7); may be empty or `"0"`.
    pub order_id: String,
    /// Parsed status (field 8).
    pub status: OrderStatus,
}

/// Parse a `UserOrder` line: symbol at 2, price at 3, side at 6, order id
/// at 7, status at 8.
///
/// Returns `None` when the line is short or the status token is not one
/// the lifecycle machine knows; an unparseable price defaults to 0.0 and
/// an unparseable side stays `None` (the tracker decides whether that
/// matters for the given status).
pub fn parse_order(fields: &[&str], time: i64) -> Option<OrderEvent> {
    if fields.len() < MIN_ORDER_FIELDS {
        return None;
    }
    let status = OrderStatus::parse(fields[8])?;
    Some(OrderEvent {
        time,
        symbol: fields[2].to_string(),
        price: parse_float(fields[3]).unwrap_or(0.0),
        side: Side::parse(fields[6]),
        order_id: fields[7].to_string(),
        status,
    })
}
