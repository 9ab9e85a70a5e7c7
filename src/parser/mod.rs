//! Log-to-dataset parsing core.
//!
//! The parse is a strictly sequential fold over the input lines: each line
//! flows clock → tokenizer → router → {field parser | lifecycle tracker},
//! and every record lands in the accumulating [`ParsedDataset`]. Nothing
//! during line processing is fatal — malformed lines, unknown event types
//! and unresolvable order events are skipped, counted and (at debug level)
//! logged. After the stream is exhausted the lifecycle tracker flushes its
//! still-open orders and each output sequence is sorted by timestamp.
//!
//! # Example
//!
//! ```
//! use tradelog_reconstructor::LogParser;
//!
//! let mut parser = LogParser::new();
//! parser.process_line("12:00:00.1|Top|BTCUSDT_Spot|100.5|100.4");
//! parser.process_line("12:00:01|UserOrder|BTCUSDT_Linear|100.2|1|x|Buy|42|New");
//! let data = parser.finish();
//!
//! assert_eq!(data.spot_quotes.len(), 1);
//! assert_eq!(data.orders.len(), 1); // flushed as ActiveAtEnd
//! ```

pub mod clock;
pub mod fields;
pub mod lifecycle;
pub mod line;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::{FileSource, LineSource};
use crate::types::{ParsedDataset, Quote};
use clock::TimeReconstructor;
use lifecycle::{LifecycleStats, OrderLifecycleTracker};
use line::{tokenize, EventKind};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the log parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Case-insensitive substring that routes a `Top` quote into the spot
    /// sequence. Default: `"spot"`.
    pub spot_marker: String,

    /// Case-insensitive substring that routes a `Top` quote into the
    /// linear sequence. Default: `"linear"`.
    pub linear_marker: String,

    /// Whether to log skipped lines at debug level.
    pub log_skips: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            spot_marker: "spot".to_string(),
            linear_marker: "linear".to_string(),
            log_skips: true,
        }
    }
}

impl ParserConfig {
    /// Set the spot routing marker.
    pub fn with_spot_marker(mut self, marker: impl Into<String>) -> Self {
        self.spot_marker = marker.into();
        self
    }

    /// Set the linear routing marker.
    pub fn with_linear_marker(mut self, marker: impl Into<String>) -> Self {
        self.linear_marker = marker.into();
        self
    }

    /// Enable/disable skip logging.
    pub fn with_skip_logging(mut self, log: bool) -> Self {
        self.log_skips = log;
        self
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters for one parse run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ParserStats {
    /// Lines fed to the parser.
    pub lines_read: u64,

    /// Lines skipped before routing (no delimiter, too few fields, or an
    /// unparseable timestamp).
    pub lines_skipped: u64,

    /// Lines whose timestamp token failed to parse.
    pub timestamp_failures: u64,

    /// Lines with an unrecognized event discriminator.
    pub unknown_events: u64,

    /// Candle lines recognized and skipped.
    pub candles_skipped: u64,

    /// Recognized events whose field parse failed.
    pub malformed_events: u64,

    /// `Top` quotes dropped because the symbol matched neither marker.
    pub quotes_dropped: u64,

    /// +12 h clock corrections applied.
    pub half_day_corrections: u32,

    /// +24 h clock corrections applied.
    pub full_day_corrections: u32,

    /// Lifecycle tracking counters.
    pub lifecycle: LifecycleStats,
}

// ============================================================================
// Log Parser
// ============================================================================

/// The log-to-dataset parser: fold driver and aggregator in one.
///
/// Feed lines with [`process_line`](Self::process_line) (or use the
/// [`parse_file`] / [`parse_source`] entry points), then call
/// [`finish`](Self::finish) to flush open orders and obtain the sorted
/// dataset. Order-record completion is inherently non-streaming — the set
/// of orders still open is only known once no more closing events can
/// arrive — while quote/trade/spread/border records accumulate as they
/// are seen.
#[derive(Debug, Default)]
pub struct LogParser {
    config: ParserConfig,
    clock: TimeReconstructor,
    tracker: OrderLifecycleTracker,
    dataset: ParsedDataset,

    /// Last successfully reconstructed timestamp; the end-of-stream flush
    /// falls back to this (and ultimately to the base origin) when the
    /// clock never adjusted anything.
    last_timestamp: i64,

    lines_read: u64,
    lines_skipped: u64,
    timestamp_failures: u64,
    unknown_events: u64,
    candles_skipped: u64,
    malformed_events: u64,
    quotes_dropped: u64,
}

impl LogParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process one raw log line.
    ///
    /// Never fails; a line that cannot be used is counted and dropped.
    pub fn process_line(&mut self, raw_line: &str) {
        self.lines_read += 1;

        let Some(tok) = tokenize(raw_line) else {
            self.lines_skipped += 1;
            return;
        };

        let Some(time) = self.clock.reconstruct(tok.timestamp_token) else {
            self.timestamp_failures += 1;
            self.lines_skipped += 1;
            if self.config.log_skips {
                log::debug!("unparseable timestamp token: {:?}", tok.timestamp_token);
            }
            return;
        };
        self.last_timestamp = time;

        let Some(kind) = tok.kind else {
            self.unknown_events += 1;
            return;
        };

        match kind {
            EventKind::Candle => self.candles_skipped += 1,
            EventKind::Top => match fields::parse_top(&tok.fields, time) {
                Some((symbol, quote)) => self.route_quote(&symbol, quote),
                None => self.record_malformed(kind),
            },
            EventKind::UserOrder => match fields::parse_order(&tok.fields, time) {
                Some(event) => self.tracker.on_event(event),
                None => self.record_malformed(kind),
            },
            EventKind::UserTrade => match fields::parse_trade(&tok.fields, time) {
                Some(trade) => self.dataset.trades.push(trade),
                None => self.record_malformed(kind),
            },
            EventKind::Border => match fields::parse_border(&tok.fields, time) {
                Some(border) => self.dataset.borders.push(border),
                None => self.record_malformed(kind),
            },
            EventKind::Spreads => match fields::parse_spread(&tok.fields, time) {
                Some(spread) => self.dataset.spreads.push(spread),
                None => self.record_malformed(kind),
            },
        }
    }

    /// Route a quote by case-insensitive substring match on the symbol.
    fn route_quote(&mut self, symbol: &str, quote: Quote) {
        let lowered = symbol.to_ascii_lowercase();
        if lowered.contains(&self.config.spot_marker.to_ascii_lowercase()) {
            self.dataset.spot_quotes.push(quote);
        } else if lowered.contains(&self.config.linear_marker.to_ascii_lowercase()) {
            self.dataset.linear_quotes.push(quote);
        } else {
            self.quotes_dropped += 1;
        }
    }

    fn record_malformed(&mut self, kind: EventKind) {
        self.malformed_events += 1;
        if self.config.log_skips {
            log::debug!("malformed {kind:?} event skipped");
        }
    }

    /// Flush open orders, sort every sequence and return the dataset.
    pub fn finish(mut self) -> ParsedDataset {
        let end_time = self.clock.last_adjusted().unwrap_or(self.last_timestamp);
        self.tracker.finish(end_time);
        self.dataset.orders.extend(self.tracker.take_completed());
        self.dataset.sort();

        log::info!(
            "parsed {} lines: {} spot quotes, {} linear quotes, {} orders, {} trades, {} spreads, {} borders ({} skipped)",
            self.lines_read,
            self.dataset.spot_quotes.len(),
            self.dataset.linear_quotes.len(),
            self.dataset.orders.len(),
            self.dataset.trades.len(),
            self.dataset.spreads.len(),
            self.dataset.borders.len(),
            self.lines_skipped,
        );

        self.dataset
    }

    /// Snapshot of the current counters.
    pub fn stats(&self) -> ParserStats {
        ParserStats {
            lines_read: self.lines_read,
            lines_skipped: self.lines_skipped,
            timestamp_failures: self.timestamp_failures,
            unknown_events: self.unknown_events,
            candles_skipped: self.candles_skipped,
            malformed_events: self.malformed_events,
            quotes_dropped: self.quotes_dropped,
            half_day_corrections: self.clock.half_day_corrections(),
            full_day_corrections: self.clock.full_day_corrections(),
            lifecycle: *self.tracker.stats(),
        }
    }

    /// Access the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a log file into a [`ParsedDataset`].
///
/// A missing file yields [`crate::TradelogError::MissingSource`] — the
/// "no data" outcome, distinct from an existing file with no recognized
/// events, which parses to an empty dataset.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedDataset> {
    parse_source(FileSource::new(path)?)
}

/// Parse a log file with a custom configuration.
pub fn parse_file_with_config(
    path: impl AsRef<Path>,
    config: ParserConfig,
) -> Result<ParsedDataset> {
    parse_source_with_config(FileSource::new(path)?, config)
}

/// Parse any [`LineSource`] with the default configuration.
pub fn parse_source<S: LineSource>(source: S) -> Result<ParsedDataset> {
    parse_source_with_config(source, ParserConfig::default())
}

/// Parse any [`LineSource`] with a custom configuration.
pub fn parse_source_with_config<S: LineSource>(
    source: S,
    config: ParserConfig,
) -> Result<ParsedDataset> {
    let mut parser = LogParser::with_config(config);
    for line in source.lines()? {
        parser.process_line(&line);
    }
    Ok(parser.finish())
}

// ============================================================================
// Tests
// ============================================================================
