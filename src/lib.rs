//! # tradelog-reconstructor
//!
//! Reconstructs a coherent, chronologically ordered dataset of price
//! quotes, user orders, executed trades, spreads and border values from a
//! line-oriented trading-activity log — a log whose entries carry only a
//! time of day, no date, and an ambiguous clock format.
//!
//! ## Features
//!
//! - **Timestamp reconstruction**: infers absolute elapsed time from
//!   day-less `HH:MM:SS[.ffffff]` tokens, detecting and correcting the
//!   backward jumps caused by 12-hour-clock ambiguity and midnight
//!   rollover.
//! - **Order lifecycle tracking**: a per-(symbol, side) slot plus
//!   per-order-id state machine that correlates `New`, status-update and
//!   terminal events into complete order records, even when events omit
//!   identifying fields.
//! - **Fault tolerance**: a malformed line is dropped and counted, never
//!   fatal; only a missing source file fails the parse.
//! - **Chart-ready output**: six independently sorted record sequences
//!   ([`ParsedDataset`]) with JSON save/load for downstream viewers.
//!
//! ## Quick Start
//!
//! ```
//! use tradelog_reconstructor::{LogParser, OrderStatus};
//!
//! let log = [
//!     "13:59:59.25|Top|BERAUSDT_Spot|2.015|2.013",
//!     "13:59:59.5|UserOrder|BERAUSDT_Linear|2.014|1|x|Buy|81245|New",
//!     // the clock wrapped: 02:00:00 here is really 14:00 + 12h
//!     "02:00:00|UserOrder|BERAUSDT_Linear|0|1|x|Buy|81245|Filled",
//! ];
//!
//! let mut parser = LogParser::new();
//! for line in log {
//!     parser.process_line(line);
//! }
//! let data = parser.finish();
//!
//! assert_eq!(data.spot_quotes.len(), 1);
//! assert_eq!(data.orders.len(), 1);
//! assert_eq!(data.orders[0].final_status, OrderStatus::Filled);
//! assert!(data.orders[0].end_time > data.orders[0].start_time);
//! ```
//!
//! To parse straight from a file:
//!
//! ```no_run
//! use tradelog_reconstructor::parse_file;
//!
//! let data = parse_file("Cache_BERAUSDT_0.csv")?;
//! data.save_json("dataset.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Record types: `Quote`, `Trade`, `Spread`, `Border`, `OrderRecord`, `ParsedDataset` |
//! | [`parser`] | The fold driver: `LogParser`, `ParserConfig`, `ParserStats`, entry points |
//! | [`parser::clock`] | `TimeReconstructor` and time-of-day token parsing |
//! | [`parser::line`] | Line tokenization and `EventKind` classification |
//! | [`parser::fields`] | Per-event-type field parsers |
//! | [`parser::lifecycle`] | `OrderLifecycleTracker` with the slot and id indices |
//! | [`source`] | `LineSource` abstraction: `FileSource`, `VecSource` |
//! | [`error`] | `TradelogError` and the crate `Result` alias |
//!
//! ## Scope
//!
//! Rendering, axis handling and file-picker UI belong to downstream
//! viewers, which consume the six sequences read-only. The parser does not
//! validate log authenticity and supports at most one rollover correction
//! per detected backward jump; the jump thresholds are inherited verbatim
//! from the producing system (see [`parser::clock`] for the known
//! limitations).

pub mod error;
pub mod parser;
pub mod source;
pub mod types;

// Re-exports - Core types
pub use error::{Result, TradelogError};
pub use types::{Border, OrderRecord, OrderStatus, ParsedDataset, Quote, Side, Spread, Trade};

// Re-exports - Parsing
pub use parser::{
    parse_file, parse_file_with_config, parse_source, parse_source_with_config, LogParser,
    ParserConfig, ParserStats,
};

// Re-exports - Timestamp reconstruction
pub use parser::clock::TimeReconstructor;

// Re-exports - Order lifecycle
pub use parser::lifecycle::{LifecycleStats, OrderLifecycleTracker};

// Re-exports - Source abstraction
pub use source::{FileSource, LineSource, SourceMetadata, VecSource};
