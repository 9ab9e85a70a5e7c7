//! End-to-end tests for the log-to-dataset parser.
//!
//! These drive realistic log text through the full pipeline — clock
//! reconstruction, routing, field parsing, lifecycle tracking, sorting —
//! and check the externally observable properties of the output.
//!
//! Run with:
//! ```bash
//! cargo test --test integration_test
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tradelog_reconstructor::{
    parse_file, parse_source, LogParser, OrderStatus, ParsedDataset, Side, VecSource,
};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_temp_file(name: &str) -> PathBuf {
    let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "tradelog_test_{}_{}_{}",
        std::process::id(),
        name,
        counter
    ))
}

fn parse_lines(lines: &[&str]) -> ParsedDataset {
    let mut parser = LogParser::new();
    for line in lines {
        parser.process_line(line);
    }
    parser.finish()
}

/// A realistic session slice: quotes on both venues, an order that gets
/// partially filled and then filled, a fill print, spreads and borders,
/// plus a candle and some noise.
fn sample_log() -> Vec<&'static str> {
    vec![
        "09:30:00.000001|Top|BERAUSDT_Spot|2.0150|2.0130",
        "09:30:00.000005|Top|BERAUSDT_Linear|2.0160|2.0140",
        "09:30:00.1|Spreads|0.0012|0.0015",
        "09:30:00.2|Border|1.99|2.00|2.03|2.04",
        "09:30:01|UserOrder|BERAUSDT_Linear|2.0140|10|flags|Buy|900101|New",
        "09:30:01.5|Candle|irrelevant|payload",
        "09:30:02|UserOrder|BERAUSDT_Linear|2.0140|10|flags|Buy|900101|PartiallyFilled",
        "09:30:02.5|UserTrade|BERAUSDT_Linear|2.0141|4|Buy",
        "09:30:03|UserOrder|BERAUSDT_Linear|0|10|flags|Buy|900101|Filled",
        "09:30:03.5|UserTrade|BERAUSDT_Linear|2.0142|6|Buy",
        "09:30:04|Top|BERAUSDT_Spot|2.0155|2.0135",
        "not a log line",
        "09:30:05|Spreads|0.0013",
    ]
}

// ============================================================================
// Ordering and routing
// ============================================================================

#[test]
fn test_all_sequences_sorted_ascending() {
    // deliberately includes a backward jump the clock passes through
    // uncorrected, so the final sort has real work to do
    let mut lines = sample_log();
    lines.push("01:00:00|Top|BERAUSDT_Spot|2.0160|2.0140");
    lines.push("01:00:01|UserTrade|BERAUSDT_Spot|2.0161|1|sell");
    let data = parse_lines(&lines);

    fn assert_sorted(times: &[i64], what: &str) {
        for pair in times.windows(2) {
            assert!(pair[0] <= pair[1], "{what} not sorted: {pair:?}");
        }
    }
    assert_sorted(&data.spot_quotes.iter().map(|q| q.time).collect::<Vec<_>>(), "spot_quotes");
    assert_sorted(&data.linear_quotes.iter().map(|q| q.time).collect::<Vec<_>>(), "linear_quotes");
    assert_sorted(&data.orders.iter().map(|o| o.start_time).collect::<Vec<_>>(), "orders");
    assert_sorted(&data.trades.iter().map(|t| t.time).collect::<Vec<_>>(), "trades");
    assert_sorted(&data.spreads.iter().map(|s| s.time).collect::<Vec<_>>(), "spreads");
    assert_sorted(&data.borders.iter().map(|b| b.time).collect::<Vec<_>>(), "borders");
}

#[test]
fn test_sample_log_counts() {
    let data = parse_lines(&sample_log());
    assert_eq!(data.spot_quotes.len(), 2);
    assert_eq!(data.linear_quotes.len(), 1);
    assert_eq!(data.trades.len(), 2);
    assert_eq!(data.spreads.len(), 2);
    assert_eq!(data.borders.len(), 1);
    assert_eq!(data.orders.len(), 1);
    assert_eq!(data.orders[0].final_status, OrderStatus::Filled);
}

// ============================================================================
// Clock reconstruction through the full pipeline
// ============================================================================

#[test]
fn test_no_rollover_means_adjusted_equals_raw() {
    let data = parse_lines(&[
        "09:00:00|Spreads|0.1",
        "12:30:00|Spreads|0.2",
        "17:45:00.5|Spreads|0.3",
    ]);
    let expected = [
        9 * 3_600_000_000i64,
        (12 * 3600 + 30 * 60) * 1_000_000,
        (17 * 3600 + 45 * 60) * 1_000_000 + 500_000,
    ];
    let actual: Vec<i64> = data.spreads.iter().map(|s| s.time).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_half_day_correction_keeps_stream_monotonic() {
    let data = parse_lines(&["13:00:00|Spreads|0.1", "01:00:00|Spreads|0.2"]);
    assert_eq!(data.spreads.len(), 2);
    assert!(data.spreads[1].time >= data.spreads[0].time);
    // +12h applied: 01:00 landed at 13:00 adjusted
    assert_eq!(data.spreads[1].time, 13 * 3_600_000_000i64);
}

#[test]
fn test_full_day_correction_keeps_stream_monotonic() {
    let data = parse_lines(&["23:50:00|Spreads|0.1", "00:10:00|Spreads|0.2"]);
    assert!(data.spreads[1].time > data.spreads[0].time);
    // +24h applied: 00:10 next day
    assert_eq!(data.spreads[1].time, (24 * 3600 + 600) * 1_000_000i64);
}

// ============================================================================
// Order lifecycle through the full pipeline
// ============================================================================

#[test]
fn test_order_replacement_and_fill() {
    let data = parse_lines(&[
        "10:00:00|UserOrder|X|100.0|q|f|Buy|1|New",
        "10:00:10|UserOrder|X|101.0|q|f|Buy|2|New",
        "10:00:20|UserOrder|X|0|q|f|Buy|2|Filled",
    ]);
    assert_eq!(data.orders.len(), 2);

    let replaced = data.orders.iter().find(|o| o.order_id == "1").unwrap();
    assert_eq!(replaced.final_status, OrderStatus::Replaced);
    assert_eq!(replaced.end_time, 10 * 3_600_000_000i64 + 10_000_000);

    let filled = data.orders.iter().find(|o| o.order_id == "2").unwrap();
    assert_eq!(filled.final_status, OrderStatus::Filled);
    assert_eq!(filled.start_time, replaced.end_time);
    assert_eq!(filled.end_time, 10 * 3_600_000_000i64 + 20_000_000);
}

#[test]
fn test_end_of_stream_flush() {
    let data = parse_lines(&[
        "10:00:00|UserOrder|X|100.0|q|f|Sell|7|New",
        "10:30:00|Top|Y_Spot|1.0|0.9",
    ]);
    assert_eq!(data.orders.len(), 1);
    let order = &data.orders[0];
    assert_eq!(order.final_status, OrderStatus::ActiveAtEnd);
    assert_eq!(order.end_time, (10 * 3600 + 30 * 60) * 1_000_000i64);
    assert!(order.end_time >= order.start_time);
}

#[test]
fn test_close_event_with_garbled_side_resolves_by_id() {
    let data = parse_lines(&[
        "10:00:00|UserOrder|X|100.0|q|f|Buy|A1|New",
        "10:00:05|UserOrder|X|0|q|f|???|a1|Cancelled",
    ]);
    assert_eq!(data.orders.len(), 1);
    assert_eq!(data.orders[0].final_status, OrderStatus::Cancelled);
}

#[test]
fn test_untracked_terminal_event_is_acceptable_loss() {
    let data = parse_lines(&["10:00:00|UserOrder|X|100.0|q|f|Buy|77|Filled"]);
    assert!(data.orders.is_empty());
}

// ============================================================================
// Malformed input tolerance
// ============================================================================

#[test]
fn test_malformed_lines_change_nothing_else() {
    let clean = parse_lines(&sample_log());

    let mut noisy = sample_log();
    noisy.insert(3, "09:30:00.15|Top|BERAUSDT_Spot|not-a-price|2.0");
    noisy.insert(5, "09:30:00.25|Border|1.0|2.0"); // too few fields
    noisy.insert(7, "|||||");
    noisy.insert(9, "09:30:01.7|UserOrder|X|1.0|short"); // short order line
    let dirty = parse_lines(&noisy);

    assert_eq!(clean, dirty);
}

#[test]
fn test_spread_second_value_defaults_to_first() {
    let data = parse_lines(&["10:00:00|Spreads|0.0042"]);
    assert_eq!(data.spreads.len(), 1);
    assert_eq!(data.spreads[0].s1, 0.0042);
    assert_eq!(data.spreads[0].s2, 0.0042);
}

// ============================================================================
// File entry point and JSON round trip
// ============================================================================

#[test]
fn test_parse_file_missing_is_no_data() {
    let err = parse_file("/definitely/not/here.csv").unwrap_err();
    assert!(err.is_missing_source());
}

#[test]
fn test_parse_file_empty_is_valid_and_empty() {
    let path = unique_temp_file("empty.csv");
    fs::write(&path, "").unwrap();
    let data = parse_file(&path).unwrap();
    assert!(data.is_empty());
    let _ = fs::remove_file(&path);
}

#[test]
fn test_parse_file_end_to_end() {
    let path = unique_temp_file("session.csv");
    fs::write(&path, sample_log().join("\n")).unwrap();

    let data = parse_file(&path).unwrap();
    assert_eq!(data.spot_quotes.len(), 2);
    assert_eq!(data.orders.len(), 1);
    assert_eq!(data.trades[0].side, Side::Buy);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_vec_source_matches_file_source() {
    let path = unique_temp_file("parity.csv");
    fs::write(&path, sample_log().join("\n")).unwrap();

    let from_file = parse_file(&path).unwrap();
    let from_vec = parse_source(VecSource::new(sample_log())).unwrap();
    assert_eq!(from_file, from_vec);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_dataset_json_round_trip() {
    let data = parse_lines(&sample_log());
    let path = unique_temp_file("dataset.json");

    data.save_json(&path).unwrap();
    let loaded = ParsedDataset::load_json(&path).unwrap();
    assert_eq!(data, loaded);

    let _ = fs::remove_file(&path);
}
