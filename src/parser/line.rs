//! Line tokenization and event classification.
//!
//! A log line is a `|`-delimited field sequence: field 0 is the timestamp
//! token, field 1 the event-type discriminator, the rest are event-specific
//! payload fields. Lines without the delimiter, or with fewer than two
//! fields, carry nothing usable and are skipped outright.

/// Field delimiter for log lines.
pub const FIELD_DELIMITER: char = '|';

/// Minimum number of fields a line must split into (timestamp + event type).
pub const MIN_FIELDS: usize = 2;

/// The event types the parser knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Top-of-book quote.
    Top,
    /// User order lifecycle event.
    UserOrder,
    /// Executed user fill.
    UserTrade,
    /// Border/band values.
    Border,
    /// Spread values.
    Spreads,
    /// Candle aggregate; recognized and always skipped.
    Candle,
}

impl EventKind {
    /// Classify a discriminator token.
    ///
    /// Matching is case-sensitive, except `Candle` which the producing
    /// system emits with varying capitalization. Unknown discriminators
    /// yield `None` and the line is ignored.
    pub fn classify(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("Candle") {
            return Some(EventKind::Candle);
        }
        match raw {
            "Top" => Some(EventKind::Top),
            "UserOrder" => Some(EventKind::UserOrder),
            "UserTrade" => Some(EventKind::UserTrade),
            "Border" => Some(EventKind::Border),
            "Spreads" => Some(EventKind::Spreads),
            _ => None,
        }
    }
}

/// A tokenized log line, borrowing from the raw input.
#[derive(Debug)]
pub struct TokenizedLine<'a> {
    /// Field 0, trimmed: the raw time-of-day token.
    pub timestamp_token: &'a str,
    /// Classification of field 1, if the discriminator is recognized.
    pub kind: Option<EventKind>,
    /// All fields, trimmed, including timestamp and discriminator.
    pub fields: Vec<&'a str>,
}

/// Split a raw line into trimmed fields and classify it.
///
/// Returns `None` when the line lacks the delimiter or yields fewer than
/// [`MIN_FIELDS`] fields.
pub fn tokenize(line: &str) -> Option<TokenizedLine<'_>> {
    if !line.contains(FIELD_DELIMITER) {
        return None;
    }

    let fields: Vec<&str> = line.split(FIELD_DELIMITER).map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    Some(TokenizedLine {
        timestamp_token: fields[0],
        kind: EventKind::classify(fields[1]),
        fields,
    })
}
