//! Timestamp reconstruction from day-less time-of-day tokens.
//!
//! Log entries carry only a clock reading (`HH:MM:SS` or
//! `HH:MM:SS.ffffff`), with no date and no AM/PM marker. Two artifacts
//! follow:
//!
//! - a 12-hour-format clock wraps at noon, producing an ~12-hour backward
//!   jump between consecutive entries;
//! - a session crossing midnight produces an ~24-hour backward jump.
//!
//! [`TimeReconstructor`] turns each token into microseconds since an
//! arbitrary base midnight and maintains a cumulative offset that absorbs
//! those jumps, keeping the adjusted feed (mostly) non-decreasing.
//!
//! # Known limitations
//!
//! The jump thresholds below are heuristics inherited from the producing
//! system and are preserved verbatim for behavioral compatibility.
//! Backward jumps between 10–11 h or 13–~22.2 h fall in an untreated noise
//! band and pass through uncorrected, so global monotonicity is
//! best-effort, not guaranteed. Logs spanning more than one rollover per
//! jump, or daylight-saving transitions, are not handled.

// ============================================================================
// Constants
// ============================================================================

/// Microseconds per second.
pub const US_PER_SECOND: i64 = 1_000_000;

/// Microseconds per minute.
pub const US_PER_MINUTE: i64 = 60 * US_PER_SECOND;

/// Microseconds per hour.
pub const US_PER_HOUR: i64 = 60 * US_PER_MINUTE;

/// A backward jump smaller than this (more than 10 hours back) is a
/// candidate for correction; anything milder passes through.
const JUMP_CANDIDATE_US: i64 = -36_000 * US_PER_SECOND;

/// Lower bound (exclusive) of the 12-hour-ambiguity band: 13 hours back.
const HALF_DAY_BAND_LOW_US: i64 = -46_800 * US_PER_SECOND;

/// Upper bound (exclusive) of the 12-hour-ambiguity band: 11 hours back.
const HALF_DAY_BAND_HIGH_US: i64 = -39_600 * US_PER_SECOND;

/// A jump below this (~22.2 hours back) is treated as a midnight rollover.
const FULL_DAY_JUMP_US: i64 = -80_000 * US_PER_SECOND;

/// Correction applied for a 12-hour-clock AM/PM ambiguity.
const HALF_DAY_US: i64 = 12 * US_PER_HOUR;

/// Correction applied for a midnight rollover.
const FULL_DAY_US: i64 = 24 * US_PER_HOUR;

// ============================================================================
// Token parsing
// ============================================================================

/// Parse a raw time-of-day token into microseconds since midnight.
///
/// Accepted forms are `HH:MM:SS` and `HH:MM:SS.ffffff`. The fractional
/// part is truncated beyond 6 digits and right-padded with zeros when
/// shorter; segments after a second dot are ignored. Returns `None` when
/// the colon split does not yield exactly three components or any
/// component is non-numeric.
pub fn parse_time_of_day(token: &str) -> Option<i64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    // Only the first fraction segment counts; anything after a second dot
    // is noise the producing system also ignores
    let mut dot_parts = token.split('.');
    let hms = dot_parts.next()?;
    let fraction = dot_parts.next();

    let mut parts = hms.split(':');
    let h: i64 = parts.next()?.trim().parse().ok()?;
    let m: i64 = parts.next()?.trim().parse().ok()?;
    let s: i64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let micros = match fraction {
        Some(fraction) => {
            // get() instead of slicing: garbage bytes must skip the line,
            // not panic on a char boundary
            let truncated = if fraction.len() > 6 {
                fraction.get(..6)?
            } else {
                fraction
            };
            let padded = format!("{truncated:0<6}");
            padded.parse::<i64>().ok()?
        }
        None => 0,
    };

    Some((h * 3600 + m * 60 + s) * US_PER_SECOND + micros)
}

// ============================================================================
// Time Reconstructor
// ============================================================================

/// Converts raw time-of-day tokens into adjusted absolute timestamps.
///
/// Carried state: the cumulative correction offset, the last raw instant
/// and the last adjusted instant. The state is an explicit value threaded
/// through the parse fold, so reconstruction stays pure with respect to
/// everything else and is independently testable.
///
/// # Example
///
/// ```
/// use tradelog_reconstructor::parser::clock::{TimeReconstructor, US_PER_HOUR};
///
/// let mut clock = TimeReconstructor::new();
/// let t1 = clock.reconstruct("13:00:00").unwrap();
/// // 12-hour clock wrapped at noon: 01:00:00 is really 13:00 + 12h
/// let t2 = clock.reconstruct("01:00:00").unwrap();
/// assert_eq!(t2, t1);
/// assert_eq!(clock.offset(), 12 * US_PER_HOUR);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimeReconstructor {
    /// Running correction added to each raw instant (µs).
    offset_us: i64,

    /// Last raw instant (unadjusted, µs since base midnight).
    last_raw_us: Option<i64>,

    /// Last adjusted instant returned.
    last_adjusted_us: Option<i64>,

    /// Number of +12 h corrections applied.
    half_day_corrections: u32,

    /// Number of +24 h corrections applied.
    full_day_corrections: u32,
}

impl TimeReconstructor {
    /// Create a new reconstructor with zero offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a token and return the adjusted timestamp, updating carried
    /// state. Returns `None` for unparseable tokens; carried state is left
    /// untouched in that case.
    pub fn reconstruct(&mut self, token: &str) -> Option<i64> {
        let raw = parse_time_of_day(token)?;

        if let Some(last_raw) = self.last_raw_us {
            let delta = raw - last_raw;
            if delta < JUMP_CANDIDATE_US {
                if delta > HALF_DAY_BAND_LOW_US && delta < HALF_DAY_BAND_HIGH_US {
                    // 11–13 hours back: AM/PM wrap of a 12-hour clock
                    self.offset_us += HALF_DAY_US;
                    self.half_day_corrections += 1;
                    log::debug!(
                        "clock wrapped ~12h back ({delta} us); offset now {} us",
                        self.offset_us
                    );
                } else if delta < FULL_DAY_JUMP_US {
                    // ~22.2+ hours back: midnight rollover
                    self.offset_us += FULL_DAY_US;
                    self.full_day_corrections += 1;
                    log::debug!(
                        "clock rolled over midnight ({delta} us); offset now {} us",
                        self.offset_us
                    );
                }
                // 10–11 h or 13–22.2 h back: noise band, pass through
            }
        }

        self.last_raw_us = Some(raw);
        let adjusted = raw + self.offset_us;
        self.last_adjusted_us = Some(adjusted);
        Some(adjusted)
    }

    /// Current cumulative offset in microseconds.
    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset_us
    }

    /// Last adjusted timestamp returned, if any token parsed so far.
    #[inline]
    pub fn last_adjusted(&self) -> Option<i64> {
        self.last_adjusted_us
    }

    /// Last raw (unadjusted) instant seen.
    #[inline]
    pub fn last_raw(&self) -> Option<i64> {
        self.last_raw_us
    }

    /// Number of +12 h corrections applied so far.
    pub fn half_day_corrections(&self) -> u32 {
        self.half_day_corrections
    }

    /// Number of +24 h corrections applied so far.
    pub fn full_day_corrections(&self) -> u32 {
        self.full_day_corrections
    }

    /// Reset carried state to the initial (zero-offset) state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Tests
// ============================================================================
