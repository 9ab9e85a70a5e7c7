//! Order lifecycle tracking.
//!
//! Correlates `UserOrder` events into complete order records:
//! `New → {PartiallyFilled | Untriggered | Triggered}* → terminal`.
//!
//! # Key design decisions
//!
//! ## Two indices, one owner
//!
//! An open order must be reachable two ways: by its (symbol, side) slot —
//! the venue allows one working order per slot, so a later `New` replaces
//! the current occupant — and by its order id, because progress and close
//! events frequently omit or mangle the symbol/side fields. The slot map
//! owns the open [`OrderRecord`]s; the id index maps lowercased ids to
//! slot keys. This keeps a single owner per record while both lookup paths
//! stay O(1).
//!
//! ## Handling events that omit identity
//!
//! Close events resolve by id first and fall back to the (symbol, parsed
//! side) slot. A close that resolves neither way is dropped — acceptable
//! data loss in a noisy log, counted in [`LifecycleStats`]. Progress
//! updates trust the id only (their side fields are unreliable mid-flight)
//! and are silently dropped for unknown ids.
//!
//! ## Slot removal on close
//!
//! Removal is keyed by the *target order's own* symbol and side, not the
//! event's, so a close event with a malformed side still clears the right
//! slot after an id hit.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::parser::fields::OrderEvent;
use crate::types::{OrderRecord, OrderStatus, Side};

/// Key for the one-open-order-per-(symbol, side) slot index.
type SlotKey = (String, Side);

// ============================================================================
// Statistics
// ============================================================================

/// Counters for lifecycle tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LifecycleStats {
    /// Orders opened by `New` events.
    pub opened: u64,

    /// Orders force-closed because a new order took their slot.
    pub replaced: u64,

    /// In-place status updates applied.
    pub updated: u64,

    /// Orders closed by a terminal log event.
    pub closed: u64,

    /// Orders flushed as `ActiveAtEnd` at end of stream.
    pub flushed: u64,

    /// `New` events dropped for lack of a parseable side.
    pub dropped_opens: u64,

    /// Progress updates dropped (unknown or missing order id).
    pub dropped_updates: u64,

    /// Close events dropped (no id match and no slot match).
    pub dropped_closes: u64,
}

// ============================================================================
// Tracker
// ============================================================================

/// Stateful correlator over `UserOrder` events.
///
/// Completed records accumulate internally (in emission order, which is
/// not chronological; the aggregator sorts at the end) and are handed over
/// via [`take_completed`](Self::take_completed).
#[derive(Debug, Default)]
pub struct OrderLifecycleTracker {
    /// Open orders, owned here: (symbol, side) -> order.
    slots: AHashMap<SlotKey, OrderRecord>,

    /// Lowercased order id -> slot key of the open order bound to it.
    ids: AHashMap<String, SlotKey>,

    /// Emitted records awaiting collection.
    completed: Vec<OrderRecord>,

    stats: LifecycleStats,
}

impl OrderLifecycleTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `UserOrder` event through the state machine.
    pub fn on_event(&mut self, event: OrderEvent) {
        match event.status {
            OrderStatus::New => self.open(event),
            s if s.is_progress() => self.update(event),
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected => {
                self.close(event)
            }
            // Replaced / ActiveAtEnd are synthesized here, never parsed
            _ => {}
        }
    }

    /// Handle a `New` event: evict any current slot occupant as Replaced,
    /// then open the new order.
    fn open(&mut self, event: OrderEvent) {
        let Some(side) = event.side else {
            self.stats.dropped_opens += 1;
            log::debug!("dropping New order without a parseable side: {}", event.symbol);
            return;
        };

        let key: SlotKey = (event.symbol, side);
        if let Some(mut previous) = self.slots.remove(&key) {
            self.unbind_id(&previous);
            previous.end_time = event.time;
            previous.final_status = OrderStatus::Replaced;
            self.completed.push(previous);
            self.stats.replaced += 1;
        }

        let order = OrderRecord::open(event.time, event.price, side, key.0.clone(), event.order_id);
        let id = order.order_id.trim();
        if !id.is_empty() && id != "0" {
            self.ids.insert(id.to_ascii_lowercase(), key.clone());
        }
        self.slots.insert(key, order);
        self.stats.opened += 1;
    }

    /// Handle a progress update: id lookup only, status rewritten in place.
    fn update(&mut self, event: OrderEvent) {
        let id = event.order_id.trim();
        if !id.is_empty() {
            if let Some(key) = self.ids.get(&id.to_ascii_lowercase()) {
                if let Some(order) = self.slots.get_mut(key) {
                    order.status = event.status;
                    self.stats.updated += 1;
                    return;
                }
            }
        }
        self.stats.dropped_updates += 1;
    }

    /// Handle a terminal event: resolve by id, then by slot; emit.
    fn close(&mut self, event: OrderEvent) {
        let Some(key) = self.resolve(&event.order_id, event.side, &event.symbol) else {
            self.stats.dropped_closes += 1;
            log::debug!(
                "dropping unresolvable close event: symbol={} id={:?}",
                event.symbol,
                event.order_id
            );
            return;
        };

        // resolve() only returns keys present in the slot map
        if let Some(mut order) = self.slots.remove(&key) {
            self.unbind_id(&order);
            order.end_time = event.time;
            order.final_status = event.status;
            self.completed.push(order);
            self.stats.closed += 1;
        }
    }

    /// Resolve the slot key of the order a close event targets.
    fn resolve(&self, order_id: &str, side: Option<Side>, symbol: &str) -> Option<SlotKey> {
        let id = order_id.trim();
        if !id.is_empty() {
            if let Some(key) = self.ids.get(&id.to_ascii_lowercase()) {
                return Some(key.clone());
            }
        }

        // Fallback needs a successfully parsed side
        let side = side?;
        let key: SlotKey = (symbol.to_string(), side);
        self.slots.contains_key(&key).then_some(key)
    }

    /// Remove an order's id binding, if it has one.
    fn unbind_id(&mut self, order: &OrderRecord) {
        let id = order.order_id.trim();
        if !id.is_empty() {
            self.ids.remove(&id.to_ascii_lowercase());
        }
    }

    /// End-of-stream flush: every still-open order closes as `ActiveAtEnd`
    /// at `end_time`.
    pub fn finish(&mut self, end_time: i64) {
        for (_, mut order) in self.slots.drain() {
            order.end_time = end_time;
            order.final_status = OrderStatus::ActiveAtEnd;
            self.completed.push(order);
            self.stats.flushed += 1;
        }
        self.ids.clear();
    }

    /// Take all completed records accumulated so far.
    pub fn take_completed(&mut self) -> Vec<OrderRecord> {
        std::mem::take(&mut self.completed)
    }

    /// Number of currently open orders.
    pub fn open_orders(&self) -> usize {
        self.slots.len()
    }

    /// Look up an open order by its id (case-insensitive).
    pub fn get_open(&self, order_id: &str) -> Option<&OrderRecord> {
        let key = self.ids.get(&order_id.trim().to_ascii_lowercase())?;
        self.slots.get(key)
    }

    /// Tracking counters.
    pub fn stats(&self) -> &LifecycleStats {
        &self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================
