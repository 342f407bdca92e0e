//! # Quote Session
//!
//! Holds the latest finished quote for a front-end and keeps late or
//! abandoned calculations from overwriting it.
//!
//! ## Ticket Lifecycle
//! ```text
//!   slot.begin() ──► ticket #1 ─────── calculating ───────► publish → dropped
//!   slot.begin() ──► ticket #2 ── calculating ──► publish → stored    (newer)
//!
//!   slot.begin() ──► ticket #3 ── calculating ...
//!   slot.close()   (front-end torn down)
//!                    ticket #3 ──► publish → dropped, slot untouched
//! ```

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use totem_core::Quote;

#[derive(Debug)]
struct SlotState<T> {
    generation: u64,
    closed: bool,
    latest: Option<T>,
}

/// Latest-result holder shared between a front-end and its calculations.
#[derive(Debug)]
pub struct QuoteSlot<T = Quote> {
    state: Arc<RwLock<SlotState<T>>>,
}

impl<T> Clone for QuoteSlot<T> {
    fn clone(&self) -> Self {
        QuoteSlot {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for QuoteSlot<T> {
    fn default() -> Self {
        QuoteSlot {
            state: Arc::new(RwLock::new(SlotState {
                generation: 0,
                closed: false,
                latest: None,
            })),
        }
    }
}

impl<T: Clone> QuoteSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a calculation. Any earlier ticket becomes stale.
    pub async fn begin(&self) -> QuoteTicket<T> {
        let mut state = self.state.write().await;
        state.generation += 1;
        QuoteTicket {
            state: Arc::clone(&self.state),
            generation: state.generation,
        }
    }

    /// The most recently published result.
    pub async fn latest(&self) -> Option<T> {
        self.state.read().await.latest.clone()
    }

    /// Marks the owner as gone. Outstanding tickets can no longer publish.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.closed = true;
        debug!(generation = state.generation, "Quote slot closed");
    }

    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }
}

/// Permission to publish one result into a [`QuoteSlot`].
#[derive(Debug)]
pub struct QuoteTicket<T = Quote> {
    state: Arc<RwLock<SlotState<T>>>,
    generation: u64,
}

impl<T> QuoteTicket<T> {
    /// True while this is the newest ticket and the slot is open.
    pub async fn is_live(&self) -> bool {
        let state = self.state.read().await;
        !state.closed && state.generation == self.generation
    }

    /// Stores `value` if the ticket is still live. Returns whether it was stored.
    pub async fn publish(self, value: T) -> bool {
        let mut state = self.state.write().await;
        if state.closed || state.generation != self.generation {
            debug!(
                ticket = self.generation,
                current = state.generation,
                closed = state.closed,
                "Discarding stale result"
            );
            return false;
        }
        state.latest = Some(value);
        true
    }
}
