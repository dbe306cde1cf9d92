//! Push-mode transformer with a fixed-size token ring buffer.
//!
//! The pull iterator in `transform` suits most callers. This module serves
//! producers that push data tokens as they arrive:
//! - Data tokens are fed in batches, markup tokens land in a ring buffer
//! - The ring buffer never grows, so memory stays bounded
//! - Backpressure when the consumer is slow
//!
//! # Architecture
//!
//! ```text
//! Producer            Transformer          Ring Buffer          Consumer
//!     │                    │                    │                   │
//!     │──feed(tokens)─────▶│                    │                   │
//!     │                    │──emit(token)──────▶│                   │
//!     │                    │                    │◀──read()──────────│
//!     │                    │                    │──token────────────▶│
//!     │◀──backpressure─────│                    │                   │
//! ```

use crate::error::TransformError;
use crate::token::{DataToken, MarkupToken};
use crate::transform::{Machine, MAX_TOKENS_PER_STEP};

/// Fixed-size ring buffer for markup tokens.
///
/// Uses power-of-2 sizing for fast modulo via bitmask.
/// Provides backpressure when full - producer must wait for consumer to read.
#[derive(Debug)]
pub struct TokenRing {
    /// The actual token storage (power-of-2 sized)
    tokens: Vec<Option<MarkupToken>>,
    /// Read position (consumer)
    read_pos: usize,
    /// Write position (producer)
    write_pos: usize,
    /// Number of tokens currently in buffer
    count: usize,
    /// Bitmask for fast modulo (capacity - 1)
    mask: usize,
}

impl TokenRing {
    /// Create a new ring buffer with at least the given capacity.
    /// Actual capacity will be rounded up to the next power of 2.
    pub fn new(min_capacity: usize) -> Self {
        let capacity = min_capacity.max(2).next_power_of_two();
        let mut tokens = Vec::with_capacity(capacity);
        tokens.resize_with(capacity, || None);
        Self {
            tokens,
            read_pos: 0,
            write_pos: 0,
            count: 0,
            mask: capacity - 1,
        }
    }

    /// Create with default capacity (1024 tokens).
    pub fn with_default_capacity() -> Self {
        Self::new(1024)
    }

    /// Actual capacity (power of 2).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of tokens available to read.
    #[inline]
    pub fn available(&self) -> usize {
        self.count
    }

    /// Space available for writing.
    #[inline]
    pub fn space(&self) -> usize {
        self.capacity() - self.count
    }

    /// Try to push a token. Returns it back if the buffer is full.
    #[inline]
    pub fn try_push(&mut self, token: MarkupToken) -> Result<(), MarkupToken> {
        if self.is_full() {
            return Err(token);
        }
        self.tokens[self.write_pos] = Some(token);
        self.write_pos = (self.write_pos + 1) & self.mask;
        self.count += 1;
        Ok(())
    }

    /// Push a token, panicking if full.
    pub fn push(&mut self, token: MarkupToken) {
        self.try_push(token).expect("TokenRing is full");
    }

    /// Pop a token from the front. Returns None if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<MarkupToken> {
        if self.count == 0 {
            return None;
        }
        let token = self.tokens[self.read_pos].take();
        self.read_pos = (self.read_pos + 1) & self.mask;
        self.count -= 1;
        token
    }

    /// Peek at the front token without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&MarkupToken> {
        if self.count == 0 {
            return None;
        }
        self.tokens[self.read_pos].as_ref()
    }

    /// Iterate over available tokens without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &MarkupToken> {
        let mask = self.mask;
        let read_pos = self.read_pos;
        let tokens = &self.tokens;
        (0..self.count).filter_map(move |i| tokens[(read_pos + i) & mask].as_ref())
    }

    /// Drop all buffered tokens and reset positions.
    pub fn clear(&mut self) {
        for i in 0..self.count {
            let idx = (self.read_pos + i) & self.mask;
            self.tokens[idx] = None;
        }
        self.read_pos = 0;
        self.write_pos = 0;
        self.count = 0;
    }
}

/// Result of a feed or finish operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedResult {
    /// Number of data tokens consumed from input
    pub tokens_consumed: usize,
    /// Number of markup tokens written to the ring buffer
    pub tokens_written: usize,
    /// Whether the ring buffer is too full for another step (backpressure)
    pub buffer_full: bool,
}

/// Push-driven transformer.
///
/// Produces exactly the tokens [`HtmlOutTransformer::transform`] would,
/// however the input is split across `feed` calls.
///
/// [`HtmlOutTransformer::transform`]: crate::HtmlOutTransformer::transform
#[derive(Debug)]
pub struct StreamingTransformer {
    machine: Machine,
    ring: TokenRing,
}

impl StreamingTransformer {
    /// Create with a ring of at least `min_capacity` tokens
    /// (never less than one full step).
    pub fn new(min_capacity: usize) -> Self {
        Self {
            machine: Machine::new(),
            ring: TokenRing::new(min_capacity.max(MAX_TOKENS_PER_STEP)),
        }
    }

    /// Create with default capacity (1024 tokens).
    pub fn with_default_capacity() -> Self {
        Self::new(1024)
    }

    /// Feed a batch of data tokens.
    ///
    /// Consumes tokens until the ring cannot hold another full step; the
    /// caller re-feeds `tokens[result.tokens_consumed..]` after reading.
    /// Feeding after [`finish`](Self::finish) consumes nothing. Once an
    /// error is returned, every later call returns it again.
    pub fn feed(&mut self, tokens: &[DataToken]) -> Result<FeedResult, TransformError> {
        if let Some(err) = self.machine.error() {
            return Err(err);
        }
        if self.machine.is_done() {
            return Ok(FeedResult::default());
        }
        let before = self.ring.available();
        let mut consumed = 0;
        for token in tokens {
            if self.ring.space() < MAX_TOKENS_PER_STEP {
                break;
            }
            self.machine.step(token.clone(), &mut self.ring)?;
            consumed += 1;
        }
        Ok(FeedResult {
            tokens_consumed: consumed,
            tokens_written: self.ring.available() - before,
            buffer_full: self.ring.space() < MAX_TOKENS_PER_STEP,
        })
    }

    /// Signal end of input.
    ///
    /// If the ring is completely full nothing happens and `buffer_full`
    /// is set; read and call again.
    pub fn finish(&mut self) -> Result<FeedResult, TransformError> {
        if let Some(err) = self.machine.error() {
            return Err(err);
        }
        if self.ring.is_full() {
            return Ok(FeedResult {
                buffer_full: true,
                ..FeedResult::default()
            });
        }
        let before = self.ring.available();
        self.machine.finish(&mut self.ring)?;
        Ok(FeedResult {
            tokens_consumed: 0,
            tokens_written: self.ring.available() - before,
            buffer_full: self.ring.is_full(),
        })
    }

    /// True once `finish` has succeeded.
    pub fn is_finished(&self) -> bool {
        self.machine.is_done()
    }

    /// Read the next markup token.
    pub fn read(&mut self) -> Option<MarkupToken> {
        self.ring.pop()
    }

    /// Read all buffered markup tokens.
    pub fn drain(&mut self) -> impl Iterator<Item = MarkupToken> + '_ {
        std::iter::from_fn(move || self.ring.pop())
    }

    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.machine.depth()
    }

    /// The output buffer.
    pub fn ring(&self) -> &TokenRing {
        &self.ring
    }
}

impl Default for StreamingTransformer {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
