//! Growable accumulation buffer for in-progress names and values.
//!
//! Growth is append-only and doubles from [`MIN_CAPACITY`]. Every growth
//! goes through `try_reserve_exact`, so an allocation failure is reported as
//! a [`CapacityError`] and leaves the existing contents untouched. An
//! optional limit turns oversized tokens into the same error.

use std::fmt;

/// Smallest capacity allocated on first growth.
pub const MIN_CAPACITY: usize = 64;

/// A buffer could not grow to hold `requested` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityError {
    /// Total length the buffer needed.
    pub requested: usize,
    /// Configured limit, if the limit is what refused the growth.
    pub limit: Option<usize>,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            Some(limit) => write!(
                f,
                "token of {} bytes exceeds the {limit}-byte limit",
                self.requested
            ),
            None => write!(f, "cannot allocate {} bytes for token", self.requested),
        }
    }
}

impl std::error::Error for CapacityError {}

/// Owned, append-only byte buffer with fallible growth.
#[derive(Clone, Debug, Default)]
pub struct ScanBuffer {
    bytes: Vec<u8>,
    /// Maximum length; `None` means bounded only by the allocator.
    limit: Option<usize>,
}

impl ScanBuffer {
    /// Create an empty buffer. No allocation happens until the first push.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Append one byte.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<(), CapacityError> {
        if self.bytes.len() == self.bytes.capacity() || self.limit.is_some() {
            self.reserve_for(1)?;
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Append a run of bytes in one growth step.
    pub fn extend(&mut self, run: &[u8]) -> Result<(), CapacityError> {
        self.reserve_for(run.len())?;
        self.bytes.extend_from_slice(run);
        Ok(())
    }

    /// Logically empty the buffer, keeping its capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Bytes that can still be appended before the limit, if there is one.
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.bytes.len()))
    }

    /// Ensure room for `additional` more bytes, doubling capacity as needed.
    fn reserve_for(&mut self, additional: usize) -> Result<(), CapacityError> {
        let Some(needed) = self.bytes.len().checked_add(additional) else {
            return Err(CapacityError {
                requested: usize::MAX,
                limit: self.limit,
            });
        };
        if let Some(limit) = self.limit {
            if needed > limit {
                return Err(CapacityError {
                    requested: needed,
                    limit: Some(limit),
                });
            }
        }
        if needed <= self.bytes.capacity() {
            return Ok(());
        }

        let mut target = self.bytes.capacity().max(MIN_CAPACITY);
        while target < needed {
            target = target.saturating_mul(2);
        }
        if let Some(limit) = self.limit {
            // `needed <= limit` was checked above, so the clamp never undershoots.
            target = target.min(limit);
        }

        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| CapacityError {
                requested: target,
                limit: None,
            })
    }
}
