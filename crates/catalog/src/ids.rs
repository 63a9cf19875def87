//! Document identifiers
//!
//! 12-byte object ids in the usual layout: 4-byte big-endian seconds since
//! the epoch, 5 bytes of per-generator randomness, 3-byte counter. Rendered
//! as 24 lowercase hex digits.

use chrono::Utc;
use pipebench_core::Value;
use rand::Rng;
use std::fmt;

/// A 12-byte object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Raw bytes
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time in seconds since the epoch
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// 24-digit lowercase hex form
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::String(id.to_hex())
    }
}

/// Generator of unique object ids
///
/// Uniqueness within one generator comes from the counter; across
/// generators from the random middle bytes.
#[derive(Debug, Clone)]
pub struct ObjectIdGenerator {
    random: [u8; 5],
    counter: u32,
}

impl ObjectIdGenerator {
    /// Create a generator with fresh random middle bytes and counter
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            random: rng.gen(),
            counter: rng.gen_range(0..0x00FF_FFFF),
        }
    }

    /// Next id
    pub fn next_id(&mut self) -> ObjectId {
        let secs = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        self.counter = (self.counter + 1) & 0x00FF_FFFF;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.random);
        bytes[9..].copy_from_slice(&self.counter.to_be_bytes()[1..]);
        ObjectId(bytes)
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
