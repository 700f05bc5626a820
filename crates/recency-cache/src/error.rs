use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cache capacity must be a positive integer")]
    InvalidCapacity,
    #[error("cache holds {0} entries but its capacity is {1}")]
    IntegrityOverCapacity(usize, usize),
    #[error("recency order has {0} entries but the key index has {1}")]
    IntegrityOrderLength(usize, usize),
    #[error("recency order points at empty slot {0}")]
    IntegrityEmptySlot(usize),
    #[error("slot {0} is in the free list but still holds an entry")]
    IntegrityFreeSlotInUse(usize),
    #[error("key index for slot {0} disagrees with the key stored there")]
    IntegrityKeyToSlotMismatch(usize),
    #[error("back link of slot {0} does not match its predecessor")]
    IntegrityBrokenBackLink(usize),
    #[error("recency order does not end at the most recently used slot")]
    IntegrityTailMismatch,
    #[error("cycle found in recency order")]
    CycleFound,
    #[error("{0} slots in use plus {1} free slots do not cover the {2} allocated")]
    IntegritySlotAccounting(usize, usize, usize),
}

pub type Result<T> = std::result::Result<T, Error>;
