pub mod error;
pub mod lru_cache;
pub mod shared_cache;

pub use error::{Error, Result};
pub use lru_cache::{BoundedRecencyCache, Iter};
pub use shared_cache::SharedRecencyCache;
