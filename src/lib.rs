#[cfg(feature = "cache")]
pub use recency_cache as cache;
