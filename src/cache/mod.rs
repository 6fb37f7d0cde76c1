//! Time-bounded in-memory caches.
//!
//! A [`TtlCache`] holds one complete snapshot of keyed values plus the time
//! it was built. Reads made inside the expiry window are served from the
//! snapshot; the first read after it expires rebuilds everything.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use docscope::cache::{Keyed, TtlCache};
//!
//! #[derive(Clone)]
//! struct Entry(String);
//!
//! impl Keyed for Entry {
//!     fn key(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! # tokio_test();
//! # fn tokio_test() {
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let cache = TtlCache::new(Duration::from_secs(300));
//!     cache
//!         .ensure_fresh(|| async { Ok::<_, ()>(vec![Entry("Button".into())]) })
//!         .await
//!         .unwrap();
//!     assert!(cache.get("Button").await.is_some());
//! });
//! # }
//! ```

mod ttl;

pub use ttl::{Keyed, TtlCache};
