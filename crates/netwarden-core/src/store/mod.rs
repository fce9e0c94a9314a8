//! Persisted state: the snapshot baseline and the deny-list history.
//!
//! Both stores use read-entire-file → mutate in memory → truncate-and-
//! rewrite. There is no write-ahead log and no cross-store atomicity; a
//! crash mid-rewrite can leave a partially written file. That trade-off is
//! accepted for a best-effort home-monitoring tool; the snapshot can always
//! be re-captured and the deny-list re-accumulates.

mod denylist;
mod snapshot;

pub use denylist::{DenyList, DenyRecord};
pub use snapshot::{SnapshotEntry, SnapshotStore};
