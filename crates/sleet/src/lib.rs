//! Snowflake-style 64-bit identifiers with region and node fields.
//!
//! An identifier packs the milliseconds elapsed since [`EPOCH`], a region
//! id, a node id and a per-millisecond sequence into an integer that always
//! fits in a non-negative `i64`. Identifiers from one allocator are strictly
//! increasing. Identifiers from allocators with distinct `(region, node)`
//! pairs never collide.
//!
//! ```
//! use sleet::LockIdWorker;
//!
//! let worker = LockIdWorker::new(7).unwrap();
//! let id = worker.next_id().unwrap();
//! assert_eq!(id.node_id(), 7);
//! assert_eq!(id.region_id(), 1);
//!
//! let batch = worker.next_ids(10).unwrap();
//! assert!(batch.windows(2).all(|w| w[0] < w[1]));
//! assert!(id < batch[0]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "base64")]
mod base64;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

#[cfg(feature = "base64")]
pub use crate::base64::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
