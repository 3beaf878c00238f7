mod basic;
mod builder;
mod interface;
#[cfg(feature = "lock")]
mod lock;
mod state;
mod wait;

#[cfg(test)]
mod tests;

pub use basic::*;
pub use builder::*;
pub use interface::*;
#[cfg(feature = "lock")]
pub use lock::*;
pub use state::*;
pub use wait::*;

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
pub(crate) use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};
