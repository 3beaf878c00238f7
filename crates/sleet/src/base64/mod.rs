mod sleet_id;
mod standard;

pub use sleet_id::*;
pub use standard::*;
