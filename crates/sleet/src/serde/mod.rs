mod sleet_id;

pub use sleet_id::*;
