mod format;
mod layout;
mod sleet_id;

pub use format::*;
pub use layout::*;
pub use sleet_id::*;
