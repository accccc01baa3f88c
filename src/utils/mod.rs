pub mod fs;
pub mod time;

pub use fs::read_artifact;
pub use time::{Clock, FixedClock, SystemClock};
