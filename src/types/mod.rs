pub mod message;
pub mod timestamp;
pub mod transcript;

pub use message::*;
pub use timestamp::{date_label, parse_timestamp, time_label, UNKNOWN_DATE, UNKNOWN_TIME};
pub use transcript::*;
