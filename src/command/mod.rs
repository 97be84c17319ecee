pub mod common;
pub mod probe;
pub mod watch;
