pub mod fetch;
pub mod health;
pub mod monitor;
pub mod reader;
