#![forbid(unsafe_code)]

pub mod model;
pub mod parser;
pub mod time;
pub mod titles;

pub use time::Clock;
