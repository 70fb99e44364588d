#![forbid(unsafe_code)]

pub mod greet;
pub mod version;
pub mod welcome;
