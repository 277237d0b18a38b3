pub mod client;
pub mod payload;

pub use client::*;
pub use payload::*;
