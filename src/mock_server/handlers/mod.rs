//! HTTP request handlers for the mock server.

pub mod homeworks;
pub mod telegram;

pub use homeworks::*;
pub use telegram::*;
