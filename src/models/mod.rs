//! Homework API model types.

mod homework;

pub use homework::*;
