pub mod common;
pub mod json;
