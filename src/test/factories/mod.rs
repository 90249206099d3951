//! Sample values shared by the unit tests.

pub mod records;
