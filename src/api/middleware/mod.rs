//! API middleware.

pub mod access;
pub mod method;
