//! Core types shared across the GGRC client facilities
//!
//! - **Correlation types**: RequestId
//! - **Schema constants**: Canonical field keys and event names used by
//!   the logging and error facilities

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
