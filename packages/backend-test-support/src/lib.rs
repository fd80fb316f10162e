//! Backend test support utilities
//!
//! Shared by the catalog API's unit and integration tests: unified logging
//! initialization and assertions over the JSON error contract.

pub mod error_body;
pub mod logging;
