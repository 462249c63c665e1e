//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: unified logging
//! initialization and assertions for the HTTP error contract.

pub mod logging;
pub mod problem_details;
