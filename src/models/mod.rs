//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod evaluation;
pub mod match_record;
pub mod question;
pub mod queue;

pub use evaluation::*;
pub use match_record::*;
pub use question::*;
pub use queue::*;
