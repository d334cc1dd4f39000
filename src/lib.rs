//! Subversion client core: builds `svn` invocations, runs them with
//! cancellation, and parses their output into typed models.

pub mod core;
pub mod parse;
pub mod ui;
