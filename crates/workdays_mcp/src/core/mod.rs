//! # Workdays MCP Server Core
//!
//! This module provides the clock and workday calendar operations for the MCP server.
//!
//! ## Features
//! - Current time in any IANA timezone through a custom template
//! - Monthly workdays, holidays and makeup workdays from the timor and
//!   holiday-cn (nate) yearly calendars
//! - Mirror fallback for the holiday-cn provider
//!
//! ## Modules
//! - `calendar`: Month lengths and ISO weekday arithmetic
//! - `clock`: Timezone resolution and template rendering
//! - `error`: Custom error types and error handling
//! - `models`: Data structures for requests and responses
//! - `resolver`: Reconciles provider data into a month's workday calendar
//! - `sources`: Provider adapters behind the holiday data source trait
//! - `utils`: Constants and formatting helpers
//! - `validation`: Tool argument checks

pub mod calendar;
pub mod clock;
pub mod error;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod utils;
pub mod validation;
