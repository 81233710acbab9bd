//! Natural-language query interpretation.
//!
//! Turns a free-text question into a [`ParsedQuery`] (location, intent,
//! date context, clarification decision) and from there into a concrete
//! [`StructuredRequest`] with a resolved date window.

pub mod date_range;
pub mod interpreter;
pub mod location_normalizer;
pub mod models;

pub use date_range::{resolve_date_range, DateRange};
pub use interpreter::interpret;
pub use location_normalizer::normalize_location;
pub use models::*;
