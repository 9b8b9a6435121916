//! List-page filtering.
//!
//! # Responsibility
//! - Decide which cached records the list page shows for a search string and
//!   an optional tag.
//!
//! # See also
//! - `controller` for where filter state lives across navigation.

pub mod filter;
