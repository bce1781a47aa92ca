//! Pagination module
//!
//! Follows the server's `pagination_key` cursor until a page arrives without
//! one, concatenating every page into a single `AggregatedResult`.
//!
//! # Overview
//!
//! A failure on any page aborts the whole aggregation. Callers never see a
//! truncated list: either every page arrived or they get an error naming the
//! page that did not.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{NextPage, PaginationState};
