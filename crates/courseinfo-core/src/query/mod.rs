//! Listing and detail reads.
//!
//! Listings are sorted in memory by the caller's fields, the kind's natural
//! key, and finally id, then sliced into 1-based pages.

mod executor;
mod pagination;
mod view;

pub use executor::ListingExecutor;
pub use pagination::{paginate, ListRequest, Page, PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use view::{DetailView, RecordView};
