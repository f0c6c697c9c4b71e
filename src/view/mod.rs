//! What is visible: search filtering, pagination, and the immutable view state
//! the renderers project.

pub mod filter;
pub mod pagination;
pub mod state;

pub use filter::{filter_indices, DisplayedSet, SearchQuery};
pub use pagination::{
    step_page_size, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGE_SIZE_STEP,
};
pub use state::{PageNav, ViewState, ViewStats};
