//! Front-end facing search: requests, the searcher and result pages.

pub mod request;
pub mod result;
pub mod searcher;

pub use request::SearchRequest;
pub use result::{Page, SearchHit, round_half_up};
pub use searcher::Searcher;
