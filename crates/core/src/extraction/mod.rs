//! Pagination, flattening and the extraction entry point

pub mod extractor;
pub mod flatten;
pub mod pagination;

pub use extractor::{ExtractionRequest, ExtractionTask, Extractor};
pub use flatten::{flatten, flatten_all};
pub use pagination::{initial_params, FetchOutcome, PaginationSettings, Paginator};
