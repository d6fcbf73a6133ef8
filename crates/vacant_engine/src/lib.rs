//! Vacant engine: listing sources, the search orchestrator and the JSON store.
mod error;
mod orchestrator;
mod persist;
mod source;
mod store;

pub use error::{FailureKind, SourceError};
pub use orchestrator::{fetch_listings, Orchestrator, SearchOutcome, SearchRequest};
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use source::{page_count, HhSource, ListingSource, SourceSettings, SuperJobSource};
pub use store::{JsonVacancyStore, StoreError};
