//! Collaborator seam for the external downtime API.
//!
//! - `DowntimeApi`: async create/update/delete/read contract; transport,
//!   authentication and retries belong to implementations
//! - `InMemoryDowntimeApi`: map-backed implementation for dry runs and tests
//! - `apply`: decides between create, in-place update and replacement

pub mod apply;
pub mod memory;
pub mod traits;

pub use apply::{apply, refresh, ApplyError, ApplyOutcome, Deployed};
pub use memory::InMemoryDowntimeApi;
pub use traits::{ApiError, DowntimeApi};
