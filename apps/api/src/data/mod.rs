// Job-market dataset: CSV loading, skill canonicalization, the process-wide
// cache and the aggregation queries the dashboard features run.

pub mod canonical;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod queries;
pub mod store;
