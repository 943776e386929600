//! Knowledge graph adapters
//!
//! - [`JsonGraphStore`] - the graph document and examples file on disk
//! - [`GraphReloader`] - background task that swaps in a rebuilt graph

mod reloader;
mod store;

pub use reloader::GraphReloader;
pub use store::JsonGraphStore;
