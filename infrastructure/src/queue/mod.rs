//! Work queue adapters
//!
//! - [`SpoolQueue`] - one JSON file per item in a directory shared with
//!   the batch worker
//! - [`InMemoryWorkQueue`] - process-local queue for runs with generation disabled

mod memory;
mod spool;

pub use memory::InMemoryWorkQueue;
pub use spool::SpoolQueue;
