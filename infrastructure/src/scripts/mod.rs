//! Script runner adapters

mod disabled;
mod process;

pub use disabled::DisabledScriptRunner;
pub use process::ProcessScriptRunner;
