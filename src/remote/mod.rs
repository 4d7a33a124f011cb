//! Remote collaborators consumed by the workflows

mod dry_run;
mod traits;
mod types;

pub use dry_run::DryRunBackend;
pub use traits::{Navigator, RemoteBackend};
pub use types::*;

#[cfg(test)]
pub use traits::{MockNavigator, MockRemoteBackend};
