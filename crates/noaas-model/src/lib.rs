mod error;
pub use error::ModelError;

mod domain;
pub use domain::*;

mod job;
pub use job::*;

mod allocation;
pub use allocation::*;

mod nullable;

/// Label of the dynamic port every provisioned service listens on.
///
/// Job construction requests a port under this label and address resolution
/// looks the binding up by the same label.
pub const WWW_PORT_LABEL: &str = "www";
