mod ids;
pub use ids::{AllocationId, EvalId, JobId};

mod provision_request;
pub use provision_request::ProvisionRequest;

mod service_address;
pub use service_address::ServiceAddress;

/// Caller-supplied logical name of a service.
///
/// Used as the scheduler job *name*; the job *id* is always freshly generated.
pub type ServiceName = String;
