pub mod error;
pub mod fetch;
pub use fetch::{ContentFetcher, FetchConfig, FetchedPayload, HttpFetcher};
pub mod job;
pub use job::{JobBuilder, JobTemplate};
pub mod provisioner;
pub use provisioner::Provisioner;
pub mod resolver;
pub use resolver::{AllocationResolver, ResolverConfig};

#[cfg(test)]
pub(crate) mod testing;
