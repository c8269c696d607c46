mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::ProvisionerAdapter;

mod http;
pub use http::{HttpApi, ServiceResponse};

pub use axum;
