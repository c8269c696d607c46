use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! scheduler_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

scheduler_id!(
    /// Identifier of a job registered with the scheduler.
    JobId
);

scheduler_id!(
    /// Identifier of the evaluation created by a job registration.
    EvalId
);

scheduler_id!(
    /// Identifier of a concrete allocation (running instance) of a job.
    AllocationId
);
