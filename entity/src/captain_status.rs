use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Availability of a captain for new ride dispatch.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptainStatus {
    /// Connected and reporting locations
    Active,
    /// Disconnected, or never reported a location
    #[default]
    Inactive,
}

impl std::fmt::Display for CaptainStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptainStatus::Active => write!(fmt, "active"),
            CaptainStatus::Inactive => write!(fmt, "inactive"),
        }
    }
}
