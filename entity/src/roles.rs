use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which side of a ride a person is on.
///
/// On the wire riders are called `user`, matching what rider clients send in
/// their socket `join` message.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize, ToSchema)]
pub enum Role {
    #[serde(rename = "user")]
    Rider,
    #[serde(rename = "captain")]
    Captain,
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Rider => write!(fmt, "user"),
            Role::Captain => write!(fmt, "captain"),
        }
    }
}
