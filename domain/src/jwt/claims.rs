//! Claims carried by session tokens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionClaims {
    /// Person id
    pub(crate) sub: String,
    /// `user` or `captain`
    pub(crate) role: String,
    pub(crate) iat: usize,
    pub(crate) exp: usize,
}
