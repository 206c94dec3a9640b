//! Session gatekeeper: issues and verifies the bearer tokens riders and
//! captains present on every HTTP call and when opening a socket.
//!
//! Tokens are HS256 JWTs carrying the person id and role. Logging out adds
//! the token to a revocation list, which is consulted before the signature
//! is even checked. Revoked entries are dropped once the token would have
//! expired anyway.
//!
//! # Example
//!
//! ```rust
//! use domain::jwt::JwtGatekeeper;
//! use domain::roles::Role;
//! use domain::Id;
//!
//! let gatekeeper = JwtGatekeeper::new("secret", 3600);
//! let person_id = Id::new_v4();
//! let token = gatekeeper.issue(person_id, Role::Captain).unwrap();
//! let identity = gatekeeper.authenticate(&token).unwrap();
//! assert_eq!(identity.person_id, person_id);
//! ```

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use chrono::Utc;
use claims::SessionClaims;
use dashmap::DashMap;
use entity::{roles::Role, Id};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

pub(crate) mod claims;

/// Who a verified token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub person_id: Id,
    pub role: Role,
}

pub struct JwtGatekeeper {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
    // token -> exp
    revoked: DashMap<String, usize>,
}

impl JwtGatekeeper {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
            revoked: DashMap::new(),
        }
    }

    /// Builds the gatekeeper from `JWT_SECRET`. Outside production a missing
    /// secret is replaced by a random one, so tokens do not survive a restart.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret = match config.jwt_secret() {
            Some(secret) if !secret.is_empty() => secret,
            _ if config.is_production() => {
                error!("JWT_SECRET must be set in production");
                return Err(Error {
                    source: None,
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
                });
            }
            _ => {
                warn!("No JWT_SECRET configured, generating an ephemeral signing secret");
                Id::new_v4().simple().to_string()
            }
        };

        Ok(Self::new(&secret, config.session_expiry_seconds))
    }

    pub fn issue(&self, person_id: Id, role: Role) -> Result<String, Error> {
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            sub: person_id.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now.saturating_add(usize::try_from(self.expiry_seconds).unwrap_or(usize::MAX)),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    pub fn authenticate(&self, token: &str) -> Result<Identity, Error> {
        if self.revoked.contains_key(token) {
            debug!("Rejected revoked token {}...", prefix(token));
            return Err(Error::unauthorized());
        }

        let claims = self.verify(token)?;
        let person_id = claims.sub.parse::<Id>().map_err(|_| Error::unauthorized())?;
        let role = match claims.role.as_str() {
            "user" => Role::Rider,
            "captain" => Role::Captain,
            other => {
                warn!("Token carries unknown role {other}");
                return Err(Error::unauthorized());
            }
        };

        Ok(Identity { person_id, role })
    }

    /// Adds a valid token to the revocation list. Returns false for a token
    /// that does not verify, which needs no revoking.
    pub fn revoke(&self, token: &str) -> bool {
        let now = Utc::now().timestamp() as usize;
        self.revoked.retain(|_, exp| *exp > now);

        match self.verify(token) {
            Ok(claims) => {
                self.revoked.insert(token.to_string(), claims.exp);
                info!("Revoked session for {}", claims.sub);
                true
            }
            Err(_) => false,
        }
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token {}... failed verification: {e}", prefix(token));
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Unauthorized,
                }
            })
    }
}

fn prefix(token: &str) -> &str {
    token.get(..8).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn gatekeeper() -> JwtGatekeeper {
        JwtGatekeeper::new("test-secret", 3600)
    }

    #[test]
    fn issued_tokens_authenticate_with_person_and_role() {
        let gatekeeper = gatekeeper();
        let rider = Id::new_v4();

        let token = gatekeeper.issue(rider, Role::Rider).unwrap();

        assert_eq!(
            gatekeeper.authenticate(&token).unwrap(),
            Identity {
                person_id: rider,
                role: Role::Rider
            }
        );
    }

    #[test]
    fn huge_expiry_is_capped_instead_of_overflowing() {
        let gatekeeper = JwtGatekeeper::new("test-secret", u64::MAX);
        let captain = Id::new_v4();

        let token = gatekeeper.issue(captain, Role::Captain).unwrap();

        assert_eq!(gatekeeper.authenticate(&token).unwrap().person_id, captain);
    }

    #[test]
    fn revoked_tokens_are_unauthorized() {
        let gatekeeper = gatekeeper();
        let token = gatekeeper.issue(Id::new_v4(), Role::Captain).unwrap();

        assert!(gatekeeper.revoke(&token));

        assert_eq!(
            gatekeeper.authenticate(&token).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn revoking_one_token_leaves_others_valid() {
        let gatekeeper = gatekeeper();
        let person = Id::new_v4();
        let first = gatekeeper.issue(person, Role::Rider).unwrap();
        let second = JwtGatekeeper::new("test-secret", 7200)
            .issue(person, Role::Rider)
            .unwrap();

        gatekeeper.revoke(&first);

        assert!(gatekeeper.authenticate(&second).is_ok());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_unauthorized() {
        let token = JwtGatekeeper::new("other-secret", 3600)
            .issue(Id::new_v4(), Role::Rider)
            .unwrap();

        let err = gatekeeper().authenticate(&token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn expired_tokens_are_unauthorized() {
        let gatekeeper = gatekeeper();
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            sub: Id::new_v4().to_string(),
            role: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            gatekeeper.authenticate(&token).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn garbage_is_unauthorized_and_not_revocable() {
        let gatekeeper = gatekeeper();
        assert!(gatekeeper.authenticate("not-a-token").is_err());
        assert!(!gatekeeper.revoke("not-a-token"));
    }

    #[test]
    fn production_requires_a_secret() {
        let config = Config::from_args(["--runtime-env", "production"]).unwrap();
        let err = JwtGatekeeper::from_config(&config).err().unwrap();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }
}
