//! Session credential decoding.
//!
//! Sessions are issued elsewhere as HS256-signed JWTs carrying the caller's
//! role, tenant and expiry. This module verifies and decodes them; it never
//! issues tokens.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use edugate_rbac::{Role, SessionIdentity};
use edugate_types::{TenantId, TenantScope, TenantType, id_from_json};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// Default name of the cookie carrying the session token.
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Claims carried by a session token.
///
/// `role` stays a raw tag so that a token minted with a role this build does
/// not know still decodes; the gate treats such a role as listed nowhere.
/// The tenant claims stay raw JSON as well: the gate decides on role and
/// expiry alone, and they are only parsed when building a [`SessionIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Subject (user ID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Role tag, e.g. `ZONE_ADMIN`.
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Value>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl SessionClaims {
    /// Parses the role tag, returning `None` for unknown roles.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Returns whether the session expired strictly before `now`, allowing
    /// `leeway_secs` of clock skew.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: u64) -> bool {
        let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
        let deadline_ms = self.exp.saturating_add(leeway).saturating_mul(1000);
        deadline_ms < now.timestamp_millis()
    }

    /// Parses the tenant type claim.
    pub fn tenant_type(&self) -> Result<Option<TenantType>, DecodeError> {
        let Some(value) = &self.tenant_type else {
            return Ok(None);
        };
        value
            .as_str()
            .and_then(|tag| tag.parse::<TenantType>().ok())
            .map(Some)
            .ok_or_else(|| DecodeError::InvalidClaim {
                claim: "tenantType",
                value: value.to_string(),
            })
    }

    /// Parses the tenant id claim, accepting a string or a number.
    pub fn tenant_id(&self) -> Result<Option<TenantId>, DecodeError> {
        let Some(value) = &self.tenant_id else {
            return Ok(None);
        };
        id_from_json(value)
            .map(|id| Some(TenantId::new(id)))
            .ok_or_else(|| DecodeError::InvalidClaim {
                claim: "tenantId",
                value: value.to_string(),
            })
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, DecodeError> {
        DateTime::from_timestamp(self.exp, 0).ok_or(DecodeError::ExpiryOutOfRange(self.exp))
    }

    /// Converts the claims into a typed session identity.
    ///
    /// Fails on an unknown role, on a missing or unparseable tenant claim,
    /// and on a scoped tenant type without a tenant id.
    pub fn into_identity(self) -> Result<SessionIdentity, DecodeError> {
        let role = self
            .role()
            .ok_or_else(|| DecodeError::UnknownRole(self.role.clone()))?;
        let expires_at = self.expires_at()?;
        let tenant_type = self
            .tenant_type()?
            .ok_or(DecodeError::MissingClaim("tenantType"))?;
        let tenant_id = self.tenant_id()?;

        if !tenant_type.is_unscoped() && tenant_id.is_none() {
            return Err(DecodeError::MissingClaim("tenantId"));
        }

        let scope = TenantScope {
            tenant_type,
            tenant_id,
        };
        Ok(SessionIdentity::new(role, scope, expires_at))
    }
}

/// Turns a raw credential into session claims.
///
/// Implementations must not panic on arbitrary input.
pub trait SessionDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> Result<SessionClaims, DecodeError>;
}

impl<D: SessionDecoder + ?Sized> SessionDecoder for &D {
    fn decode(&self, raw: &str) -> Result<SessionClaims, DecodeError> {
        (**self).decode(raw)
    }
}

impl<D: SessionDecoder + ?Sized> SessionDecoder for Arc<D> {
    fn decode(&self, raw: &str) -> Result<SessionClaims, DecodeError> {
        (**self).decode(raw)
    }
}

/// HS256 session decoder verifying signatures against a shared secret.
///
/// Expiry is not validated here: the gate classifies expired sessions itself
/// so it can send the caller to login with `expired=true`.
#[derive(Clone)]
pub struct JwtSessionDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionDecoder {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl fmt::Debug for JwtSessionDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSessionDecoder")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl SessionDecoder for JwtSessionDecoder {
    fn decode(&self, raw: &str) -> Result<SessionClaims, DecodeError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(DecodeError::InvalidToken("empty token".to_string()));
        }
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Extracts the value of cookie `name` from a `Cookie` header value.
pub fn session_from_cookie_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Picks the session credential from request headers.
///
/// The cookie wins over the `Authorization` header when both are present.
pub fn credential_from_headers<'a>(
    cookie_header: Option<&'a str>,
    authorization_header: Option<&'a str>,
    cookie_name: &str,
) -> Option<&'a str> {
    cookie_header
        .and_then(|header| session_from_cookie_header(header, cookie_name))
        .or_else(|| authorization_header.and_then(bearer_token))
}
