//! Token minting for tests. Production code never issues sessions.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

pub(crate) const SECRET: &str = "test-secret-key-that-is-long-enough";

/// Mints an HS256 session token signed with [`SECRET`].
pub(crate) fn mint(role: &str, tenant: Option<(&str, &str)>, expires_at: DateTime<Utc>) -> String {
    let mut claims = serde_json::json!({
        "sub": "user-1",
        "role": role,
        "exp": expires_at.timestamp(),
    });
    match tenant {
        Some((tenant_type, tenant_id)) => {
            claims["tenantType"] = tenant_type.into();
            claims["tenantId"] = tenant_id.into();
        }
        None => claims["tenantType"] = "bureau".into(),
    }
    mint_claims(&claims)
}

/// Signs arbitrary claims with [`SECRET`].
pub(crate) fn mint_claims(claims: &serde_json::Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}
