//! Authenticated session identity.

use chrono::{DateTime, Utc};
use edugate_types::{TenantId, TenantScope, TenantType};
use serde::{Deserialize, Serialize};

use crate::policy::RolePolicy;
use crate::roles::Role;
use crate::scope::ScopeFilter;

/// Decoded form of a caller's credential.
///
/// Produced by the credential collaborator (see `edugate-gate`); everything
/// here is trusted except `expires_at`, which callers must check against a
/// fresh clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub role: Role,
    #[serde(flatten)]
    pub scope: TenantScope,
    pub expires_at: DateTime<Utc>,
}

impl SessionIdentity {
    pub fn new(role: Role, scope: TenantScope, expires_at: DateTime<Utc>) -> Self {
        Self {
            role,
            scope,
            expires_at,
        }
    }

    pub fn tenant_type(&self) -> TenantType {
        self.scope.tenant_type
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.scope.tenant_id.as_ref()
    }

    /// Returns whether the session expired strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Role policy queries for this viewer.
    pub fn policy(&self) -> RolePolicy {
        RolePolicy::for_role(self.role)
    }

    /// Scope filter anchored at this viewer's tenant.
    pub fn scope_filter(&self) -> ScopeFilter {
        ScopeFilter::new(self.scope.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_is_exclusive_of_now() {
        let now = Utc::now();
        let identity = SessionIdentity::new(
            Role::ZoneAdmin,
            TenantScope::new(TenantType::Zone, "Z1"),
            now,
        );

        assert!(!identity.is_expired_at(now));
        assert!(identity.is_expired_at(now + Duration::seconds(1)));
        assert!(!identity.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_identity_json_shape() {
        let json = r#"{
            "role": "WOREDA_ADMIN",
            "tenantType": "woreda",
            "tenantId": "W1",
            "expiresAt": "2030-01-01T00:00:00Z"
        }"#;

        let identity: SessionIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.role, Role::WoredaAdmin);
        assert_eq!(identity.tenant_type(), TenantType::Woreda);
        assert_eq!(identity.tenant_id().map(TenantId::as_str), Some("W1"));
    }

    #[test]
    fn test_identity_exposes_policy_and_filter() {
        let identity = SessionIdentity::new(
            Role::SystemAdmin,
            TenantScope::bureau(),
            Utc::now() + Duration::hours(1),
        );

        assert!(identity.policy().can_manage(Role::RegionalAdmin));
        assert_eq!(identity.scope_filter().scope(), &TenantScope::bureau());
    }
}
