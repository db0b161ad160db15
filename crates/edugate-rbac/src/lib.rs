//! # edugate-rbac: Hierarchical Role-Based Access Control
//!
//! Provides the authorization core of the education-management dashboard:
//! - **Role hierarchy** (10 roles, flat precomputed subordinate sets)
//! - **Role policy** (can-manage, hierarchical access, managed roles, rank)
//! - **Tenant scoping** (per-kind ownership rules over hierarchical records)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SessionIdentity (role, tenant, expiry)      │
//! └───────────────┬──────────────────┬──────────┘
//!                 │                  │
//!                 ▼                  ▼
//! ┌───────────────────────┐ ┌───────────────────────┐
//! │  RolePolicy            │ │  ScopeFilter           │
//! │  ├─ can_manage         │ │  ├─ zone rule          │
//! │  ├─ has_access_to      │ │  ├─ woreda rule        │
//! │  └─ managed_roles      │ │  ├─ school rule        │
//! └──────────┬────────────┘ │  └─ attached rule      │
//!            │              └───────────────────────┘
//!            ▼
//! ┌───────────────────────┐
//! │  hierarchy table       │
//! └───────────────────────┘
//! ```
//!
//! ## Roles
//!
//! | Role              | Rank | Admin | Manages                       |
//! |-------------------|------|-------|-------------------------------|
//! | SYSTEM_ADMIN      | 0    | ✓     | everyone                      |
//! | REGIONAL_ADMIN    | 1    | ✓     | zone admin and below          |
//! | ZONE_ADMIN        | 2    | ✓     | woreda admin and below        |
//! | WOREDA_ADMIN      | 3    | ✓     | kebele admin and below        |
//! | KEBELE_ADMIN      | 4    | ✓     | institution admin and below   |
//! | INSTITUTION_ADMIN | 5    | ✓     | registrar, instructor, accountant, student |
//! | REGISTRAR         | 6    | ✗     | nobody                        |
//! | INSTRUCTOR        | 6    | ✗     | nobody                        |
//! | ACCOUNTANT        | 6    | ✗     | nobody                        |
//! | STUDENT           | 7    | ✗     | nobody                        |
//!
//! ## Examples
//!
//! ### Role queries
//!
//! ```
//! use edugate_rbac::policy::{can_manage_role, managed_roles};
//! use edugate_rbac::roles::Role;
//!
//! assert!(can_manage_role(Role::ZoneAdmin, Role::KebeleAdmin));
//! assert!(!can_manage_role(Role::KebeleAdmin, Role::ZoneAdmin));
//! assert!(managed_roles(Role::Student).is_empty());
//! ```
//!
//! ### Tenant scoping
//!
//! ```
//! use edugate_rbac::scope::ScopeFilter;
//! use edugate_types::{EntityKind, EntityRecord, TenantScope, TenantType};
//!
//! let schools = vec![
//!     EntityRecord::new("S1").with_woreda("W1"),
//!     EntityRecord::new("S2").with_woreda("W2"),
//! ];
//!
//! let filter = ScopeFilter::new(TenantScope::new(TenantType::Woreda, "W1"));
//! let visible = filter.filter(&schools, EntityKind::School);
//!
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id, "S1");
//! ```

pub mod hierarchy;
pub mod identity;
pub mod policy;
pub mod roles;
pub mod scope;

// Re-export commonly used types
pub use hierarchy::Subordinates;
pub use identity::SessionIdentity;
pub use policy::{
    RolePolicy, UNRANKED, can_manage_role, has_hierarchical_access, is_admin_role,
    is_terminal_role, managed_roles, outranks, role_level, role_level_of_tag,
};
pub use roles::{ParseRoleError, Role};
pub use scope::{OwnershipRule, ScopeError, ScopeFilter, is_visible, ownership_rule, scope_filter};
