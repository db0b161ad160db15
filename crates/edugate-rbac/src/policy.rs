//! Role policy engine.
//!
//! Pure, total queries over the hierarchy table. They back both the route
//! gate and UI affordances such as "may this viewer create a kebele admin".

use std::collections::BTreeSet;

use crate::hierarchy::{self, Subordinates};
use crate::roles::Role;

/// Rank reported for a role tag that is not in the table.
///
/// Greater than every real rank, so "outranks" comparisons against an unknown
/// tag always favour the known role.
pub const UNRANKED: u8 = u8::MAX;

/// Returns whether `actor` may create, assign or revoke `target`.
pub fn can_manage_role(actor: Role, target: Role) -> bool {
    if actor == Role::SystemAdmin {
        return true;
    }
    hierarchy::subordinates(actor).contains(target)
}

/// Returns whether `actor` may view content scoped to `required`.
///
/// Currently the same rule as [`can_manage_role`] plus reflexivity. Kept
/// separate because viewing and managing are different grants.
pub fn has_hierarchical_access(actor: Role, required: Role) -> bool {
    if actor == required || actor == Role::SystemAdmin {
        return true;
    }
    hierarchy::subordinates(actor).contains(required)
}

/// Returns the roles `actor` may administer, in rank order.
pub fn managed_roles(actor: Role) -> BTreeSet<Role> {
    if actor == Role::SystemAdmin {
        return Role::ALL.into_iter().collect();
    }
    hierarchy::subordinates(actor).iter().collect()
}

/// Returns whether `role` is an administrative tier.
pub fn is_admin_role(role: Role) -> bool {
    role.is_admin()
}

/// Returns whether `role` administers nobody.
pub fn is_terminal_role(role: Role) -> bool {
    hierarchy::subordinates(role).is_empty()
}

/// Returns the rank of `role` (0 = broadest).
pub fn role_level(role: Role) -> u8 {
    role.level()
}

/// Returns the rank for a raw role tag, or [`UNRANKED`] if it is unknown.
pub fn role_level_of_tag(tag: &str) -> u8 {
    tag.parse::<Role>().map_or(UNRANKED, |role| role.level())
}

/// Returns whether `actor` has strictly broader authority than `other`.
pub fn outranks(actor: Role, other: Role) -> bool {
    actor.level() < other.level()
}

/// Policy queries bound to one viewer's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    role: Role,
}

impl RolePolicy {
    pub fn for_role(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn can_manage(&self, target: Role) -> bool {
        can_manage_role(self.role, target)
    }

    pub fn has_access_to(&self, required: Role) -> bool {
        has_hierarchical_access(self.role, required)
    }

    pub fn managed_roles(&self) -> BTreeSet<Role> {
        managed_roles(self.role)
    }

    pub fn subordinates(&self) -> Subordinates {
        hierarchy::subordinates(self.role)
    }

    pub fn is_admin(&self) -> bool {
        is_admin_role(self.role)
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal_role(self.role)
    }

    pub fn level(&self) -> u8 {
        role_level(self.role)
    }

    pub fn outranks(&self, other: Role) -> bool {
        outranks(self.role, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TERMINALS: [Role; 4] = [
        Role::Registrar,
        Role::Instructor,
        Role::Accountant,
        Role::Student,
    ];

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    #[test]
    fn test_system_admin_manages_everyone() {
        for role in Role::ALL {
            assert!(can_manage_role(Role::SystemAdmin, role));
        }
    }

    #[test]
    fn test_terminal_roles_manage_nobody() {
        for role in TERMINALS {
            assert!(managed_roles(role).is_empty());
            assert!(is_terminal_role(role));
            for target in Role::ALL {
                assert!(!can_manage_role(role, target));
            }
        }
    }

    #[test]
    fn test_zone_admin_manages_downward_only() {
        assert!(can_manage_role(Role::ZoneAdmin, Role::WoredaAdmin));
        assert!(can_manage_role(Role::ZoneAdmin, Role::KebeleAdmin));
        assert!(can_manage_role(Role::ZoneAdmin, Role::Student));
        assert!(!can_manage_role(Role::ZoneAdmin, Role::ZoneAdmin));
        assert!(!can_manage_role(Role::ZoneAdmin, Role::RegionalAdmin));
        assert!(!can_manage_role(Role::ZoneAdmin, Role::SystemAdmin));
    }

    #[test]
    fn test_hierarchical_access_is_reflexive_where_manage_is_not() {
        assert!(has_hierarchical_access(Role::WoredaAdmin, Role::WoredaAdmin));
        assert!(!can_manage_role(Role::WoredaAdmin, Role::WoredaAdmin));
        assert!(has_hierarchical_access(Role::Student, Role::Student));
        assert!(!has_hierarchical_access(Role::Student, Role::Instructor));
        assert!(!has_hierarchical_access(Role::Registrar, Role::Accountant));
    }

    #[test]
    fn test_managed_roles_for_system_admin_is_universe() {
        let managed = managed_roles(Role::SystemAdmin);
        assert_eq!(managed.len(), Role::ALL.len());
        assert!(managed.contains(&Role::SystemAdmin));
    }

    #[test]
    fn test_managed_roles_for_institution_admin() {
        let managed: Vec<Role> = managed_roles(Role::InstitutionAdmin).into_iter().collect();
        assert_eq!(
            managed,
            vec![
                Role::Registrar,
                Role::Instructor,
                Role::Accountant,
                Role::Student
            ]
        );
    }

    #[test]
    fn test_role_level_of_unknown_tag_is_unranked() {
        assert_eq!(role_level_of_tag("ZONE_ADMIN"), 2);
        assert_eq!(role_level_of_tag("PRINCIPAL"), UNRANKED);
        assert_eq!(role_level_of_tag(""), UNRANKED);
        for role in Role::ALL {
            assert!(role_level(role) < UNRANKED);
        }
    }

    #[test]
    fn test_outranks_is_strict() {
        assert!(outranks(Role::SystemAdmin, Role::RegionalAdmin));
        assert!(!outranks(Role::Registrar, Role::Accountant));
        assert!(!outranks(Role::Accountant, Role::Registrar));
        assert!(!outranks(Role::Student, Role::Instructor));
    }

    #[test]
    fn test_role_policy_handle_delegates() {
        let policy = RolePolicy::for_role(Role::KebeleAdmin);
        assert_eq!(policy.role(), Role::KebeleAdmin);
        assert!(policy.is_admin());
        assert!(!policy.is_terminal());
        assert_eq!(policy.level(), 4);
        assert!(policy.can_manage(Role::InstitutionAdmin));
        assert!(!policy.can_manage(Role::WoredaAdmin));
        assert!(policy.has_access_to(Role::KebeleAdmin));
        assert!(policy.outranks(Role::Student));
        assert_eq!(policy.managed_roles().len(), 5);
        assert!(policy.subordinates().contains(Role::Accountant));
    }

    proptest! {
        #[test]
        fn prop_system_admin_can_manage_any(target in any_role()) {
            prop_assert!(can_manage_role(Role::SystemAdmin, target));
        }

        #[test]
        fn prop_hierarchical_access_reflexive(role in any_role()) {
            prop_assert!(has_hierarchical_access(role, role));
        }

        #[test]
        fn prop_manage_implies_access(actor in any_role(), target in any_role()) {
            if can_manage_role(actor, target) {
                prop_assert!(has_hierarchical_access(actor, target));
            }
        }

        #[test]
        fn prop_non_system_manage_implies_outrank(actor in any_role(), target in any_role()) {
            prop_assume!(actor != Role::SystemAdmin);
            if can_manage_role(actor, target) {
                prop_assert!(role_level(actor) < role_level(target));
            }
        }

        #[test]
        fn prop_managed_roles_agree_with_can_manage(actor in any_role(), target in any_role()) {
            prop_assert_eq!(
                managed_roles(actor).contains(&target),
                can_manage_role(actor, target)
            );
        }

        #[test]
        fn prop_unknown_tags_are_unranked(tag in "[a-z]{3,12}_[a-z]{3,6}x") {
            prop_assert_eq!(role_level_of_tag(&tag), UNRANKED);
        }
    }
}
