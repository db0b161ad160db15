//! Role hierarchy table.
//!
//! Declares, for each role, the roles it may administer. Sets are flat
//! (direct and transitive subordinates listed together) so lookups never walk
//! the hierarchy. `SystemAdmin` is not listed: it is universal and reported
//! as [`Subordinates::All`].

use crate::roles::Role;

const REGIONAL_ADMIN: &[Role] = &[
    Role::ZoneAdmin,
    Role::WoredaAdmin,
    Role::KebeleAdmin,
    Role::InstitutionAdmin,
    Role::Registrar,
    Role::Instructor,
    Role::Accountant,
    Role::Student,
];

const ZONE_ADMIN: &[Role] = &[
    Role::WoredaAdmin,
    Role::KebeleAdmin,
    Role::InstitutionAdmin,
    Role::Registrar,
    Role::Instructor,
    Role::Accountant,
    Role::Student,
];

const WOREDA_ADMIN: &[Role] = &[
    Role::KebeleAdmin,
    Role::InstitutionAdmin,
    Role::Registrar,
    Role::Instructor,
    Role::Accountant,
    Role::Student,
];

const KEBELE_ADMIN: &[Role] = &[
    Role::InstitutionAdmin,
    Role::Registrar,
    Role::Instructor,
    Role::Accountant,
    Role::Student,
];

const INSTITUTION_ADMIN: &[Role] = &[
    Role::Registrar,
    Role::Instructor,
    Role::Accountant,
    Role::Student,
];

/// The set of roles a role may administer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subordinates {
    /// Every role, including the holder's own.
    All,
    /// Exactly the listed roles. Empty for terminal roles.
    Only(&'static [Role]),
}

impl Subordinates {
    pub fn contains(&self, role: Role) -> bool {
        match self {
            Subordinates::All => true,
            Subordinates::Only(roles) => roles.contains(&role),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Subordinates::All => false,
            Subordinates::Only(roles) => roles.is_empty(),
        }
    }

    /// Iterates the members in rank order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        let roles: &'static [Role] = match self {
            Subordinates::All => &Role::ALL,
            Subordinates::Only(roles) => roles,
        };
        roles.iter().copied()
    }
}

/// Looks up the subordinate set of `role`.
pub fn subordinates(role: Role) -> Subordinates {
    match role {
        Role::SystemAdmin => Subordinates::All,
        Role::RegionalAdmin => Subordinates::Only(REGIONAL_ADMIN),
        Role::ZoneAdmin => Subordinates::Only(ZONE_ADMIN),
        Role::WoredaAdmin => Subordinates::Only(WOREDA_ADMIN),
        Role::KebeleAdmin => Subordinates::Only(KEBELE_ADMIN),
        Role::InstitutionAdmin => Subordinates::Only(INSTITUTION_ADMIN),
        Role::Registrar | Role::Instructor | Role::Accountant | Role::Student => {
            Subordinates::Only(&[])
        }
    }
}

/// Iterates every listed (parent, child) edge of the table.
///
/// `SystemAdmin` contributes no edges since its set is implicit.
pub fn edges() -> impl Iterator<Item = (Role, Role)> {
    Role::ALL.into_iter().flat_map(|parent| {
        let listed: &'static [Role] = match subordinates(parent) {
            Subordinates::All => &[],
            Subordinates::Only(roles) => roles,
        };
        listed.iter().map(move |child| (parent, *child))
    })
}
