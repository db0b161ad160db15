//! Role definitions for RBAC.
//!
//! Ten roles ordered by administrative rank, broadest authority first:
//! the six administrative tiers (system, regional, zone, woreda, kebele,
//! institution), three operational school roles of equal rank, and students.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role in the access control system.
///
/// The derived `Ord` follows declaration order, which is rank order. Roles of
/// equal rank (`Registrar`, `Instructor`, `Accountant`) still compare unequal
/// under `Ord`; use [`Role::level`] when ties matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Ministry-level operator.
    ///
    /// **Permissions:**
    /// - Manages every role, including other system admins
    /// - Passes every route check once the session is valid
    /// - Bureau tenants see all rows
    SystemAdmin,

    /// Regional education bureau administrator.
    RegionalAdmin,

    /// Zone administrator. Manages woredas and everything below.
    ZoneAdmin,

    /// Woreda (district) education office administrator.
    WoredaAdmin,

    /// Kebele administrator.
    KebeleAdmin,

    /// School / institution administrator.
    InstitutionAdmin,

    /// Student records office within an institution.
    Registrar,

    /// Teaching staff.
    Instructor,

    /// Institution finance officer.
    Accountant,

    /// Enrolled student. Most restricted role.
    Student,
}

impl Role {
    /// All roles in rank order.
    pub const ALL: [Role; 10] = [
        Role::SystemAdmin,
        Role::RegionalAdmin,
        Role::ZoneAdmin,
        Role::WoredaAdmin,
        Role::KebeleAdmin,
        Role::InstitutionAdmin,
        Role::Registrar,
        Role::Instructor,
        Role::Accountant,
        Role::Student,
    ];

    /// Returns the wire tag (`"ZONE_ADMIN"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SYSTEM_ADMIN",
            Role::RegionalAdmin => "REGIONAL_ADMIN",
            Role::ZoneAdmin => "ZONE_ADMIN",
            Role::WoredaAdmin => "WOREDA_ADMIN",
            Role::KebeleAdmin => "KEBELE_ADMIN",
            Role::InstitutionAdmin => "INSTITUTION_ADMIN",
            Role::Registrar => "REGISTRAR",
            Role::Instructor => "INSTRUCTOR",
            Role::Accountant => "ACCOUNTANT",
            Role::Student => "STUDENT",
        }
    }

    /// Returns the label shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "System Admin",
            Role::RegionalAdmin => "Regional Admin",
            Role::ZoneAdmin => "Zone Admin",
            Role::WoredaAdmin => "Woreda Admin",
            Role::KebeleAdmin => "Kebele Admin",
            Role::InstitutionAdmin => "Institution Admin",
            Role::Registrar => "Registrar",
            Role::Instructor => "Instructor",
            Role::Accountant => "Accountant",
            Role::Student => "Student",
        }
    }

    /// Returns the administrative rank (0 = broadest authority).
    pub fn level(&self) -> u8 {
        match self {
            Role::SystemAdmin => 0,
            Role::RegionalAdmin => 1,
            Role::ZoneAdmin => 2,
            Role::WoredaAdmin => 3,
            Role::KebeleAdmin => 4,
            Role::InstitutionAdmin => 5,
            Role::Registrar | Role::Instructor | Role::Accountant => 6,
            Role::Student => 7,
        }
    }

    /// Returns whether this role is one of the six administrative tiers.
    pub fn is_admin(&self) -> bool {
        match self {
            Role::SystemAdmin
            | Role::RegionalAdmin
            | Role::ZoneAdmin
            | Role::WoredaAdmin
            | Role::KebeleAdmin
            | Role::InstitutionAdmin => true,
            Role::Registrar | Role::Instructor | Role::Accountant | Role::Student => false,
        }
    }

    /// Returns the dashboard a user with this role lands on after login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "/dashboard/admin",
            Role::RegionalAdmin => "/dashboard/region",
            Role::ZoneAdmin => "/dashboard/zone",
            Role::WoredaAdmin => "/dashboard/woreda",
            Role::KebeleAdmin => "/dashboard/kebele",
            Role::InstitutionAdmin => "/dashboard/institution",
            Role::Registrar => "/dashboard/registrar",
            Role::Instructor | Role::Student => "/dashboard/academic",
            Role::Accountant => "/dashboard/finance",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role tag is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Parses a role tag. Case-insensitive; `-` and space are accepted in
    /// place of `_` (`"zone-admin"`, `"Zone Admin"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}
