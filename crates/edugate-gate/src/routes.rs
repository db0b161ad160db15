//! Route permission table.
//!
//! Maps dashboard path prefixes to the roles admitted under them. Matching is
//! a raw string-prefix test, and every rule whose prefix matches a path must
//! admit the role: overlapping prefixes narrow access, never widen it.

use edugate_rbac::Role;

/// One (path prefix, allowed roles) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    prefix: String,
    allowed: Vec<Role>,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            prefix: prefix.into(),
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Returns whether the rule lists `role`. An unknown role is listed nowhere.
    pub fn admits(&self, role: Option<Role>) -> bool {
        role.is_some_and(|role| self.allowed.contains(&role))
    }
}

/// Ordered list of route rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePermissionTable {
    rules: Vec<RouteRule>,
}

impl RoutePermissionTable {
    /// Creates a table with no rules. Every authenticated role is admitted.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The dashboard's route table.
    pub fn standard() -> Self {
        use Role::{
            InstitutionAdmin, Instructor, KebeleAdmin, RegionalAdmin, Registrar, Student,
            SystemAdmin, WoredaAdmin, ZoneAdmin,
        };

        Self::empty()
            .with_rule("/dashboard/admin", [SystemAdmin])
            .with_rule("/dashboard/region", [SystemAdmin, RegionalAdmin])
            .with_rule("/dashboard/zone", [SystemAdmin, RegionalAdmin, ZoneAdmin])
            .with_rule(
                "/dashboard/woreda",
                [SystemAdmin, RegionalAdmin, ZoneAdmin, WoredaAdmin],
            )
            .with_rule(
                "/dashboard/kebele",
                [SystemAdmin, RegionalAdmin, ZoneAdmin, WoredaAdmin, KebeleAdmin],
            )
            .with_rule("/dashboard/institution", [SystemAdmin, InstitutionAdmin])
            .with_rule("/dashboard/registrar", [SystemAdmin, Registrar])
            .with_rule("/dashboard/academic", [SystemAdmin, Instructor, Student])
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(
        mut self,
        prefix: impl Into<String>,
        allowed: impl IntoIterator<Item = Role>,
    ) -> Self {
        self.rules.push(RouteRule::new(prefix, allowed));
        self
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates the rules whose prefix matches `path`, in table order.
    pub fn matching<'t, 'p>(&'t self, path: &'p str) -> impl Iterator<Item = &'t RouteRule> + 'p
    where
        't: 'p,
    {
        self.rules.iter().filter(move |rule| rule.matches(path))
    }

    /// Returns the first matching rule that does not admit `role`.
    pub fn first_excluding(&self, path: &str, role: Option<Role>) -> Option<&RouteRule> {
        self.matching(path).find(|rule| !rule.admits(role))
    }

    /// Returns whether every rule matching `path` admits `role`.
    pub fn permits(&self, path: &str, role: Option<Role>) -> bool {
        self.first_excluding(path, role).is_none()
    }
}

impl Default for RoutePermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_standard_table_has_eight_rules() {
        let table = RoutePermissionTable::standard();
        assert_eq!(table.len(), 8);
        assert_eq!(table.rules()[0].prefix(), "/dashboard/admin");
        assert_eq!(table.rules()[0].allowed(), &[Role::SystemAdmin]);
        for rule in table.rules() {
            assert!(rule.allowed().contains(&Role::SystemAdmin));
        }
    }

    #[test_case("/dashboard/admin", Role::ZoneAdmin, false ; "zone admin denied admin area")]
    #[test_case("/dashboard/region/stats", Role::RegionalAdmin, true ; "regional admin in region")]
    #[test_case("/dashboard/zone", Role::WoredaAdmin, false ; "woreda admin denied zone")]
    #[test_case("/dashboard/kebele/list", Role::WoredaAdmin, true ; "woreda admin in kebele")]
    #[test_case("/dashboard/institution", Role::KebeleAdmin, false ; "kebele admin denied institution")]
    #[test_case("/dashboard/registrar", Role::Registrar, true ; "registrar in registrar")]
    #[test_case("/dashboard/academic/grades", Role::Student, true ; "student in academic")]
    #[test_case("/dashboard/academic", Role::Accountant, false ; "accountant denied academic")]
    #[test_case("/dashboard/reports", Role::Student, true ; "unlisted path admits everyone")]
    #[test_case("/dashboard", Role::Accountant, true ; "dashboard root admits everyone")]
    fn test_standard_table_permits(path: &str, role: Role, expected: bool) {
        assert_eq!(
            RoutePermissionTable::standard().permits(path, Some(role)),
            expected
        );
    }

    #[test]
    fn test_matching_is_raw_prefix() {
        let table = RoutePermissionTable::standard();
        assert!(!table.permits("/dashboard/administration", Some(Role::ZoneAdmin)));
        assert!(table.permits("/dashboard/zones", Some(Role::ZoneAdmin)));
        assert!(table.permits("/Dashboard/admin", Some(Role::ZoneAdmin)));
    }

    #[test]
    fn test_overlapping_prefixes_require_every_rule() {
        let table = RoutePermissionTable::empty()
            .with_rule("/dashboard/zone", [Role::SystemAdmin, Role::ZoneAdmin])
            .with_rule("/dashboard/zone/finance", [Role::SystemAdmin, Role::Accountant]);

        assert!(table.permits("/dashboard/zone/schools", Some(Role::ZoneAdmin)));
        assert!(!table.permits("/dashboard/zone/finance", Some(Role::ZoneAdmin)));
        assert!(!table.permits("/dashboard/zone/finance", Some(Role::Accountant)));

        let denied = table
            .first_excluding("/dashboard/zone/finance", Some(Role::ZoneAdmin))
            .unwrap();
        assert_eq!(denied.prefix(), "/dashboard/zone/finance");
    }

    #[test]
    fn test_excluding_rule_outlives_the_path() {
        let table = RoutePermissionTable::standard();
        let denied = {
            let path = format!("/dashboard/{}", "region/stats");
            table.first_excluding(&path, Some(Role::ZoneAdmin))
        };
        assert_eq!(denied.map(RouteRule::prefix), Some("/dashboard/region"));

        let prefixes: Vec<&str> = {
            let path = String::from("/dashboard/zone/reports");
            table.matching(&path).map(RouteRule::prefix).collect()
        };
        assert_eq!(prefixes, vec!["/dashboard/zone"]);
    }

    #[test]
    fn test_unknown_role_is_listed_nowhere() {
        let table = RoutePermissionTable::standard();
        assert!(!table.permits("/dashboard/zone", None));
        assert!(table.permits("/dashboard/reports", None));
    }

    #[test]
    fn test_empty_table_permits_everything() {
        let table = RoutePermissionTable::empty();
        assert!(table.is_empty());
        assert!(table.permits("/dashboard/admin", Some(Role::Student)));
    }
}
