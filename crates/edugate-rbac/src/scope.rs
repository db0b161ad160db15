//! Tenant scope filtering.
//!
//! Narrows collections of hierarchical records (zones, woredas, schools and
//! the staff / inventory / budget rows attached to them) to what a caller
//! anchored at a given tenant may see.
//!
//! ## Ownership rules
//!
//! | Kind | `zone` caller | `woreda` caller | `school` caller |
//! |------|---------------|-----------------|-----------------|
//! | zone | `id` | - | - |
//! | woreda | `zoneId` | `id` | - |
//! | school | `zoneId` | `woredaId` | `id` |
//! | staff / inventory / budget | `zoneId` | `woredaId` | `schoolId` |
//!
//! A `bureau` caller sees everything. Any other combination sees nothing: a
//! caller never sees a record above its own granularity, even the unit that
//! contains it.

use edugate_types::{EntityKind, ScopedRecord, TenantScope, TenantType};
use thiserror::Error;
use tracing::{Level, debug, event, warn};

/// Error type for scope enforcement.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The record is outside the caller's tenant scope.
    #[error("{kind} '{id}' is outside scope {scope}")]
    OutOfScope {
        kind: EntityKind,
        id: String,
        scope: String,
    },
}

/// Result type for scope operations.
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Level for rows hidden by a collection filter. Hiding rows is the normal
/// outcome for a scoped caller; `warn` is reserved for refused single-record
/// access.
pub const HIDDEN_ROWS_LEVEL: Level = Level::INFO;

/// Ownership predicate for one entity kind.
///
/// Called only for scoped (non-bureau) callers.
pub type OwnershipRule = fn(&TenantScope, &dyn ScopedRecord) -> bool;

/// Returns the ownership predicate for `kind`.
pub fn ownership_rule(kind: EntityKind) -> OwnershipRule {
    match kind {
        EntityKind::Zone => owns_zone,
        EntityKind::Woreda => owns_woreda,
        EntityKind::School => owns_school,
        EntityKind::Staff | EntityKind::Inventory | EntityKind::Budget => owns_attached,
    }
}

fn owns_zone(scope: &TenantScope, record: &dyn ScopedRecord) -> bool {
    scope.is_anchored_at(TenantType::Zone, Some(record.id()))
}

fn owns_woreda(scope: &TenantScope, record: &dyn ScopedRecord) -> bool {
    scope.is_anchored_at(TenantType::Zone, record.zone_id())
        || scope.is_anchored_at(TenantType::Woreda, Some(record.id()))
}

fn owns_school(scope: &TenantScope, record: &dyn ScopedRecord) -> bool {
    scope.is_anchored_at(TenantType::Zone, record.zone_id())
        || scope.is_anchored_at(TenantType::Woreda, record.woreda_id())
        || scope.is_anchored_at(TenantType::School, Some(record.id()))
}

fn owns_attached(scope: &TenantScope, record: &dyn ScopedRecord) -> bool {
    scope.is_anchored_at(TenantType::Zone, record.zone_id())
        || scope.is_anchored_at(TenantType::Woreda, record.woreda_id())
        || scope.is_anchored_at(TenantType::School, record.school_id())
}

/// Returns whether `record` of `kind` is visible from `scope`.
pub fn is_visible<R: ScopedRecord>(record: &R, kind: EntityKind, scope: &TenantScope) -> bool {
    if scope.tenant_type.is_unscoped() {
        return true;
    }
    // Never visible to a caller anchored below the record's own granularity.
    if scope.tenant_type > kind.granularity() {
        return false;
    }
    ownership_rule(kind)(scope, record)
}

/// Returns the records of `kind` visible from `scope`, in input order.
pub fn scope_filter<R: ScopedRecord + Clone>(
    entities: &[R],
    kind: EntityKind,
    scope: &TenantScope,
) -> Vec<R> {
    entities
        .iter()
        .filter(|record| is_visible(*record, kind, scope))
        .cloned()
        .collect()
}

/// Scope enforcement bound to one caller.
///
/// Same rules as [`scope_filter`], plus audit logging: hidden rows are
/// logged at `info`, a refused single-record access at `warn`.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    scope: TenantScope,

    /// Whether to log filtering outcomes.
    audit_enabled: bool,
}

impl ScopeFilter {
    /// Creates a filter anchored at `scope`.
    pub fn new(scope: TenantScope) -> Self {
        Self {
            scope,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Returns whether the caller sees every row regardless of kind.
    pub fn is_unrestricted(&self) -> bool {
        self.scope.tenant_type.is_unscoped()
    }

    pub fn is_visible<R: ScopedRecord>(&self, record: &R, kind: EntityKind) -> bool {
        is_visible(record, kind, &self.scope)
    }

    /// Returns the visible records, borrowed, in input order.
    pub fn filter<'a, R: ScopedRecord>(&self, records: &'a [R], kind: EntityKind) -> Vec<&'a R> {
        let visible: Vec<&R> = records
            .iter()
            .filter(|record| self.is_visible(*record, kind))
            .collect();

        self.audit(kind, records.len(), visible.len());
        visible
    }

    /// Consumes `records` and returns the visible ones, in input order.
    pub fn filter_owned<R: ScopedRecord>(&self, records: Vec<R>, kind: EntityKind) -> Vec<R> {
        let total = records.len();
        let visible: Vec<R> = records
            .into_iter()
            .filter(|record| self.is_visible(record, kind))
            .collect();

        self.audit(kind, total, visible.len());
        visible
    }

    /// Removes invisible records in place.
    pub fn retain<R: ScopedRecord>(&self, records: &mut Vec<R>, kind: EntityKind) {
        let total = records.len();
        records.retain(|record| self.is_visible(record, kind));
        self.audit(kind, total, records.len());
    }

    /// Checks a single record, e.g. before rendering its detail page.
    pub fn ensure_visible<R: ScopedRecord>(&self, record: &R, kind: EntityKind) -> Result<()> {
        if self.is_visible(record, kind) {
            return Ok(());
        }

        if self.audit_enabled {
            warn!(
                kind = %kind,
                id = %record.id(),
                scope = %self.scope,
                "Record access denied by tenant scope"
            );
        }

        Err(ScopeError::OutOfScope {
            kind,
            id: record.id().to_string(),
            scope: self.scope.to_string(),
        })
    }

    fn audit(&self, kind: EntityKind, total: usize, visible: usize) {
        if !self.audit_enabled {
            return;
        }

        let hidden = total - visible;
        if hidden > 0 {
            event!(
                HIDDEN_ROWS_LEVEL,
                kind = %kind,
                scope = %self.scope,
                total,
                hidden,
                "Rows hidden by tenant scope"
            );
        } else {
            debug!(kind = %kind, scope = %self.scope, total, "All rows in scope");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugate_types::EntityRecord;
    use proptest::prelude::*;

    fn zone_caller(id: &str) -> TenantScope {
        TenantScope::new(TenantType::Zone, id)
    }

    fn woreda_caller(id: &str) -> TenantScope {
        TenantScope::new(TenantType::Woreda, id)
    }

    fn school_caller(id: &str) -> TenantScope {
        TenantScope::new(TenantType::School, id)
    }

    fn ids<R: ScopedRecord>(records: &[R]) -> Vec<&str> {
        records.iter().map(ScopedRecord::id).collect()
    }

    fn schools() -> Vec<EntityRecord> {
        vec![
            EntityRecord::new("S1").with_zone("Z1").with_woreda("W1"),
            EntityRecord::new("S2").with_zone("Z1").with_woreda("W2"),
            EntityRecord::new("S3").with_zone("Z2").with_woreda("W3"),
            EntityRecord::new("S4").with_woreda("W1"),
        ]
    }

    fn budgets() -> Vec<EntityRecord> {
        vec![
            EntityRecord::new("B1")
                .with_zone("Z1")
                .with_woreda("W1")
                .with_school("S1"),
            EntityRecord::new("B2").with_woreda("W1"),
            EntityRecord::new("B3")
                .with_zone("Z2")
                .with_woreda("W3")
                .with_school("S3"),
            EntityRecord::new("B4").with_school("S1"),
        ]
    }

    // ------------------------------------------------------------------
    // Per-kind ownership rules
    // ------------------------------------------------------------------

    #[test]
    fn test_zone_visible_only_to_its_own_zone_caller() {
        let zone = EntityRecord::new("Z1");

        assert!(is_visible(&zone, EntityKind::Zone, &zone_caller("Z1")));
        assert!(!is_visible(&zone, EntityKind::Zone, &zone_caller("Z2")));
    }

    #[test]
    fn test_zone_hidden_from_lower_granularity_callers() {
        // Even the zone that contains the caller's woreda / school.
        let zone = EntityRecord::new("Z1");

        assert!(!is_visible(&zone, EntityKind::Zone, &woreda_caller("Z1")));
        assert!(!is_visible(&zone, EntityKind::Zone, &school_caller("Z1")));
        assert!(!is_visible(
            &zone,
            EntityKind::Zone,
            &TenantScope::new(TenantType::Region, "Z1")
        ));
    }

    #[test]
    fn test_callers_below_kind_granularity_see_nothing() {
        // Every reference points at the caller's own id.
        let row = EntityRecord::new("X1")
            .with_zone("X1")
            .with_woreda("X1")
            .with_school("X1");

        for kind in EntityKind::ALL {
            for tenant_type in TenantType::ALL {
                if tenant_type > kind.granularity() {
                    let caller = TenantScope::new(tenant_type, "X1");
                    assert!(!is_visible(&row, kind, &caller), "{tenant_type} sees {kind}");
                }
            }
        }
        assert!(is_visible(&row, EntityKind::Zone, &zone_caller("X1")));
    }

    #[test]
    fn test_hidden_rows_are_not_logged_as_warnings() {
        assert_eq!(HIDDEN_ROWS_LEVEL, Level::INFO);
        assert_ne!(HIDDEN_ROWS_LEVEL, Level::WARN);
    }

    #[test]
    fn test_woreda_rules() {
        let woreda = EntityRecord::new("W1").with_zone("Z1");

        assert!(is_visible(&woreda, EntityKind::Woreda, &zone_caller("Z1")));
        assert!(!is_visible(&woreda, EntityKind::Woreda, &zone_caller("Z2")));
        assert!(is_visible(&woreda, EntityKind::Woreda, &woreda_caller("W1")));
        assert!(!is_visible(&woreda, EntityKind::Woreda, &woreda_caller("W2")));
        assert!(!is_visible(&woreda, EntityKind::Woreda, &school_caller("W1")));
    }

    #[test]
    fn test_school_visible_to_owning_woreda() {
        let school = EntityRecord::new("S1").with_woreda("W1");

        assert!(is_visible(&school, EntityKind::School, &woreda_caller("W1")));
        assert!(!is_visible(&school, EntityKind::School, &woreda_caller("W2")));
    }

    #[test]
    fn test_school_rules_for_zone_and_school_callers() {
        let school = EntityRecord::new("S1").with_zone("Z1").with_woreda("W1");

        assert!(is_visible(&school, EntityKind::School, &zone_caller("Z1")));
        assert!(!is_visible(&school, EntityKind::School, &zone_caller("Z9")));
        assert!(is_visible(&school, EntityKind::School, &school_caller("S1")));
        assert!(!is_visible(&school, EntityKind::School, &school_caller("S2")));
    }

    #[test]
    fn test_school_without_zone_reference_hidden_from_zone_caller() {
        let school = EntityRecord::new("S4").with_woreda("W1");
        assert!(!is_visible(&school, EntityKind::School, &zone_caller("Z1")));
    }

    #[test]
    fn test_attached_records_follow_school_reference() {
        for kind in [EntityKind::Staff, EntityKind::Inventory, EntityKind::Budget] {
            let row = EntityRecord::new("R1").with_woreda("W1").with_school("S1");

            assert!(is_visible(&row, kind, &school_caller("S1")));
            assert!(!is_visible(&row, kind, &school_caller("R1")));
            assert!(is_visible(&row, kind, &woreda_caller("W1")));
            assert!(!is_visible(&row, kind, &zone_caller("Z1")));
        }
    }

    #[test]
    fn test_scoped_caller_without_id_sees_nothing() {
        let scope = TenantScope {
            tenant_type: TenantType::Woreda,
            tenant_id: None,
        };
        let orphan = EntityRecord::new("W1");

        for kind in EntityKind::ALL {
            assert!(!is_visible(&orphan, kind, &scope));
        }
    }

    #[test]
    fn test_region_caller_sees_nothing() {
        let scope = TenantScope::new(TenantType::Region, "R1");
        let rows = budgets();
        for kind in EntityKind::ALL {
            assert!(scope_filter(&rows, kind, &scope).is_empty());
        }
    }

    #[test]
    fn test_ownership_rules_are_independent_per_kind() {
        let scope = woreda_caller("W1");
        let row = EntityRecord::new("W1");

        // Matches the woreda rule by id, but a school row's own id is not a woreda.
        assert!(ownership_rule(EntityKind::Woreda)(&scope, &row));
        assert!(!ownership_rule(EntityKind::School)(&scope, &row));
        assert!(!ownership_rule(EntityKind::Budget)(&scope, &row));
    }

    // ------------------------------------------------------------------
    // Collection filtering
    // ------------------------------------------------------------------

    #[test]
    fn test_bureau_returns_input_unchanged() {
        let rows = schools();
        let filtered = scope_filter(&rows, EntityKind::School, &TenantScope::bureau());
        assert_eq!(filtered, rows);
    }

    #[test]
    fn test_filter_preserves_order() {
        let rows = schools();
        let filtered = scope_filter(&rows, EntityKind::School, &woreda_caller("W1"));
        assert_eq!(ids(&filtered), vec!["S1", "S4"]);
    }

    #[test]
    fn test_filter_does_not_deduplicate() {
        let row = EntityRecord::new("S1").with_woreda("W1");
        let rows = vec![row.clone(), row.clone()];
        let filtered = scope_filter(&rows, EntityKind::School, &woreda_caller("W1"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_budget_rows_for_each_level() {
        let rows = budgets();

        let zone = scope_filter(&rows, EntityKind::Budget, &zone_caller("Z1"));
        assert_eq!(ids(&zone), vec!["B1"]);

        let woreda = scope_filter(&rows, EntityKind::Budget, &woreda_caller("W1"));
        assert_eq!(ids(&woreda), vec!["B1", "B2"]);

        let school = scope_filter(&rows, EntityKind::Budget, &school_caller("S1"));
        assert_eq!(ids(&school), vec!["B1", "B4"]);
    }

    #[test]
    fn test_enforcer_variants_agree() {
        let filter = ScopeFilter::new(zone_caller("Z1")).without_audit();
        let rows = schools();

        let borrowed: Vec<&str> = filter
            .filter(&rows, EntityKind::School)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();

        let owned = filter.filter_owned(rows.clone(), EntityKind::School);

        let mut retained = rows.clone();
        filter.retain(&mut retained, EntityKind::School);

        assert_eq!(borrowed, vec!["S1", "S2"]);
        assert_eq!(ids(&owned), borrowed);
        assert_eq!(ids(&retained), borrowed);
    }

    #[test]
    fn test_ensure_visible() {
        let filter = ScopeFilter::new(school_caller("S1")).without_audit();

        let own = EntityRecord::new("S1");
        let other = EntityRecord::new("S2");

        assert!(filter.ensure_visible(&own, EntityKind::School).is_ok());

        match filter.ensure_visible(&other, EntityKind::School) {
            Err(ScopeError::OutOfScope { kind, id, scope }) => {
                assert_eq!(kind, EntityKind::School);
                assert_eq!(id, "S2");
                assert_eq!(scope, "school:S1");
            }
            Ok(()) => panic!("Expected OutOfScope error"),
        }
    }

    #[test]
    fn test_bureau_filter_is_unrestricted() {
        let filter = ScopeFilter::new(TenantScope::bureau());
        assert!(filter.is_unrestricted());
        assert!(!ScopeFilter::new(zone_caller("Z1")).is_unrestricted());
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    fn arb_ref() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(vec![
            "Z1".to_string(),
            "Z2".to_string(),
            "W1".to_string(),
            "W2".to_string(),
            "S1".to_string(),
            "S2".to_string(),
        ]))
    }

    fn arb_record() -> impl Strategy<Value = EntityRecord> {
        (
            prop::sample::select(vec!["Z1", "Z2", "W1", "W2", "S1", "S2"]),
            arb_ref(),
            arb_ref(),
            arb_ref(),
        )
            .prop_map(|(id, zone, woreda, school)| EntityRecord {
                id: id.to_string(),
                zone_id: zone,
                woreda_id: woreda,
                school_id: school,
                fields: serde_json::Map::new(),
            })
    }

    fn arb_scope() -> impl Strategy<Value = TenantScope> {
        (
            prop::sample::select(TenantType::ALL.to_vec()),
            arb_ref(),
        )
            .prop_map(|(tenant_type, tenant_id)| TenantScope {
                tenant_type,
                tenant_id: tenant_id.map(Into::into),
            })
    }

    fn arb_kind() -> impl Strategy<Value = EntityKind> {
        prop::sample::select(EntityKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            rows in prop::collection::vec(arb_record(), 0..20),
            kind in arb_kind(),
            scope in arb_scope()
        ) {
            let once = scope_filter(&rows, kind, &scope);
            let twice = scope_filter(&once, kind, &scope);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_bureau_sees_everything(
            rows in prop::collection::vec(arb_record(), 0..20),
            kind in arb_kind()
        ) {
            let filtered = scope_filter(&rows, kind, &TenantScope::bureau());
            prop_assert_eq!(filtered, rows);
        }

        #[test]
        fn prop_filter_result_is_ordered_subsequence(
            rows in prop::collection::vec(arb_record(), 0..20),
            kind in arb_kind(),
            scope in arb_scope()
        ) {
            let filtered = scope_filter(&rows, kind, &scope);
            let mut remaining = rows.iter();
            for kept in &filtered {
                prop_assert!(remaining.any(|row| row == kept));
            }
        }

        #[test]
        fn prop_zones_invisible_below_zone_granularity(
            zone in arb_record(),
            tenant_id in arb_ref(),
            tenant_type in prop::sample::select(vec![TenantType::Woreda, TenantType::School])
        ) {
            let scope = TenantScope { tenant_type, tenant_id: tenant_id.map(Into::into) };
            prop_assert!(!is_visible(&zone, EntityKind::Zone, &scope));
        }
    }
}
