//! # edugate-types: Core types for `edugate`
//!
//! This crate contains shared types used across the `edugate` workspace:
//! - Tenant anchoring ([`TenantType`], [`TenantId`], [`TenantScope`])
//! - Filterable record kinds ([`EntityKind`])
//! - Hierarchical record access ([`ScopedRecord`], [`EntityRecord`])

use std::fmt::{Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

// ============================================================================
// Tenant Anchoring
// ============================================================================

/// Granularity at which a user's visibility is anchored.
///
/// Ordered from the broadest anchor (`Bureau`, unscoped) down to the
/// narrowest (`School`). The derived `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantType {
    /// National education bureau. Sees everything.
    Bureau,
    /// Regional education bureau.
    Region,
    /// Zone administration.
    Zone,
    /// Woreda (district) education office.
    Woreda,
    /// A single school or institution.
    #[serde(alias = "institution")]
    School,
}

impl TenantType {
    /// All tenant types, broadest first.
    pub const ALL: [TenantType; 5] = [
        TenantType::Bureau,
        TenantType::Region,
        TenantType::Zone,
        TenantType::Woreda,
        TenantType::School,
    ];

    /// Returns the lowercase tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantType::Bureau => "bureau",
            TenantType::Region => "region",
            TenantType::Zone => "zone",
            TenantType::Woreda => "woreda",
            TenantType::School => "school",
        }
    }

    /// Returns whether this anchor carries system-wide visibility.
    pub fn is_unscoped(&self) -> bool {
        matches!(self, TenantType::Bureau)
    }
}

impl Display for TenantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tenant type tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tenant type: {0:?}")]
pub struct ParseTenantTypeError(pub String);

impl FromStr for TenantType {
    type Err = ParseTenantTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bureau" => Ok(TenantType::Bureau),
            "region" => Ok(TenantType::Region),
            "zone" => Ok(TenantType::Zone),
            "woreda" => Ok(TenantType::Woreda),
            "school" | "institution" => Ok(TenantType::School),
            _ => Err(ParseTenantTypeError(s.to_string())),
        }
    }
}

/// Identifier of an administrative unit (zone, woreda, school, ...).
///
/// Identifiers are issued by the organizational-entity store and are opaque
/// to this workspace; equality is the only operation the scope rules need.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TenantId({:?})", self.0)
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A caller's position in the administrative hierarchy.
///
/// `tenant_id` is `None` only for bureau (system-wide) callers. A scoped
/// caller without an id is representable, because claims arrive from an
/// external issuer, but it anchors nowhere and sees nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantScope {
    pub tenant_type: TenantType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
}

impl TenantScope {
    /// Creates a scope anchored at the given unit.
    pub fn new(tenant_type: TenantType, tenant_id: impl Into<TenantId>) -> Self {
        Self {
            tenant_type,
            tenant_id: Some(tenant_id.into()),
        }
    }

    /// The system-wide scope.
    pub fn bureau() -> Self {
        Self {
            tenant_type: TenantType::Bureau,
            tenant_id: None,
        }
    }

    /// Returns the anchor id, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.tenant_id.as_ref().map(TenantId::as_str)
    }

    /// Returns whether this scope is anchored at `tenant_type` with id `id`.
    pub fn is_anchored_at(&self, tenant_type: TenantType, id: Option<&str>) -> bool {
        self.tenant_type == tenant_type && id.is_some() && self.anchor() == id
    }
}

impl Display for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tenant_id {
            Some(id) => write!(f, "{}:{id}", self.tenant_type),
            None => write!(f, "{}", self.tenant_type),
        }
    }
}

// ============================================================================
// Entity Kinds
// ============================================================================

/// Kind of hierarchical record being filtered.
///
/// Closed set: every kind has an explicit ownership rule, and there is no
/// catch-all that lets an unrecognized kind through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Zone administrative unit.
    Zone,
    /// Woreda administrative unit, owned by a zone.
    Woreda,
    /// School / institution, owned by a woreda.
    School,
    /// Staff (HR) record attached to a school or woreda.
    Staff,
    /// Inventory item attached to a school or woreda.
    Inventory,
    /// Budget line attached to a school or woreda.
    Budget,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Zone,
        EntityKind::Woreda,
        EntityKind::School,
        EntityKind::Staff,
        EntityKind::Inventory,
        EntityKind::Budget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Zone => "zone",
            EntityKind::Woreda => "woreda",
            EntityKind::School => "school",
            EntityKind::Staff => "staff",
            EntityKind::Inventory => "inventory",
            EntityKind::Budget => "budget",
        }
    }

    /// The tenant granularity a record of this kind sits at.
    ///
    /// Operational records (staff, inventory, budget) attach at school level.
    pub fn granularity(&self) -> TenantType {
        match self {
            EntityKind::Zone => TenantType::Zone,
            EntityKind::Woreda => TenantType::Woreda,
            EntityKind::School | EntityKind::Staff | EntityKind::Inventory | EntityKind::Budget => {
                TenantType::School
            }
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an entity kind tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind: {0:?}")]
pub struct ParseEntityKindError(pub String);

impl FromStr for EntityKind {
    type Err = ParseEntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zone" => Ok(EntityKind::Zone),
            "woreda" => Ok(EntityKind::Woreda),
            "school" | "institution" => Ok(EntityKind::School),
            "staff" => Ok(EntityKind::Staff),
            "inventory" => Ok(EntityKind::Inventory),
            "budget" => Ok(EntityKind::Budget),
            _ => Err(ParseEntityKindError(s.to_string())),
        }
    }
}

// ============================================================================
// Hierarchical Records
// ============================================================================

/// Read access to the ownership chain of a hierarchical record.
///
/// Implemented by anything the scope filter narrows: zone, woreda and school
/// rows, and the staff / inventory / budget rows attached to them. Parent
/// references a record does not carry return `None`.
pub trait ScopedRecord {
    /// The record's own identifier.
    fn id(&self) -> &str;

    /// Owning zone, if the record carries one.
    fn zone_id(&self) -> Option<&str> {
        None
    }

    /// Owning woreda, if the record carries one.
    fn woreda_id(&self) -> Option<&str> {
        None
    }

    /// Owning school, if the record carries one.
    fn school_id(&self) -> Option<&str> {
        None
    }
}

impl<T: ScopedRecord + ?Sized> ScopedRecord for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn zone_id(&self) -> Option<&str> {
        (**self).zone_id()
    }

    fn woreda_id(&self) -> Option<&str> {
        (**self).woreda_id()
    }

    fn school_id(&self) -> Option<&str> {
        (**self).school_id()
    }
}

/// Generic hierarchical row as delivered by the dashboard's data APIs.
///
/// Only the ownership references are typed; every other column is kept
/// verbatim in `fields` so a filtered row serializes back unchanged.
///
/// Ids and references may arrive as JSON strings or numbers; numbers are kept
/// as their decimal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    #[serde(deserialize_with = "id_text")]
    pub id: String,

    #[serde(
        default,
        deserialize_with = "optional_id_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "optional_id_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub woreda_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "optional_id_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub school_id: Option<String>,

    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl EntityRecord {
    /// Creates a record with no parent references.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            zone_id: None,
            woreda_id: None,
            school_id: None,
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_woreda(mut self, woreda_id: impl Into<String>) -> Self {
        self.woreda_id = Some(woreda_id.into());
        self
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    /// Adds an untyped column.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Reads an id written as a JSON string or number.
///
/// Returns `None` for any other JSON type.
pub fn id_from_json(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_json(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a string or number id, found {value}")))
}

fn optional_id_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(value) => id_from_json(&value).map(Some).ok_or_else(|| {
            de::Error::custom(format!("expected a string or number id, found {value}"))
        }),
        None => Ok(None),
    }
}

impl ScopedRecord for EntityRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    fn woreda_id(&self) -> Option<&str> {
        self.woreda_id.as_deref()
    }

    fn school_id(&self) -> Option<&str> {
        self.school_id.as_deref()
    }
}
