//! Entity identity types.
//!
//! Hosts and groups are addressed externally by name and internally by a
//! system-assigned id. `Reference` captures the "name and/or id" addressing
//! contract as a tagged variant, so the at-least-one-present invariant is
//! enforced by the type instead of a runtime check scattered over call sites.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::value::Value;

/// Opaque, stable entity identifier.
///
/// Assigned by the store at creation, never rewritten, never reused after
/// deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Creates a new random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parses an id from its string form (as stored in documents).
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns true if this is the nil (all zeros) id.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// The two entity kinds the inventory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Host,
    Group,
}

impl EntityKind {
    /// The store table holding entities of this kind.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Host => "hosts",
            Self::Group => "groups",
        }
    }

    /// The document field the payload lives under.
    ///
    /// Host variables are stored under `vars`; group payloads under `data`.
    #[must_use]
    pub const fn payload_field(&self) -> &'static str {
        match self {
            Self::Host => "vars",
            Self::Group => "data",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// A caller-supplied address for one entity: a name, an id, or both.
///
/// When both are present the id is authoritative and the name is ignored
/// by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Name(String),
    Id(EntityId),
    NameAndId { name: String, id: EntityId },
}

impl Reference {
    /// Builds a reference from optional parts, failing with
    /// `InvalidReference` when neither is usable. Empty name strings count
    /// as absent.
    pub fn from_parts(name: Option<&str>, id: Option<EntityId>) -> InventoryResult<Self> {
        let name = name.filter(|n| !n.is_empty());
        match (name, id) {
            (Some(name), Some(id)) => Ok(Self::NameAndId {
                name: name.to_string(),
                id,
            }),
            (Some(name), None) => Ok(Self::Name(name.to_string())),
            (None, Some(id)) => Ok(Self::Id(id)),
            (None, None) => Err(InventoryError::InvalidReference),
        }
    }

    /// The id, when the reference carries one.
    #[must_use]
    pub const fn id(&self) -> Option<EntityId> {
        match self {
            Self::Id(id) | Self::NameAndId { id, .. } => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// The name, when the reference carries one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) | Self::NameAndId { name, .. } => Some(name),
            Self::Id(_) => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "{id}"),
            Self::NameAndId { name, id } => write!(f, "{name} ({id})"),
        }
    }
}

impl From<EntityId> for Reference {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// The typed form of a group's `data` sub-document.
///
/// All three sub-fields are optional in storage; absent fields default to
/// empty containers. `children` names are unchecked, so cycles in the group
/// hierarchy are representable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    /// Names of hosts belonging directly to this group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Variables inherited by all member hosts.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub vars: Value,

    /// Names of child groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

impl GroupData {
    /// Converts to the stored document form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut data = Value::map();
        if !self.hosts.is_empty() {
            data.insert(
                "hosts",
                Value::Sequence(self.hosts.iter().map(|h| Value::from(h.as_str())).collect()),
            );
        }
        if !self.vars.is_null() {
            data.insert("vars", self.vars.clone());
        }
        if !self.children.is_empty() {
            data.insert(
                "children",
                Value::Sequence(
                    self.children
                        .iter()
                        .map(|c| Value::from(c.as_str()))
                        .collect(),
                ),
            );
        }
        data
    }
}
