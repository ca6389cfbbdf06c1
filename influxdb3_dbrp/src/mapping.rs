//! The DBRP mapping record and its validation rules.

use std::cmp::Ordering;
use std::fmt::Display;

use influxdb3_id::{BucketId, OrgId};
use serde::{Deserialize, Serialize};
use unicode_general_category::{GeneralCategory, get_general_category};

/// A mapping of a cluster, database and retention policy to an organization and bucket.
///
/// The record is not validated on construction; backends call [`DbrpMapping::validate`]
/// before accepting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DbrpMapping {
    pub cluster: String,
    pub database: String,
    pub retention_policy: String,

    /// Whether this is the mapping used for the cluster and database when a request does not
    /// name a retention policy.
    #[serde(default)]
    pub default: bool,

    pub organization_id: OrgId,
    pub bucket_id: BucketId,
}

impl DbrpMapping {
    /// Report the first field that breaks the mapping rules, checked in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let names = [
            (MappingField::Cluster, &self.cluster),
            (MappingField::Database, &self.database),
            (MappingField::RetentionPolicy, &self.retention_policy),
        ];
        if let Some((field, _)) = names.into_iter().find(|(_, name)| !valid_name(name)) {
            return Err(ValidationError::InvalidName { field });
        }
        if self.organization_id.is_empty() {
            return Err(ValidationError::MissingId {
                field: MappingField::OrganizationId,
            });
        }
        if self.bucket_id.is_empty() {
            return Err(ValidationError::MissingId {
                field: MappingField::BucketId,
            });
        }
        Ok(())
    }

    /// Compare two possibly absent mappings.
    ///
    /// The same reference is always equal to itself without looking at the fields, and two
    /// absent mappings are equal. An absent mapping never equals a present one.
    pub fn equal(a: Option<&Self>, b: Option<&Self>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => std::ptr::eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        }
    }

    pub fn key(&self) -> DbrpMappingKey {
        DbrpMappingKey::new(&self.cluster, &self.database, &self.retention_policy)
    }

    /// `true` if both mappings route to the same place with the same default flag
    pub fn same_target(&self, other: &Self) -> bool {
        self.default == other.default
            && self.organization_id == other.organization_id
            && self.bucket_id == other.bucket_id
    }

    pub(crate) fn cmp_key(&self, other: &Self) -> Ordering {
        self.cluster
            .cmp(&other.cluster)
            .then_with(|| self.database.cmp(&other.database))
            .then_with(|| self.retention_policy.cmp(&other.retention_policy))
    }
}

/// Checks that `name` can be used as a cluster, database or retention policy name.
///
/// These names end up as path segments in the legacy storage layout, so anything that could
/// escape or alias a directory is refused.
pub fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(is_printable)
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

// Letters, marks, numbers, punctuation, symbols and the ASCII space are printable.
fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
                | GeneralCategory::SpaceSeparator
                | GeneralCategory::PrivateUse
                | GeneralCategory::Surrogate
                | GeneralCategory::Unassigned
        )
}

/// The `(cluster, database, retention_policy)` triple that identifies a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbrpMappingKey {
    pub cluster: String,
    pub database: String,
    pub retention_policy: String,
}

impl DbrpMappingKey {
    pub fn new(
        cluster: impl Into<String>,
        database: impl Into<String>,
        retention_policy: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            database: database.into(),
            retention_policy: retention_policy.into(),
        }
    }
}

// valid names never contain '/', so the rendering is unambiguous
impl Display for DbrpMappingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.cluster, self.database, self.retention_policy
        )
    }
}

/// Fields of a [`DbrpMapping`] that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingField {
    Cluster,
    Database,
    RetentionPolicy,
    OrganizationId,
    BucketId,
}

impl Display for MappingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cluster => "Cluster",
            Self::Database => "Database",
            Self::RetentionPolicy => "RetentionPolicy",
            Self::OrganizationId => "OrganizationID",
            Self::BucketId => "BucketID",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "{field} must contain at least one printable character, must not be '.' or '..' and must not contain '/' or '\\'"
    )]
    InvalidName { field: MappingField },

    #[error("{field} is required")]
    MissingId { field: MappingField },
}

impl ValidationError {
    /// The field that failed validation
    pub fn field(&self) -> MappingField {
        match self {
            Self::InvalidName { field } | Self::MissingId { field } => *field,
        }
    }
}
