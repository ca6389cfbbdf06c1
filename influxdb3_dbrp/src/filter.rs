//! Filters and listing options for looking up DBRP mappings.

use std::cmp::Ordering;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::str::FromStr;

use influxdb3_clap_blocks::dbrp::DbrpServiceConfig;
use serde::{Deserialize, Serialize};

use crate::{DbrpMapping, Error, Result};

/// Restricts the mappings returned by a lookup.
///
/// Each `Some` field must match exactly; `None` leaves the field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbrpMappingFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl DbrpMappingFilter {
    /// A filter that matches every mapping
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_retention_policy(mut self, retention_policy: impl Into<String>) -> Self {
        self.retention_policy = Some(retention_policy.into());
        self
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = Some(default);
        self
    }

    pub fn matches(&self, mapping: &DbrpMapping) -> bool {
        fn field_matches<T: PartialEq + ?Sized>(want: Option<&T>, have: &T) -> bool {
            want.is_none_or(|want| want == have)
        }

        field_matches(self.cluster.as_deref(), mapping.cluster.as_str())
            && field_matches(self.database.as_deref(), mapping.database.as_str())
            && field_matches(
                self.retention_policy.as_deref(),
                mapping.retention_policy.as_str(),
            )
            && field_matches(self.default.as_ref(), &mapping.default)
    }
}

/// Column used to order the result of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    Cluster,
    Database,
    RetentionPolicy,
    Default,
}

impl SortBy {
    fn compare(&self, a: &DbrpMapping, b: &DbrpMapping) -> Ordering {
        match self {
            Self::Cluster => a.cluster.cmp(&b.cluster),
            Self::Database => a.database.cmp(&b.database),
            Self::RetentionPolicy => a.retention_policy.cmp(&b.retention_policy),
            Self::Default => a.default.cmp(&b.default),
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cluster => "cluster",
            Self::Database => "database",
            Self::RetentionPolicy => "retention_policy",
            Self::Default => "default",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort column '{0}', expected one of cluster, database, retention_policy, default")]
pub struct ParseSortByError(String);

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cluster" => Ok(Self::Cluster),
            "database" => Ok(Self::Database),
            "retention_policy" => Ok(Self::RetentionPolicy),
            "default" => Ok(Self::Default),
            _ => Err(ParseSortByError(s.to_string())),
        }
    }
}

/// Pagination and ordering of a `find_many` listing.
///
/// Without a [`SortBy`] column the listing is in key order; with one, ties fall back to key
/// order. `descending` reverses the final order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Page size, capped at the service's max page size. `None` uses the default page size.
    pub limit: Option<usize>,
    pub offset: usize,
    pub sort_by: Option<SortBy>,
    pub descending: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    /// Order `mappings` and cut out the requested page.
    ///
    /// Returns the page together with the number of mappings before pagination.
    pub fn paginate(
        &self,
        mut mappings: Vec<DbrpMapping>,
        config: &DbrpServiceConfig,
    ) -> Result<(Vec<DbrpMapping>, usize)> {
        let limit = match self.limit {
            Some(limit) => Some(NonZeroUsize::new(limit).ok_or_else(|| {
                Error::InvalidFindOptions("limit must be greater than zero".to_string())
            })?),
            None => None,
        };

        match self.sort_by {
            Some(sort_by) => {
                mappings.sort_by(|a, b| sort_by.compare(a, b).then_with(|| a.cmp_key(b)))
            }
            None => mappings.sort_by(DbrpMapping::cmp_key),
        }
        if self.descending {
            mappings.reverse();
        }

        let total = mappings.len();
        let page = mappings
            .into_iter()
            .skip(self.offset)
            .take(config.page_size(limit).get())
            .collect();
        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use influxdb3_id::{BucketId, OrgId};
    use pretty_assertions::assert_eq;

    fn mapping(cluster: &str, database: &str, rp: &str, default: bool) -> DbrpMapping {
        DbrpMapping {
            cluster: cluster.to_string(),
            database: database.to_string(),
            retention_policy: rp.to_string(),
            default,
            organization_id: OrgId::from_static(&[0x01]),
            bucket_id: BucketId::from_static(&[0x02]),
        }
    }

    fn keys(mappings: &[DbrpMapping]) -> Vec<String> {
        mappings.iter().map(|m| m.key().to_string()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = DbrpMappingFilter::new();
        assert!(filter.matches(&mapping("c", "db", "rp", false)));
        assert!(filter.matches(&mapping("other", "x", "y", true)));
    }

    #[test]
    fn filter_fields_must_all_match() {
        let m = mapping("c1", "db1", "autogen", true);

        assert!(DbrpMappingFilter::new().with_cluster("c1").matches(&m));
        assert!(!DbrpMappingFilter::new().with_cluster("c2").matches(&m));
        assert!(
            DbrpMappingFilter::new()
                .with_cluster("c1")
                .with_database("db1")
                .with_retention_policy("autogen")
                .with_default(true)
                .matches(&m)
        );
        assert!(
            !DbrpMappingFilter::new()
                .with_cluster("c1")
                .with_database("db1")
                .with_default(false)
                .matches(&m)
        );
        // exact comparison, no case folding
        assert!(!DbrpMappingFilter::new().with_database("DB1").matches(&m));
    }

    #[test]
    fn filter_serde_skips_unset_fields() {
        let filter = DbrpMappingFilter::new().with_database("db1").with_default(true);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"database": "db1", "default": true})
        );
        let back: DbrpMappingFilter = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn sort_by_parse_and_display() {
        for s in ["cluster", "database", "retention_policy", "default"] {
            let sort_by: SortBy = s.parse().unwrap();
            assert_eq!(sort_by.to_string(), s);
        }
        let err = "bucket_id".parse::<SortBy>().unwrap_err();
        insta::assert_snapshot!(
            err,
            @"unknown sort column 'bucket_id', expected one of cluster, database, retention_policy, default"
        );
    }

    #[test]
    fn paginate_defaults_to_key_order() {
        let mappings = vec![
            mapping("b", "db", "rp", false),
            mapping("a", "db2", "rp", false),
            mapping("a", "db1", "z", false),
            mapping("a", "db1", "a", false),
        ];
        let (page, total) = FindOptions::new()
            .paginate(mappings, &DbrpServiceConfig::default())
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(keys(&page), ["a/db1/a", "a/db1/z", "a/db2/rp", "b/db/rp"]);
    }

    #[test]
    fn paginate_sorts_and_breaks_ties_by_key() {
        let mappings = vec![
            mapping("a", "db", "rp2", true),
            mapping("a", "db", "rp1", false),
            mapping("b", "db", "rp", true),
            mapping("a", "db", "rp0", false),
        ];
        let config = DbrpServiceConfig::default();

        let (page, _) = FindOptions::new()
            .with_sort_by(SortBy::Default)
            .paginate(mappings.clone(), &config)
            .unwrap();
        assert_eq!(keys(&page), ["a/db/rp0", "a/db/rp1", "a/db/rp2", "b/db/rp"]);

        let (page, _) = FindOptions::new()
            .with_sort_by(SortBy::RetentionPolicy)
            .with_descending(true)
            .paginate(mappings, &config)
            .unwrap();
        assert_eq!(keys(&page), ["a/db/rp2", "a/db/rp1", "a/db/rp0", "b/db/rp"]);
    }

    #[test]
    fn paginate_limit_and_offset() {
        let mappings: Vec<_> = (0..10)
            .map(|i| mapping("c", "db", &format!("rp{i}"), false))
            .collect();
        let config = DbrpServiceConfig::default();

        let (page, total) = FindOptions::new()
            .with_limit(3)
            .with_offset(2)
            .paginate(mappings.clone(), &config)
            .unwrap();
        assert_eq!(total, 10);
        assert_eq!(keys(&page), ["c/db/rp2", "c/db/rp3", "c/db/rp4"]);

        let (page, total) = FindOptions::new()
            .with_offset(20)
            .paginate(mappings, &config)
            .unwrap();
        assert_eq!(total, 10);
        assert!(page.is_empty());
    }

    #[test]
    fn paginate_caps_at_max_page_size() {
        let config = DbrpServiceConfig {
            default_page_size: NonZeroUsize::new(2).unwrap(),
            max_page_size: NonZeroUsize::new(4).unwrap(),
        };
        let mappings: Vec<_> = (0..10)
            .map(|i| mapping("c", "db", &format!("rp{i}"), false))
            .collect();

        let (page, _) = FindOptions::new()
            .paginate(mappings.clone(), &config)
            .unwrap();
        assert_eq!(page.len(), 2);

        let (page, total) = FindOptions::new()
            .with_limit(50)
            .paginate(mappings, &config)
            .unwrap();
        assert_eq!(page.len(), 4);
        assert_eq!(total, 10);
    }

    #[test]
    fn paginate_rejects_zero_limit() {
        let err = FindOptions::new()
            .with_limit(0)
            .paginate(vec![], &DbrpServiceConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFindOptions(_)), "{err}");
    }
}
