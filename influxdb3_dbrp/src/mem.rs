//! An in-memory implementation of the [`DbrpMappingService`]. It can be used for testing or
//! for running without persistence of the mappings.

use std::collections::BTreeMap;

use async_trait::async_trait;
use influxdb3_clap_blocks::dbrp::DbrpServiceConfig;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    DbrpMapping, DbrpMappingFilter, DbrpMappingKey, DbrpMappingService, Error, FindOptions,
    Result,
};

/// In-memory mapping store keyed, and therefore ordered, by cluster, database and retention
/// policy.
#[derive(Debug)]
pub struct MemDbrpMappingService {
    config: DbrpServiceConfig,
    mappings: RwLock<BTreeMap<DbrpMappingKey, DbrpMapping>>,
}

impl MemDbrpMappingService {
    pub fn new(config: DbrpServiceConfig) -> Self {
        Self {
            config,
            mappings: Default::default(),
        }
    }

    pub fn config(&self) -> &DbrpServiceConfig {
        &self.config
    }

    /// Number of stored mappings
    pub fn len(&self) -> usize {
        self.mappings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.read().is_empty()
    }
}

impl Default for MemDbrpMappingService {
    fn default() -> Self {
        Self::new(DbrpServiceConfig::default())
    }
}

/// The stored default mapping for `cluster` and `database`, if any
fn default_for<'a>(
    mappings: &'a BTreeMap<DbrpMappingKey, DbrpMapping>,
    cluster: &str,
    database: &str,
) -> Option<&'a DbrpMapping> {
    // the empty retention policy sorts first within the cluster and database
    let start = DbrpMappingKey::new(cluster, database, "");
    mappings
        .range(start..)
        .take_while(|(k, _)| k.cluster == cluster && k.database == database)
        .map(|(_, m)| m)
        .find(|m| m.default)
}

#[async_trait]
impl DbrpMappingService for MemDbrpMappingService {
    async fn find_by(
        &self,
        cluster: &str,
        database: &str,
        retention_policy: &str,
    ) -> Result<DbrpMapping> {
        let key = DbrpMappingKey::new(cluster, database, retention_policy);
        self.mappings
            .read()
            .get(&key)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn find(&self, filter: &DbrpMappingFilter) -> Result<DbrpMapping> {
        self.mappings
            .read()
            .values()
            .find(|m| filter.matches(m))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn find_many(
        &self,
        filter: &DbrpMappingFilter,
        options: FindOptions,
    ) -> Result<(Vec<DbrpMapping>, usize)> {
        let matches = self
            .mappings
            .read()
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        options.paginate(matches, &self.config)
    }

    async fn create(&self, mapping: DbrpMapping) -> Result<()> {
        mapping.validate()?;

        let key = mapping.key();
        let mut mappings = self.mappings.write();

        if let Some(existing) = mappings.get(&key) {
            if existing == &mapping {
                debug!(%key, "dbrp mapping already exists");
                return Ok(());
            }
            info!(%key, "rejecting dbrp mapping that conflicts with an existing mapping");
            return Err(Error::Conflict {
                cluster: key.cluster,
                database: key.database,
                retention_policy: key.retention_policy,
            });
        }

        if mapping.default {
            if let Some(existing) = default_for(&mappings, &mapping.cluster, &mapping.database) {
                info!(
                    %key,
                    existing_retention_policy = %existing.retention_policy,
                    "rejecting second default dbrp mapping"
                );
                return Err(Error::DefaultConflict {
                    cluster: mapping.cluster.clone(),
                    database: mapping.database.clone(),
                    existing_retention_policy: existing.retention_policy.clone(),
                });
            }
        }

        debug!(
            %key,
            default = mapping.default,
            organization_id = %mapping.organization_id,
            bucket_id = %mapping.bucket_id,
            "created dbrp mapping"
        );
        mappings.insert(key, mapping);
        Ok(())
    }

    async fn delete(&self, cluster: &str, database: &str, retention_policy: &str) -> Result<()> {
        let key = DbrpMappingKey::new(cluster, database, retention_policy);
        if self.mappings.write().remove(&key).is_some() {
            debug!(%key, "deleted dbrp mapping");
        }
        Ok(())
    }
}
