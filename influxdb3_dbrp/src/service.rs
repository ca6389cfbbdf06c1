//! The contract a DBRP mapping backend fulfils.

use async_trait::async_trait;

use crate::{DbrpMapping, DbrpMappingFilter, FindOptions, Result};

/// Provides the mapping of cluster, database and retention policy to an organization and
/// bucket.
///
/// Every call is a single request against the backend. Dropping the returned future abandons
/// the call; implementations must leave their state consistent when that happens.
#[async_trait]
pub trait DbrpMappingService: std::fmt::Debug + Send + Sync + 'static {
    /// Get the mapping for the exact cluster, database and retention policy, or
    /// [`Error::NotFound`](crate::Error::NotFound).
    async fn find_by(
        &self,
        cluster: &str,
        database: &str,
        retention_policy: &str,
    ) -> Result<DbrpMapping>;

    /// Get the first mapping that matches `filter`, or
    /// [`Error::NotFound`](crate::Error::NotFound) if nothing does.
    async fn find(&self, filter: &DbrpMappingFilter) -> Result<DbrpMapping>;

    /// List the mappings that match `filter`, ordered and paginated by `options`, along with
    /// the number of matches before pagination.
    async fn find_many(
        &self,
        filter: &DbrpMappingFilter,
        options: FindOptions,
    ) -> Result<(Vec<DbrpMapping>, usize)>;

    /// Store a new mapping.
    ///
    /// The mapping is validated first. Creating a mapping identical to a stored one succeeds,
    /// while a different mapping under the same key is an
    /// [`Error::Conflict`](crate::Error::Conflict).
    async fn create(&self, mapping: DbrpMapping) -> Result<()>;

    /// Remove the mapping for the cluster, database and retention policy.
    ///
    /// Deleting a mapping that does not exist is not an error.
    async fn delete(&self, cluster: &str, database: &str, retention_policy: &str) -> Result<()>;

    /// Get the default mapping for a cluster and database
    async fn find_default(&self, cluster: &str, database: &str) -> Result<DbrpMapping> {
        let filter = DbrpMappingFilter::new()
            .with_cluster(cluster)
            .with_database(database)
            .with_default(true);
        self.find(&filter).await
    }
}
