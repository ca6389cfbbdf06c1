//! Mapping of legacy cluster/database/retention-policy (DBRP) triples to organization and
//! bucket identifiers.
//!
//! # Records
//!
//! A [`DbrpMapping`] routes one `(cluster, database, retention_policy)` triple to an
//! [`OrgId`] and [`BucketId`]. Mappings are plain values: they are checked with
//! [`DbrpMapping::validate`] before a backend accepts them, never on construction.
//!
//! # Service
//!
//! The [`DbrpMappingService`] trait is the contract a storage backend fulfils. This crate ships
//! [`MemDbrpMappingService`], an in-memory backend for tests and for running without
//! persistence, and the [`TracingDecorator`] that instruments any backend.

pub use influxdb3_id::{BucketId, OrgId};

pub mod decorator;
pub mod filter;
pub mod mapping;
pub mod mem;
pub mod service;

#[cfg(test)]
mod test_util;

pub use decorator::TracingDecorator;
pub use filter::{DbrpMappingFilter, FindOptions, ParseSortByError, SortBy};
pub use mapping::{DbrpMapping, DbrpMappingKey, MappingField, ValidationError, valid_name};
pub use mem::MemDbrpMappingService;
pub use service::DbrpMappingService;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid dbrp mapping: {0}")]
    Validation(#[from] ValidationError),

    #[error("dbrp mapping not found")]
    NotFound,

    #[error(
        "a different dbrp mapping already exists for {cluster}/{database}/{retention_policy}"
    )]
    Conflict {
        cluster: String,
        database: String,
        retention_policy: String,
    },

    #[error(
        "database {database} on cluster {cluster} already maps retention policy \
        {existing_retention_policy} as its default"
    )]
    DefaultConflict {
        cluster: String,
        database: String,
        existing_retention_policy: String,
    },

    #[error("invalid find options: {0}")]
    InvalidFindOptions(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
