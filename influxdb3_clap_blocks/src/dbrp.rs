//! Config for the DBRP mapping service.

use std::num::NonZeroUsize;

/// Page size used by `find_many` when the caller does not set a limit.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(20).unwrap();

/// Upper bound on the number of mappings returned by a single `find_many` call.
pub const MAX_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// CLI config for the DBRP mapping service
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::Parser)]
pub struct DbrpServiceConfig {
    /// Number of mappings returned by a listing that does not ask for a specific limit.
    ///
    /// Values above `--dbrp-max-page-size` are clamped to it.
    #[clap(
        long = "dbrp-default-page-size",
        env = "INFLUXDB3_DBRP_DEFAULT_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        action
    )]
    pub default_page_size: NonZeroUsize,

    /// Largest number of mappings a single listing may return.
    #[clap(
        long = "dbrp-max-page-size",
        env = "INFLUXDB3_DBRP_MAX_PAGE_SIZE",
        default_value_t = MAX_PAGE_SIZE,
        action
    )]
    pub max_page_size: NonZeroUsize,
}

impl DbrpServiceConfig {
    /// The page size to use when no limit is requested, never above the max page size
    pub fn effective_default_page_size(&self) -> NonZeroUsize {
        self.default_page_size.min(self.max_page_size)
    }

    /// Resolve a requested limit into the number of rows to return
    pub fn page_size(&self, requested: Option<NonZeroUsize>) -> NonZeroUsize {
        requested
            .unwrap_or_else(|| self.effective_default_page_size())
            .min(self.max_page_size)
    }
}

impl Default for DbrpServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}
