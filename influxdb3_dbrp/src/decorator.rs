//! Tracing instrumentation for DBRP mapping service implementations.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{DbrpMapping, DbrpMappingFilter, DbrpMappingService, FindOptions, Result};

/// Decorates an implementation of the [`DbrpMappingService`] with instrumentation that emits a
/// `tracing` event for each call.
///
/// Events carry the operation name, the result (`success` or `error`) and the call duration in
/// milliseconds. Failures other than "not found" are logged at `warn`.
#[derive(Debug)]
pub struct TracingDecorator<T> {
    inner: T,
}

impl<T> TracingDecorator<T> {
    /// Wrap `T` with instrumentation
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Emit a trait impl for `impl_trait` that delegates calls to the inner implementation,
/// tracing the duration and result of each.
///
/// Format:
///
/// ```ignore
///     decorate!(
///         impl_trait = <trait name>,
///         methods = [
///             "<op name>" = <method signature>;
///             // ... and so on
///         ]
///     );
/// ```
///
/// All required methods of the trait MUST be listed or the impl won't compile.
macro_rules! decorate {
    (
        impl_trait = $trait:ident,
        methods = [$(
            $op:literal = $method:ident(
                &self $(,)?
                $($arg:ident : $t:ty),*
            ) -> Result<$out:ty>;
        )+]
    ) => {
        #[async_trait]
        impl<T: $trait> $trait for TracingDecorator<T> {
            $(
                async fn $method(&self, $($arg : $t),*) -> Result<$out> {
                    let start = Instant::now();
                    let res = self.inner.$method($($arg),*).await;
                    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                    match &res {
                        Ok(_) => debug!(op = $op, result = "success", elapsed_ms, "dbrp mapping call"),
                        Err(e) if e.is_not_found() => {
                            debug!(op = $op, result = "error", elapsed_ms, error = %e, "dbrp mapping call")
                        }
                        Err(e) => {
                            warn!(op = $op, result = "error", elapsed_ms, error = %e, "dbrp mapping call")
                        }
                    }

                    res
                }
            )+
        }
    };
}

decorate!(
    impl_trait = DbrpMappingService,
    methods = [
        "dbrp_find_by" = find_by(&self, cluster: &str, database: &str, retention_policy: &str) -> Result<DbrpMapping>;
        "dbrp_find" = find(&self, filter: &DbrpMappingFilter) -> Result<DbrpMapping>;
        "dbrp_find_many" = find_many(&self, filter: &DbrpMappingFilter, options: FindOptions) -> Result<(Vec<DbrpMapping>, usize)>;
        "dbrp_create" = create(&self, mapping: DbrpMapping) -> Result<()>;
        "dbrp_delete" = delete(&self, cluster: &str, database: &str, retention_policy: &str) -> Result<()>;
    ]
);
