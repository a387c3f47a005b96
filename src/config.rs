use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::{HttpTransport, ReqwestTransport};

/// Settings for region lookups.
///
/// `ResolverConfig::default()` builds a fresh reqwest client with no timeout;
/// nothing is shared between independently constructed configs.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Executes the HEAD request. Default: [`ReqwestTransport`].
    pub transport: Arc<dyn HttpTransport>,

    /// Deadline for a single lookup, enforced around the transport call.
    /// Default: `None`, leaving timeouts to the transport or the caller.
    pub timeout: Option<Duration>,
}

impl ResolverConfig {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::default()))
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("transport", &"<dyn HttpTransport>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
