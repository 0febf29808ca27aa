//! Rate-limit key derivation from caller identity

use xxhash_rust::xxh3::xxh3_64;

/// Number of buckets client fingerprints are folded into
const FINGERPRINT_BUCKETS: u64 = 10_000;

/// What the request layer knows about a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// API key from a bearer token or key header, if any
    pub api_key: Option<String>,
    /// Client address as reported by the request layer
    pub address: Option<String>,
    /// Client fingerprint such as the user agent
    pub fingerprint: Option<String>,
}

impl CallerIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Compose the limiter key for an endpoint class
    ///
    /// Callers with an API key are keyed by it alone, so one key shares its
    /// budget across addresses. Anonymous callers are keyed by address plus a
    /// stable fingerprint bucket.
    pub fn rate_limit_key(&self, endpoint_class: &str) -> String {
        match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => format!("{endpoint_class}:{api_key}"),
            None => {
                let address = self.address.as_deref().unwrap_or("unknown");
                let fingerprint = self.fingerprint.as_deref().unwrap_or("unknown");
                let bucket = xxh3_64(fingerprint.as_bytes()) % FINGERPRINT_BUCKETS;
                format!("{endpoint_class}:{address}:{bucket}")
            }
        }
    }
}

/// Endpoint class of a composed key: the text before the first `:`
pub fn endpoint_class(key: &str) -> Option<&str> {
    key.split_once(':').map(|(class, _)| class)
}
