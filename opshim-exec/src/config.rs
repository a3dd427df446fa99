use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Scheme and host (optionally a path prefix) that template paths hang off.
    pub base_url: String,
    /// Per-request timeout handed to the transport.
    pub timeout: Duration,
    pub max_response_bytes: usize,
    /// Sent with every request before template headers are applied, e.g. an
    /// auth header the caller has already obtained.
    pub default_headers: BTreeMap<String, String>,
    pub poll: PollConfig,
    pub limits: PollLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://management.azure.com".to_string(),
            timeout: Duration::from_secs(60),
            max_response_bytes: 4 * 1024 * 1024,
            default_headers: BTreeMap::new(),
            poll: PollConfig::default(),
            limits: PollLimits::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Interval policy between polls when the server gives no hint.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub default_interval: Duration,
    /// Growth per attempt; 1.0 keeps the interval fixed.
    pub factor: f64,
    pub max_interval: Duration,
    pub jitter: bool,
    pub vendor_headers: Vec<DelayVendorHeader>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            default_interval: Duration::from_secs(30),
            factor: 1.0,
            max_interval: Duration::from_secs(600),
            jitter: false,
            vendor_headers: vec![
                DelayVendorHeader {
                    name: "retry-after-ms".to_string(),
                    kind: VendorHeaderKind::DeltaMillis,
                },
                DelayVendorHeader {
                    name: "x-ms-retry-after-ms".to_string(),
                    kind: VendorHeaderKind::DeltaMillis,
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct DelayVendorHeader {
    pub name: String,
    pub kind: VendorHeaderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorHeaderKind {
    /// delta milliseconds
    DeltaMillis,
    /// delta seconds
    DeltaSeconds,
    /// unix epoch seconds
    UnixSeconds,
    /// HTTP-date
    HttpDate,
}

/// Caller-imposed ceilings on the poll loop. The engine itself imposes none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollLimits {
    pub max_attempts: Option<u32>,
    pub max_duration: Option<Duration>,
}
