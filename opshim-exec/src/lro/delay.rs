use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use httpdate::parse_http_date;

use crate::config::{DelayVendorHeader, PollConfig, VendorHeaderKind};
use crate::http::get_header_ci;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollDelay {
    pub delay: Duration,
    pub reason: DelayReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayReason {
    /// `Retry-After` or a vendor delay header on the latest response.
    ServerHint,
    Backoff,
}

impl DelayReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DelayReason::ServerHint => "server_hint",
            DelayReason::Backoff => "backoff",
        }
    }
}

/// Server hint from a response, if any. The standard `Retry-After` header
/// wins over vendor headers.
pub fn parse_retry_after(
    headers: &BTreeMap<String, String>,
    vendor_headers: &[DelayVendorHeader],
    now: SystemTime,
) -> Option<Duration> {
    if let Some(v) = get_header_ci(headers, "retry-after") {
        if let Some(d) = parse_retry_after_value(v, now) {
            return Some(d);
        }
    }

    for vh in vendor_headers {
        if let Some(v) = get_header_ci(headers, &vh.name) {
            if let Some(d) = parse_vendor_value(v, vh.kind, now) {
                return Some(d);
            }
        }
    }
    None
}

/// Delay before the next poll.
///
/// - `attempt_no`: polls already issued for this operation (0 before the first).
/// - `hint`: the server's latest retry-after hint, which always wins.
/// - `rand_u64`: RNG for jitter.
pub fn next_poll_delay(
    cfg: &PollConfig,
    attempt_no: u32,
    hint: Option<Duration>,
    rand_u64: impl Fn() -> u64,
) -> PollDelay {
    if let Some(delay) = hint {
        return PollDelay {
            delay: clamp(delay, cfg.max_interval),
            reason: DelayReason::ServerHint,
        };
    }

    let exp = attempt_no.min(i32::MAX as u32) as i32;
    let raw = (cfg.default_interval.as_millis() as f64) * cfg.factor.max(1.0).powi(exp);
    let raw_ms = raw.min(cfg.max_interval.as_millis() as f64).max(0.0) as u64;

    // Equal jitter: never less than half the computed interval.
    let delay_ms = if cfg.jitter && raw_ms > 1 {
        let half = raw_ms / 2;
        half + rand_u64() % (raw_ms - half + 1)
    } else {
        raw_ms
    };
    PollDelay {
        delay: Duration::from_millis(delay_ms),
        reason: DelayReason::Backoff,
    }
}

fn parse_retry_after_value(v: &str, now: SystemTime) -> Option<Duration> {
    let v = v.trim();
    if let Ok(secs) = v.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    // HTTP-date; a date in the past means "now".
    let dt = parse_http_date(v).ok()?;
    Some(dt.duration_since(now).unwrap_or(Duration::ZERO))
}

fn parse_vendor_value(v: &str, kind: VendorHeaderKind, now: SystemTime) -> Option<Duration> {
    let v = v.trim();
    match kind {
        VendorHeaderKind::DeltaMillis => v.parse::<u64>().ok().map(Duration::from_millis),
        VendorHeaderKind::DeltaSeconds => v.parse::<u64>().ok().map(Duration::from_secs),
        VendorHeaderKind::UnixSeconds => {
            let ts = v.parse::<u64>().ok()?;
            let dt = SystemTime::UNIX_EPOCH + Duration::from_secs(ts);
            dt.duration_since(now).ok()
        }
        VendorHeaderKind::HttpDate => {
            let dt = parse_http_date(v).ok()?;
            dt.duration_since(now).ok()
        }
    }
}

fn clamp(delay: Duration, max: Duration) -> Duration {
    if delay > max { max } else { delay }
}
