use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use opshim_exec::lro::{next_poll_delay, parse_retry_after, DelayReason};
use opshim_exec::{DelayVendorHeader, PollConfig, VendorHeaderKind};

fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn retry_after_delta_seconds() {
    let cfg = PollConfig::default();
    let result = parse_retry_after(&headers(&[("Retry-After", "5")]), &cfg.vendor_headers, SystemTime::now());
    assert_eq!(result, Some(Duration::from_secs(5)));
}

#[test]
fn retry_after_http_date() {
    let cfg = PollConfig::default();
    let now = SystemTime::now();
    let date = httpdate::fmt_http_date(now + Duration::from_secs(10));

    let delay = parse_retry_after(&headers(&[("retry-after", &date)]), &cfg.vendor_headers, now).unwrap();
    assert!(delay.as_secs() >= 9 && delay.as_secs() <= 10);
}

#[test]
fn retry_after_in_the_past_means_now() {
    let cfg = PollConfig::default();
    let now = SystemTime::now();
    let date = httpdate::fmt_http_date(now - Duration::from_secs(60));

    let delay = parse_retry_after(&headers(&[("Retry-After", &date)]), &cfg.vendor_headers, now);
    assert_eq!(delay, Some(Duration::ZERO));
}

#[test]
fn vendor_millisecond_headers() {
    let cfg = PollConfig::default();
    let now = SystemTime::now();

    let a = parse_retry_after(&headers(&[("retry-after-ms", "1500")]), &cfg.vendor_headers, now);
    assert_eq!(a, Some(Duration::from_millis(1500)));

    let b = parse_retry_after(&headers(&[("x-ms-retry-after-ms", "250")]), &cfg.vendor_headers, now);
    assert_eq!(b, Some(Duration::from_millis(250)));
}

#[test]
fn standard_header_wins_over_vendor_headers() {
    let cfg = PollConfig::default();
    let h = headers(&[("Retry-After", "2"), ("retry-after-ms", "9000")]);
    assert_eq!(
        parse_retry_after(&h, &cfg.vendor_headers, SystemTime::now()),
        Some(Duration::from_secs(2))
    );
}

#[test]
fn garbage_retry_after_falls_through_to_vendor() {
    let cfg = PollConfig::default();
    let h = headers(&[("Retry-After", "soon"), ("retry-after-ms", "700")]);
    assert_eq!(
        parse_retry_after(&h, &cfg.vendor_headers, SystemTime::now()),
        Some(Duration::from_millis(700))
    );
}

#[test]
fn custom_vendor_header_in_seconds() {
    let mut cfg = PollConfig::default();
    cfg.vendor_headers.push(DelayVendorHeader {
        name: "X-Poll-In".to_string(),
        kind: VendorHeaderKind::DeltaSeconds,
    });
    let h = headers(&[("x-poll-in", "7")]);
    assert_eq!(
        parse_retry_after(&h, &cfg.vendor_headers, SystemTime::now()),
        Some(Duration::from_secs(7))
    );
}

#[test]
fn no_hint_gives_none() {
    let cfg = PollConfig::default();
    assert_eq!(parse_retry_after(&headers(&[]), &cfg.vendor_headers, SystemTime::now()), None);
}

#[test]
fn server_hint_wins_and_is_capped() {
    let cfg = PollConfig::default();

    let d = next_poll_delay(&cfg, 3, Some(Duration::from_secs(4)), || 0);
    assert_eq!(d.delay, Duration::from_secs(4));
    assert_eq!(d.reason, DelayReason::ServerHint);

    let capped = next_poll_delay(&cfg, 0, Some(Duration::from_secs(3600)), || 0);
    assert_eq!(capped.delay, cfg.max_interval);
}

#[test]
fn default_interval_is_fixed() {
    let cfg = PollConfig::default();
    for attempt in [0, 1, 5, 40] {
        let d = next_poll_delay(&cfg, attempt, None, || 0);
        assert_eq!(d.delay, Duration::from_secs(30));
        assert_eq!(d.reason, DelayReason::Backoff);
    }
}

#[test]
fn growing_interval_stops_at_max() {
    let cfg = PollConfig {
        default_interval: Duration::from_secs(1),
        factor: 2.0,
        max_interval: Duration::from_secs(10),
        ..PollConfig::default()
    };
    assert_eq!(next_poll_delay(&cfg, 0, None, || 0).delay, Duration::from_secs(1));
    assert_eq!(next_poll_delay(&cfg, 2, None, || 0).delay, Duration::from_secs(4));
    assert_eq!(next_poll_delay(&cfg, 10, None, || 0).delay, Duration::from_secs(10));
}

#[test]
fn jitter_stays_within_upper_half() {
    let cfg = PollConfig {
        jitter: true,
        ..PollConfig::default()
    };
    let low = next_poll_delay(&cfg, 0, None, || 0);
    assert_eq!(low.delay, Duration::from_secs(15));
    let high = next_poll_delay(&cfg, 0, None, || 15_000);
    assert_eq!(high.delay, Duration::from_secs(30));
}
