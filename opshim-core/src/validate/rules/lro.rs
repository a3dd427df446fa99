use crate::types::LroOptions;
use crate::validate::validator::Validator;

pub(crate) fn validate_lro(v: &mut Validator, path: &str, lro: &LroOptions) {
    if lro.sync_statuses.is_empty() {
        v.push(format!("{path}.sync_statuses"), "must not be empty");
    }
    for (field, codes) in [
        ("sync_statuses", &lro.sync_statuses),
        ("async_statuses", &lro.async_statuses),
    ] {
        for code in codes {
            if !(100..=599).contains(code) {
                v.push(format!("{path}.{field}"), format!("{code} is not an HTTP status code"));
            } else if !(200..300).contains(code) {
                v.push(
                    format!("{path}.{field}"),
                    format!("{code} is not a success status"),
                );
            }
        }
    }
    if lro.enabled {
        for code in &lro.async_statuses {
            if lro.sync_statuses.contains(code) {
                v.push(
                    path,
                    format!("status {code} cannot be both synchronous and asynchronous"),
                );
            }
        }
    }
}
