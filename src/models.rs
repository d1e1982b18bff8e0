use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /metrics/volume` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeSeries {
    #[serde(default)]
    pub data: Vec<VolumePoint>,
}

/// One time bucket of log volume. `bucket` arrives as whatever the collector
/// emits (RFC 3339 string or epoch number) and is only reshaped for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumePoint {
    pub bucket: Value,
    #[serde(default)]
    pub logs: i64,
}

/// `GET /metrics/error` response body. Semantically 0-100, not clamped here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorMetric {
    #[serde(default)]
    pub error_pct: f64,
}

/// `GET /metrics/top-src` response body. Row order is the collector's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopSources {
    #[serde(default)]
    pub rows: Vec<TopSourceRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSourceRow {
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub c: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let series: VolumeSeries = serde_json::from_str("{}").unwrap();
        assert!(series.data.is_empty());

        let top: TopSources = serde_json::from_str("{}").unwrap();
        assert!(top.rows.is_empty());
    }

    #[test]
    fn extra_collector_fields_are_ignored() {
        let metric: ErrorMetric =
            serde_json::from_str(r#"{"error_pct": 3.25, "window": "24h"}"#).unwrap();
        assert_eq!(metric.error_pct, 3.25);
    }
}
