//! Generated metrics for running the dashboard without a collector.
//!
//! Only reachable through `METRICS_MODE=synthetic`; the default mode never
//! routes here and the collector client is not constructed at all.

use axum::{routing::get, Json, Router};
use chrono::{Duration, Local};
use rand::Rng;
use serde_json::{json, Value};

pub fn synthetic_router() -> Router {
    Router::new()
        .route("/api/mock/metrics/volume", get(synthetic_volume))
        .route("/api/mock/metrics/error", get(synthetic_error_rate))
        .route("/api/mock/metrics/top-src", get(synthetic_top_sources))
}

/// Sixty one-minute buckets ending now, with plausible counts.
async fn synthetic_volume() -> Json<Value> {
    let now = Local::now();
    let mut rng = rand::thread_rng();
    let data: Vec<Value> = (0..60)
        .map(|i| {
            let bucket = (now - Duration::minutes(59 - i as i64))
                .format("%H:%M")
                .to_string();
            json!({ "bucket": bucket, "logs": rng.gen_range(50..250) })
        })
        .collect();
    Json(json!({ "data": data }))
}

async fn synthetic_error_rate() -> Json<Value> {
    let mut rng = rand::thread_rng();
    let error_pct: f64 = rng.gen_range(0.0..5.0);
    Json(json!({ "error_pct": error_pct }))
}

async fn synthetic_top_sources() -> Json<Value> {
    let mut rng = rand::thread_rng();
    let rows: Vec<Value> = (0..8)
        .map(|i| {
            json!({
                "src_ip": format!("10.0.1.{}", i + 10),
                "c": rng.gen_range(50..550)
            })
        })
        .collect();
    Json(json!({ "rows": rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TopSources, VolumeSeries};

    #[tokio::test]
    async fn volume_has_sixty_labeled_buckets() {
        let Json(body) = synthetic_volume().await;
        let series: VolumeSeries = serde_json::from_value(body).unwrap();
        assert_eq!(series.data.len(), 60);
        for point in &series.data {
            let label = point.bucket.as_str().unwrap();
            assert_eq!(label.len(), 5);
            assert!((50..250).contains(&point.logs));
        }
    }

    #[tokio::test]
    async fn error_rate_stays_in_range() {
        let Json(body) = synthetic_error_rate().await;
        let pct = body["error_pct"].as_f64().unwrap();
        assert!((0.0..5.0).contains(&pct));
    }

    #[tokio::test]
    async fn top_sources_cover_the_fixed_subnet() {
        let Json(body) = synthetic_top_sources().await;
        let top: TopSources = serde_json::from_value(body).unwrap();
        assert_eq!(top.rows.len(), 8);
        assert_eq!(top.rows[0].src_ip, "10.0.1.10");
        assert_eq!(top.rows[7].src_ip, "10.0.1.17");
    }
}
