use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

use crate::models::{ErrorMetric, TopSourceRow, TopSources, VolumeSeries};

pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// A volume point after bucket reshaping, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub bucket: String,
    pub logs: i64,
}

/// The three panel values the dashboard renders.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub volume: Vec<ChartPoint>,
    pub error_pct: f64,
    pub top_sources: Vec<TopSourceRow>,
}

/// Polls the three proxy endpoints on a fixed cadence and publishes panel
/// values through a watch channel.
///
/// Panels update independently: a failed or malformed response leaves that
/// panel's previous value in place and never disturbs the other two.
pub struct DashboardPoller {
    http: Client,
    base: String,
    state: watch::Sender<DashboardState>,
}

/// Owns the polling task. Dropping the handle without calling `shutdown`
/// leaves the task running for the life of the process.
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the recurring timer. Cycles already in flight run to
    /// completion on their own; no request is aborted mid-flight.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

impl DashboardPoller {
    pub fn new(base: &str) -> (Self, watch::Receiver<DashboardState>) {
        let (tx, rx) = watch::channel(DashboardState::default());
        let poller = Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            state: tx,
        };
        (poller, rx)
    }

    /// Runs one cycle immediately, then every `POLL_INTERVAL` until shutdown.
    ///
    /// Each cycle runs as its own task, so the tick fires on cadence even
    /// while an earlier cycle is still waiting on a slow endpoint.
    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let poller = Arc::new(self);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(POLL_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let poller = Arc::clone(&poller);
                        tokio::spawn(async move { poller.poll_once().await });
                    }
                    _ = stop_rx.changed() => break,
                }
            }
        });
        PollerHandle {
            stop: stop_tx,
            task,
        }
    }

    /// One polling cycle: all three panels fetched concurrently, each result
    /// applied on its own.
    pub async fn poll_once(&self) {
        let (volume, error_pct, top_sources) = tokio::join!(
            self.fetch_volume(),
            self.fetch_error_rate(),
            self.fetch_top_sources(),
        );

        self.state.send_modify(|state| {
            if let Some(points) = volume {
                state.volume = points;
            }
            if let Some(pct) = error_pct {
                state.error_pct = pct;
            }
            if let Some(rows) = top_sources {
                state.top_sources = rows;
            }
        });
    }

    async fn fetch_volume(&self) -> Option<Vec<ChartPoint>> {
        let series: VolumeSeries = self.get_json("/api/mock/metrics/volume").await?;
        let points = series
            .data
            .iter()
            .map(|point| ChartPoint {
                bucket: bucket_label(&point.bucket),
                logs: point.logs,
            })
            .collect();
        Some(points)
    }

    async fn fetch_error_rate(&self) -> Option<f64> {
        let metric: ErrorMetric = self.get_json("/api/mock/metrics/error").await?;
        Some(metric.error_pct)
    }

    async fn fetch_top_sources(&self) -> Option<Vec<TopSourceRow>> {
        let top: TopSources = self.get_json("/api/mock/metrics/top-src").await?;
        Some(top.rows)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = format!("{}{}", self.base, path);
        match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<T>().await {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("bad payload from {}: {}", path, err);
                    None
                }
            },
            Ok(resp) => {
                warn!("{} returned status {}", path, resp.status());
                None
            }
            Err(err) => {
                warn!("request to {} failed: {}", path, err);
                None
            }
        }
    }
}

/// Converts a raw collector bucket value into a localized "HH:MM" label.
///
/// String buckets are parsed as RFC 3339 timestamps; numeric buckets are
/// treated as milliseconds since the Unix epoch. Anything unparseable is
/// displayed as-is so a single odd bucket never loses its point.
pub fn bucket_label(raw: &Value) -> String {
    bucket_label_in(raw, &Local)
}

fn bucket_label_in<Tz: TimeZone>(raw: &Value, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match raw {
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.with_timezone(tz).format("%H:%M").to_string(),
            Err(_) => s.clone(),
        },
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|dt| dt.with_timezone(tz).format("%H:%M").to_string())
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}
