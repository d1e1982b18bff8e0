pub mod api;
pub mod collector;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod poller;
pub mod synthetic;
pub mod view;

pub use error::{ProxyError, Result, UpstreamError};
