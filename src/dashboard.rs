use std::env;

use commlogs_dashboard::{logging, poller::DashboardPoller, view};
use tracing::info;

#[tokio::main]
async fn main() {
    logging::init_logger();

    let base = env::var("DASHBOARD_API_BASE")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    info!("Polling dashboard endpoints at {}", base);

    let (poller, mut state_rx) = DashboardPoller::new(&base);
    let handle = poller.spawn();

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                println!("{}", view::render(&state));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
}
