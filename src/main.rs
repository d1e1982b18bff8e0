use commlogs_dashboard::{api::proxy, logging};
use tracing::error;

#[tokio::main]
async fn main() {
    logging::init_logger();

    if let Err(err) = proxy::start_server().await {
        error!("Server error: {}", err);
        std::process::exit(1);
    }
}
