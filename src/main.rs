use std::sync::Arc;

use color_eyre::Result;
use signal_relay::adapters::{EnvTokenProvider, ReqwestHttpClient, TracingObserver};
use signal_relay::config::RelayConfig;
use signal_relay::logging;
use signal_relay::supervisor::Supervisor;
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Handle --version flag before any initialization
    if std::env::args().any(|arg| arg == "--version") {
        println!("signal-relay {}", VERSION);
        std::process::exit(0);
    }

    color_eyre::install()?;

    // A missing .env is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();
    logging::init_tracing(logging::DEFAULT_FILTER);

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(code = err.error_code(), hint = err.recovery_hint(), "{}", err);
            return Err(err.into());
        }
    };
    info!(
        version = VERSION,
        mode = ?config.mode,
        idle_timeout_secs = config.idle_timeout.as_secs(),
        forward_timeout_secs = config.forward_timeout.as_secs(),
        "Configuration loaded"
    );

    let http = ReqwestHttpClient::new().with_post_timeout(config.forward_timeout);
    let supervisor = Supervisor::new(
        config,
        Arc::new(http),
        Arc::new(EnvTokenProvider::new()),
        Arc::new(TracingObserver::new()),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(supervisor.run())? {}
}
