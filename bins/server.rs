use std::process::ExitCode;

use tokio::runtime::Runtime;
use tracing::{error, info};
use uuid::Uuid;

fn install_panic_hook(service_id: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "poseidon", event = "panic", %service_id, message = %info, "unhandled panic occurred");
    }));
}

fn build_runtime(worker_threads: Option<usize>) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = worker_threads.filter(|n| *n > 0) {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    common::env::load_dotenv();
    common::utils::logging::init_logging_from_env();

    let service_id = Uuid::new_v4();
    install_panic_hook(service_id);

    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %e, "cannot start without a valid configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(cfg.server.worker_threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %service_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "poseidon api starting"
    );

    // returns after the shutdown signal once in-flight requests have drained
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(event = "stop", %service_id, "server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(event = "run_failed", %service_id, error = %e, "server exited with an error");
            ExitCode::FAILURE
        }
    }
}
