use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // .env first so RUST_LOG / LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "student_registry", event = "logger_init", "tracing subscriber initialized");
}

/// TOKIO_WORKER_THREADS wins over the config file.
fn worker_threads() -> Option<usize> {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .or_else(|| configs::AppConfig::load_or_env().ok().and_then(|cfg| cfg.server.worker_threads))
}

fn main() -> ExitCode {
    init_logging();

    let instance_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "student_registry",
            event = "panic",
            %instance_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let workers = worker_threads();
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = workers {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "student_registry", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "student_registry",
        event = "start",
        %instance_id,
        pid,
        version,
        threads = workers.unwrap_or_default(),
        "student registry starting"
    );

    // server::run owns graceful shutdown on Ctrl+C
    match rt.block_on(server::run()) {
        Ok(()) => {
            info!(service = "student_registry", event = "stop", %instance_id, pid, "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "student_registry", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
