use std::process::ExitCode;

use spa_static_server::config::Config;
use spa_static_server::error::StartupError;
use spa_static_server::logger;
use spa_static_server::server::{self, ServerInstance};

/// Exit code for invalid configuration
const EXIT_CONFIG: u8 = 1;
/// Exit code for bind/runtime failures
const EXIT_STARTUP: u8 = 2;

fn main() -> ExitCode {
    let loaded = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    };

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = logger::init(&cfg.logging) {
        eprintln!("[ERROR] Failed to open log files: {e}");
        return ExitCode::from(EXIT_CONFIG);
    }

    // Root and headers are validated before any socket is bound
    let server_config = match cfg.to_server_config() {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&e.to_string());
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // Create Tokio runtime, sizing the worker pool from configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    }

    let runtime = match runtime_builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_error(&StartupError::Runtime(e).to_string());
            return ExitCode::from(EXIT_STARTUP);
        }
    };

    runtime.block_on(async {
        let instance = match ServerInstance::bind(server_config) {
            Ok(instance) => instance,
            Err(e) => {
                logger::log_error(&e.to_string());
                return ExitCode::from(EXIT_STARTUP);
            }
        };
        instance.serve_with_shutdown(server::shutdown_signal()).await;
        ExitCode::SUCCESS
    })
}
