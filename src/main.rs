use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind_listener(addr)?;

    let database = db::Database::connect(&cfg.database.url).await?;
    let state = Arc::new(config::AppState::new(cfg, database));
    let connections = Arc::new(AtomicUsize::new(0));

    logger::log_server_start(&addr, &state.config);

    server::run(listener, state, connections).await
}
