use std::sync::{Arc, RwLock};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jsonstead::cli::Cli;
use jsonstead::counter::VisitCounter;
use jsonstead::dispatcher::Dispatcher;
use jsonstead::fixture::Dataset;
use jsonstead::graphql;
use jsonstead::middleware::{
    AccessLogMiddleware, CountReportMiddleware, Middleware, StoreResetMiddleware,
    VisitCountMiddleware,
};
use jsonstead::registry;
use jsonstead::router::Router;
use jsonstead::runtime_config::RuntimeConfig;
use jsonstead::server::{AppService, HttpServer, GRAPHQL_PATH};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let runtime = RuntimeConfig::from_env();
    may::config().set_stack_size(runtime.stack_size);

    // Fixture load failure is fatal: the process never starts serving.
    let dataset = Arc::new(Dataset::load(&cli.fixture)?);
    let store = Arc::new(RwLock::new(dataset.snapshot()));
    let counter = Arc::new(VisitCounter::new(cli.counter_file.clone()));

    let mut dispatcher = Dispatcher::new();
    unsafe {
        registry::register_all(&mut dispatcher, &store);
    }

    let middlewares: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(VisitCountMiddleware::new(Arc::clone(&counter))),
        Arc::new(CountReportMiddleware::new(Arc::clone(&counter))),
        Arc::new(StoreResetMiddleware::new(
            Arc::clone(&dataset),
            Arc::clone(&store),
        )),
        Arc::new(AccessLogMiddleware::new(cli.access_log_enabled())),
    ];

    let service = AppService::new(
        Router::new(),
        Arc::new(RwLock::new(dispatcher)),
        middlewares,
        Arc::new(graphql::schema()),
        store,
    );

    let addr = format!("0.0.0.0:{}", cli.port);
    info!(
        "jsonstead listening on http://{addr} and graphql is running on http://{addr}{GRAPHQL_PATH}"
    );

    let handle = HttpServer(service).start(&addr)?;
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {e:?}"))?;
    Ok(())
}
