use std::{net::SocketAddr, path::PathBuf, process::exit, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

use sales_insights::{
    AppState,
    analytics::{AnalyticsConfig, parse_reference_year},
    build_router, graceful_shutdown,
    pagination::PaginationConfig,
    seed::{DEFAULT_SEED_URL, HttpDatasetSource},
    setup_logging,
};

/// The REST API server for sales_insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 4000)]
    port: u16,

    /// The year that month numbers in queries refer to.
    #[arg(long, default_value_t = 2021, value_parser = parse_reference_year)]
    reference_year: i32,

    /// The URL of the JSON dataset used to seed the database.
    #[arg(long, default_value_t = DEFAULT_SEED_URL.to_owned())]
    seed_url: String,

    /// How many seconds to wait for the dataset before giving up.
    #[arg(long, default_value_t = 10)]
    seed_timeout_secs: u64,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not open log file {:#?}: {error}", args.log_path);
        exit(1);
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let analytics_config = AnalyticsConfig {
        reference_year: args.reference_year,
        pagination: PaginationConfig::default(),
    };
    let dataset_source = HttpDatasetSource::new(
        &args.seed_url,
        Duration::from_secs(args.seed_timeout_secs),
    );

    let app_state = match AppState::new(conn, analytics_config, dataset_source) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
