//! ScrollWise RPC Server: JSON-RPC over stdin/stdout for front-end integration.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"collection.view", "params":{"query":"news"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Requests are handled concurrently, so responses may come back out of order.

use std::io::Write;
use std::sync::Arc;

use scrollwise::app::App;
use scrollwise::rpc_handler::serve;
use scrollwise::services::logging;
use scrollwise::types::settings::DEFAULT_LOG_FILTER;

use serde_json::{json, Value};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

const MAX_REQUESTS_PER_SECOND: u32 = 200;

fn emit(value: &Value) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", value);
    let _ = stdout.flush();
}

#[tokio::main]
async fn main() {
    let app = match App::from_config(None) {
        Ok(app) => app,
        Err(e) => {
            logging::init(DEFAULT_LOG_FILTER);
            error!(error = %e, "failed to initialize");
            emit(&json!({"event": "error", "error": e.to_string()}));
            std::process::exit(1);
        }
    };
    logging::init(&app.settings.log_filter);
    info!(api = %app.settings.api_base_url, config = app.config_path(), "settings loaded");

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            emit(&response);
        }
    });

    let app = Arc::new(app);
    serve(
        Arc::clone(&app),
        BufReader::new(tokio::io::stdin()),
        tx,
        MAX_REQUESTS_PER_SECOND,
    )
    .await;

    let _ = writer.await;
    app.shutdown();
}
