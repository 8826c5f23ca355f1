#![deny(warnings)]

use logging::*;

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");

    let port = common::config::get("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{port}");

    web::serve(&addr).await;

    info!(log, "shutting down");
}
