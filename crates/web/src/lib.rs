#![deny(warnings)]

mod health;
mod services;

pub mod proto {
    tonic::include_proto!("favservice.v1");
}

use favorites::{Controller, MongoStore};
use logging::*;
use proto::favorite_service_server::FavoriteServiceServer;
use services::favorite::FavoriteServiceImpl;

// Matches the upstream gateway's message ceiling.
const MAX_RECV_MSG_SIZE: usize = 16 << 20;

pub async fn serve(addr: &str) {
    let log = DEFAULT.new(o!("module" => "web"));

    let addr = addr.parse().expect("valid socket address");

    // Establishes the unique (fileID, userID) index; idempotent.
    persistence::favorite::init()
        .await
        .expect("favorite store initialization failed");

    let controller = Controller::new(MongoStore);

    let favorite_svc = FavoriteServiceServer::new(FavoriteServiceImpl::new(controller.clone()))
        .max_decoding_message_size(MAX_RECV_MSG_SIZE);

    let (health_reporter, health_svc) = tonic_health::server::health_reporter();
    tokio::spawn(health::worker(health_reporter, controller));

    info!(log, "gRPC server starting"; "addr" => %addr);

    tonic::transport::Server::builder()
        .accept_http1(true)
        .layer(tonic_web::GrpcWebLayer::new())
        .add_service(favorite_svc)
        .add_service(health_svc)
        .serve(addr)
        .await
        .expect("gRPC server failed");
}
