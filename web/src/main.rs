#![deny(missing_docs)]

//! # oasprobe Web Binary
//!
//! Entry point for the Actix Web server.

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use oasprobe_core::{EndpointStore, Pipeline, TestRunner};
use oasprobe_web::config::{AppConfig, Args};
use oasprobe_web::store::DieselStore;
use oasprobe_web::{configure, AppPipeline};
use std::io;
use std::net::TcpListener;
use std::sync::Arc;

fn build_server(
    listener: TcpListener,
    pipeline: web::Data<AppPipeline>,
    max_upload_bytes: usize,
) -> io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(pipeline.clone())
            .configure(|cfg| configure(cfg, max_upload_bytes))
    })
    .listen(listener)?
    .run())
}

fn build_pipeline(config: &AppConfig) -> io::Result<web::Data<AppPipeline>> {
    let store: Arc<dyn EndpointStore> = Arc::new(
        DieselStore::connect(&config.database_url, config.pool_size).map_err(io::Error::other)?,
    );
    let runner = TestRunner::http(&config.runner()).map_err(io::Error::other)?;
    Ok(web::Data::new(Pipeline::new(store, runner)))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = AppConfig::load(&args).map_err(io::Error::other)?;

    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .try_init()
        .ok();

    let pipeline = build_pipeline(&config)?;
    let listener = TcpListener::bind(&config.bind)?;
    log::info!("listening on {}", listener.local_addr()?);

    build_server(listener, pipeline, config.max_upload_bytes)?.await
}
