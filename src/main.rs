use actix_web::HttpServer;
use std::env;

use crate::app::config::Config;
use crate::app::factory::{AppState, CreateApp};

mod app;
mod conversation;
mod render;
mod webhook;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenv::dotenv().ok();

  if env::var_os("RUST_LOG").is_none() {
    env::set_var("RUST_LOG", "actix_web=info,stock_chat=debug");
  }
  env_logger::init();

  let config: Config = Config::load();
  log::info!("Starting stock chat in {} mode, webhook target: {}", config.mode, config.resolve_target());

  let app_state: AppState = AppState::new(&config)?;

  let server_builder = HttpServer::new(move || {
    let factory: CreateApp = CreateApp::with_state(app_state.clone());
    factory.build_app().wrap(actix_web::middleware::Logger::default())
  });

  let server = server_builder.bind((config.host.as_str(), config.port))?;
  log::info!("Listening on http://{}:{}", config.host, config.port);

  server.run().await?;

  Ok(())
}
