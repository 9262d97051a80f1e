use anyhow::Context as _;
use orderbot::bot::{
    commands::{Command, command_handler},
    message::message_handler,
    state::SessionStore,
};
use orderbot::config::load_user_config;
use orderbot::keep_alive;
use orderbot::order::{catalog::Catalog, service::OrderService, store::JsonFileStore};
use std::sync::Arc;
use teloxide::prelude::*;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = Arc::new(load_user_config().context("Failed to load configuration")?);

    let log_level: log::Level = cfg.log_level.clone().into();
    simple_logger::init_with_level(log_level).unwrap();

    let port = cfg.keep_alive.port;
    tokio::spawn(async move {
        if let Err(e) = keep_alive::serve(port).await {
            log::error!("Keep-alive server failed: {:?}", e);
        }
    });

    let store = Arc::new(
        JsonFileStore::open(&cfg.storage.orders_json_path)
            .context("Failed to open the order store")?,
    );
    let service = Arc::new(OrderService::new(store, Catalog::default()));
    let sessions = Arc::new(SessionStore::new());

    log::info!(
        "Bot starting with token: {}...",
        &cfg.telegram.token[..cfg.telegram.token.len().min(8)]
    );

    let bot = Bot::new(cfg.telegram.token.clone());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![cfg.clone(), sessions, service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped.");
    Ok(())
}
