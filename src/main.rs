use dotenv::dotenv;
use log::info;
use parley::{
    api::ChatClient,
    app::{open_storage, App},
    chat_panel::ChatPanel,
    config::load_config,
    logging::init_logging,
    ui::run_ui,
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = load_config()?;
    let _logger = init_logging(&config)?;
    info!("Starting parley against {}", config.server_url);

    let panel = ChatPanel::mount(open_storage(&config));
    let client = ChatClient::new(&config.server_url);
    let app = Arc::new(Mutex::new(App::new(panel)));

    run_ui(app, client).await?;
    Ok(())
}
