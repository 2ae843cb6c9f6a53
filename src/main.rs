use shop_api::{config::Config, logging, run_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init_logger(&config.log_level);
    run_app(config).await
}
