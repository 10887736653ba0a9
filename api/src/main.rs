use clap::Parser;
use direct_upload_api::{
    config::Config,
    tracing_config::{self, HoneycombConfig},
    Server,
};

#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let mut config = Config::parse();

    let honeycomb_config = config.honeycomb_team.take().map(|team| HoneycombConfig {
        team,
        dataset: std::mem::take(&mut config.honeycomb_dataset),
    });

    tracing_config::configure("direct-upload", std::io::stdout, honeycomb_config)
        .map_err(|e| eyre::eyre!(e))?;

    let Server { server, .. } = direct_upload_api::run_server(config)
        .await
        .map_err(|e| eyre::eyre!(e))?;
    let result = server.await;

    tracing_config::teardown();

    result?;
    Ok(())
}
