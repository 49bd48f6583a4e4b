use labtrack::config::AppConfig;

#[tokio::main]
async fn main() {
    labtrack::init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(err) = labtrack::run(config).await {
        tracing::error!(%err, "Labtrack stopped with an error");
        std::process::exit(1);
    }
}
