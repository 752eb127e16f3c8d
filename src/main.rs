use clip_gateway::Config;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() {
    // Load environment variables from a .env file if one exists
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration from CLI, environment and/or config file
    let config = Config::load().expect("Failed to load configuration");
    clip_gateway::run(config).await
}
