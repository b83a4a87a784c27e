use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use folio::app::AppState;
use folio::auth::config::OAuthConfig;
use folio::auth::middleware::session_key;
use folio::auth::GoogleProvider;
use folio::config::Settings;
use folio::db::admin_repository::MongoAdminRepository;
use folio::db::repository::MongoProjectRepository;
use folio::fetch::client::HttpFetcher;
use folio::fetch::endpoints::BlogApi;
use folio::rendering::templates::Templates;

#[derive(Parser)]
#[command(author, version, about = "Personal website renderer")]
struct Cli {
    /// JSON secrets file. Defaults to the file selected by `DEV_MODE`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding `LISTEN_ADDR`.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting website server...");

    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!("Configuration: {settings:?}");

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&settings.mongo_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let mongo_db = mongo_client.database(&settings.database_name);
    tracing::info!("Using MongoDB database {}", settings.database_name);

    let identity = GoogleProvider::discover(&OAuthConfig::from_settings(&settings)).await?;

    let templates = match &settings.template_dir {
        Some(dir) => Templates::from_dir(dir)?,
        None => Templates::embedded()?,
    };

    let app_state = AppState {
        fetcher: Arc::new(HttpFetcher::new(settings.fetch_timeout())?),
        blog_api: BlogApi::new(&settings.api_url)?,
        templates: Arc::new(templates),
        project_repo: Arc::new(MongoProjectRepository::new(&mongo_db)),
        admin_repo: Arc::new(MongoAdminRepository::new(&mongo_db)),
        identity: Arc::new(identity),
        cookie_key: session_key(&settings.session_key),
        settings: Arc::new(settings.clone()),
    };

    let app = folio::app::router(app_state);

    let addr = cli.listen.unwrap_or(settings.listen_addr);
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
