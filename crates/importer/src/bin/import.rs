use clap::Parser;
use importer::{
    ConnectionSettings, ImportSettings, ImporterError, Markup, MySqlStore, PriceImporter,
    SmsHubClient, sources::smshub::DEFAULT_API_URL, sync,
};
use std::time::Duration;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sms-price-import")]
#[command(about = "Imports an SMS-verification price list into the services and prices tables", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long, env = "SMS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "SMS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Provider row id written to `prices.apiId`
    #[arg(long, env = "SMS_API_ID", default_value_t = 2)]
    api_id: i32,

    /// Upstream country code (`countries.smshubId`)
    #[arg(long, env = "SMS_COUNTRY", default_value_t = 73)]
    country: i32,

    /// Markup percentage; 100 doubles the upstream price
    #[arg(long, env = "MARKUP_PERCENTAGE", default_value_t = 100)]
    markup: u32,

    #[arg(long, env = "SMS_API_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Fetch and price the list without touching the database
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let connection = ConnectionSettings::parse(&cli.database_url)?;
    let markup = Markup::percent(cli.markup);
    let client = SmsHubClient::new(
        cli.api_url.as_str(),
        cli.api_key.as_str(),
        Duration::from_secs(cli.timeout_secs),
    )?;

    if cli.dry_run {
        return handle_dry_run(&client, cli.country, markup).await;
    }

    tracing::info!("Connecting to database at {}", connection);
    let db = Database::connect(connection.connect_options()).await?;
    tracing::info!("Database connection established");

    tracing::info!("Fetching prices from {}", client.base_url());
    let prices = client.fetch_prices(cli.country).await?;

    let store = MySqlStore::new(db.pool().clone());
    let settings = ImportSettings {
        api_id: cli.api_id,
        country: cli.country,
        markup,
    };

    let outcome = PriceImporter::new(&store, settings).run(&prices).await;
    db.close().await;

    match outcome {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(ImporterError::CountryNotFound(code)) => {
            tracing::warn!("Country {} not found, nothing imported", code);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn handle_dry_run(
    client: &SmsHubClient,
    country: i32,
    markup: Markup,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Dry run: fetching prices from {}", client.base_url());
    let prices = client.fetch_prices(country).await?;

    let (priced, summary) = sync::preview(&prices, markup)?;
    for item in &priced {
        tracing::info!(
            "{}/{}: {} -> {} ({} available)",
            item.entry.country_code,
            item.entry.service_code,
            item.quote.smshub_price,
            item.quote.our_price,
            item.entry.count
        );
    }

    println!(
        "Dry run: {} entries priced, {} skipped, nothing written",
        priced.len(),
        summary.skipped
    );

    Ok(())
}
