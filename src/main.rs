use std::sync::Arc;

use studytainment::config::{init_db, Config};
use studytainment::modules::auth::bootstrap::ensure_admin;
use studytainment::services::jwt::JwtService;
use studytainment::services::metrics::MetricsRegistry;
use studytainment::services::payment::{PaymentGateway, RazorpayClient};
use studytainment::services::sms::{ConsoleSmsSender, HttpSmsSender, SmsSender};
use studytainment::store::Repositories;
use studytainment::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studytainment=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let db = init_db(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Connected to MySQL");

    let repos = Repositories::mysql(db);

    if let Some(seed) = &config.admin {
        ensure_admin(&repos, seed).await?;
    }

    let payments: Arc<dyn PaymentGateway> = Arc::new(RazorpayClient::new(
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
    ));

    let sms: Arc<dyn SmsSender> = match (&config.sms_api_url, &config.sms_api_key) {
        (Some(url), Some(key)) => Arc::new(HttpSmsSender::new(url.clone(), key.clone())),
        _ => {
            tracing::warn!("SMS_API_URL/SMS_API_KEY not set, OTPs will only be logged");
            Arc::new(ConsoleSmsSender)
        }
    };

    let state = Arc::new(AppState {
        repos,
        jwt_service: JwtService::new(
            config.access_token_secret.clone(),
            config.refresh_token_secret.clone(),
        ),
        payments,
        sms,
        metrics: MetricsRegistry::new()?,
        settings: config.settings.clone(),
    });

    let app = studytainment::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
