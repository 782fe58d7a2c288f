use std::env;
use std::str::FromStr;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub sms_api_url: Option<String>,
    pub sms_api_key: Option<String>,
    pub admin: Option<AdminSeed>,
    pub settings: Settings,
}

/// Administrator created at startup when absent.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub phone: String,
    pub password: String,
}

/// Runtime knobs the request handlers read from `AppState`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cookie_secure: bool,
    pub otp_ttl_minutes: i64,
    pub payment_currency: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub silent_refresh_path: String,
    pub rate_limit_burst: u32,
    pub rate_limit_per_second: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cookie_secure: true,
            otp_ttl_minutes: 5,
            payment_currency: "INR".to_string(),
            payment_key_id: String::new(),
            payment_key_secret: String::new(),
            silent_refresh_path: "/silent-refresh".to_string(),
            rate_limit_burst: 100,
            rate_limit_per_second: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let access_token_secret = required("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = required("REFRESH_TOKEN_SECRET")?;
        let razorpay_key_id = required("RAZORPAY_KEY_ID")?;
        let razorpay_key_secret = required("RAZORPAY_KEY_SECRET")?;

        if access_token_secret == refresh_token_secret {
            return Err("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string());
        }

        let defaults = Settings::default();
        let settings = Settings {
            cookie_secure: parsed("COOKIE_SECURE", defaults.cookie_secure)?,
            otp_ttl_minutes: parsed("OTP_TTL_MINUTES", defaults.otp_ttl_minutes)?,
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or(defaults.payment_currency),
            payment_key_id: razorpay_key_id.clone(),
            payment_key_secret: razorpay_key_secret.clone(),
            silent_refresh_path: env::var("SILENT_REFRESH_PATH")
                .unwrap_or(defaults.silent_refresh_path),
            rate_limit_burst: parsed("RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            rate_limit_per_second: parsed("RATE_LIMIT_PER_SECOND", defaults.rate_limit_per_second)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            access_token_secret,
            refresh_token_secret,
            razorpay_key_id,
            razorpay_key_secret,
            sms_api_url: env::var("SMS_API_URL").ok(),
            sms_api_key: env::var("SMS_API_KEY").ok(),
            admin: admin_seed(),
            settings,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{} must be set", name))
}

fn parsed<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn admin_seed() -> Option<AdminSeed> {
    Some(AdminSeed {
        username: env::var("ADMIN_USERNAME").ok()?,
        phone: env::var("ADMIN_PHONE").ok()?,
        password: env::var("ADMIN_PASSWORD").ok()?,
    })
}
