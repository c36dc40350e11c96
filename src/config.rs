use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub frontend_url: String,
    pub stripe_api_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub automation_webhook_url: String,
    pub jwt_public_key: String, // Public key (PEM), verification only
    pub auth_audience: String,
    pub checkout_hold_minutes: i64,
    pub default_offer_window_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3001".to_string()),
            stripe_api_url: env::var("STRIPE_API_URL").unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set"),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET must be set"),
            automation_webhook_url: env::var("AUTOMATION_WEBHOOK_URL").unwrap_or_else(|_| "http://localhost:8000/hooks/booking-confirmed".to_string()),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "studio-frontend".to_string()),
            checkout_hold_minutes: env::var("CHECKOUT_HOLD_MINUTES").unwrap_or_else(|_| "15".to_string()).parse().expect("CHECKOUT_HOLD_MINUTES must be a number"),
            default_offer_window_hours: env::var("DEFAULT_OFFER_WINDOW_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("DEFAULT_OFFER_WINDOW_HOURS must be a number"),
        }
    }
}
