use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::models::booking_request::Identity;
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;

const VISITOR_COOKIE: &str = "visitor_id";
const VISITOR_HEADER: &str = "x-visitor-id";

/// Resolves who is booking. A valid access token wins; otherwise the
/// client-persisted visitor id (cookie or header) is used, and a fresh
/// one is minted and set as a cookie for first-time visitors.
pub struct BookingIdentity(pub Identity);

impl<S> FromRequestParts<S> for BookingIdentity
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        if let Some(cookie) = cookies.get("access_token")
            && let Ok(decoding_key) = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes()) {
            let mut validation = Validation::new(Algorithm::EdDSA);
            validation.set_audience(&[app_state.config.auth_audience.as_str()]);

            match decode::<Claims>(cookie.value(), &decoding_key, &validation) {
                Ok(token_data) => {
                    return Ok(BookingIdentity(Identity::Authenticated(token_data.claims.sub)));
                }
                Err(_) => {
                    // Expired or invalid token: fall through to visitor identity
                    debug!("Ignoring invalid access token, treating caller as visitor");
                }
            }
        }

        if let Some(cookie) = cookies.get(VISITOR_COOKIE) {
            return Ok(BookingIdentity(Identity::Anonymous(cookie.value().to_string())));
        }

        if let Some(header) = parts.headers.get(VISITOR_HEADER)
            && let Ok(value) = header.to_str()
            && !value.is_empty() {
            return Ok(BookingIdentity(Identity::Anonymous(value.to_string())));
        }

        let visitor_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();

        cookies.add(Cookie::new(VISITOR_COOKIE, visitor_id.clone()));
        Ok(BookingIdentity(Identity::Anonymous(visitor_id)))
    }
}
