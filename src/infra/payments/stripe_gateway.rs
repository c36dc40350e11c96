use crate::domain::models::payment::{CheckoutSession, CheckoutSessionParams};
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

/// Checkout-session client for the payment gateway. Only the session
/// create call is spoken here; completion arrives on the webhook.
pub struct StripeCheckoutGateway {
    client: Client,
    api_url: String,
    secret_key: String,
}

impl StripeCheckoutGateway {
    pub fn new(api_url: String, secret_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            secret_key,
        }
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    async fn create_checkout_session(&self, params: &CheckoutSessionParams) -> Result<CheckoutSession, AppError> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("success_url".into(), params.success_url.clone()),
            ("cancel_url".into(), params.cancel_url.clone()),
            ("expires_at".into(), params.expires_at.timestamp().to_string()),
            ("line_items[0][quantity]".into(), "1".into()),
        ];

        if let Some(price_id) = &params.stripe_price_id {
            form.push(("line_items[0][price]".into(), price_id.clone()));
        } else {
            form.push(("line_items[0][price_data][currency]".into(), params.currency.clone()));
            form.push(("line_items[0][price_data][unit_amount]".into(), params.amount_cents.to_string()));
            form.push(("line_items[0][price_data][product_data][name]".into(), params.product_name.clone()));
        }

        let metadata = serde_json::to_value(&params.metadata)
            .map_err(|e| AppError::InternalWithMsg(format!("Metadata serialization failed: {}", e)))?;
        if let Some(map) = metadata.as_object() {
            for (key, value) in map {
                if let Some(value) = value.as_str() {
                    form.push((format!("metadata[{}]", key), value.to_string()));
                }
            }
        }

        let response = self.client
            .post(format!("{}/v1/checkout/sessions", self.api_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Payment gateway unreachable: {}", e);
                AppError::InternalWithMsg("Payment gateway unreachable".into())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Checkout session create failed: {} {}", status, body);
            return Err(AppError::InternalWithMsg("Checkout session create failed".into()));
        }

        let session: SessionResponse = response.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid gateway response: {}", e)))?;

        Ok(CheckoutSession { id: session.id, url: session.url })
    }
}
