use crate::domain::ports::AutomationRelay;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::error;

/// Fire-and-forget JSON POST to the external automation service. The
/// payment handler spawns this and never awaits it on the hot path.
pub struct HttpAutomationRelay {
    client: Client,
    webhook_url: String,
}

impl HttpAutomationRelay {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl AutomationRelay for HttpAutomationRelay {
    async fn booking_confirmed(&self, payload: &serde_json::Value) -> Result<(), AppError> {
        let response = self.client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Automation relay unreachable: {}", e);
                AppError::InternalWithMsg("Automation relay unreachable".into())
            })?;

        if !response.status().is_success() {
            error!("Automation relay rejected payload: {}", response.status());
            return Err(AppError::InternalWithMsg("Automation relay rejected payload".into()));
        }

        Ok(())
    }
}
