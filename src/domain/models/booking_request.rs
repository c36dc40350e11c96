use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Who is booking. Anonymous visitors carry a client-persisted id that
/// substitutes for a user id in request lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(String),
    Anonymous(String),
}

impl Identity {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(id) => Some(id),
            Identity::Anonymous(_) => None,
        }
    }

    pub fn visitor_id(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(_) => None,
            Identity::Anonymous(id) => Some(id),
        }
    }
}

/// What is being booked: a product, or one card of a campaign page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingTarget {
    Product(String),
    CampaignCard { campaign_id: String, card_index: i32 },
}

impl BookingTarget {
    pub fn product_id(&self) -> Option<&str> {
        match self {
            BookingTarget::Product(id) => Some(id),
            BookingTarget::CampaignCard { .. } => None,
        }
    }

    pub fn campaign(&self) -> Option<(&str, i32)> {
        match self {
            BookingTarget::Product(_) => None,
            BookingTarget::CampaignCard { campaign_id, card_index } => Some((campaign_id, *card_index)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingRequest {
    pub id: String,
    pub product_id: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_card_index: Option<i32>,
    pub user_id: Option<String>,
    pub visitor_id: Option<String>,
    pub event_date: NaiveDate,
    pub timezone: String,
    pub stage: String,
    pub offer_expires_at: DateTime<Utc>,
    pub selected_time: Option<String>,
    pub checkout_session_id: Option<String>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

fn stage_rank(stage: &str) -> i32 {
    match stage {
        "DATE_SELECTED" => 0,
        "TIME_SELECTED" => 1,
        "CHECKOUT_STARTED" => 2,
        "PAID" => 3,
        _ => -1,
    }
}

impl BookingRequest {
    pub fn new(
        target: &BookingTarget,
        identity: &Identity,
        event_date: NaiveDate,
        timezone: String,
        offer_window_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let (campaign_id, campaign_card_index) = match target.campaign() {
            Some((id, idx)) => (Some(id.to_string()), Some(idx)),
            None => (None, None),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: target.product_id().map(str::to_string),
            campaign_id,
            campaign_card_index,
            user_id: identity.user_id().map(str::to_string),
            visitor_id: identity.visitor_id().map(str::to_string),
            event_date,
            timezone,
            stage: "DATE_SELECTED".to_string(),
            offer_expires_at: now + Duration::hours(offer_window_hours),
            selected_time: None,
            checkout_session_id: None,
            last_seen_at: now,
            created_at: now,
        }
    }

    /// Derived, never stored. Full slot list while the offer window is
    /// open or once the request is paid; the limited list otherwise.
    pub fn availability_version(&self, now: DateTime<Utc>) -> &'static str {
        if self.stage == "PAID" || now < self.offer_expires_at {
            "full"
        } else {
            "limited"
        }
    }

    /// Stage only ever moves forward within one request's lifetime.
    pub fn advance_stage(&mut self, target: &str) {
        if stage_rank(target) > stage_rank(&self.stage) {
            self.stage = target.to_string();
        }
    }
}
