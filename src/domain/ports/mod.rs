use crate::domain::models::{
    audit::AuditLogEntry,
    availability_override::AvailabilityOverride,
    availability_rule::AvailabilityRule,
    booking::Booking,
    booking_request::{BookingRequest, BookingTarget, Identity},
    payment::{CheckoutSession, CheckoutSessionParams},
    product::Product,
    slot_hold::BookingSlotHold,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError>;
    async fn list(&self) -> Result<Vec<Product>, AppError>;
}

#[async_trait]
pub trait AvailabilityRuleRepository: Send + Sync {
    async fn create(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;
    async fn update(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityRule>, AppError>;
    /// Most recently created active rule for the exact scope
    /// (`None` = the global scope, not "any scope").
    async fn find_active(&self, product_id: Option<&str>) -> Result<Option<AvailabilityRule>, AppError>;
    async fn count_active(&self, product_id: Option<&str>) -> Result<i64, AppError>;
    async fn list(&self, product_id: Option<&str>) -> Result<Vec<AvailabilityRule>, AppError>;
}

#[async_trait]
pub trait AvailabilityOverrideRepository: Send + Sync {
    async fn upsert(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityOverride>, AppError>;
    async fn find_for_date(&self, product_id: Option<&str>, date: NaiveDate) -> Result<Option<AvailabilityOverride>, AppError>;
    async fn list_by_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Preset application: delete every whole-day override in the range
    /// for the scope, then bulk-insert `rows`, atomically. Returns the
    /// number of deleted rows.
    async fn replace_range(
        &self,
        product_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
        rows: &[AvailabilityOverride],
    ) -> Result<u64, AppError>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), AppError>;
    async fn list(&self, limit: i64) -> Result<Vec<AuditLogEntry>, AppError>;
}

#[async_trait]
pub trait BookingRequestRepository: Send + Sync {
    async fn create(&self, request: &BookingRequest) -> Result<BookingRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError>;
    async fn find_by_key(
        &self,
        target: &BookingTarget,
        identity: &Identity,
        event_date: NaiveDate,
    ) -> Result<Option<BookingRequest>, AppError>;
    async fn update(&self, request: &BookingRequest) -> Result<BookingRequest, AppError>;
}

#[async_trait]
pub trait SlotHoldRepository: Send + Sync {
    /// The hold currently blocking a slot, if any: status ACTIVE or
    /// CONVERTED (expired-but-unswept ACTIVE rows are included; the
    /// caller decides whether to expire them).
    async fn find_blocking(&self, product_id: &str, event_date: NaiveDate, start_time: &str) -> Result<Option<BookingSlotHold>, AppError>;
    async fn create(&self, hold: &BookingSlotHold) -> Result<BookingSlotHold, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<BookingSlotHold>, AppError>;
    async fn mark_expired(&self, id: &str) -> Result<(), AppError>;
    async fn mark_converted(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_checkout_session(&self, session_id: &str) -> Result<Option<Booking>, AppError>;
    /// Confirmed bookings per date in the range, for the month engine.
    async fn count_by_date_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, i64)>, AppError>;
    /// Dates in the range with at least one confirmed booking
    /// (`None` = across all products) - the preset engine's protected set.
    async fn booked_dates_in_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AppError>;
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Idempotent post-purchase activation of the customer dashboard.
    async fn activate(&self, user_id: Option<&str>, customer_email: &str, booking_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, params: &CheckoutSessionParams) -> Result<CheckoutSession, AppError>;
}

#[async_trait]
pub trait AutomationRelay: Send + Sync {
    async fn booking_confirmed(&self, payload: &serde_json::Value) -> Result<(), AppError>;
}
