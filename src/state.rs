use std::sync::Arc;
use crate::domain::ports::{
    AuditLogRepository, AutomationRelay, AvailabilityOverrideRepository,
    AvailabilityRuleRepository, BookingRepository, BookingRequestRepository,
    DashboardRepository, PaymentGateway, ProductRepository, SlotHoldRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub product_repo: Arc<dyn ProductRepository>,
    pub rule_repo: Arc<dyn AvailabilityRuleRepository>,
    pub override_repo: Arc<dyn AvailabilityOverrideRepository>,
    pub audit_repo: Arc<dyn AuditLogRepository>,
    pub request_repo: Arc<dyn BookingRequestRepository>,
    pub hold_repo: Arc<dyn SlotHoldRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub dashboard_repo: Arc<dyn DashboardRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub automation_relay: Arc<dyn AutomationRelay>,
}
