pub mod postgres_audit_log_repo;
pub mod postgres_availability_override_repo;
pub mod postgres_availability_rule_repo;
pub mod postgres_booking_repo;
pub mod postgres_booking_request_repo;
pub mod postgres_dashboard_repo;
pub mod postgres_product_repo;
pub mod postgres_slot_hold_repo;
pub mod sqlite_audit_log_repo;
pub mod sqlite_availability_override_repo;
pub mod sqlite_availability_rule_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_booking_request_repo;
pub mod sqlite_dashboard_repo;
pub mod sqlite_product_repo;
pub mod sqlite_slot_hold_repo;
