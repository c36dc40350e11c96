pub mod audit;
pub mod auth;
pub mod availability_override;
pub mod availability_rule;
pub mod booking;
pub mod booking_request;
pub mod payment;
pub mod product;
pub mod slot_hold;
