pub mod contact_service;
pub mod error;
pub mod listing_service;
