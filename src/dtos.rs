pub mod contactdtos;
pub mod listingdtos;
