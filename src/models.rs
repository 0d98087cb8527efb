pub mod contactmodel;
pub mod listingmodel;
