pub mod cache;
pub mod contactdb;
pub mod db;
#[cfg(test)]
pub mod fixtures;
pub mod listingdb;
pub mod query_timeout;
