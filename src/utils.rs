pub mod search_query;
pub mod token;
