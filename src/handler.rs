pub mod agent_contact;
pub mod listings;
