use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::listingmodel::ListingKind;

/// A lead: one user's expression of interest in one listing. The
/// `(listing_id, listing_type)` pair points into whichever table the kind names.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AgentContact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub listing_type: ListingKind,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new lead; the user always comes from the token.
#[derive(Debug, Clone)]
pub struct NewAgentContact {
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub listing_type: ListingKind,
    pub message: Option<String>,
}
