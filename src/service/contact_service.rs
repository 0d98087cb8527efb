use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::contactdb::ContactExt,
    dtos::contactdtos::CreateContactDto,
    models::{
        contactmodel::{AgentContact, NewAgentContact},
        listingmodel::ListingKind,
    },
    service::{error::ServiceError, listing_service::ListingService},
};

/// Records leads against listings. A lead is the only input to popularity,
/// and it is written once and never changed.
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactExt>,
    listings: Arc<ListingService>,
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService").finish()
    }
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactExt>, listings: Arc<ListingService>) -> Self {
        Self { contacts, listings }
    }

    /// Creates a lead attributed to `user_id`, which must come from the
    /// authenticated caller.
    pub async fn create(
        &self,
        user_id: Uuid,
        body: CreateContactDto,
    ) -> Result<AgentContact, ServiceError> {
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let listing_id = Uuid::parse_str(&body.listing_id)
            .map_err(|_| ServiceError::Validation("listingId must be a UUID".to_string()))?;
        let listing_type: ListingKind = body
            .listing_type
            .parse()
            .map_err(ServiceError::Validation)?;

        if !self.listings.listing_exists(listing_type, listing_id).await? {
            return Err(ServiceError::ListingNotFound {
                kind: listing_type,
                id: listing_id.to_string(),
            });
        }

        let contact = self
            .contacts
            .save_contact(NewAgentContact {
                user_id,
                listing_id,
                listing_type,
                message: body.message,
            })
            .await?;

        tracing::info!(
            "Lead {} recorded for {} {} by user {}",
            contact.id,
            contact.listing_type,
            contact.listing_id,
            contact.user_id
        );

        Ok(contact)
    }
}
