use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{
    contactmodel::AgentContact,
    listingmodel::ListingKind,
};

// Any user identity field in the body is rejected; the caller comes from the token.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateContactDto {
    #[validate(
        length(min = 1, message = "listingId is required"),
        custom = "validate_listing_id"
    )]
    pub listing_id: String,

    #[validate(
        length(min = 1, message = "listingType is required"),
        custom = "validate_listing_type"
    )]
    pub listing_type: String,

    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

fn validate_listing_id(listing_id: &str) -> Result<(), ValidationError> {
    if Uuid::parse_str(listing_id).is_err() {
        let mut error = ValidationError::new("invalid_uuid");
        error.message = Some(Cow::from("listingId must be a UUID"));
        return Err(error);
    }
    Ok(())
}

fn validate_listing_type(listing_type: &str) -> Result<(), ValidationError> {
    match listing_type {
        "property" | "project" | "land" => Ok(()),
        _ => {
            let mut error = ValidationError::new("invalid_listing_type");
            error.message = Some(Cow::from("listingType must be one of: property, project, land"));
            Err(error)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentContactDto {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(rename = "listingType")]
    pub listing_type: ListingKind,
    pub message: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl AgentContactDto {
    pub fn from_contact(contact: &AgentContact) -> Self {
        Self {
            id: contact.id,
            user_id: contact.user_id,
            listing_id: contact.listing_id,
            listing_type: contact.listing_type,
            message: contact.message.clone(),
            created_at: contact.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentContactData {
    pub contact: AgentContactDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentContactResponseDto {
    pub status: String,
    pub data: AgentContactData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(listing_id: &str, listing_type: &str) -> CreateContactDto {
        CreateContactDto {
            listing_id: listing_id.to_string(),
            listing_type: listing_type.to_string(),
            message: Some("Interested!".to_string()),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let body = dto(&Uuid::new_v4().to_string(), "land");
        assert!(body.validate().is_ok());
    }

    #[test]
    fn wrong_type_tag_is_rejected() {
        let body = dto(&Uuid::new_v4().to_string(), "castle");
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("listing_type"));
    }

    #[test]
    fn non_uuid_listing_id_is_rejected() {
        let body = dto("42", "property");
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("listing_id"));
    }

    #[test]
    fn overlong_message_is_rejected() {
        let mut body = dto(&Uuid::new_v4().to_string(), "project");
        body.message = Some("x".repeat(2001));
        assert!(body.validate().is_err());
    }

    #[test]
    fn body_uses_camel_case_and_rejects_unknown_fields() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"listingId":"{}","listingType":"property"}}"#, id);
        let body: CreateContactDto = serde_json::from_str(&json).unwrap();
        assert_eq!(body.listing_id, id.to_string());
        assert!(body.message.is_none());

        let smuggled = format!(
            r#"{{"listingId":"{}","listingType":"property","userId":"{}"}}"#,
            id,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<CreateContactDto>(&smuggled).is_err());
    }
}
