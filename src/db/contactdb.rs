use async_trait::async_trait;

use crate::{
    db::{db::DBClient, query_timeout::QueryTimeout},
    models::contactmodel::{AgentContact, NewAgentContact},
};

#[async_trait]
pub trait ContactExt: Send + Sync {
    /// Inserts a lead. Leads are append-only; there is no update or delete.
    async fn save_contact(
        &self,
        contact: NewAgentContact,
    ) -> Result<AgentContact, sqlx::Error>;
}

#[async_trait]
impl ContactExt for DBClient {
    async fn save_contact(
        &self,
        contact: NewAgentContact,
    ) -> Result<AgentContact, sqlx::Error> {
        let query = sqlx::query_as::<_, AgentContact>(
            r#"
            INSERT INTO agent_contacts (user_id, listing_id, listing_type, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, listing_id, listing_type, message, created_at
            "#,
        )
        .bind(contact.user_id)
        .bind(contact.listing_id)
        .bind(contact.listing_type)
        .bind(contact.message)
        .fetch_one(&self.pool);

        QueryTimeout::execute_with_timeout(query, self.query_timeout).await
    }
}
