//! Conversation model.

use diesel::prelude::*;
use driveloom_core::types::Conversation;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::conversations;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbConversation {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DbConversation> for Conversation {
    fn from(row: DbConversation) -> Self {
        Conversation {
            id: row.id,
            folder_id: row.folder_id,
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        }
    }
}
