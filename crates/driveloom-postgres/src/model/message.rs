//! Message model. Citations are stored as a `jsonb` map keyed by the
//! `[N]` marker, matching `driveloom_core::types::Message::citations`.

use std::collections::HashMap;

use diesel::prelude::*;
use driveloom_core::types::{Citation, Message};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::messages;
use crate::types::DbMessageRole;
use crate::{PgError, PgResult};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: DbMessageRole,
    pub content: String,
    pub citations: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDbMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: DbMessageRole,
    pub content: String,
    pub citations: serde_json::Value,
}

impl NewDbMessage {
    pub fn from_domain(message: &Message) -> PgResult<Self> {
        Ok(Self {
            id: message.id,
            conversation_id: message.conversation_id,
            role: message.role.into(),
            content: message.content.clone(),
            citations: serde_json::to_value(&message.citations)
                .map_err(|e| PgError::Unexpected(e.to_string().into()))?,
        })
    }
}

impl TryFrom<DbMessage> for Message {
    type Error = PgError;

    fn try_from(row: DbMessage) -> Result<Self, Self::Error> {
        let citations: HashMap<String, Citation> = serde_json::from_value(row.citations)
            .map_err(|e| PgError::Unexpected(e.to_string().into()))?;

        Ok(Message {
            id: row.id,
            conversation_id: row.conversation_id,
            role: row.role.into(),
            content: row.content,
            citations,
            created_at: row.created_at.into(),
        })
    }
}
