//! Message repository (`SPEC_FULL.md` §3 "Message").

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use driveloom_core::types::Message;
use uuid::Uuid;

use crate::model::{DbMessage, NewDbMessage};
use crate::{PgConnection, PgError, PgResult, schema};

pub trait MessageRepository {
    fn append_message(
        &mut self,
        message: &Message,
    ) -> impl Future<Output = PgResult<Message>> + Send;

    /// Conversation history in chronological order, used to build the chat
    /// agent's prompt context (`SPEC_FULL.md` §4.H).
    fn list_messages(
        &mut self,
        conversation_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Message>>> + Send;
}

impl MessageRepository for PgConnection {
    async fn append_message(&mut self, message: &Message) -> PgResult<Message> {
        let new_message = NewDbMessage::from_domain(message)?;

        let row = diesel::insert_into(schema::messages::table)
            .values(&new_message)
            .returning(DbMessage::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        row.try_into()
    }

    async fn list_messages(&mut self, conversation_id: Uuid) -> PgResult<Vec<Message>> {
        use schema::messages::dsl;

        let rows: Vec<DbMessage> = schema::messages::table
            .filter(dsl::conversation_id.eq(conversation_id))
            .order(dsl::created_at.asc())
            .select(DbMessage::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        rows.into_iter().map(TryFrom::try_from).collect()
    }
}
