//! Conversation repository (`SPEC_FULL.md` §3 "Conversation").

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use driveloom_core::types::Conversation;
use uuid::Uuid;

use crate::model::DbConversation;
use crate::{PgConnection, PgError, PgResult, schema};

pub trait ConversationRepository {
    fn create_conversation(
        &mut self,
        folder_id: Uuid,
    ) -> impl Future<Output = PgResult<Conversation>> + Send;

    fn find_conversation_scoped(
        &mut self,
        conversation_id: Uuid,
        folder_id: Uuid,
    ) -> impl Future<Output = PgResult<Conversation>> + Send;
}

impl ConversationRepository for PgConnection {
    async fn create_conversation(&mut self, folder_id: Uuid) -> PgResult<Conversation> {
        #[derive(Insertable)]
        #[diesel(table_name = schema::conversations)]
        struct NewConversation {
            id: Uuid,
            folder_id: Uuid,
        }

        let row = diesel::insert_into(schema::conversations::table)
            .values(&NewConversation { id: Uuid::now_v7(), folder_id })
            .returning(DbConversation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row.into())
    }

    async fn find_conversation_scoped(
        &mut self,
        conversation_id: Uuid,
        folder_id: Uuid,
    ) -> PgResult<Conversation> {
        use schema::conversations::dsl;

        let row = schema::conversations::table
            .filter(dsl::id.eq(conversation_id))
            .filter(dsl::folder_id.eq(folder_id))
            .select(DbConversation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)?;

        Ok(row.into())
    }
}
