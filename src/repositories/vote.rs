use crate::models::{vote, Vote, VoteModel};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

pub struct VoteRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VoteRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Inserts unconditionally. A repeated `(idea_id, voter)` surfaces as a
    /// unique-constraint error from storage.
    pub async fn create(&self, idea_id: i32, voter: Option<&str>) -> Result<VoteModel, DbErr> {
        vote::ActiveModel {
            idea_id: ActiveValue::Set(idea_id),
            voter: ActiveValue::Set(voter.map(str::to_string)),
            created_at: ActiveValue::Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn exists_for_voter(&self, idea_id: i32, voter: &str) -> Result<bool, DbErr> {
        let count = Vote::find()
            .filter(vote::Column::IdeaId.eq(idea_id))
            .filter(vote::Column::Voter.eq(voter))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }
}
