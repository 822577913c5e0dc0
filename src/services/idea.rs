use crate::{
    error::{AppError, AppResult},
    models::{IdeaModel, IdeaView},
    repositories::{IdeaListQuery, IdeaRepository, VoteRepository, WriteOutcome},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// Idea and vote use-cases.
///
/// Every mutation runs in its own transaction. Uniqueness is checked up front
/// for a fast answer, but the unique indexes on `ideas.title` and
/// `votes(idea_id, voter)` are what actually decide: a violation at write or
/// commit time is rolled back and reported the same way as a failed pre-check.
pub struct IdeaService {
    db: DatabaseConnection,
}

impl IdeaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_idea(&self, title: &str, description: &str) -> AppResult<IdeaModel> {
        let txn = self.db.begin().await?;
        let ideas = IdeaRepository::new(&txn);

        if ideas.get_by_title(title).await?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let write = ideas.create(title, description).await;
        match commit_unique(txn, write).await? {
            WriteOutcome::Applied(idea) => {
                tracing::info!(idea_id = idea.id, "Idea created");
                Ok(idea)
            }
            WriteOutcome::UniqueViolation => {
                tracing::warn!(title, "Title claimed concurrently, create rejected");
                Err(AppError::AlreadyExists)
            }
        }
    }

    pub async fn update_idea(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<IdeaView> {
        let txn = self.db.begin().await?;
        let ideas = IdeaRepository::new(&txn);

        let idea = ideas.get(id).await?.ok_or(AppError::NotFound)?;

        if let Some(title) = title.filter(|t| *t != idea.title) {
            if ideas.get_by_title(title).await?.is_some() {
                return Err(AppError::AlreadyExists);
            }
        }

        // The count is read before commit, inside the same transaction.
        let write = match ideas.update(idea, title, description).await {
            Ok(idea) => ideas
                .votes_count(idea.id)
                .await
                .map(|count| IdeaView::new(idea, count as i64)),
            Err(err) => Err(err),
        };
        match commit_unique(txn, write).await? {
            WriteOutcome::Applied(idea) => {
                tracing::info!(idea_id = idea.id, "Idea updated");
                Ok(idea)
            }
            WriteOutcome::UniqueViolation => {
                tracing::warn!(idea_id = id, "Title claimed concurrently, update rejected");
                Err(AppError::AlreadyExists)
            }
        }
    }

    pub async fn delete_idea(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let ideas = IdeaRepository::new(&txn);

        let idea = ideas.get(id).await?.ok_or(AppError::NotFound)?;
        ideas.delete(idea).await?;
        txn.commit().await?;

        tracing::info!(idea_id = id, "Idea deleted");
        Ok(())
    }

    pub async fn get_idea(&self, id: i32) -> AppResult<IdeaView> {
        let ideas = IdeaRepository::new(&self.db);
        let idea = ideas.get(id).await?.ok_or(AppError::NotFound)?;
        let votes_count = ideas.votes_count(id).await?;
        Ok(IdeaView::new(idea, votes_count as i64))
    }

    pub async fn list_ideas(&self, query: &IdeaListQuery) -> AppResult<(Vec<IdeaView>, u64)> {
        Ok(IdeaRepository::new(&self.db).list_paginated(query).await?)
    }

    pub async fn top_ideas(&self, page: u64, size: u64) -> AppResult<Vec<IdeaView>> {
        Ok(IdeaRepository::new(&self.db).top(page, size).await?)
    }

    /// Records one vote. A named voter may vote once per idea; anonymous
    /// votes (`voter = None`) are unlimited.
    pub async fn vote(&self, idea_id: i32, voter: Option<&str>) -> AppResult<()> {
        let txn = self.db.begin().await?;

        if IdeaRepository::new(&txn).get(idea_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let votes = VoteRepository::new(&txn);
        if let Some(voter) = voter {
            if votes.exists_for_voter(idea_id, voter).await? {
                return Err(AppError::DuplicateVote);
            }
        }

        let write = votes.create(idea_id, voter).await;
        match commit_unique(txn, write).await? {
            WriteOutcome::Applied(vote) => {
                tracing::info!(idea_id, vote_id = vote.id, anonymous = voter.is_none(), "Vote recorded");
                Ok(())
            }
            WriteOutcome::UniqueViolation => {
                tracing::warn!(idea_id, "Duplicate vote caught by unique index");
                Err(AppError::DuplicateVote)
            }
        }
    }

    pub async fn votes_count(&self, idea_id: i32) -> AppResult<u64> {
        let ideas = IdeaRepository::new(&self.db);
        if ideas.get(idea_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        Ok(ideas.votes_count(idea_id).await?)
    }
}

/// Finishes a transaction whose single write may hit a unique index.
///
/// A conflicting write is rolled back before returning. A conflict reported
/// by the commit itself leaves nothing applied either.
async fn commit_unique<T>(
    txn: DatabaseTransaction,
    write: Result<T, DbErr>,
) -> Result<WriteOutcome<T>, DbErr> {
    match WriteOutcome::classify(write)? {
        WriteOutcome::Applied(value) => {
            Ok(WriteOutcome::classify(txn.commit().await)?.map(|()| value))
        }
        WriteOutcome::UniqueViolation => {
            txn.rollback().await?;
            Ok(WriteOutcome::UniqueViolation)
        }
    }
}
