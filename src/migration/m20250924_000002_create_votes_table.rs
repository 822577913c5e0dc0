use sea_orm_migration::prelude::*;

use super::m20250924_000001_create_ideas_table::Ideas;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    IdeaId,
    Voter,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::IdeaId).integer().not_null())
                    .col(ColumnDef::new(Votes::Voter).string_len(120).null())
                    .col(
                        ColumnDef::new(Votes::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_idea_id")
                            .from(Votes::Table, Votes::IdeaId)
                            .to(Ideas::Table, Ideas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // NULL voters are distinct, so anonymous votes never collide here.
        manager
            .create_index(
                Index::create()
                    .name("uq_votes_idea_voter")
                    .table(Votes::Table)
                    .col(Votes::IdeaId)
                    .col(Votes::Voter)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_idea_id")
                    .table(Votes::Table)
                    .col(Votes::IdeaId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}
