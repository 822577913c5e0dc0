use crate::models::{idea, Idea, IdeaModel, IdeaView, Vote};
use sea_orm::sea_query::{BinOper, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

const VOTES_COUNT: &str = "votes_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdeaSort {
    #[default]
    CreatedAt,
    Votes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaListQuery {
    pub page: u64,
    pub size: u64,
    /// Case-insensitive substring matched against title or description.
    pub q: Option<String>,
    pub sort: IdeaSort,
    pub order: SortOrder,
}

impl Default for IdeaListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            q: None,
            sort: IdeaSort::default(),
            order: SortOrder::default(),
        }
    }
}

pub fn clamp_page(page: u64) -> u64 {
    page.max(1)
}

pub fn clamp_size(size: u64) -> u64 {
    size.clamp(1, MAX_PAGE_SIZE)
}

fn search_condition(q: Option<&str>) -> Condition {
    let Some(q) = q.filter(|q| !q.is_empty()) else {
        return Condition::all();
    };

    // Both sides are folded by the database so they agree on what lowercase means.
    let pattern = || Func::lower(Expr::val(format!("%{q}%")));
    let lowered = |col: idea::Column| Expr::expr(Func::lower(Expr::col((Idea, col))));

    Condition::any()
        .add(lowered(idea::Column::Title).binary(BinOper::Like, pattern()))
        .add(lowered(idea::Column::Description).binary(BinOper::Like, pattern()))
}

pub struct IdeaRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> IdeaRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Inserts without checking title uniqueness; the unique index still applies.
    pub async fn create(&self, title: &str, description: &str) -> Result<IdeaModel, DbErr> {
        let now = chrono::Utc::now().naive_utc();

        idea::ActiveModel {
            title: ActiveValue::Set(title.to_string()),
            description: ActiveValue::Set(description.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<IdeaModel>, DbErr> {
        Idea::find_by_id(id).one(self.conn).await
    }

    pub async fn get_by_title(&self, title: &str) -> Result<Option<IdeaModel>, DbErr> {
        Idea::find()
            .filter(idea::Column::Title.eq(title))
            .one(self.conn)
            .await
    }

    /// Writes only the provided fields. `updated_at` is always refreshed.
    pub async fn update(
        &self,
        idea: IdeaModel,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<IdeaModel, DbErr> {
        let mut active: idea::ActiveModel = idea.into();
        if let Some(title) = title {
            active.title = ActiveValue::Set(title.to_string());
        }
        if let Some(description) = description {
            active.description = ActiveValue::Set(description.to_string());
        }
        active.updated_at = ActiveValue::Set(chrono::Utc::now().naive_utc());

        active.update(self.conn).await
    }

    /// Votes go with it through the `ON DELETE CASCADE` foreign key.
    pub async fn delete(&self, idea: IdeaModel) -> Result<(), DbErr> {
        Idea::delete_by_id(idea.id).exec(self.conn).await?;
        Ok(())
    }

    pub async fn votes_count(&self, idea_id: i32) -> Result<u64, DbErr> {
        Vote::find()
            .filter(crate::models::vote::Column::IdeaId.eq(idea_id))
            .count(self.conn)
            .await
    }

    /// Returns one page plus the number of matching rows before paging.
    pub async fn list_paginated(
        &self,
        query: &IdeaListQuery,
    ) -> Result<(Vec<IdeaView>, u64), DbErr> {
        let condition = search_condition(query.q.as_deref());

        let total = Idea::find()
            .filter(condition.clone())
            .count(self.conn)
            .await?;

        let items = self
            .fetch_page(condition, query.sort, query.order, query.page, query.size)
            .await?;

        Ok((items, total))
    }

    /// Most-voted first, no text filter.
    pub async fn top(&self, page: u64, size: u64) -> Result<Vec<IdeaView>, DbErr> {
        self.fetch_page(Condition::all(), IdeaSort::Votes, SortOrder::Desc, page, size)
            .await
    }

    async fn fetch_page(
        &self,
        condition: Condition,
        sort: IdeaSort,
        order: SortOrder,
        page: u64,
        size: u64,
    ) -> Result<Vec<IdeaView>, DbErr> {
        let page = clamp_page(page);
        let size = clamp_size(size);
        let order = Order::from(order);

        let select = Idea::find()
            .column_as(
                Expr::col((Vote, crate::models::vote::Column::Id)).count(),
                VOTES_COUNT,
            )
            .join(JoinType::LeftJoin, idea::Relation::Vote.def())
            .filter(condition)
            .group_by(idea::Column::Id);

        let select = match sort {
            IdeaSort::CreatedAt => select.order_by(idea::Column::CreatedAt, order.clone()),
            IdeaSort::Votes => select.order_by(Expr::cust(VOTES_COUNT), order.clone()),
        };

        select
            .order_by(idea::Column::Id, order)
            .offset((page - 1) * size)
            .limit(size)
            .into_model::<IdeaView>()
            .all(self.conn)
            .await
    }
}
