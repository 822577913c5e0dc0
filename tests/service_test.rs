mod common;

use crowd_ideas::models::Vote;
use crowd_ideas::repositories::{
    is_unique_violation, IdeaListQuery, IdeaRepository, IdeaSort, SortOrder, VoteRepository,
    WriteOutcome,
};
use crowd_ideas::{AppError, IdeaService};
use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};

#[tokio::test]
async fn duplicate_create_leaves_one_row() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db.clone());

    let idea = service.create_idea("Dark Mode", "first").await.unwrap();
    let err = service.create_idea("Dark Mode", "second").await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists));

    let (items, total) = service.list_ideas(&IdeaListQuery::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, idea.id);
    assert_eq!(items[0].description, "first");
}

#[tokio::test]
async fn storage_rejects_duplicate_named_vote() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db.clone());
    let idea = service.create_idea("Indexed", "").await.unwrap();

    service.vote(idea.id, Some("alice")).await.unwrap();

    // Bypass the service pre-check and let the unique index decide.
    let txn = db.begin().await.unwrap();
    let err = VoteRepository::new(&txn)
        .create(idea.id, Some("alice"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err));
    txn.rollback().await.unwrap();

    let txn = db.begin().await.unwrap();
    let write = VoteRepository::new(&txn).create(idea.id, Some("alice")).await;
    let outcome = WriteOutcome::classify(write).unwrap();
    assert_eq!(outcome.map(|vote| vote.id), WriteOutcome::UniqueViolation);
    txn.rollback().await.unwrap();

    // Anonymous votes are never part of the index.
    let txn = db.begin().await.unwrap();
    let votes = VoteRepository::new(&txn);
    votes.create(idea.id, None).await.unwrap();
    votes.create(idea.id, None).await.unwrap();
    txn.commit().await.unwrap();

    assert_eq!(service.votes_count(idea.id).await.unwrap(), 3);
}

#[tokio::test]
async fn storage_rejects_duplicate_title() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db.clone());
    service.create_idea("Taken", "").await.unwrap();

    let txn = db.begin().await.unwrap();
    let write = IdeaRepository::new(&txn).create("Taken", "again").await;
    let outcome = WriteOutcome::classify(write).unwrap();
    assert_eq!(outcome.map(|idea| idea.id), WriteOutcome::UniqueViolation);
    txn.rollback().await.unwrap();
}

#[tokio::test]
async fn votes_are_counted_per_idea() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db.clone());
    let a = service.create_idea("Idea A", "").await.unwrap();
    let b = service.create_idea("Idea B", "").await.unwrap();

    service.vote(a.id, Some("alice")).await.unwrap();
    service.vote(a.id, None).await.unwrap();
    service.vote(b.id, Some("alice")).await.unwrap();

    let err = service.vote(a.id, Some("alice")).await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateVote));

    assert_eq!(service.votes_count(a.id).await.unwrap(), 2);
    assert_eq!(service.get_idea(a.id).await.unwrap().votes_count, 2);
    assert_eq!(service.get_idea(b.id).await.unwrap().votes_count, 1);
}

#[tokio::test]
async fn delete_cascades_to_votes() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db.clone());
    let doomed = service.create_idea("Doomed", "").await.unwrap();
    let kept = service.create_idea("Kept", "").await.unwrap();

    service.vote(doomed.id, Some("alice")).await.unwrap();
    service.vote(doomed.id, None).await.unwrap();
    service.vote(kept.id, None).await.unwrap();
    assert_eq!(Vote::find().count(&db).await.unwrap(), 3);

    service.delete_idea(doomed.id).await.unwrap();

    assert_eq!(Vote::find().count(&db).await.unwrap(), 1);
    assert!(matches!(
        service.votes_count(doomed.id).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        service.delete_idea(doomed.id).await.unwrap_err(),
        AppError::NotFound
    ));
}

#[tokio::test]
async fn vote_on_missing_idea_is_not_found() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db);

    let err = service.vote(404, None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn update_keeps_unset_fields() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db);
    let idea = service.create_idea("Original", "body").await.unwrap();

    let updated = service
        .update_idea(idea.id, Some("Renamed"), None)
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, "body");
    assert_eq!(updated.created_at, idea.created_at);
    assert!(updated.updated_at >= idea.updated_at);

    let untouched = service.update_idea(idea.id, None, None).await.unwrap();
    assert_eq!(untouched.title, "Renamed");
}

#[tokio::test]
async fn list_sorts_and_filters_views() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db);
    let quiet = service.create_idea("Quiet idea", "nobody cares").await.unwrap();
    let loud = service.create_idea("Loud idea", "everyone cares").await.unwrap();
    service.create_idea("Unrelated", "other").await.unwrap();

    service.vote(loud.id, None).await.unwrap();
    service.vote(loud.id, None).await.unwrap();

    let query = IdeaListQuery {
        q: Some("CARES".to_string()),
        sort: IdeaSort::Votes,
        order: SortOrder::Desc,
        ..Default::default()
    };
    let (items, total) = service.list_ideas(&query).await.unwrap();
    assert_eq!(total, 2);
    let ids: Vec<i32> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![loud.id, quiet.id]);
    assert_eq!(items[0].votes_count, 2);
    assert_eq!(items[1].votes_count, 0);

    let top = service.top_ideas(1, 1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, loud.id);
}

#[tokio::test]
async fn search_folds_term_and_column_alike() {
    let db = common::setup_db().await;
    let service = IdeaService::new(db);
    let idea = service.create_idea("Éclair menu", "").await.unwrap();

    let query = IdeaListQuery {
        q: Some("ÉCLAIR MENU".to_string()),
        ..Default::default()
    };
    let (items, total) = service.list_ideas(&query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, idea.id);
}
