#![cfg(feature = "pg-tests")]

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use playmark_core::application::AppUnitOfWork;
use playmark_core::database::PostgresDatabase;
use playmark_core::database::ports::viewing_history::{
    FinalProgress, HistoryFilter, ViewingHistoryRepository,
};
use playmark_core::playback::{StreamingResolver, ViewingHistoryService};
use playmark_model::{ContentId, UserId};
use sqlx::PgPool;

const USER: UserId = UserId(7);

async fn seed_content(pool: &PgPool, title: &str, duration: f64) -> Result<ContentId> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO contents (title, thumbnail_url, video_url, duration) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(title)
    .bind(format!("https://cdn.example.com/{title}.jpg"))
    .bind(format!("https://cdn.example.com/{title}.mp4"))
    .bind(duration)
    .fetch_one(pool)
    .await?;
    Ok(ContentId(id))
}

fn fixed(offset_secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
        + Duration::seconds(offset_secs)
}

#[sqlx::test(migrator = "playmark_core::MIGRATOR")]
async fn heartbeat_then_final_keeps_one_row(pool: PgPool) -> Result<()> {
    let content = seed_content(&pool, "pilot", 1200.0).await?;
    let db = PostgresDatabase::from_pool(pool.clone(), 4);
    let uow = AppUnitOfWork::postgres(&db);
    let history = ViewingHistoryService::from_unit_of_work(&uow);
    let resolver = StreamingResolver::from_unit_of_work(&uow);

    let first = history.upsert_position(USER, content, 30.0).await?;
    assert_eq!(first.watch_duration, 0.0);
    assert!(!first.is_completed);

    history.upsert_position(USER, content, 60.0).await?;
    let done = history
        .upsert_final(
            USER,
            content,
            FinalProgress {
                final_position: 1100.0,
                watch_duration: 1100.0,
                is_completed: true,
            },
        )
        .await?;
    assert!(done.is_completed);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM viewing_histories WHERE user_id = $1 AND content_id = $2",
    )
    .bind(USER.get())
    .bind(content.get())
    .fetch_one(&pool)
    .await?;
    assert_eq!(rows, 1);

    let resolved = resolver.resolve(content, USER).await?;
    assert_eq!(resolved.grant.resume_position, 1100.0);
    assert_eq!(resolved.content.duration, 1200.0);
    Ok(())
}

#[sqlx::test(migrator = "playmark_core::MIGRATOR")]
async fn heartbeat_does_not_touch_terminal_fields(pool: PgPool) -> Result<()> {
    let content = seed_content(&pool, "feature", 600.0).await?;
    let db = PostgresDatabase::from_pool(pool, 4);
    let repo = db.viewing_history();
    repo.upsert_final(
        USER,
        content,
        FinalProgress {
            final_position: 300.0,
            watch_duration: 300.0,
            is_completed: false,
        },
        fixed(0),
    )
    .await?;
    let record = repo.upsert_position(USER, content, 330.0, fixed(30)).await?;

    assert_eq!(record.last_position, 330.0);
    assert_eq!(record.watch_duration, 300.0);
    assert_eq!(record.watched_at, fixed(30));
    Ok(())
}

#[sqlx::test(migrator = "playmark_core::MIGRATOR")]
async fn in_progress_listing_is_newest_first(pool: PgPool) -> Result<()> {
    let a = seed_content(&pool, "a", 100.0).await?;
    let b = seed_content(&pool, "b", 100.0).await?;
    let c = seed_content(&pool, "c", 100.0).await?;
    let repo = PostgresDatabase::from_pool(pool, 4).viewing_history();

    repo.upsert_position(USER, a, 10.0, fixed(10)).await?;
    repo.upsert_position(USER, b, 10.0, fixed(20)).await?;
    repo.upsert_final(
        USER,
        c,
        FinalProgress {
            final_position: 95.0,
            watch_duration: 95.0,
            is_completed: true,
        },
        fixed(30),
    )
    .await?;

    let rows = repo
        .list_for_user(USER, HistoryFilter::InProgressOnly, 10)
        .await?;
    let ids: Vec<ContentId> = rows.iter().map(|r| r.content_id).collect();
    assert_eq!(ids, vec![b, a]);

    let rows = repo.list_for_user(USER, HistoryFilter::All, 1).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content_id, c);
    Ok(())
}
