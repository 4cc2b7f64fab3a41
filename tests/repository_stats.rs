mod common;

use chrono::{Duration, Utc};
use linkhub::domain::entities::{
    DeviceClass, NewClick, NewLinkTree, NewView, VisitDetails,
};
use linkhub::domain::repositories::{LinkTreeRepository, StatsRepository};
use linkhub::infrastructure::persistence::{PgLinkTreeRepository, PgStatsRepository};
use sqlx::PgPool;
use std::sync::Arc;

fn details(device: DeviceClass, country: &str) -> VisitDetails {
    VisitDetails {
        city: "Paris".to_string(),
        country: country.to_string(),
        device,
        browser: "Firefox".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_record_click_and_list(pool: PgPool) {
    let link_id = common::insert_link(&pool, "user-1", "abc123", "https://example.com/").await;
    let repo = PgStatsRepository::new(Arc::new(pool));

    let click = repo
        .record_click(NewClick {
            link_id,
            details: details(DeviceClass::Mobile, "France"),
        })
        .await
        .unwrap();

    assert_eq!(click.device_type, "mobile");
    assert_eq!(click.country, "France");

    let clicks = repo.clicks_for_link(link_id).await.unwrap();
    assert_eq!(clicks, vec![click]);
    assert_eq!(repo.count_clicks().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_click_counts_include_unclicked_links(pool: PgPool) {
    let clicked = common::insert_link(&pool, "user-1", "abc123", "https://example.com/").await;
    let idle = common::insert_link(&pool, "user-1", "idle01", "https://example.com/").await;
    common::insert_link(&pool, "user-2", "other1", "https://example.com/").await;
    let repo = PgStatsRepository::new(Arc::new(pool));

    for _ in 0..3 {
        repo.record_click(NewClick {
            link_id: clicked,
            details: details(DeviceClass::Desktop, "Germany"),
        })
        .await
        .unwrap();
    }

    let mut counts = repo.click_counts_for_user("user-1").await.unwrap();
    counts.sort_by_key(|c| c.link_id);

    assert_eq!(counts.len(), 2);
    assert_eq!((counts[0].link_id, counts[0].clicks), (clicked, 3));
    assert_eq!((counts[1].link_id, counts[1].clicks), (idle, 0));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_views_since(pool: PgPool) {
    let shared = Arc::new(pool.clone());
    let tree = PgLinkTreeRepository::new(shared.clone())
        .create(NewLinkTree {
            user_id: "user-1".to_string(),
            short_code: "janedoe".to_string(),
            title: "Jane".to_string(),
            bio: None,
            avatar_url: None,
            theme: "default".to_string(),
        })
        .await
        .unwrap();
    let repo = PgStatsRepository::new(shared);

    repo.record_view(NewView {
        linktree_id: tree.id,
        details: VisitDetails::unknown(),
    })
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO linktree_views (linktree_id, city, country, device_type, browser, viewed_at)
         VALUES ($1, 'Unknown', 'Unknown', 'unknown', 'Unknown', NOW() - INTERVAL '40 days')",
    )
    .bind(tree.id)
    .execute(&pool)
    .await
    .unwrap();

    let recent = repo
        .views_since(tree.id, Utc::now() - Duration::days(30))
        .await
        .unwrap();
    let all = repo
        .views_since(tree.id, Utc::now() - Duration::days(60))
        .await
        .unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].device_type, "unknown");
    assert_eq!(all.len(), 2);
    assert!(all[0].viewed_at <= all[1].viewed_at);
}
