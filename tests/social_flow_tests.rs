mod common;

use common::{seed_post, seed_user, test_state};
use snapfeed::{
    error::AppError,
    models::comment::{CreateCommentRequest, UpdateCommentRequest},
    models::post::CreatePostRequest,
    models::search::SearchQuery,
    models::user::UpdateProfileRequest,
};

#[tokio::test]
async fn like_toggle_flips_state_and_count() {
    let (state, _dir) = test_state().await;
    let user = seed_user(&state, "ana@example.com", "Ana").await;
    let post = seed_post(&state, &user.id, "first light").await;

    let status = state.like_service.toggle(&user.id, &post.id).await.unwrap();
    assert!(status.liked);
    assert_eq!(status.like_count, 1);

    let status = state.like_service.toggle(&user.id, &post.id).await.unwrap();
    assert!(!status.liked);
    assert_eq!(status.like_count, 0);

    let status = state.like_service.status(&user.id, &post.id).await.unwrap();
    assert!(!status.liked);
    assert_eq!(status.like_count, 0);
}

#[tokio::test]
async fn concurrent_like_toggles_never_duplicate_rows() {
    let (state, _dir) = test_state().await;
    let user = seed_user(&state, "ana@example.com", "Ana").await;
    let post = seed_post(&state, &user.id, "race me").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        let user_id = user.id.clone();
        let post_id = post.id.clone();
        handles.push(tokio::spawn(async move {
            state.like_service.toggle(&user_id, &post_id).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM likes WHERE user_id = ?1 AND post_id = ?2",
    )
    .bind(&user.id)
    .bind(&post.id)
    .fetch_one(state.db.pool())
    .await
    .unwrap();
    assert!(rows <= 1, "expected at most one like row, found {}", rows);

    let status = state.like_service.status(&user.id, &post.id).await.unwrap();
    assert_eq!(status.like_count, rows);
}

#[tokio::test]
async fn like_count_is_recomputed_per_request() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let ben = seed_user(&state, "ben@example.com", "Ben").await;
    let post = seed_post(&state, &ana.id, "sunset over the river").await;

    state.like_service.toggle(&ana.id, &post.id).await.unwrap();
    let status = state.like_service.toggle(&ben.id, &post.id).await.unwrap();
    assert_eq!(status.like_count, 2);

    // Ben's view after Ana withdraws her like reflects the real row count
    state.like_service.toggle(&ana.id, &post.id).await.unwrap();
    let status = state.like_service.status(&ben.id, &post.id).await.unwrap();
    assert!(status.liked);
    assert_eq!(status.like_count, 1);

    let item = state.post_service.get_post(&post.id, &ben.id).await.unwrap();
    assert_eq!(item.like_count, 1);
    assert!(item.liked);
    assert!(!item.bookmarked);
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let (state, _dir) = test_state().await;
    let user = seed_user(&state, "ana@example.com", "Ana").await;

    let err = state
        .like_service
        .toggle(&user.id, "no-such-post")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn bookmark_toggle_and_listing() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let ben = seed_user(&state, "ben@example.com", "Ben").await;
    let post = seed_post(&state, &ben.id, "keep this one").await;

    let status = state.bookmark_service.toggle(&ana.id, &post.id).await.unwrap();
    assert!(status.bookmarked);
    assert_eq!(status.bookmark_count, 1);

    let saved = state
        .bookmark_service
        .list_bookmarked(&ana.id, 1, 20)
        .await
        .unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].post.id, post.id);
    assert!(saved[0].bookmarked);

    let status = state.bookmark_service.toggle(&ana.id, &post.id).await.unwrap();
    assert!(!status.bookmarked);
    assert_eq!(status.bookmark_count, 0);

    let saved = state
        .bookmark_service
        .list_bookmarked(&ana.id, 1, 20)
        .await
        .unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn post_requires_an_image() {
    let (state, _dir) = test_state().await;
    let user = seed_user(&state, "ana@example.com", "Ana").await;

    let err = state
        .post_service
        .create_post(
            &user.id,
            CreatePostRequest {
                caption: Some("no picture".to_string()),
                tags: vec![],
                image_url: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidatorError(_)));
}

#[tokio::test]
async fn deleting_a_post_cascades_and_enforces_ownership() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let ben = seed_user(&state, "ben@example.com", "Ben").await;
    let post = seed_post(&state, &ana.id, "short lived").await;

    state.like_service.toggle(&ben.id, &post.id).await.unwrap();
    state
        .comment_service
        .create_comment(
            &ben.id,
            CreateCommentRequest {
                post_id: post.id.clone(),
                content: "nice shot".to_string(),
            },
        )
        .await
        .unwrap();

    let err = state
        .post_service
        .delete_post(&post.id, &ben.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    state.post_service.delete_post(&post.id, &ana.id).await.unwrap();
    assert!(!state.post_service.exists(&post.id).await.unwrap());

    let orphans = sqlx::query_scalar::<_, i64>(
        "SELECT (SELECT COUNT(*) FROM likes WHERE post_id = ?1)
              + (SELECT COUNT(*) FROM comments WHERE post_id = ?1)
              + (SELECT COUNT(*) FROM post_images WHERE post_id = ?1)",
    )
    .bind(&post.id)
    .fetch_one(state.db.pool())
    .await
    .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn comment_edit_and_delete_are_owner_only() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let ben = seed_user(&state, "ben@example.com", "Ben").await;
    let post = seed_post(&state, &ana.id, "discuss").await;

    let comment = state
        .comment_service
        .create_comment(
            &ben.id,
            CreateCommentRequest {
                post_id: post.id.clone(),
                content: "first".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!comment.edited);

    let err = state
        .comment_service
        .update_comment(
            &comment.id,
            &ana.id,
            UpdateCommentRequest {
                content: "hijacked".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let updated = state
        .comment_service
        .update_comment(
            &comment.id,
            &ben.id,
            UpdateCommentRequest {
                content: "first, edited".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(updated.edited);
    assert_eq!(updated.content, "first, edited");

    let err = state
        .comment_service
        .delete_comment(&comment.id, &ana.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    state
        .comment_service
        .delete_comment(&comment.id, &ben.id)
        .await
        .unwrap();
    let remaining = state
        .comment_service
        .list_for_post(&post.id, 50)
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn comment_listing_carries_author_info() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let post = seed_post(&state, &ana.id, "say hi").await;

    state
        .comment_service
        .create_comment(
            &ana.id,
            CreateCommentRequest {
                post_id: post.id.clone(),
                content: "hello".to_string(),
            },
        )
        .await
        .unwrap();

    let comments = state
        .comment_service
        .list_for_post(&post.id, 50)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_name.as_deref(), Some("Ana"));
    assert_eq!(comments[0].comment.content, "hello");
}

#[tokio::test]
async fn follow_rules_and_stats() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;
    let ben = seed_user(&state, "ben@example.com", "Ben").await;

    let err = state.follow_service.follow(&ana.id, &ana.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    state.follow_service.follow(&ana.id, &ben.id).await.unwrap();
    assert!(state.follow_service.is_following(&ana.id, &ben.id).await.unwrap());

    let err = state.follow_service.follow(&ana.id, &ben.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let followers = state.follow_service.followers(&ben.id).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, ana.id);

    let stats = state.user_service.get_stats(&ben.id).await.unwrap();
    assert_eq!(stats.followers, 1);
    assert_eq!(stats.following, 0);

    state.follow_service.unfollow(&ana.id, &ben.id).await.unwrap();
    let err = state.follow_service.unfollow(&ana.id, &ben.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn profile_update_is_an_upsert() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana").await;

    let view = state
        .user_service
        .update_profile(
            &ana.id,
            UpdateProfileRequest {
                name: Some("Ana K".to_string()),
                bio: Some("street photographer".to_string()),
                avatar_url: None,
                location: Some("Bratislava".to_string()),
                interests: Some(vec!["photo".to_string(), "travel".to_string()]),
            },
        )
        .await
        .unwrap();
    assert_eq!(view.user.name.as_deref(), Some("Ana K"));
    let profile = view.profile.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("street photographer"));
    assert_eq!(profile.interests, vec!["photo", "travel"]);

    // Second update replaces, never duplicates
    let view = state
        .user_service
        .update_profile(
            &ana.id,
            UpdateProfileRequest {
                name: None,
                bio: Some("mostly landscapes now".to_string()),
                avatar_url: None,
                location: None,
                interests: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(view.user.name.as_deref(), Some("Ana K"));
    assert_eq!(
        view.profile.unwrap().bio.as_deref(),
        Some("mostly landscapes now")
    );

    let rows =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE user_id = ?1")
            .bind(&ana.id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn search_matches_captions_tags_and_users() {
    let (state, _dir) = test_state().await;
    let ana = seed_user(&state, "ana@example.com", "Ana Sunset").await;
    seed_post(&state, &ana.id, "sunset over the bay").await;
    seed_post(&state, &ana.id, "morning coffee").await;

    let results = state
        .search_service
        .search(
            &ana.id,
            SearchQuery {
                q: "sunset".to_string(),
                search_type: None,
                page: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(results.posts.len(), 1);
    assert_eq!(results.users.len(), 1);
    assert_eq!(results.total_results, 2);

    // Below the minimum query length nothing is searched
    let results = state
        .search_service
        .search(
            &ana.id,
            SearchQuery {
                q: "s".to_string(),
                search_type: None,
                page: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert!(results.posts.is_empty());
    assert!(results.users.is_empty());
    assert_eq!(results.total_results, 0);
}

#[tokio::test]
async fn resolve_user_is_idempotent_per_email() {
    let (state, _dir) = test_state().await;
    let first = seed_user(&state, "ana@example.com", "Ana").await;
    let second = seed_user(&state, "ana@example.com", "Ana").await;
    assert_eq!(first.id, second.id);

    let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?1")
        .bind("ana@example.com")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
