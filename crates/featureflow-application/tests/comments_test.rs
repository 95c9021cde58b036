mod common;

use common::{Harness, comment_json, idea_json};
use featureflow_application::FlightPolicy;
use featureflow_core::FeedbackError;
use serde_json::json;

fn comment_ids(comments: &[featureflow_core::Comment]) -> Vec<&str> {
    comments.iter().map(|c| c.id.as_str()).collect()
}

async fn board_with_comments(viewer: u64, admin: bool) -> Harness {
    let h = Harness::signed_in(viewer, admin, FlightPolicy::PerEntity).await;
    let mut idea = idea_json("1", 0, false);
    idea["comments_count"] = json!(3);
    h.with_listing(vec![idea]).await;
    h.with_comments(
        "1",
        vec![
            comment_json("c3", 5),
            comment_json("c2", 6),
            comment_json("c1", 5),
        ],
    )
    .await;
    h
}

#[tokio::test]
async fn test_add_comment_prepends_server_copy() {
    let h = board_with_comments(5, false).await;
    h.gateway.reply("POST /ideas/1/comments", comment_json("c4", 5));

    let comment = h.store.add_comment("1", "  Looks great  ").await.unwrap();

    assert_eq!(comment.id, "c4");
    assert_eq!(
        h.gateway.last_request().body,
        Some(json!({"comment": {"content": "Looks great"}}))
    );
    let comments = h.store.comments("1").await;
    assert_eq!(comment_ids(&comments), vec!["c4", "c3", "c2", "c1"]);
    assert_eq!(h.store.idea("1").await.unwrap().comment_count, 4);
}

#[tokio::test]
async fn test_failed_add_changes_nothing() {
    let h = board_with_comments(5, false).await;
    h.gateway.fail(
        "POST /ideas/1/comments",
        FeedbackError::from_status(422, vec!["Content is too long".into()]),
    );

    let err = h.store.add_comment("1", "hello").await.unwrap_err();

    assert_eq!(err.user_message(), "Content is too long");
    assert_eq!(h.store.comments("1").await.len(), 3);
    assert_eq!(h.store.idea("1").await.unwrap().comment_count, 3);
}

#[tokio::test]
async fn test_blank_or_oversized_comment_is_local() {
    let h = board_with_comments(5, false).await;
    let before = h.gateway.request_count();

    assert!(h.store.add_comment("1", "   ").await.unwrap_err().is_validation());
    assert!(
        h.store
            .add_comment("1", &"x".repeat(1001))
            .await
            .unwrap_err()
            .is_validation()
    );
    assert_eq!(h.gateway.request_count(), before);
}

#[tokio::test]
async fn test_delete_removes_and_decrements() {
    let h = board_with_comments(5, false).await;
    h.gateway.reply("DELETE /ideas/1/comments/c1", serde_json::Value::Null);
    h.store.delete_comment("1", "c1").await.unwrap();

    let comments = h.store.comments("1").await;
    assert_eq!(comment_ids(&comments), vec!["c3", "c2"]);
    assert_eq!(h.store.idea("1").await.unwrap().comment_count, 2);
}

#[tokio::test]
async fn test_failed_delete_reinserts_at_original_position() {
    let h = board_with_comments(5, true).await;

    let release = h.gateway.hold("DELETE /ideas/1/comments/c2");
    let (deleted, during) = futures::join!(h.store.delete_comment("1", "c2"), async {
        let during = h.store.comments("1").await;
        release
            .send(Err(FeedbackError::transport("timed out")))
            .unwrap();
        during
    });

    assert_eq!(comment_ids(&during), vec!["c3", "c1"]);
    assert!(deleted.unwrap_err().is_transport());
    let comments = h.store.comments("1").await;
    assert_eq!(comment_ids(&comments), vec!["c3", "c2", "c1"]);
    assert_eq!(h.store.idea("1").await.unwrap().comment_count, 3);
}

#[tokio::test]
async fn test_cannot_delete_someone_elses_comment() {
    let h = board_with_comments(5, false).await;
    let before = h.gateway.request_count();

    let err = h.store.delete_comment("1", "c2").await.unwrap_err();

    assert!(matches!(err, FeedbackError::Forbidden { .. }));
    assert_eq!(h.gateway.request_count(), before);
    assert_eq!(h.store.comments("1").await.len(), 3);
}

#[tokio::test]
async fn test_admin_may_delete_any_comment() {
    let h = board_with_comments(8, true).await;
    h.gateway.reply("DELETE /ideas/1/comments/c2", serde_json::Value::Null);

    h.store.delete_comment("1", "c2").await.unwrap();

    let comments = h.store.comments("1").await;
    assert_eq!(comment_ids(&comments), vec!["c3", "c1"]);
}

#[tokio::test]
async fn test_comment_already_gone_stays_removed() {
    let h = board_with_comments(5, false).await;
    h.gateway.fail(
        "DELETE /ideas/1/comments/c3",
        FeedbackError::from_status(404, vec!["Comment not found".into()]),
    );

    let err = h.store.delete_comment("1", "c3").await.unwrap_err();

    assert_eq!(err, FeedbackError::not_found("comment", "c3"));
    let comments = h.store.comments("1").await;
    assert_eq!(comment_ids(&comments), vec!["c2", "c1"]);
    assert!(h.store.idea("1").await.is_some());
}

#[tokio::test]
async fn test_later_comment_pages_append() {
    let h = board_with_comments(5, false).await;
    h.gateway.reply(
        "GET /ideas/1/comments",
        json!([comment_json("c1", 5), comment_json("c0", 6)]),
    );

    let comments = h.store.load_comments("1", 2).await.unwrap();

    assert_eq!(comment_ids(&comments), vec!["c3", "c2", "c1", "c0"]);
    assert_eq!(
        h.gateway.last_request().query,
        vec![("page".to_string(), "2".to_string())]
    );
}
