//! Comment handlers: create, list, edit, delete and like.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use crate::extract::{AuthState, Json, Path, Query, ValidateJson};
use crate::handler::Result;
use crate::handler::request::{CommentPathParams, CreateComment, ListComments, UpdateComment};
use crate::handler::response::{
    Comment, CommentsPage, DeleteConfirmation, ErrorResponse, LikeStatus,
};
use crate::middleware::BEARER_SCHEME;
use crate::service::{CommentService, ServiceState};

/// Tracing target for comment handlers.
const TRACING_TARGET: &str = "threadline_server::handler::comments";

/// Creates a comment on a post, or a reply to another comment.
#[tracing::instrument(
    skip_all,
    fields(
        author_id = %identity.id,
        post_id = %request.post_id,
    )
)]
async fn post_comment(
    State(comments): State<CommentService>,
    AuthState(identity): AuthState,
    ValidateJson(request): ValidateJson<CreateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    tracing::debug!(target: TRACING_TARGET, "Creating comment");

    let comment = comments
        .create(&identity, &request.post_id, request.content, request.parent_id)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        comment_id = %comment.id,
        depth = comment.depth,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(Comment::from_model(comment))))
}

fn post_comment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create comment")
        .description(
            "Creates a comment on a post. With `parentId` the comment is a reply; \
             replies nest at most five levels deep.",
        )
        .security_requirement(BEARER_SCHEME)
        .response::<201, Json<Comment>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns one page of a post's comments nested into reply trees.
#[tracing::instrument(skip_all, fields(post_id = %query.post_id))]
async fn get_comments(
    State(comments): State<CommentService>,
    Query(query): Query<ListComments>,
) -> Result<(StatusCode, Json<CommentsPage>)> {
    query.validate()?;

    let thread = comments.list(&query.post_id, query.page, query.limit).await?;
    let response = CommentsPage::from_thread(thread);

    tracing::debug!(
        target: TRACING_TARGET,
        roots = response.comments.len(),
        total = response.pagination.total,
        "Comments listed",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn get_comments_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List comments")
        .description(
            "Returns active comments of a post in creation order, paginated, with \
             replies nested under their parent when both are on the same page.",
        )
        .response::<200, Json<CommentsPage>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Replaces the content of a comment.
#[tracing::instrument(
    skip_all,
    fields(
        caller_id = %identity.id,
        comment_id = %path_params.id,
    )
)]
async fn put_comment(
    State(comments): State<CommentService>,
    AuthState(identity): AuthState,
    Path(path_params): Path<CommentPathParams>,
    ValidateJson(request): ValidateJson<UpdateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    tracing::debug!(target: TRACING_TARGET, "Updating comment");

    let comment = comments
        .update(&identity, path_params.id, request.content)
        .await?;

    tracing::info!(target: TRACING_TARGET, "Comment updated");

    Ok((StatusCode::OK, Json(Comment::from_model(comment))))
}

fn put_comment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update comment")
        .description("Replaces the content of a comment. Only its author or an admin may edit it.")
        .security_requirement(BEARER_SCHEME)
        .response::<200, Json<Comment>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Soft-deletes a comment, keeping its replies.
#[tracing::instrument(
    skip_all,
    fields(
        caller_id = %identity.id,
        comment_id = %path_params.id,
    )
)]
async fn delete_comment(
    State(comments): State<CommentService>,
    AuthState(identity): AuthState,
    Path(path_params): Path<CommentPathParams>,
) -> Result<(StatusCode, Json<DeleteConfirmation>)> {
    tracing::debug!(target: TRACING_TARGET, "Deleting comment");

    comments.delete(&identity, path_params.id).await?;

    tracing::info!(target: TRACING_TARGET, "Comment deleted");

    Ok((StatusCode::OK, Json(DeleteConfirmation::default())))
}

fn delete_comment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete comment")
        .description(
            "Marks a comment as deleted and replaces its content with `[deleted]`. \
             Replies are kept. Only its author or an admin may delete it.",
        )
        .security_requirement(BEARER_SCHEME)
        .response::<200, Json<DeleteConfirmation>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Likes a comment, or removes the caller's like.
#[tracing::instrument(
    skip_all,
    fields(
        caller_id = %identity.id,
        comment_id = %path_params.id,
    )
)]
async fn post_comment_like(
    State(comments): State<CommentService>,
    AuthState(identity): AuthState,
    Path(path_params): Path<CommentPathParams>,
) -> Result<(StatusCode, Json<LikeStatus>)> {
    let toggle = comments.toggle_like(&identity, path_params.id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        liked = toggle.liked,
        "Comment like toggled",
    );

    Ok((StatusCode::OK, Json(LikeStatus::from_toggle(toggle))))
}

fn post_comment_like_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Toggle like")
        .description("Adds the caller's like to a comment, or removes it if already present.")
        .security_requirement(BEARER_SCHEME)
        .response::<200, Json<LikeStatus>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all comment routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/comments",
            post_with(post_comment, post_comment_docs).get_with(get_comments, get_comments_docs),
        )
        .api_route(
            "/comments/{id}",
            put_with(put_comment, put_comment_docs)
                .delete_with(delete_comment, delete_comment_docs),
        )
        .api_route(
            "/comments/{id}/like",
            post_with(post_comment_like, post_comment_like_docs),
        )
        .with_path_items(|item| item.tag("Comments"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::TestApp;

    async fn create(app: &TestApp, token: &str, body: Value) -> Value {
        let response = app
            .server
            .post("/comments")
            .authorization_bearer(token)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    #[tokio::test]
    async fn create_requires_a_bearer_token() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        let response = app
            .server
            .post("/comments")
            .json(&json!({ "content": "hi", "postId": "p1" }))
            .await;

        response.assert_status_unauthorized();
        let error = response.json::<Value>();
        assert_eq!(error["name"], "unauthorized");
        assert_eq!(error["message"], "Access token required");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_tokens_are_rejected() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        let response = app
            .server
            .post("/comments")
            .authorization_bearer("not-a-jwt")
            .json(&json!({ "content": "hi", "postId": "p1" }))
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["message"], "Invalid or expired token");
        Ok(())
    }

    #[tokio::test]
    async fn creates_comments_and_replies() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;

        let root = create(&app, &token, json!({ "content": "root", "postId": "p1" })).await;
        assert_eq!(root["depth"], 0);
        assert_eq!(root["authorId"], "u1");
        assert_eq!(root["authorName"], "User u1");
        assert_eq!(root["likeCount"], 0);
        assert_eq!(root["status"], "active");
        assert!(root["parentId"].is_null());

        let reply = create(
            &app,
            &token,
            json!({ "content": "reply", "postId": "p1", "parentId": root["id"] }),
        )
        .await;
        assert_eq!(reply["depth"], 1);
        assert_eq!(reply["parentId"], root["id"]);

        app.comments.flush_counter_updates().await;
        assert_eq!(app.posts.net_count("p1"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_invalid_bodies() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;

        for body in [
            json!({ "content": "", "postId": "p1" }),
            json!({ "content": "   ", "postId": "p1" }),
            json!({ "content": "x".repeat(1001), "postId": "p1" }),
            json!({ "content": "hi" }),
            json!({ "content": "hi", "postId": "p1", "parentId": "not-a-uuid" }),
        ] {
            let response = app
                .server
                .post("/comments")
                .authorization_bearer(&token)
                .json(&body)
                .await;
            response.assert_status_bad_request();
            assert_eq!(response.json::<Value>()["name"], "bad_request");
        }

        assert!(app.store.snapshot().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_on_unknown_post_is_not_found() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;

        let response = app
            .server
            .post("/comments")
            .authorization_bearer(&token)
            .json(&json!({ "content": "hi", "postId": "missing" }))
            .await;

        response.assert_status_not_found();
        let error = response.json::<Value>();
        assert_eq!(error["message"], "Post not found");
        assert_eq!(error["resource"], "post");
        assert!(app.store.snapshot().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn replies_deeper_than_five_levels_are_rejected() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;

        let mut parent = create(&app, &token, json!({ "content": "c0", "postId": "p1" })).await;
        for depth in 1..=5 {
            parent = create(
                &app,
                &token,
                json!({ "content": format!("c{depth}"), "postId": "p1", "parentId": parent["id"] }),
            )
            .await;
            assert_eq!(parent["depth"], depth);
        }

        let response = app
            .server
            .post("/comments")
            .authorization_bearer(&token)
            .json(&json!({ "content": "c6", "postId": "p1", "parentId": parent["id"] }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["message"],
            "Maximum comment depth exceeded"
        );
        Ok(())
    }

    #[tokio::test]
    async fn lists_nested_pages_without_authentication() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;

        let a = create(&app, &token, json!({ "content": "a", "postId": "p1" })).await;
        create(&app, &token, json!({ "content": "b", "postId": "p1" })).await;
        create(
            &app,
            &token,
            json!({ "content": "a1", "postId": "p1", "parentId": a["id"] }),
        )
        .await;
        create(&app, &token, json!({ "content": "other", "postId": "p2" })).await;

        let response = app
            .server
            .get("/comments")
            .add_query_param("postId", "p1")
            .await;
        response.assert_status_ok();

        let page = response.json::<Value>();
        assert_eq!(
            page["pagination"],
            json!({ "current": 1, "pages": 1, "total": 3, "limit": 50 })
        );

        let roots = page["comments"].as_array().cloned().unwrap_or_default();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0]["content"], "a");
        assert_eq!(roots[0]["replies"][0]["content"], "a1");
        assert_eq!(roots[1]["content"], "b");
        assert_eq!(roots[1]["replies"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn list_validates_the_query() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        app.server.get("/comments").await.assert_status_bad_request();

        for (name, value) in [("page", "0"), ("limit", "0"), ("limit", "101"), ("page", "x")] {
            let response = app
                .server
                .get("/comments")
                .add_query_param("postId", "p1")
                .add_query_param(name, value)
                .await;
            response.assert_status_bad_request();
        }
        Ok(())
    }

    #[tokio::test]
    async fn only_the_author_or_an_admin_may_edit() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let author = app.token("u1")?;
        let comment = create(&app, &author, json!({ "content": "hi", "postId": "p1" })).await;
        let path = format!("/comments/{}", comment["id"].as_str().unwrap_or_default());

        let response = app
            .server
            .put(&path)
            .authorization_bearer(app.token("u2")?)
            .json(&json!({ "content": "hijacked" }))
            .await;
        response.assert_status_forbidden();
        assert_eq!(
            response.json::<Value>()["message"],
            "You can only edit your own comments"
        );

        let response = app
            .server
            .put(&path)
            .authorization_bearer(&author)
            .json(&json!({ "content": "edited" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["content"], "edited");

        let response = app
            .server
            .put(&path)
            .authorization_bearer(app.admin_token("moderator")?)
            .json(&json!({ "content": "moderated" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["content"], "moderated");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_comments_are_not_found() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;
        let path = format!("/comments/{}", uuid::Uuid::now_v7());

        let response = app
            .server
            .put(&path)
            .authorization_bearer(&token)
            .json(&json!({ "content": "edit" }))
            .await;
        response.assert_status_not_found();

        app.server
            .delete(&path)
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();

        app.server
            .post(&format!("{path}/like"))
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();

        app.server
            .delete("/comments/not-a-uuid")
            .authorization_bearer(&token)
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn delete_tombstones_and_hides_the_comment() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let token = app.token("u1")?;
        let root = create(&app, &token, json!({ "content": "root", "postId": "p1" })).await;
        let reply = create(
            &app,
            &token,
            json!({ "content": "reply", "postId": "p1", "parentId": root["id"] }),
        )
        .await;
        let path = format!("/comments/{}", root["id"].as_str().unwrap_or_default());

        let response = app.server.delete(&path).authorization_bearer(&token).await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "Comment deleted successfully" })
        );

        let response = app.server.delete(&path).authorization_bearer(&token).await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["message"],
            "Comment has already been deleted"
        );

        let page = app
            .server
            .get("/comments")
            .add_query_param("postId", "p1")
            .await
            .json::<Value>();
        assert_eq!(page["pagination"]["total"], 1);
        assert_eq!(page["comments"][0]["id"], reply["id"]);

        app.comments.flush_counter_updates().await;
        assert_eq!(app.posts.net_count("p1"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn like_toggles_per_caller() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        let comment = create(
            &app,
            &app.token("u1")?,
            json!({ "content": "hi", "postId": "p1" }),
        )
        .await;
        let path = format!("/comments/{}/like", comment["id"].as_str().unwrap_or_default());

        let liked = app
            .server
            .post(&path)
            .authorization_bearer(app.token("u2")?)
            .await;
        liked.assert_status_ok();
        assert_eq!(liked.json::<Value>(), json!({ "liked": true, "likeCount": 1 }));

        let liked = app
            .server
            .post(&path)
            .authorization_bearer(app.token("u3")?)
            .await;
        assert_eq!(liked.json::<Value>(), json!({ "liked": true, "likeCount": 2 }));

        let unliked = app
            .server
            .post(&path)
            .authorization_bearer(app.token("u2")?)
            .await;
        assert_eq!(unliked.json::<Value>(), json!({ "liked": false, "likeCount": 1 }));
        Ok(())
    }
}
