//! Comment service orchestrating the store, the post service and the
//! reply tree.

use threadline_postgres::model::{Comment, NewComment};
use threadline_postgres::query::LikeToggle;
use threadline_postgres::types::OffsetPagination;
use threadline_postgres::types::constants::comment::{MAX_CONTENT_LENGTH, MAX_DEPTH};
use threadline_upstream::{CommentCountUpdate, PostProvider, PostService, ServiceHealth};
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use super::{CommentNode, CommentStore, CommentStoreHandle, build_tree};
use crate::service::Identity;
use crate::utility::tracing_targets::{
    TRACING_TARGET_AUTHORIZATION, TRACING_TARGET_COMMENTS, TRACING_TARGET_COUNTER,
};
use crate::{Error, Result};

/// One page of a post's comments nested into reply trees.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    /// Root nodes of the page.
    pub nodes: Vec<CommentNode>,
    /// Current page, 1-based.
    pub page: i64,
    /// Total number of pages.
    pub pages: i64,
    /// Number of active comments of the post across all pages.
    pub total: i64,
    /// Page size.
    pub limit: i64,
}

/// Create, list, update, delete and like comments.
///
/// Post comment counters are adjusted in background tasks after a comment
/// is created or deleted; their outcome never affects the operation result.
#[derive(Debug, Clone)]
pub struct CommentService {
    store: CommentStoreHandle,
    posts: PostService,
    counter_tasks: TaskTracker,
}

impl CommentService {
    /// Creates a service over `store`, verifying posts with `posts`.
    pub fn new(store: CommentStoreHandle, posts: PostService) -> Self {
        Self {
            store,
            posts,
            counter_tasks: TaskTracker::new(),
        }
    }

    /// Creates a comment on `post_id`, or a reply to `parent_id`.
    #[tracing::instrument(skip_all, fields(post_id = %post_id, author_id = %caller.id))]
    pub async fn create(
        &self,
        caller: &Identity,
        post_id: &str,
        content: String,
        parent_id: Option<Uuid>,
    ) -> Result<Comment> {
        check_content(&content)?;
        if post_id.trim().is_empty() {
            return Err(Error::invalid_argument("Post id is required"));
        }

        if let Err(error) = self.posts.verify_post(post_id).await {
            tracing::debug!(
                target: TRACING_TARGET_COMMENTS,
                error = %error,
                "Post could not be verified"
            );
            return Err(Error::not_found("post").with_source(error));
        }

        let mut new_comment = NewComment::for_post(post_id, caller.id.as_str(), content)
            .with_author_name(caller.name.clone())
            .with_author_avatar(caller.avatar.clone());

        if let Some(parent_id) = parent_id {
            let parent = self
                .store
                .find(parent_id)
                .await?
                .ok_or_else(|| Error::not_found("parent comment"))?;

            if parent.post_id != post_id {
                return Err(Error::invalid_argument(
                    "Parent comment belongs to a different post",
                ));
            }

            if !parent.accepts_replies() {
                tracing::debug!(
                    target: TRACING_TARGET_COMMENTS,
                    parent_id = %parent.id,
                    parent_depth = parent.depth,
                    max_depth = MAX_DEPTH,
                    "Reply rejected"
                );
                return Err(Error::invalid_argument("Maximum comment depth exceeded"));
            }

            new_comment = new_comment.with_parent(&parent);
        }

        let comment = self.store.create(new_comment).await?;
        self.spawn_counter_update(CommentCountUpdate::increment(post_id));

        tracing::info!(
            target: TRACING_TARGET_COMMENTS,
            comment_id = %comment.id,
            depth = comment.depth,
            "Comment created"
        );

        Ok(comment)
    }

    /// Lists one page of active comments of `post_id` as reply trees.
    ///
    /// Replies whose parent falls on another page are rendered as roots.
    #[tracing::instrument(skip_all, fields(post_id = %post_id, page = page, limit = limit))]
    pub async fn list(&self, post_id: &str, page: i64, limit: i64) -> Result<CommentThread> {
        let page = page.max(1);
        let pagination = OffsetPagination::from_page(page, limit);
        let comments = self.store.list_active(post_id, pagination).await?;

        let total = comments
            .total
            .unwrap_or_else(|| i64::try_from(comments.items.len()).unwrap_or(i64::MAX));
        let pages = comments.total_pages(&pagination).unwrap_or(0);

        tracing::debug!(
            target: TRACING_TARGET_COMMENTS,
            count = comments.items.len(),
            total,
            "Comments listed"
        );

        Ok(CommentThread {
            nodes: build_tree(comments.items),
            page,
            pages,
            total,
            limit: pagination.limit,
        })
    }

    /// Replaces the content of a comment owned by the caller.
    #[tracing::instrument(skip_all, fields(comment_id = %comment_id, caller_id = %caller.id))]
    pub async fn update(
        &self,
        caller: &Identity,
        comment_id: Uuid,
        content: String,
    ) -> Result<Comment> {
        check_content(&content)?;

        let comment = self.find_modifiable(caller, comment_id, "edit").await?;
        if comment.is_deleted() {
            return Err(Error::invalid_argument("Comment has been deleted"));
        }

        let comment = self
            .store
            .update_content(comment_id, content)
            .await?
            .ok_or_else(|| Error::invalid_argument("Comment has been deleted"))?;

        tracing::info!(target: TRACING_TARGET_COMMENTS, "Comment updated");
        Ok(comment)
    }

    /// Soft-deletes a comment owned by the caller.
    ///
    /// Replies are kept and still point at the deleted comment.
    #[tracing::instrument(skip_all, fields(comment_id = %comment_id, caller_id = %caller.id))]
    pub async fn delete(&self, caller: &Identity, comment_id: Uuid) -> Result<Comment> {
        let comment = self.find_modifiable(caller, comment_id, "delete").await?;
        if comment.is_deleted() {
            return Err(Error::invalid_argument("Comment has already been deleted"));
        }

        // A concurrent delete wins the row; only one of them decrements.
        let comment = self
            .store
            .soft_delete(comment_id)
            .await?
            .ok_or_else(|| Error::invalid_argument("Comment has already been deleted"))?;

        self.spawn_counter_update(CommentCountUpdate::decrement(comment.post_id.as_str()));

        tracing::info!(
            target: TRACING_TARGET_COMMENTS,
            post_id = %comment.post_id,
            "Comment deleted"
        );

        Ok(comment)
    }

    /// Likes the comment for the caller, or removes an existing like.
    #[tracing::instrument(skip_all, fields(comment_id = %comment_id, caller_id = %caller.id))]
    pub async fn toggle_like(&self, caller: &Identity, comment_id: Uuid) -> Result<LikeToggle> {
        let comment = self
            .store
            .find(comment_id)
            .await?
            .ok_or_else(|| Error::not_found("comment"))?;

        if comment.is_deleted() {
            return Err(Error::invalid_argument("Comment has been deleted"));
        }

        let toggle = self
            .store
            .toggle_like(comment_id, &caller.id)
            .await?
            .ok_or_else(|| Error::invalid_argument("Comment has been deleted"))?;

        tracing::debug!(
            target: TRACING_TARGET_COMMENTS,
            liked = toggle.liked,
            like_count = toggle.comment.like_count,
            "Comment like toggled"
        );

        Ok(toggle)
    }

    /// Checks that the comment store can serve requests.
    pub async fn check_store(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Reports whether the post service answers its health endpoint.
    pub async fn check_post_service(&self) -> ServiceHealth {
        self.posts
            .health_check()
            .await
            .unwrap_or_else(|error| ServiceHealth::unhealthy(error.to_string()))
    }

    /// Waits for every counter update spawned so far to finish.
    pub async fn flush_counter_updates(&self) {
        self.counter_tasks.close();
        self.counter_tasks.wait().await;
        self.counter_tasks.reopen();
    }

    async fn find_modifiable(
        &self,
        caller: &Identity,
        comment_id: Uuid,
        action: &'static str,
    ) -> Result<Comment> {
        let comment = self
            .store
            .find(comment_id)
            .await?
            .ok_or_else(|| Error::not_found("comment"))?;

        if !caller.can_modify(&comment) {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                comment_id = %comment.id,
                author_id = %comment.author_id,
                caller_id = %caller.id,
                action,
                "Comment modification denied"
            );
            return Err(Error::forbidden(format!(
                "You can only {action} your own comments"
            ))
            .with_resource("comment"));
        }

        Ok(comment)
    }

    fn spawn_counter_update(&self, update: CommentCountUpdate) {
        let posts = self.posts.clone();
        self.counter_tasks.spawn(async move {
            if let Err(error) = posts.adjust_comment_count(&update).await {
                tracing::warn!(
                    target: TRACING_TARGET_COUNTER,
                    post_id = %update.post_id,
                    increment = update.increment,
                    retryable = error.is_retryable(),
                    error = %error,
                    "Failed to update post comment count"
                );
            }
        });
    }
}

fn check_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::invalid_argument("Comment content is required"));
    }

    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(Error::invalid_argument(format!(
            "Comment content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use threadline_upstream::mock::MockProvider;

    use super::*;
    use crate::ErrorKind;
    use crate::service::Role;
    use crate::service::comments::MemoryCommentStore;

    struct Fixture {
        service: CommentService,
        store: MemoryCommentStore,
        posts: MockProvider,
    }

    fn fixture() -> Fixture {
        let store = MemoryCommentStore::new();
        let posts = MockProvider::new().with_post("p1").with_post("p2");
        let service = CommentService::new(
            CommentStoreHandle::new(store.clone()),
            posts.clone().into_post_service(),
        );

        Fixture {
            service,
            store,
            posts,
        }
    }

    fn alice() -> Identity {
        Identity::new("alice").with_name("Alice")
    }

    fn bob() -> Identity {
        Identity::new("bob").with_name("Bob")
    }

    #[tokio::test]
    async fn reply_chain_stops_at_max_depth() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();

        let mut parent = service.create(&alice(), "p1", "root".into(), None).await?;
        assert_eq!(parent.depth, 0);

        for depth in 1..=MAX_DEPTH {
            let reply = service
                .create(&alice(), "p1", format!("reply {depth}"), Some(parent.id))
                .await?;
            assert_eq!(reply.depth, depth);
            assert_eq!(reply.parent_id, Some(parent.id));
            parent = reply;
        }

        let error = service
            .create(&alice(), "p1", "too deep".into(), Some(parent.id))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.message(), "Maximum comment depth exceeded");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_post_writes_nothing() -> anyhow::Result<()> {
        let Fixture { service, store, posts } = fixture();

        let error = service
            .create(&alice(), "missing", "hello".into(), None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.resource(), Some("post"));

        posts.set_unreachable(true);
        let error = service
            .create(&alice(), "p1", "hello".into(), None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);

        service.flush_counter_updates().await;
        assert!(store.snapshot().is_empty());
        assert!(posts.count_updates().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn parent_must_exist_in_the_same_post() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();

        let error = service
            .create(&alice(), "p1", "reply".into(), Some(Uuid::now_v7()))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), "Parent comment not found");

        let other = service.create(&alice(), "p2", "elsewhere".into(), None).await?;
        let error = service
            .create(&alice(), "p1", "reply".into(), Some(other.id))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        Ok(())
    }

    #[tokio::test]
    async fn author_snapshot_comes_from_the_caller() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();

        let comment = service.create(&alice(), "p1", "hi".into(), None).await?;
        assert_eq!(comment.author_id, "alice");
        assert_eq!(comment.author_name, "Alice");

        let anonymous = service
            .create(&Identity::new("ghost"), "p1", "boo".into(), None)
            .await?;
        assert_eq!(anonymous.author_name, "Unknown User");
        Ok(())
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let Fixture { service, .. } = fixture();

        let error = service
            .create(&alice(), "p1", "   ".into(), None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);

        let error = service
            .create(&alice(), "p1", "x".repeat(MAX_CONTENT_LENGTH + 1), None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn counters_follow_creates_and_deletes() -> anyhow::Result<()> {
        let Fixture { service, posts, .. } = fixture();

        let first = service.create(&alice(), "p1", "one".into(), None).await?;
        service.create(&alice(), "p1", "two".into(), None).await?;
        service.delete(&alice(), first.id).await?;

        service.flush_counter_updates().await;
        assert_eq!(posts.count_updates().len(), 3);
        assert_eq!(posts.net_count("p1"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn counter_failures_do_not_fail_the_write() -> anyhow::Result<()> {
        let Fixture { service, store, posts } = fixture();

        let comment = service.create(&alice(), "p1", "one".into(), None).await?;
        service.flush_counter_updates().await;
        posts.set_unreachable(true);
        let deleted = service.delete(&alice(), comment.id).await?;

        service.flush_counter_updates().await;
        assert!(deleted.is_deleted());
        assert_eq!(posts.net_count("p1"), 1);
        assert!(store.snapshot()[0].is_deleted());
        Ok(())
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_modify() -> anyhow::Result<()> {
        let Fixture { service, store, .. } = fixture();
        let comment = service.create(&alice(), "p1", "mine".into(), None).await?;

        let error = service
            .update(&bob(), comment.id, "hijacked".into())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        let error = service.delete(&bob(), comment.id).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(store.snapshot()[0].content, "mine");

        let admin = Identity::new("root").with_role(Role::Admin);
        let updated = service.update(&admin, comment.id, "moderated".into()).await?;
        assert_eq!(updated.content, "moderated");
        assert_eq!(updated.depth, comment.depth);
        Ok(())
    }

    #[tokio::test]
    async fn delete_keeps_replies_attached() -> anyhow::Result<()> {
        let Fixture { service, store, .. } = fixture();
        let root = service.create(&alice(), "p1", "root".into(), None).await?;
        let reply = service
            .create(&bob(), "p1", "reply".into(), Some(root.id))
            .await?;

        let deleted = service.delete(&alice(), root.id).await?;
        assert_eq!(deleted.content, "[deleted]");

        let stored = store.snapshot();
        let kept = stored.iter().find(|c| c.id == reply.id).expect("reply kept");
        assert_eq!(kept.parent_id, Some(root.id));
        assert!(!kept.is_deleted());

        let thread = service.list("p1", 1, 50).await?;
        assert_eq!(thread.total, 1);
        assert_eq!(thread.nodes.len(), 1);
        assert_eq!(thread.nodes[0].comment.id, reply.id);
        Ok(())
    }

    #[tokio::test]
    async fn deleted_comments_reject_mutations() -> anyhow::Result<()> {
        let Fixture { service, posts, .. } = fixture();
        let comment = service.create(&alice(), "p1", "bye".into(), None).await?;
        service.delete(&alice(), comment.id).await?;

        let error = service.delete(&alice(), comment.id).await.unwrap_err();
        assert_eq!(error.message(), "Comment has already been deleted");
        let error = service
            .update(&alice(), comment.id, "back".into())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        let error = service.toggle_like(&bob(), comment.id).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);

        service.flush_counter_updates().await;
        assert_eq!(posts.net_count("p1"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn likes_toggle_per_caller() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();
        let comment = service.create(&alice(), "p1", "like me".into(), None).await?;

        let toggle = service.toggle_like(&bob(), comment.id).await?;
        assert!(toggle.liked);
        assert_eq!(toggle.comment.like_count, 1);

        let toggle = service.toggle_like(&alice(), comment.id).await?;
        assert_eq!(toggle.comment.like_count, 2);

        let toggle = service.toggle_like(&bob(), comment.id).await?;
        assert!(!toggle.liked);
        assert_eq!(toggle.comment.like_count, 1);
        assert_eq!(toggle.comment.likes(), vec!["alice".to_owned()]);

        let error = service.toggle_like(&bob(), Uuid::now_v7()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_likes_are_never_lost() -> anyhow::Result<()> {
        const CALLERS: usize = 64;

        let Fixture { service, store, .. } = fixture();
        let comment_id = service.create(&alice(), "p1", "popular".into(), None).await?.id;

        for expect_liked in [true, false] {
            let mut toggles = tokio::task::JoinSet::new();
            for caller in 0..CALLERS {
                let service = service.clone();
                toggles.spawn(async move {
                    let caller = Identity::new(format!("user-{caller}"));
                    service.toggle_like(&caller, comment_id).await
                });
            }

            while let Some(toggle) = toggles.join_next().await {
                assert_eq!(toggle??.liked, expect_liked);
            }

            let stored = store.find(comment_id).await?.expect("comment exists");
            let expected = if expect_liked { CALLERS } else { 0 };
            assert_eq!(stored.like_count as usize, expected);
            assert_eq!(stored.likes().len(), expected);
        }
        Ok(())
    }

    #[tokio::test]
    async fn list_echoes_the_requested_page() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();
        service.create(&alice(), "p1", "only".into(), None).await?;

        let far = service.list("p1", 1_000_000_000_000_000_000, 50).await?;
        assert_eq!(far.page, 1_000_000_000_000_000_000);
        assert_eq!(far.pages, 1);
        assert_eq!(far.total, 1);
        assert!(far.nodes.is_empty());

        let below_first = service.list("p1", 0, 50).await?;
        assert_eq!(below_first.page, 1);
        assert_eq!(below_first.nodes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn list_paginates_before_building_the_tree() -> anyhow::Result<()> {
        let Fixture { service, .. } = fixture();
        let root = service.create(&alice(), "p1", "root".into(), None).await?;
        service.create(&alice(), "p1", "second".into(), None).await?;
        let reply = service
            .create(&bob(), "p1", "reply".into(), Some(root.id))
            .await?;

        let first = service.list("p1", 1, 2).await?;
        assert_eq!(first.total, 3);
        assert_eq!(first.pages, 2);
        assert_eq!(first.nodes.len(), 2);
        assert!(first.nodes[0].replies.is_empty());

        let second = service.list("p1", 2, 2).await?;
        assert_eq!(second.page, 2);
        assert_eq!(second.nodes.len(), 1);
        assert_eq!(second.nodes[0].comment.id, reply.id);

        let whole = service.list("p1", 1, 50).await?;
        assert_eq!(whole.nodes.len(), 2);
        assert_eq!(whole.nodes[0].replies[0].comment.id, reply.id);
        Ok(())
    }
}
