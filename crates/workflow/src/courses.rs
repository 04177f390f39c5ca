//! Joined-course cache with an explicit invalidation rule.
//!
//! The course picker and the search screen both read from here.  A
//! successful join patches the cached member list optimistically (so
//! the UI flips to "member" without a round trip) and marks the cache
//! stale; the next view refetches from the server, which stays the
//! source of truth.

use std::sync::Arc;

use tokio::sync::RwLock;

use notesnap_client::seams::ClassDirectory;
use notesnap_client::ApiError;
use notesnap_core::class::Class;

#[derive(Debug, Default)]
struct CacheInner {
    classes: Vec<Class>,
    loaded: bool,
    stale: bool,
}

/// Cache of the acting user's classes.
pub struct CourseCache {
    directory: Arc<dyn ClassDirectory>,
    user_id: String,
    inner: RwLock<CacheInner>,
}

impl CourseCache {
    /// A cache scoped to the session's acting user.
    pub fn new(directory: Arc<dyn ClassDirectory>, user_id: impl Into<String>) -> Self {
        Self {
            directory,
            user_id: user_id.into(),
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// The user's classes, refetching when never loaded or invalidated.
    pub async fn classes(&self) -> Result<Vec<Class>, ApiError> {
        {
            let inner = self.inner.read().await;
            if inner.loaded && !inner.stale {
                return Ok(inner.classes.clone());
            }
        }

        let fetched = self.directory.list_classes(&self.user_id).await?;
        let mut inner = self.inner.write().await;
        inner.classes = fetched.clone();
        inner.loaded = true;
        inner.stale = false;
        Ok(fetched)
    }

    /// Current cached classes without any fetch.
    ///
    /// This is what a screen renders immediately after a join, before
    /// the stale cache is refetched on its next full view.
    pub async fn peek(&self) -> Vec<Class> {
        self.inner.read().await.classes.clone()
    }

    /// Find a cached class by id, loading the cache if needed.
    pub async fn find(&self, class_id: &str) -> Result<Option<Class>, ApiError> {
        Ok(self
            .classes()
            .await?
            .into_iter()
            .find(|c| c.id == class_id))
    }

    /// Join a class as the acting user.
    ///
    /// On success the cached copy (if any) gets the user appended
    /// optimistically, and the cache is marked stale so the next view
    /// refetches instead of trusting the patch.
    pub async fn join(&self, class_id: &str) -> Result<(), ApiError> {
        self.directory.join_class(class_id, &self.user_id).await?;

        let mut inner = self.inner.write().await;
        if let Some(class) = inner.classes.iter_mut().find(|c| c.id == class_id) {
            class.record_joined(&self.user_id);
        }
        inner.stale = true;
        tracing::info!(class_id, user_id = %self.user_id, "Joined class");
        Ok(())
    }

    /// Force a refetch on the next view.
    pub async fn invalidate(&self) {
        self.inner.write().await.stale = true;
    }
}
