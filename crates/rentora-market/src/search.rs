//! Search history service — keyword counters and popularity.

use rentora_core::error::RentoraResult;
use rentora_core::models::search_history::{PopularSearch, SearchHistory};
use rentora_core::models::user::{Role, User};
use rentora_core::repository::SearchHistoryRepository;

pub struct SearchService<S: SearchHistoryRepository> {
    history: S,
}

impl<S: SearchHistoryRepository> SearchService<S> {
    pub fn new(history: S) -> Self {
        Self { history }
    }

    /// Record a search, incrementing the per-(user, keyword) counter.
    /// Blank keywords are ignored.
    pub async fn log_search(&self, actor: Option<&User>, keyword: &str) -> RentoraResult<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(());
        }
        self.history
            .record(actor.map(|u| u.id), keyword)
            .await
            .map(|_| ())
    }

    /// Most popular keywords across all users.
    pub async fn popular(&self, limit: u64) -> RentoraResult<Vec<PopularSearch>> {
        self.history.popular(limit).await
    }

    /// The caller's own search history, newest first. Only tenants keep a
    /// visible history; everyone else gets an empty list.
    pub async fn my_history(&self, actor: &User, limit: u64) -> RentoraResult<Vec<SearchHistory>> {
        if actor.role != Role::Tenant {
            return Ok(Vec::new());
        }
        self.history.list_by_user(actor.id, limit).await
    }
}
