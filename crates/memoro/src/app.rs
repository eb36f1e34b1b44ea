//! Composition root and memo write path.

use std::sync::Arc;

use tracing::warn;

use memoro_accounts::AccountService;
use memoro_backup::BackupManager;
use memoro_config::ConfigStore;
use memoro_llm::{CategorySuggester, ChatClient, ChatConfig};
use memoro_query::QueryComposer;
use memoro_store::MemoStore;
use memoro_types::{CategorySuggestion, DEFAULT_CATEGORY, Memo, Priority, now};

use crate::error::{AppError, Result};
use crate::paths::AppPaths;

/// Input for creating a memo.
#[derive(Debug, Clone)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    pub category: String,
    pub priority: Priority,
}

impl MemoDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image_path: None,
            category: DEFAULT_CATEGORY.to_string(),
            priority: Priority::Normal,
        }
    }

    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Owns the store and every service built on top of it.
///
/// Construct one per process and pass references down; nothing in the
/// system reaches for a global.
pub struct App {
    store: Arc<MemoStore>,
    config: Arc<ConfigStore>,
    suggester: CategorySuggester,
    accounts: AccountService,
    backups: BackupManager,
}

impl App {
    /// Wire up all services under the given data directory.
    pub fn new(paths: AppPaths) -> Result<Self> {
        let store = Arc::new(MemoStore::open(paths.db_path())?);
        let config = Arc::new(ConfigStore::new(paths.config_path()));

        let client = ChatClient::new(ChatConfig::default())?;
        let model = client.model().to_string();
        let suggester = CategorySuggester::new(Arc::new(client), config.clone(), model);

        let accounts = AccountService::new(store.clone());
        let backups = BackupManager::new(store.clone(), paths.backup_dir());

        Ok(Self {
            store,
            config,
            suggester,
            accounts,
            backups,
        })
    }

    pub fn store(&self) -> &Arc<MemoStore> {
        &self.store
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub fn suggester(&self) -> &CategorySuggester {
        &self.suggester
    }

    /// Build a live query composer over the shared store.
    ///
    /// Must be called from within a tokio runtime. The caller owns the
    /// composer and should close it on screen teardown.
    pub fn composer(&self) -> QueryComposer {
        QueryComposer::new(self.store.clone())
    }

    /// Validate and persist a new memo, returning its id.
    pub fn create_memo(&self, draft: &MemoDraft) -> Result<i64> {
        let memo = self.memo_from_draft(draft)?;
        Ok(self.store.insert_memo(&memo)?)
    }

    /// Persist a new memo, asking the AI adapter for a category first when
    /// the draft has none.
    ///
    /// Any suggestion failure falls back to the draft's own category; a
    /// memo is always created.
    pub async fn create_memo_with_suggested_category(&self, draft: &MemoDraft) -> Result<i64> {
        let mut memo = self.memo_from_draft(draft)?;

        if memo.category == DEFAULT_CATEGORY || memo.category.trim().is_empty() {
            match self.suggester.suggest(&memo.title, &memo.content).await {
                Ok(suggestion) => memo.category = suggestion.category,
                Err(e) => warn!("Category suggestion failed, keeping draft category: {e}"),
            }
        }

        Ok(self.store.insert_memo(&memo)?)
    }

    /// Ask the AI adapter for a category suggestion.
    pub async fn suggest_category(
        &self,
        title: &str,
        content: &str,
    ) -> Result<CategorySuggestion> {
        Ok(self.suggester.suggest(title, content).await?)
    }

    /// Update a memo, bumping its modified date. Returns the stored value.
    pub fn update_memo(&self, mut memo: Memo) -> Result<Memo> {
        if memo.title.trim().is_empty() {
            return Err(AppError::EmptyTitle);
        }
        memo.modified_date = now();
        self.store.update_memo(&memo)?;
        Ok(memo)
    }

    pub fn delete_memo(&self, memo: &Memo) -> Result<bool> {
        Ok(self.store.delete_memo(memo)?)
    }

    pub fn delete_memo_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.store.delete_memo_by_id(id)?)
    }

    pub fn get_memo(&self, id: i64) -> Result<Option<Memo>> {
        Ok(self.store.get_memo(id)?)
    }

    fn memo_from_draft(&self, draft: &MemoDraft) -> Result<Memo> {
        if draft.title.trim().is_empty() {
            return Err(AppError::EmptyTitle);
        }

        let mut memo = Memo::new(draft.title.clone(), draft.content.clone())
            .with_priority(draft.priority);
        memo.image_path = draft.image_path.clone();
        memo.category = if draft.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            draft.category.clone()
        };
        Ok(memo)
    }
}
