//! Filter state machine and live result subscription.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use memoro_store::MemoStore;
use memoro_types::{ALL_CATEGORY, Memo, SortOption};

use crate::categories::build_category_list;

/// The query a given filter state resolves to.
///
/// Selection rule, first match wins. The search branches carry no sort
/// option; search results always come back newest-modification-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    SearchInCategory { category: String, query: String },
    Search { query: String },
    Category { category: String, sort: SortOption },
    All { sort: SortOption },
}

impl QueryPlan {
    /// Map a filter state to its query.
    pub fn select(search_text: &str, category_filter: &str, sort: SortOption) -> Self {
        if !search_text.is_empty() && category_filter != ALL_CATEGORY {
            QueryPlan::SearchInCategory {
                category: category_filter.to_string(),
                query: search_text.to_string(),
            }
        } else if !search_text.is_empty() {
            QueryPlan::Search {
                query: search_text.to_string(),
            }
        } else if category_filter != ALL_CATEGORY {
            QueryPlan::Category {
                category: category_filter.to_string(),
                sort,
            }
        } else {
            QueryPlan::All { sort }
        }
    }

    /// Run the query against the store.
    pub fn execute(&self, store: &MemoStore) -> memoro_store::Result<Vec<Memo>> {
        match self {
            QueryPlan::SearchInCategory { category, query } => {
                store.search_memos_by_category(category, query)
            }
            QueryPlan::Search { query } => store.search_memos(query),
            QueryPlan::Category { category, sort } => {
                store.list_memos_by_category(category, *sort)
            }
            QueryPlan::All { sort } => store.list_memos(*sort),
        }
    }
}

struct ComposerState {
    search_text: String,
    category_filter: String,
    sort: SortOption,
    /// Incremented on every recomposition; a subscription publishes only
    /// while its generation is still current.
    generation: u64,
}

/// Maintains the current filter state and one live result subscription.
///
/// Each state change atomically tears down the previous subscription task
/// and installs a new one, so the published result set always corresponds
/// to a single filter combination. Call [`QueryComposer::close`] on
/// teardown; dropping the composer also stops the subscription.
pub struct QueryComposer {
    store: Arc<MemoStore>,
    state: Arc<Mutex<ComposerState>>,
    results: watch::Sender<Vec<Memo>>,
    categories: watch::Sender<Vec<String>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl QueryComposer {
    /// Create a composer with the default state (no search, "All",
    /// modified date descending) and start its first subscription.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: Arc<MemoStore>) -> Self {
        let composer = Self {
            store,
            state: Arc::new(Mutex::new(ComposerState {
                search_text: String::new(),
                category_filter: ALL_CATEGORY.to_string(),
                sort: SortOption::default(),
                generation: 0,
            })),
            results: watch::channel(Vec::new()).0,
            categories: watch::channel(Vec::new()).0,
            task: Mutex::new(None),
        };
        composer.recompose();
        composer.refresh_categories();
        composer
    }

    /// Live result stream for the current filter combination.
    pub fn results(&self) -> watch::Receiver<Vec<Memo>> {
        self.results.subscribe()
    }

    /// Live category picker list.
    pub fn categories(&self) -> watch::Receiver<Vec<String>> {
        self.categories.subscribe()
    }

    /// Set the search text and recompose.
    pub fn set_search(&self, text: impl Into<String>) {
        self.state.lock().search_text = text.into();
        self.recompose();
    }

    /// Clear the search text and recompose.
    pub fn clear_search(&self) {
        self.set_search("");
    }

    /// Set the category filter and recompose.
    pub fn set_category(&self, category: impl Into<String>) {
        self.state.lock().category_filter = category.into();
        self.recompose();
    }

    /// Set the sort option and recompose.
    pub fn set_sort(&self, sort: SortOption) {
        self.state.lock().sort = sort;
        self.recompose();
    }

    pub fn current_category(&self) -> String {
        self.state.lock().category_filter.clone()
    }

    pub fn current_sort(&self) -> SortOption {
        self.state.lock().sort
    }

    /// The query the current state resolves to.
    pub fn current_plan(&self) -> QueryPlan {
        let state = self.state.lock();
        QueryPlan::select(&state.search_text, &state.category_filter, state.sort)
    }

    /// Recompute the category picker list from storage and publish it.
    ///
    /// The subscription loop already refreshes the list on every store
    /// change; this hook exists for callers that mutate storage through a
    /// path the composer is not watching.
    pub fn refresh_categories(&self) {
        let store = self.store.clone();
        let categories = self.categories.clone();
        tokio::spawn(async move {
            let stored = tokio::task::spawn_blocking(move || store.distinct_categories()).await;
            match stored {
                Ok(Ok(stored)) => {
                    categories.send_replace(build_category_list(&stored));
                }
                Ok(Err(e)) => warn!("Category refresh failed: {e}"),
                Err(e) => warn!("Category refresh task failed: {e}"),
            }
        });
    }

    /// Tear down the active subscription and stop publishing.
    pub fn close(&self) {
        // Invalidate the generation so an already-running query cannot
        // publish between the abort and its next generation check.
        self.state.lock().generation += 1;
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }

    /// Tear down the previous subscription and install one for the
    /// current state.
    fn recompose(&self) {
        let (plan, generation) = {
            let mut state = self.state.lock();
            state.generation += 1;
            (
                QueryPlan::select(&state.search_text, &state.category_filter, state.sort),
                state.generation,
            )
        };

        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }

        debug!(?plan, "Recomposing memo query");

        let store = self.store.clone();
        let state = self.state.clone();
        let results = self.results.clone();
        let categories = self.categories.clone();

        let handle = tokio::spawn(async move {
            // Subscribe before the first run so a write that lands while
            // the query executes still triggers a re-run.
            let mut store_changes = store.watch_changes();

            loop {
                let run_store = store.clone();
                let run_plan = plan.clone();
                let run = tokio::task::spawn_blocking(move || {
                    let memos = run_plan.execute(&run_store)?;
                    let stored = run_store.distinct_categories()?;
                    Ok::<_, memoro_store::StorageError>((memos, stored))
                });

                let (memos, stored) = match run.await {
                    Ok(Ok(output)) => output,
                    Ok(Err(e)) => {
                        warn!("Memo query failed: {e}");
                        // Keep the last published result set.
                        if store_changes.changed().await.is_err() {
                            break;
                        }
                        continue;
                    }
                    Err(e) => {
                        warn!("Memo query task failed: {e}");
                        break;
                    }
                };

                // The picker vocabulary depends only on stored data, never
                // on the filter state, so it is not generation-gated.
                categories.send_replace(build_category_list(&stored));

                {
                    let state = state.lock();
                    if state.generation != generation {
                        break;
                    }
                    results.send_replace(memos);
                }

                if store_changes.changed().await.is_err() {
                    break;
                }
            }
        });

        *self.task.lock() = Some(handle);
    }
}

impl Drop for QueryComposer {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use memoro_types::Memo;

    fn test_store() -> Arc<MemoStore> {
        Arc::new(MemoStore::open_in_memory().unwrap())
    }

    /// Poll a watch receiver until the predicate holds or time runs out.
    async fn wait_for<T: Clone>(
        rx: &mut watch::Receiver<T>,
        predicate: impl Fn(&T) -> bool,
    ) -> T {
        let deadline = Duration::from_secs(2);
        let result = tokio::time::timeout(deadline, async {
            loop {
                {
                    let value = rx.borrow();
                    if predicate(&value) {
                        return value.clone();
                    }
                }
                if rx.changed().await.is_err() {
                    panic!("watch sender dropped before condition held");
                }
            }
        })
        .await;
        result.expect("condition not reached in time")
    }

    #[test]
    fn plan_selection_table() {
        let sort = SortOption::TitleAsc;

        assert_eq!(
            QueryPlan::select("trip", "Travel", sort),
            QueryPlan::SearchInCategory {
                category: "Travel".into(),
                query: "trip".into()
            }
        );
        assert_eq!(
            QueryPlan::select("trip", ALL_CATEGORY, sort),
            QueryPlan::Search {
                query: "trip".into()
            }
        );
        assert_eq!(
            QueryPlan::select("", "Travel", sort),
            QueryPlan::Category {
                category: "Travel".into(),
                sort
            }
        );
        assert_eq!(QueryPlan::select("", ALL_CATEGORY, sort), QueryPlan::All { sort });
    }

    #[test]
    fn search_plans_carry_no_sort() {
        // The search branches ignore the chosen sort entirely; changing it
        // produces the identical plan.
        let a = QueryPlan::select("x", ALL_CATEGORY, SortOption::TitleAsc);
        let b = QueryPlan::select("x", ALL_CATEGORY, SortOption::PriorityDesc);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn results_follow_store_changes() {
        let store = test_store();
        let composer = QueryComposer::new(store.clone());
        let mut rx = composer.results();

        store.insert_memo(&Memo::new("first", "")).unwrap();
        let memos = wait_for(&mut rx, |m| m.len() == 1).await;
        assert_eq!(memos[0].title, "first");

        store.insert_memo(&Memo::new("second", "")).unwrap();
        wait_for(&mut rx, |m| m.len() == 2).await;
    }

    #[tokio::test]
    async fn category_filter_narrows_results() {
        let store = test_store();
        store
            .insert_memo(&Memo::new("w", "").with_category("Work"))
            .unwrap();
        store
            .insert_memo(&Memo::new("l", "").with_category("Life"))
            .unwrap();

        let composer = QueryComposer::new(store.clone());
        let mut rx = composer.results();
        wait_for(&mut rx, |m| m.len() == 2).await;

        composer.set_category("Work");
        let memos = wait_for(&mut rx, |m| m.len() == 1).await;
        assert_eq!(memos[0].title, "w");

        composer.set_category(ALL_CATEGORY);
        wait_for(&mut rx, |m| m.len() == 2).await;
    }

    #[tokio::test]
    async fn search_and_category_combine() {
        let store = test_store();
        store
            .insert_memo(&Memo::new("Trip to Oslo", "").with_category("Travel"))
            .unwrap();
        store
            .insert_memo(&Memo::new("Trip budget", "").with_category("Finance"))
            .unwrap();

        let composer = QueryComposer::new(store.clone());
        composer.set_category("Travel");
        composer.set_search("trip");

        assert_eq!(
            composer.current_plan(),
            QueryPlan::SearchInCategory {
                category: "Travel".into(),
                query: "trip".into()
            }
        );

        let mut rx = composer.results();
        let memos = wait_for(&mut rx, |m| m.len() == 1).await;
        assert_eq!(memos[0].title, "Trip to Oslo");
    }

    #[tokio::test]
    async fn superseded_filters_never_surface() {
        let store = test_store();
        for i in 0..20 {
            store
                .insert_memo(&Memo::new(format!("work {i}"), "").with_category("Work"))
                .unwrap();
        }
        store
            .insert_memo(&Memo::new("lone life memo", "").with_category("Life"))
            .unwrap();

        let composer = QueryComposer::new(store.clone());
        // Rapid-fire state changes; only the last combination may win.
        composer.set_category("Work");
        composer.set_search("work");
        composer.set_category("Life");
        composer.set_search("lone");

        let mut rx = composer.results();
        let memos = wait_for(&mut rx, |m| {
            m.len() == 1 && m[0].category == "Life"
        })
        .await;
        assert_eq!(memos[0].title, "lone life memo");

        // And it stays that way across a subsequent store change.
        store
            .insert_memo(&Memo::new("another work", "").with_category("Work"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn sort_applies_to_unfiltered_list() {
        let store = test_store();
        store.insert_memo(&Memo::new("banana", "")).unwrap();
        store.insert_memo(&Memo::new("apple", "")).unwrap();

        let composer = QueryComposer::new(store.clone());
        composer.set_sort(SortOption::TitleAsc);

        let mut rx = composer.results();
        let memos = wait_for(&mut rx, |m| {
            m.len() == 2 && m[0].title == "apple"
        })
        .await;
        assert_eq!(memos[1].title, "banana");
    }

    #[tokio::test]
    async fn categories_publish_on_refresh() {
        let store = test_store();
        store
            .insert_memo(&Memo::new("z", "").with_category("Zoo"))
            .unwrap();

        let composer = QueryComposer::new(store.clone());
        let mut rx = composer.categories();
        let list = wait_for(&mut rx, |c| !c.is_empty()).await;

        assert_eq!(list[0], "All");
        assert!(list.contains(&"Zoo".to_string()));
        assert!(list.contains(&"Default".to_string()));
    }

    #[tokio::test]
    async fn vocabulary_follows_memo_writes() {
        let store = test_store();
        let composer = QueryComposer::new(store.clone());
        let mut rx = composer.categories();
        wait_for(&mut rx, |c| !c.is_empty()).await;

        store
            .insert_memo(&Memo::new("q", "").with_category("Quests"))
            .unwrap();
        wait_for(&mut rx, |c| c.contains(&"Quests".to_string())).await;
    }

    #[tokio::test]
    async fn closed_composer_stops_publishing() {
        let store = test_store();
        let composer = QueryComposer::new(store.clone());
        let mut rx = composer.results();

        store.insert_memo(&Memo::new("first", "")).unwrap();
        wait_for(&mut rx, |m| m.len() == 1).await;

        composer.close();
        store.insert_memo(&Memo::new("second", "")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.borrow().len(), 1);
    }
}
