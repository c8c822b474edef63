//! Logbook view state: the boundary between user input and the filter.
//!
//! The view holds the active category and query, exposes the filtered
//! sequence, and stamps each input with a revision. Results computed off the
//! input path (debounced or otherwise deferred) come back as
//! [`FilterSnapshot`]s; [`LogbookView::publish`] drops any snapshot older than
//! the one already on screen, so the latest input always wins.

use crate::catalog::{CatalogStore, CategoryRegistry, CategorySelector, SpeciesId, SpeciesRecord};
use crate::filter::filter_species;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogbookError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Result of one filter pass, tagged with the input revision it was computed for.
pub struct FilterSnapshot {
    pub revision: u64,
    pub selector: CategorySelector,
    pub query: String,
    pub ids: Vec<SpeciesId>,
}

/// Interactive filter state over an immutable catalog.
pub struct LogbookView<'a> {
    store: &'a CatalogStore,
    registry: &'a CategoryRegistry,
    selector: CategorySelector,
    query: String,
    revision: u64,
    published: Option<FilterSnapshot>,
}

impl<'a> LogbookView<'a> {
    pub fn new(store: &'a CatalogStore, registry: &'a CategoryRegistry) -> Self {
        Self {
            store,
            registry,
            selector: CategorySelector::All,
            query: String::new(),
            revision: 0,
            published: None,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.registry
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Select a category. Only the sentinel and registry ids are accepted here;
    /// the filter itself tolerates anything.
    pub fn set_category(&mut self, selector: CategorySelector) -> Result<(), LogbookError> {
        if !self.registry.accepts(&selector) {
            return Err(LogbookError::UnknownCategory(selector.as_str().to_string()));
        }
        self.selector = selector;
        self.bump();
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.bump();
    }

    /// Reset to "all" with an empty query.
    pub fn clear_filters(&mut self) {
        self.selector = CategorySelector::All;
        self.query.clear();
        self.bump();
    }

    /// Filtered records for the current inputs, in catalog order.
    pub fn filtered(&self) -> Vec<&'a SpeciesRecord> {
        filter_species(self.store.all(), &self.selector, Some(self.query.as_str()))
    }

    pub fn is_filtered(&self) -> bool {
        !self.selector.is_all() || !self.query.is_empty()
    }

    /// "Showing N of M species" for what [`visible`](Self::visible) returns.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} species",
            self.visible().len(),
            self.store.len()
        )
    }

    /// Compute a result for the current revision.
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            revision: self.revision,
            selector: self.selector.clone(),
            query: self.query.clone(),
            ids: self.filtered().iter().map(|r| r.id.clone()).collect(),
        }
    }

    /// Install a computed result unless something newer is already shown.
    ///
    /// Returns whether the snapshot was accepted.
    pub fn publish(&mut self, snapshot: FilterSnapshot) -> bool {
        if let Some(current) = &self.published {
            if snapshot.revision < current.revision {
                debug!(
                    stale = snapshot.revision,
                    shown = current.revision,
                    "dropping stale filter result"
                );
                return false;
            }
        }
        self.published = Some(snapshot);
        true
    }

    /// The most recently published result, resolved back to records.
    pub fn displayed(&self) -> Option<Vec<&'a SpeciesRecord>> {
        let store = self.store;
        self.published.as_ref().map(|snapshot| {
            snapshot
                .ids
                .iter()
                .filter_map(|id| store.find_by_id(id))
                .collect()
        })
    }

    /// Records to put on screen: the published result once there is one,
    /// otherwise a fresh pass over the current inputs.
    pub fn visible(&self) -> Vec<&'a SpeciesRecord> {
        self.displayed().unwrap_or_else(|| self.filtered())
    }

    fn bump(&mut self) {
        self.revision += 1;
        debug!(
            revision = self.revision,
            category = %self.selector,
            query = %self.query,
            "logbook input changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> CatalogStore {
        let records: Vec<SpeciesRecord> = serde_json::from_value(json!([
            {"id": "1", "name": "Paramecium Caudatum", "category": "protozoa"},
            {"id": "2", "name": "Amanita Muscaria", "category": "fungi"},
            {"id": "3", "name": "Chlorella Vulgaris", "category": "algae",
             "description": "Single-celled green alga"}
        ]))
        .unwrap();
        CatalogStore::from_records(records).unwrap()
    }

    fn names(records: &[&SpeciesRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn starts_unfiltered() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let view = LogbookView::new(&store, &registry);
        assert!(!view.is_filtered());
        assert_eq!(view.filtered().len(), 3);
        assert_eq!(view.summary(), "Showing 3 of 3 species");
    }

    #[test]
    fn setters_drive_the_filter() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let mut view = LogbookView::new(&store, &registry);

        view.set_category("fungi".into()).unwrap();
        assert_eq!(names(&view.filtered()), vec!["Amanita Muscaria"]);

        view.set_category(CategorySelector::All).unwrap();
        view.set_query("GREEN");
        assert_eq!(names(&view.filtered()), vec!["Chlorella Vulgaris"]);
        assert_eq!(view.summary(), "Showing 1 of 3 species");

        view.clear_filters();
        assert_eq!(view.filtered().len(), 3);
        assert_eq!(view.revision(), 4);
    }

    #[test]
    fn set_category_rejects_unregistered_ids() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let mut view = LogbookView::new(&store, &registry);
        let err = view.set_category("archaea".into()).unwrap_err();
        assert_eq!(err, LogbookError::UnknownCategory("archaea".into()));
        assert!(view.selector().is_all());
        assert_eq!(view.revision(), 0);
    }

    #[test]
    fn stale_snapshots_never_overwrite_newer_results() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let mut view = LogbookView::new(&store, &registry);

        view.set_query("a");
        let stale = view.snapshot();
        view.set_query("amanita");
        let fresh = view.snapshot();

        assert!(view.publish(fresh.clone()));
        assert!(!view.publish(stale));
        assert_eq!(
            names(&view.displayed().unwrap()),
            vec!["Amanita Muscaria"]
        );
        assert!(view.publish(fresh));
    }

    #[test]
    fn nothing_displayed_before_first_publish() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let view = LogbookView::new(&store, &registry);
        assert!(view.displayed().is_none());
        assert_eq!(view.visible(), view.filtered());
    }

    #[test]
    fn visible_keeps_the_published_result_until_a_newer_one_lands() {
        let store = store();
        let registry = CategoryRegistry::shipped();
        let mut view = LogbookView::new(&store, &registry);

        view.set_query("amanita");
        let shown = view.snapshot();
        view.set_query("");
        let pending = view.snapshot();
        assert!(view.publish(shown.clone()));

        assert_eq!(names(&view.visible()), vec!["Amanita Muscaria"]);
        assert_eq!(view.summary(), "Showing 1 of 3 species");

        assert!(view.publish(pending));
        assert!(!view.publish(shown));
        assert_eq!(view.visible().len(), 3);
        assert_eq!(view.summary(), "Showing 3 of 3 species");
    }
}
