use std::sync::Arc;

use shared::{
    domain::{Gesture, GestureCollection},
    error::GestureError,
};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::{
    form::GestureFormController,
    store::GestureStore,
    surface::{ConfirmGate, Notifier, Severity},
};

pub const EMPTY_PLACEHOLDER: &str =
    "No gestures yet. Click \"Add gesture\" to create the first one.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureRow {
    pub name: String,
    pub directions: String,
}

/// What the host should currently display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedList {
    Placeholder(&'static str),
    Rows(Vec<GestureRow>),
}

impl RenderedList {
    fn from_collection(collection: &GestureCollection) -> Self {
        if collection.is_empty() {
            return RenderedList::Placeholder(EMPTY_PLACEHOLDER);
        }
        RenderedList::Rows(
            collection
                .iter()
                .map(|g| GestureRow {
                    name: g.name.clone(),
                    directions: g.directions.clone(),
                })
                .collect(),
        )
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            RenderedList::Placeholder(_) => Vec::new(),
            RenderedList::Rows(rows) => rows.iter().map(|r| r.name.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct GestureListView {
    store: Arc<dyn GestureStore>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmGate>,
    collection: RwLock<GestureCollection>,
    rendered: watch::Sender<RenderedList>,
}

impl GestureListView {
    pub fn new(
        store: Arc<dyn GestureStore>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Arc<Self> {
        let (rendered, _) = watch::channel(RenderedList::Placeholder(EMPTY_PLACEHOLDER));
        Arc::new(Self {
            store,
            notifier,
            confirm,
            collection: RwLock::new(GestureCollection::default()),
            rendered,
        })
    }

    /// Receives every re-render.
    pub fn subscribe(&self) -> watch::Receiver<RenderedList> {
        self.rendered.subscribe()
    }

    pub fn rendered(&self) -> RenderedList {
        self.rendered.borrow().clone()
    }

    pub async fn collection(&self) -> GestureCollection {
        self.collection.read().await.clone()
    }

    pub async fn gesture(&self, name: &str) -> Option<Gesture> {
        self.collection.read().await.get(name).cloned()
    }

    /// Replaces the displayed set wholesale.
    pub async fn render(&self, gestures: Vec<Gesture>) {
        let collection = GestureCollection::new(gestures);
        let rendered = RenderedList::from_collection(&collection);
        *self.collection.write().await = collection;
        self.rendered.send_replace(rendered);
    }

    /// Re-fetches the collection from the store. On failure the previous snapshot
    /// stays on screen.
    pub async fn refresh(&self) -> Result<(), GestureError> {
        match self.store.list().await {
            Ok(gestures) => {
                debug!(count = gestures.len(), "list: re-rendering");
                self.render(gestures).await;
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .notify(&format!("Failed to load gestures: {err}"), Severity::Error);
                Err(err)
            }
        }
    }

    /// "Edit" affordance of a row.
    pub async fn edit(&self, name: &str, form: &GestureFormController) -> bool {
        match self.gesture(name).await {
            Some(gesture) => form.begin_edit(&gesture).await,
            None => {
                self.missing(name);
                false
            }
        }
    }

    /// Explicit rename path: opens the form with the name unlocked.
    pub async fn rename(&self, name: &str, form: &GestureFormController) -> bool {
        match self.gesture(name).await {
            Some(gesture) => form.begin_rename(&gesture).await,
            None => {
                self.missing(name);
                false
            }
        }
    }

    /// "Delete" affordance of a row. Nothing is sent unless the user confirms.
    pub async fn delete(&self, name: &str) -> Result<DeleteOutcome, GestureError> {
        let prompt = format!("Delete gesture \"{name}\"?");
        if !self.confirm.confirm(&prompt).await {
            debug!(name, "list: delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.store.remove(name).await {
            Ok(()) => {
                info!(name, "list: gesture deleted");
                self.notifier.notify("Gesture deleted", Severity::Success);
                // Failures are already reported by refresh.
                let _ = self.refresh().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                self.notifier.notify(&err.to_string(), Severity::Error);
                Err(err)
            }
        }
    }

    fn missing(&self, name: &str) {
        self.notifier.notify(
            &format!("Gesture \"{name}\" is no longer listed"),
            Severity::Warning,
        );
    }
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
