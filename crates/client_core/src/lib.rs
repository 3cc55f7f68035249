pub mod config;
pub mod form;
pub mod list_view;
pub mod store;
pub mod surface;

pub use config::{load_config, ClientConfig};
pub use form::{EditorMode, FormSnapshot, GestureFormController, Key, SubmitOutcome, TestRun};
pub use list_view::{DeleteOutcome, GestureListView, GestureRow, RenderedList};
pub use store::{GestureStore, HttpGestureStore, TestOutcome};
pub use surface::{
    ActionEditor, BufferEditor, ConfirmGate, FormField, HandlerRegistry, Notifier, Severity,
    Surfaces,
};

use std::sync::Arc;

/// Store, list and form wired together the way a page hosts them.
pub struct GesturePanel {
    pub store: Arc<dyn GestureStore>,
    pub list: Arc<GestureListView>,
    pub form: GestureFormController,
}

impl GesturePanel {
    pub fn new(
        store: Arc<dyn GestureStore>,
        surfaces: Surfaces,
        handlers: HandlerRegistry,
    ) -> Self {
        let list = GestureListView::new(
            store.clone(),
            surfaces.notifier.clone(),
            surfaces.confirm.clone(),
        );
        let form = GestureFormController::new(store.clone(), list.clone(), surfaces, handlers);
        Self { store, list, form }
    }

    pub fn over_http(config: ClientConfig, surfaces: Surfaces, handlers: HandlerRegistry) -> Self {
        Self::new(Arc::new(HttpGestureStore::new(config)), surfaces, handlers)
    }

    pub async fn edit(&self, name: &str) -> bool {
        self.list.edit(name, &self.form).await
    }

    pub async fn rename(&self, name: &str) -> bool {
        self.list.rename(name, &self.form).await
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
