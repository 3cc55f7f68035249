//! The add/edit form: mode, field contents, validation, and submission.

use std::sync::Arc;

use shared::{
    direction,
    domain::{self, Gesture, GestureCollection},
    error::{GestureError, ValidationError},
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    list_view::GestureListView,
    store::GestureStore,
    surface::{ActionEditor, ConfirmGate, FormField, HandlerRegistry, Notifier, Severity, Surfaces},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Creating,
    /// `rename` is only set through [`GestureFormController::begin_rename`].
    Editing { target: String, rename: bool },
}

impl EditorMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorMode::Idle)
    }

    pub fn name_editable(&self) -> bool {
        match self {
            EditorMode::Idle => false,
            EditorMode::Creating => true,
            EditorMode::Editing { rename, .. } => *rename,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub mode: EditorMode,
    pub name: String,
    pub directions: String,
    pub name_editable: bool,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added { name: String },
    Updated { old_name: String, new_name: String },
    /// A previous submit is still waiting for the server; nothing was sent.
    Busy,
    /// The form is not open.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRun {
    Passed(Option<String>),
    Failed(Option<String>),
    Cancelled,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Add {
        name: String,
        directions: String,
        action: String,
    },
    Update {
        old_name: String,
        new_name: String,
        directions: String,
        action: String,
    },
}

struct FormState {
    mode: EditorMode,
    name: String,
    directions: String,
    submitting: bool,
    testing: bool,
    // Bumped whenever the form opens or closes. A reply that finds a different
    // generation leaves the form and the editor alone.
    generation: u64,
}

impl FormState {
    fn reset(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.name.clear();
        self.directions.clear();
        self.generation += 1;
    }
}

pub struct GestureFormController {
    store: Arc<dyn GestureStore>,
    list: Arc<GestureListView>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmGate>,
    editor: Arc<dyn ActionEditor>,
    handlers: HandlerRegistry,
    state: Mutex<FormState>,
}

impl GestureFormController {
    pub fn new(
        store: Arc<dyn GestureStore>,
        list: Arc<GestureListView>,
        surfaces: Surfaces,
        handlers: HandlerRegistry,
    ) -> Self {
        let on_action = handlers.clone();
        surfaces.editor.on_change(Arc::new(move |text: &str| {
            on_action.dispatch(FormField::Action, text);
        }));

        Self {
            store,
            list,
            notifier: surfaces.notifier,
            confirm: surfaces.confirm,
            editor: surfaces.editor,
            handlers,
            state: Mutex::new(FormState {
                mode: EditorMode::Idle,
                name: String::new(),
                directions: String::new(),
                submitting: false,
                testing: false,
                generation: 0,
            }),
        }
    }

    pub async fn mode(&self) -> EditorMode {
        self.state.lock().await.mode.clone()
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        FormSnapshot {
            mode: state.mode.clone(),
            name: state.name.clone(),
            directions: state.directions.clone(),
            name_editable: state.mode.name_editable(),
            submit_enabled: state.mode.is_open() && !state.submitting,
        }
    }

    pub async fn begin_create(&self) -> bool {
        let opened = self
            .open(EditorMode::Creating, String::new(), String::new())
            .await;
        if opened {
            self.editor.set_value("");
        }
        opened
    }

    /// Loads `gesture` with its name locked.
    pub async fn begin_edit(&self, gesture: &Gesture) -> bool {
        self.open_existing(gesture, false).await
    }

    pub async fn begin_rename(&self, gesture: &Gesture) -> bool {
        self.open_existing(gesture, true).await
    }

    async fn open_existing(&self, gesture: &Gesture, rename: bool) -> bool {
        let mode = EditorMode::Editing {
            target: gesture.name.clone(),
            rename,
        };
        let opened = self
            .open(
                mode,
                gesture.name.clone(),
                direction::normalize(&gesture.directions),
            )
            .await;
        if opened {
            self.editor.set_value(&gesture.action);
        }
        opened
    }

    /// Only an idle form can be opened.
    async fn open(&self, mode: EditorMode, name: String, directions: String) -> bool {
        let mut state = self.state.lock().await;
        if state.submitting {
            debug!("form: cannot switch mode while a submit is pending");
            return false;
        }
        if state.mode.is_open() {
            debug!(current = ?state.mode, requested = ?mode, "form: already open");
            return false;
        }
        debug!(from = ?state.mode, to = ?mode, "form: opening");
        state.reset(mode);
        state.name = name;
        state.directions = directions;
        true
    }

    /// Closes the form and discards its contents.
    pub async fn cancel(&self) {
        {
            let mut state = self.state.lock().await;
            if !state.mode.is_open() {
                return;
            }
            debug!(from = ?state.mode, "form: closing");
            state.reset(EditorMode::Idle);
        }
        self.editor.set_value("");
    }

    pub async fn handle_key(&self, key: Key) {
        if key == Key::Escape {
            self.cancel().await;
        }
    }

    /// Returns `false` when the name is locked or the form is closed.
    pub async fn set_name(&self, name: &str) -> bool {
        {
            let mut state = self.state.lock().await;
            if !state.mode.name_editable() {
                return false;
            }
            state.name = name.to_string();
        }
        self.handlers.dispatch(FormField::Name, name);
        true
    }

    pub async fn set_directions(&self, directions: &str) -> bool {
        self.update_directions(|_| directions.to_string()).await
    }

    /// Direction-pad press; accepts a compass label or a glyph.
    pub async fn append_direction(&self, token: &str) -> bool {
        self.update_directions(|current| direction::append(current, token))
            .await
    }

    pub async fn remove_last_direction(&self) -> bool {
        self.update_directions(direction::remove_last).await
    }

    pub async fn clear_directions(&self) -> bool {
        self.update_directions(|_| String::new()).await
    }

    async fn update_directions(&self, edit: impl FnOnce(&str) -> String) -> bool {
        let directions = {
            let mut state = self.state.lock().await;
            if !state.mode.is_open() {
                return false;
            }
            state.directions = edit(&state.directions);
            state.directions.clone()
        };
        self.handlers.dispatch(FormField::Directions, &directions);
        true
    }

    /// Appends an example snippet to the action editor on its own line.
    pub async fn insert_snippet(&self, code: &str) -> bool {
        if !self.state.lock().await.mode.is_open() {
            return false;
        }
        let current = self.editor.value();
        let combined = if current.is_empty() || current.ends_with('\n') {
            format!("{current}{code}")
        } else {
            format!("{current}\n{code}")
        };
        self.editor.set_value(&combined);
        self.notifier.notify("Example code inserted", Severity::Success);
        true
    }

    fn validate(
        state: &FormState,
        collection: &GestureCollection,
        action: String,
    ) -> Result<Submission, ValidationError> {
        let (name, own_name) = match &state.mode {
            EditorMode::Editing {
                target,
                rename: false,
            } => (target.clone(), Some(target.as_str())),
            EditorMode::Editing {
                target,
                rename: true,
            } => (state.name.trim().to_string(), Some(target.as_str())),
            _ => (state.name.trim().to_string(), None),
        };

        domain::validate_name(&name)?;
        collection.ensure_name_available(&name, own_name)?;

        let directions = direction::normalize(&state.directions);
        direction::validate(&directions)?;

        if action.trim().is_empty() {
            return Err(ValidationError::EmptyAction);
        }

        Ok(match own_name {
            Some(old_name) => Submission::Update {
                old_name: old_name.to_string(),
                new_name: name,
                directions,
                action,
            },
            None => Submission::Add {
                name,
                directions,
                action,
            },
        })
    }

    /// Validates and sends the form. Validation and server failures are reported
    /// through the notifier and leave the form as it was.
    pub async fn submit(&self) -> Result<SubmitOutcome, GestureError> {
        let (submission, generation) = {
            let mut state = self.state.lock().await;
            if !state.mode.is_open() {
                return Ok(SubmitOutcome::Closed);
            }
            if state.submitting {
                debug!("form: submit ignored, request in flight");
                return Ok(SubmitOutcome::Busy);
            }
            let collection = self.list.collection().await;
            match Self::validate(&state, &collection, self.editor.value()) {
                Ok(submission) => {
                    state.submitting = true;
                    (submission, state.generation)
                }
                Err(err) => {
                    self.notifier.notify(&err.to_string(), Severity::Warning);
                    return Err(err.into());
                }
            }
        };

        let result = match &submission {
            Submission::Add {
                name,
                directions,
                action,
            } => self.store.add(name, directions, action).await,
            Submission::Update {
                old_name,
                new_name,
                directions,
                action,
            } => {
                self.store
                    .update(old_name, new_name, directions, action)
                    .await
            }
        };

        let closed = {
            let mut state = self.state.lock().await;
            state.submitting = false;
            let still_current = state.generation == generation;
            if result.is_ok() && still_current {
                state.reset(EditorMode::Idle);
            }
            result.is_ok() && still_current
        };

        if let Err(err) = result {
            self.notifier.notify(&err.to_string(), Severity::Error);
            return Err(err);
        }

        if closed {
            self.editor.set_value("");
        }
        let outcome = match submission {
            Submission::Add { name, .. } => {
                info!(%name, "form: gesture added");
                self.notifier.notify("Gesture added", Severity::Success);
                SubmitOutcome::Added { name }
            }
            Submission::Update {
                old_name, new_name, ..
            } => {
                info!(%old_name, %new_name, "form: gesture updated");
                self.notifier.notify("Gesture updated", Severity::Success);
                SubmitOutcome::Updated { old_name, new_name }
            }
        };
        // Failures are already reported by refresh.
        let _ = self.list.refresh().await;
        Ok(outcome)
    }

    /// Runs the editor's current action on the backend after the user confirms.
    pub async fn test_execute(&self) -> Result<TestRun, GestureError> {
        let action = self.editor.value();
        if action.trim().is_empty() {
            let err = ValidationError::EmptyAction;
            self.notifier.notify(&err.to_string(), Severity::Warning);
            return Err(err.into());
        }

        {
            let mut state = self.state.lock().await;
            if state.testing {
                return Ok(TestRun::Busy);
            }
            state.testing = true;
        }

        let result = self.run_test(&action).await;
        self.state.lock().await.testing = false;
        result
    }

    async fn run_test(&self, action: &str) -> Result<TestRun, GestureError> {
        let confirmed = self
            .confirm
            .confirm("Run this action now? The code will be executed immediately.")
            .await;
        if !confirmed {
            return Ok(TestRun::Cancelled);
        }

        match self.store.test_execute(action).await {
            Ok(outcome) if outcome.passed => {
                self.notifier
                    .notify("Action executed successfully", Severity::Success);
                Ok(TestRun::Passed(outcome.message))
            }
            Ok(outcome) => {
                let detail = outcome.message.as_deref().unwrap_or("no details");
                self.notifier
                    .notify(&format!("Action failed: {detail}"), Severity::Error);
                Ok(TestRun::Failed(outcome.message))
            }
            Err(err) => {
                self.notifier
                    .notify(&format!("Test request failed: {err}"), Severity::Error);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
