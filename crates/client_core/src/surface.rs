//! Collaborators the editor talks to but does not own: the notification area, the
//! confirmation dialog, and the code-editing widget holding the action text.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Blocking yes/no prompt. Resolves once the user answers.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

pub type ChangeHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// The text widget holding the (decoded) action code.
pub trait ActionEditor: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, text: &str);
    fn on_change(&self, handler: ChangeHandler);
}

#[derive(Clone)]
pub struct Surfaces {
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn ConfirmGate>,
    pub editor: Arc<dyn ActionEditor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Directions,
    Action,
}

/// Change handlers keyed by field, handed to the form controller at construction.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<FormField, Vec<ChangeHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        field: FormField,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.handlers
            .entry(field)
            .or_default()
            .push(Arc::new(handler));
        self
    }

    pub fn dispatch(&self, field: FormField, value: &str) {
        if let Some(handlers) = self.handlers.get(&field) {
            for handler in handlers {
                handler(value);
            }
        }
    }
}

/// Plain in-memory editor, for hosts without a richer widget.
#[derive(Default)]
pub struct BufferEditor {
    text: Mutex<String>,
    handlers: Mutex<Vec<ChangeHandler>>,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ActionEditor for BufferEditor {
    fn value(&self) -> String {
        lock(&self.text).clone()
    }

    fn set_value(&self, text: &str) {
        *lock(&self.text) = text.to_string();
        let handlers = lock(&self.handlers).clone();
        for handler in handlers {
            handler(text);
        }
    }

    fn on_change(&self, handler: ChangeHandler) {
        lock(&self.handlers).push(handler);
    }
}
