//! Recording fakes shared by the controller and list-view tests.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::Gesture,
    error::{GestureError, Operation},
};

use crate::{
    store::{GestureStore, TestOutcome},
    surface::{BufferEditor, ConfirmGate, HandlerRegistry, Notifier, Severity, Surfaces},
    GesturePanel,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
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
    Remove(String),
    TestExecute(String),
}

/// In-memory backend that records every call and behaves like the real server.
pub struct RecordingStore {
    gestures: Mutex<Vec<Gesture>>,
    calls: Mutex<Vec<StoreCall>>,
    reject_next: Mutex<Option<String>>,
    fail_next_list: Mutex<Option<String>>,
    test_outcome: Mutex<TestOutcome>,
    latency: Duration,
}

impl RecordingStore {
    pub fn with(gestures: Vec<Gesture>) -> Arc<Self> {
        Arc::new(Self {
            gestures: Mutex::new(gestures),
            calls: Mutex::new(Vec::new()),
            reject_next: Mutex::new(None),
            fail_next_list: Mutex::new(None),
            test_outcome: Mutex::new(TestOutcome {
                passed: true,
                message: None,
            }),
            latency: Duration::from_millis(20),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with(Vec::new())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("calls").clone()
    }

    /// Calls other than `list`.
    pub fn mutating_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != StoreCall::List)
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == StoreCall::List)
            .count()
    }

    pub fn names(&self) -> Vec<String> {
        self.gestures
            .lock()
            .expect("gestures")
            .iter()
            .map(|g| g.name.clone())
            .collect()
    }

    pub fn reject_next(&self, message: &str) {
        *self.reject_next.lock().expect("reject") = Some(message.to_string());
    }

    /// The next `list` fails with a transport error carrying `message`.
    pub fn fail_next_list(&self, message: &str) {
        *self.fail_next_list.lock().expect("fail list") = Some(message.to_string());
    }

    pub fn set_test_outcome(&self, passed: bool, message: Option<&str>) {
        *self.test_outcome.lock().expect("outcome") = TestOutcome {
            passed,
            message: message.map(str::to_string),
        };
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("calls").push(call);
    }

    fn take_rejection(&self, operation: Operation) -> Result<(), GestureError> {
        match self.reject_next.lock().expect("reject").take() {
            Some(message) => Err(GestureError::from_rejection(operation, Some(message))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GestureStore for RecordingStore {
    async fn list(&self) -> Result<Vec<Gesture>, GestureError> {
        self.record(StoreCall::List);
        if let Some(message) = self.fail_next_list.lock().expect("fail list").take() {
            return Err(GestureError::Transport(message));
        }
        Ok(self.gestures.lock().expect("gestures").clone())
    }

    async fn add(&self, name: &str, directions: &str, action: &str) -> Result<(), GestureError> {
        self.record(StoreCall::Add {
            name: name.into(),
            directions: directions.into(),
            action: action.into(),
        });
        tokio::time::sleep(self.latency).await;
        self.take_rejection(Operation::Add)?;
        let mut gestures = self.gestures.lock().expect("gestures");
        if gestures.iter().any(|g| g.name == name) {
            return Err(GestureError::Conflict("gesture already exists".into()));
        }
        gestures.push(Gesture::new(name, directions, action));
        Ok(())
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        directions: &str,
        action: &str,
    ) -> Result<(), GestureError> {
        self.record(StoreCall::Update {
            old_name: old_name.into(),
            new_name: new_name.into(),
            directions: directions.into(),
            action: action.into(),
        });
        tokio::time::sleep(self.latency).await;
        self.take_rejection(Operation::Update)?;
        let mut gestures = self.gestures.lock().expect("gestures");
        let Some(idx) = gestures.iter().position(|g| g.name == old_name) else {
            return Err(GestureError::NotFound("not found".into()));
        };
        gestures[idx] = Gesture::new(new_name, directions, action);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), GestureError> {
        self.record(StoreCall::Remove(name.into()));
        tokio::time::sleep(self.latency).await;
        self.take_rejection(Operation::Delete)?;
        let mut gestures = self.gestures.lock().expect("gestures");
        let before = gestures.len();
        gestures.retain(|g| g.name != name);
        if gestures.len() == before {
            return Err(GestureError::NotFound("not found".into()));
        }
        Ok(())
    }

    async fn test_execute(&self, action: &str) -> Result<TestOutcome, GestureError> {
        self.record(StoreCall::TestExecute(action.into()));
        tokio::time::sleep(self.latency).await;
        Ok(self.test_outcome.lock().expect("outcome").clone())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().expect("messages").clone()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.messages().last().cloned()
    }

    pub fn contains(&self, message: &str, severity: Severity) -> bool {
        self.messages()
            .iter()
            .any(|(m, s)| m == message && *s == severity)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, s)| *s == Severity::Error)
            .map(|(m, _)| m)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .expect("messages")
            .push((message.to_string(), severity));
    }
}

pub struct ScriptedConfirm {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts").clone()
    }
}

#[async_trait]
impl ConfirmGate for ScriptedConfirm {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompts")
            .push(message.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub panel: GesturePanel,
    pub store: Arc<RecordingStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirm: Arc<ScriptedConfirm>,
    pub editor: Arc<BufferEditor>,
}

impl Harness {
    pub async fn new(gestures: Vec<Gesture>) -> Self {
        Self::with_handlers(gestures, HandlerRegistry::new()).await
    }

    /// Builds the panel and loads the initial list, then forgets that `list` call.
    pub async fn with_handlers(gestures: Vec<Gesture>, handlers: HandlerRegistry) -> Self {
        let store = RecordingStore::with(gestures);
        let notifier = Arc::new(RecordingNotifier::default());
        let confirm = ScriptedConfirm::answering(true);
        let editor = Arc::new(BufferEditor::new());
        let surfaces = Surfaces {
            notifier: notifier.clone(),
            confirm: confirm.clone(),
            editor: editor.clone(),
        };
        let panel = GesturePanel::new(store.clone(), surfaces, handlers);
        panel.list.refresh().await.expect("initial list");
        store.calls.lock().expect("calls").clear();
        Self {
            panel,
            store,
            notifier,
            confirm,
            editor,
        }
    }
}

pub fn swipe_up() -> Gesture {
    Gesture::new("swipe-up", "↑", "print(1)")
}

pub fn foo() -> Gesture {
    Gesture::new("foo", "↓ →", "foo()")
}
