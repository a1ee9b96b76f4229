#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use taskschema_core::*;
use tokio::sync::{oneshot, watch};
use tokio::time::timeout;

pub const WAIT: Duration = Duration::from_secs(2);
pub const SETTLE: Duration = Duration::from_millis(50);

type Gate = oneshot::Sender<Result<Vec<String>, SourceError>>;

#[derive(Debug)]
enum Mode {
    Ready(Vec<String>),
    Failing,
    Gated,
}

/// Remote task type source whose answers are controlled by the test.
///
/// In gated mode every query parks until the test releases it, which lets tests
/// decide the order in which concurrent queries resolve.
#[derive(Debug)]
pub struct ScriptedRemote {
    mode: Mutex<Mode>,
    pending: Mutex<VecDeque<Gate>>,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    pub fn ready(types: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(Mode::Ready(types.iter().map(|t| (*t).to_owned()).collect())),
            pending: Mutex::default(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn answer(&self, types: &[&str]) {
        *self.mode.lock() = Mode::Ready(types.iter().map(|t| (*t).to_owned()).collect());
    }

    pub fn fail(&self) {
        *self.mode.lock() = Mode::Failing;
    }

    pub fn gate(&self) {
        *self.mode.lock() = Mode::Gated;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub async fn wait_for_pending(&self, count: usize) {
        timeout(WAIT, async {
            while self.pending() < count {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("remote queries did not arrive in time");
    }

    /// Resolves the most recent parked query.
    pub fn release_latest(&self, types: &[&str]) {
        let gate = self.pending.lock().pop_back().expect("no parked query");
        let _ = gate.send(Ok(types.iter().map(|t| (*t).to_owned()).collect()));
    }

    /// Resolves the oldest parked query.
    pub fn release_earliest(&self, types: &[&str]) {
        let gate = self.pending.lock().pop_front().expect("no parked query");
        let _ = gate.send(Ok(types.iter().map(|t| (*t).to_owned()).collect()));
    }
}

#[async_trait]
impl RemoteTaskTypeSource for ScriptedRemote {
    async fn task_types(&self) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = {
            let mode = self.mode.lock();
            match &*mode {
                Mode::Ready(types) => return Ok(types.clone()),
                Mode::Failing => {
                    return Err(SourceError::Unavailable { message: "remote host is down".into(), context: None });
                },
                Mode::Gated => {
                    let (tx, rx) = oneshot::channel();
                    self.pending.lock().push_back(tx);
                    rx
                },
            }
        };
        rx.await.unwrap_or_else(|_| Err(SourceError::Internal { message: "gate dropped".into(), context: None }))
    }
}

/// Memory store that can be switched into a failing state.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryResourceStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable { message: "disk full".into(), context: None });
        }
        Ok(())
    }
}

impl ResourceStore for FlakyStore {
    fn update(&self, id: &str, content: Arc<str>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(id, content)
    }

    fn add(&self, id: &str, content: Arc<str>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.add(id, content)
    }
}

/// A service wired to in-memory collaborators.
pub struct Harness {
    pub matchers: ProblemMatcherRegistry,
    pub definitions: TaskDefinitionRegistry,
    pub remote: Arc<ScriptedRemote>,
    pub store: MemoryResourceStore,
    pub index: MemoryAssociationIndex,
    pub service: TaskSchemaService,
}

impl Harness {
    pub fn new(remote_types: &[&str]) -> Self {
        let store = MemoryResourceStore::new();
        Self::with_store(remote_types, store.clone(), Arc::new(store))
    }

    pub fn with_store(remote_types: &[&str], store: MemoryResourceStore, target: Arc<dyn ResourceStore>) -> Self {
        let matchers = ProblemMatcherRegistry::new();
        let definitions = TaskDefinitionRegistry::new();
        let remote = ScriptedRemote::ready(remote_types);
        let index = MemoryAssociationIndex::new();

        let service = TaskSchemaService::builder()
            .sources(SchemaSources {
                problem_matchers: Arc::new(matchers.clone()),
                task_definitions: Arc::new(definitions.clone()),
                remote_task_types: remote.clone(),
            })
            .target(PublishTarget { store: target, associations: Arc::new(index.clone()) })
            .build()
            .expect("default settings are valid");

        Self { matchers, definitions, remote, store, index, service }
    }

    pub fn schema_id(&self) -> &str {
        &self.service.settings().id
    }
}

/// Waits until a publication with at least `generation` has been observed.
pub async fn wait_for_generation(
    rx: &mut watch::Receiver<Option<PublishedSchema>>,
    generation: u64,
) -> PublishedSchema {
    let published = timeout(WAIT, rx.wait_for(|p| p.as_ref().is_some_and(|p| p.generation >= generation)))
        .await
        .unwrap_or_else(|_| panic!("generation {generation} was not published in time"))
        .expect("service dropped");
    published.clone().expect("checked above")
}

pub fn task_type_enum(content: &str) -> Vec<String> {
    string_array(content, &format!("{TASK_TYPE_POINTER}/enum"))
}

pub fn matcher_enum(content: &str) -> Vec<String> {
    let single = string_array(content, &format!("{PROBLEM_MATCHER_POINTER}/oneOf/0/enum"));
    let listed = string_array(content, &format!("{PROBLEM_MATCHER_POINTER}/oneOf/2/items/enum"));
    assert_eq!(single, listed, "single and array forms must enumerate the same names");
    single
}

fn string_array(content: &str, pointer: &str) -> Vec<String> {
    let document: Value = serde_json::from_str(content).expect("published content is JSON");
    let values = document.pointer(pointer).unwrap_or_else(|| panic!("missing {pointer}"));
    serde_json::from_value(values.clone()).expect("string array")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}
