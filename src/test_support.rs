//! Shared fakes for unit tests: scripted transport and counting storage.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{ApiError, StorageError};
use crate::net::http::{HttpClient, HttpRequest, HttpResponse};
use crate::net::transport::Transport;
use crate::state::auth::AuthStore;
use crate::storage::{KeyValueStore, MemoryStorage};

/// Transport that replays queued outcomes and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.queue
            .borrow_mut()
            .push_back(Ok(HttpResponse { status, body: body.to_string() }));
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.queue
            .borrow_mut()
            .push_back(Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, err: ApiError) {
        self.queue.borrow_mut().push_back(Err(err));
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn last_sent(&self) -> HttpRequest {
        self.sent.borrow().last().cloned().expect("no request sent")
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push(request.clone());
        self.queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_owned())))
    }
}

/// Memory storage that counts how often each key is removed.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    removals: RefCell<BTreeMap<String, usize>>,
}

impl CountingStorage {
    pub fn removals(&self, key: &str) -> usize {
        self.removals.borrow().get(key).copied().unwrap_or(0)
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

impl KeyValueStore for CountingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        *self.removals.borrow_mut().entry(key.to_owned()).or_default() += 1;
        self.inner.remove(key)
    }
}

pub fn profile_json(role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 3,
        "username": "t01",
        "email": "t01@local",
        "full_name": "Kim Teacher",
        "role": role,
        "is_active": true,
        "teacher_id": 1,
        "student_id": null,
        "password_change_required": false,
    })
}

pub fn token_json(token: &str, password_change_required: bool) -> serde_json::Value {
    serde_json::json!({
        "access_token": token,
        "token_type": "bearer",
        "password_change_required": password_change_required,
    })
}

/// Store over fresh memory storage, plus a session-wired client.
pub fn session_fixture() -> (AuthStore, HttpClient, Rc<ScriptedTransport>, Rc<MemoryStorage>) {
    let storage = Rc::new(MemoryStorage::new());
    let store = AuthStore::restore(storage.clone());
    let transport = ScriptedTransport::new();
    let http = HttpClient::for_session(ClientConfig::default(), transport.clone(), &store);
    (store, http, transport, storage)
}
