//! # Mock Backend & Testing Guide
//!
//! [`MockBackend<T>`] hands out a real [`ResourceClient<T>`] whose requests are
//! answered from a queue of expectations instead of a store. Pages and domain clients
//! under test cannot tell the difference.
//!
//! | | MockBackend | ResourceActor |
//! |---|---|---|
//! | **State** | None, only scripted answers | Real store and entity hooks |
//! | **Error injection** | `return_err` | Needs a hook that refuses |
//! | **Use case** | Page and client logic | Entity rules, full system |
//!
//! ```rust
//! use async_trait::async_trait;
//! use console_framework::backend::{BackendError, StoredEntity};
//! use console_framework::mock::MockBackend;
//! use console_framework::Record;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Note { id: u32, text: String }
//! impl Record for Note {
//!     type Id = u32;
//!     fn id(&self) -> u32 { self.id }
//! }
//! #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
//!
//! #[async_trait]
//! impl StoredEntity for Note {
//!     type Create = String; type Update = String; type Filter = (); type Context = (); type Error = NoteError;
//!     fn from_create_params(id: u32, text: String) -> Result<Self, NoteError> { Ok(Self { id, text }) }
//!     async fn on_update(&mut self, text: String, _: &()) -> Result<(), NoteError> { self.text = text; Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockBackend::<Note>::new();
//!     mock.expect_list().return_ok(vec![Note { id: 1, text: "hi".into() }]);
//!     mock.expect_delete(1).return_err(BackendError::Rejected("in use".into()));
//!
//!     let client = mock.client();
//!     assert_eq!(client.list(()).await.unwrap().len(), 1);
//!     assert!(client.delete(1).await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! For tests that need to hold a response back (to observe a loading flag, or to
//! reorder two responses) use [`create_mock_client`] and answer each request by hand
//! with [`next_request`].

use crate::backend::{BackendError, ResourceClient, ResourceRequest, StoredEntity};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::warn;

enum Expectation<T: StoredEntity> {
    List {
        response: Result<Vec<T>, BackendError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, BackendError>,
    },
    Create {
        response: Result<T, BackendError>,
    },
    Update {
        id: T::Id,
        response: Result<T, BackendError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), BackendError>,
    },
}

struct Script<T: StoredEntity> {
    expectations: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type SharedScript<T> = Arc<Mutex<Script<T>>>;

fn lock<T: StoredEntity>(script: &SharedScript<T>) -> MutexGuard<'_, Script<T>> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scripted stand-in for a [`ResourceActor`](crate::backend::ResourceActor).
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation (wrong operation or wrong id) gets no answer, which the caller sees as
/// [`BackendError::Dropped`], and is reported by [`verify`](Self::verify).
pub struct MockBackend<T: StoredEntity> {
    client: ResourceClient<T>,
    script: SharedScript<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoredEntity> Default for MockBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredEntity> MockBackend<T> {
    /// Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let script = Arc::new(Mutex::new(Script {
            expectations: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let task_script = script.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&task_script).expectations.pop_front();
                let kind = request.kind();

                match (request, expectation) {
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (_, expectation) => {
                        let expected = expectation.map_or("nothing", |e| e.kind());
                        let report = format!("unexpected {kind} request, expected {expected}");
                        warn!("{report}");
                        lock(&task_script).mismatches.push(report);
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            script,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_list(&self) -> ExpectationBuilder<'_, T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_get(&self, id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<'_, T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<'_, T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Number of expectations not consumed yet.
    pub fn pending(&self) -> usize {
        lock(&self.script).expectations.len()
    }

    /// Panics if an expectation was not consumed or a request did not match.
    pub fn verify(&self) {
        let script = lock(&self.script);
        if !script.mismatches.is_empty() {
            panic!("Mock received unexpected requests: {:?}", script.mismatches);
        }
        if !script.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                script.expectations.len()
            );
        }
    }

    fn builder<R>(
        &self,
        make: impl FnOnce(Result<R, BackendError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<'_, T, R> {
        ExpectationBuilder {
            script: &self.script,
            make: Box::new(make),
        }
    }
}

impl<T: StoredEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::List { .. } => "list",
            Expectation::Get { .. } => "get",
            Expectation::Create { .. } => "create",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
        }
    }
}

/// Completes an expectation with its scripted answer.
pub struct ExpectationBuilder<'a, T: StoredEntity, R> {
    script: &'a SharedScript<T>,
    make: Box<dyn FnOnce(Result<R, BackendError>) -> Expectation<T>>,
}

impl<T: StoredEntity, R> ExpectationBuilder<'_, T, R> {
    pub fn return_ok(self, value: R) {
        lock(self.script).expectations.push_back((self.make)(Ok(value)));
    }

    pub fn return_err(self, error: BackendError) {
        lock(self.script).expectations.push_back((self.make)(Err(error)));
    }
}

/// A client plus the receiving end of its channel, for answering requests by hand.
pub fn create_mock_client<T: StoredEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request sent to a client from [`create_mock_client`].
pub async fn next_request<T: StoredEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<ResourceRequest<T>> {
    receiver.recv().await
}

/// Counts calls. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    impl Record for Note {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Note error")]
    struct NoteError;

    #[async_trait]
    impl StoredEntity for Note {
        type Create = String;
        type Update = String;
        type Filter = ();
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, text: String) -> Result<Self, NoteError> {
            Ok(Self { id, text })
        }

        async fn on_update(&mut self, text: String, _ctx: &()) -> Result<(), NoteError> {
            self.text = text;
            Ok(())
        }
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_hand_answered_request() {
        let (client, mut receiver) = create_mock_client::<Note>(4);

        let task = tokio::spawn(async move { client.create("draft".into()).await });

        match next_request(&mut receiver).await {
            Some(ResourceRequest::Create { params, respond_to }) => {
                assert_eq!(params, "draft");
                respond_to.send(Ok(note(1, "draft"))).unwrap();
            }
            other => panic!("expected create, got {other:?}"),
        }

        assert_eq!(task.await.unwrap().unwrap(), note(1, "draft"));
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mock = MockBackend::<Note>::new();
        mock.expect_create().return_ok(note(1, "a"));
        mock.expect_update(1).return_ok(note(1, "b"));
        mock.expect_get(1).return_ok(Some(note(1, "b")));

        let client = mock.client();
        assert_eq!(client.create("a".into()).await.unwrap().id, 1);
        assert_eq!(client.update(1, "b".into()).await.unwrap().text, "b");
        assert!(client.get(1).await.unwrap().is_some());

        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected delete request")]
    async fn test_mismatch_is_reported_by_verify() {
        let mock = MockBackend::<Note>::new();
        mock.expect_delete(1).return_ok(());

        let result = mock.client().delete(2).await;
        assert_eq!(result, Err(BackendError::Dropped));

        mock.verify();
    }

    #[test]
    fn test_call_counter_is_shared() {
        let counter = CallCounter::new();
        let other = counter.clone();
        other.hit();
        other.hit();
        assert_eq!(counter.count(), 2);
    }
}
