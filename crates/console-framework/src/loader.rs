//! # Async Resource Loader
//!
//! A [`ResourceLoader`] wraps one "fetch the list" operation and exposes its outcome
//! as a render-safe [`ResourceState`]: `data` is always a list (empty on failure),
//! `loading` is true only while a fetch is in flight, and `error` holds the last
//! failure.
//!
//! ## State publication
//!
//! The state lives in a `tokio::sync::watch` channel. A page reads a snapshot with
//! [`ResourceLoader::state`]; a renderer that wants to redraw on every change keeps a
//! receiver from [`ResourceLoader::subscribe`].
//!
//! ## Guaranteed release
//!
//! Every fetch holds an in-flight guard. The guard is released when the fetch
//! returns, fails, panics or is dropped mid-flight, and `loading` is recomputed from
//! the number of fetches still outstanding. A spinner can never get stuck.
//!
//! ## Overlapping fetches
//!
//! Nothing stops a second [`refetch`](ResourceLoader::refetch) while one is pending.
//! With [`ResponseOrdering::LastWriteWins`] (the default) whichever response arrives
//! last overwrites the state. [`ResponseOrdering::LatestRequestWins`] tags each
//! request and drops responses older than the newest request issued.
//!
//! ## Unmounting
//!
//! There is no cancellation. After [`close`](ResourceLoader::close) any result that
//! still arrives is discarded instead of applied.

use crate::error::ConsoleError;
use crate::record::{short_type_name, Fetched, SingleRecordPolicy};
use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The asynchronous "list" operation a loader runs.
///
/// `A` is whatever the page forwards to [`ResourceLoader::refetch`]: `()` for plain
/// lists, a filter struct for searchable ones.
#[async_trait]
pub trait ListSource<T, A>: Send + Sync {
    async fn fetch(&self, args: A) -> Result<Fetched<T>, ConsoleError>;
}

/// Adapts an async closure into a [`ListSource`].
pub struct FnSource<F> {
    f: F,
}

/// Wraps `f` so it can be handed to a loader.
pub fn from_fn<T, A, F, Fut>(f: F) -> FnSource<F>
where
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Fetched<T>, ConsoleError>> + Send,
{
    FnSource { f }
}

#[async_trait]
impl<T, A, F, Fut> ListSource<T, A> for FnSource<F>
where
    T: Send + 'static,
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Fetched<T>, ConsoleError>> + Send,
{
    async fn fetch(&self, args: A) -> Result<Fetched<T>, ConsoleError> {
        (self.f)(args).await
    }
}

/// What a table renders.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Rows in server order. Never absent, empty after a failure.
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<ConsoleError>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Which response wins when fetches overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseOrdering {
    #[default]
    LastWriteWins,
    LatestRequestWins,
}

#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    /// Run a fetch with default arguments as soon as the loader is built.
    pub auto_fetch: bool,
    pub single_record: SingleRecordPolicy,
    pub ordering: ResponseOrdering,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            auto_fetch: true,
            single_record: SingleRecordPolicy::Wrap,
            ordering: ResponseOrdering::LastWriteWins,
        }
    }
}

impl LoaderConfig {
    /// Config for loaders the page fetches explicitly.
    pub fn manual() -> Self {
        Self {
            auto_fetch: false,
            ..Self::default()
        }
    }
}

struct Shared<T, A> {
    source: Option<Arc<dyn ListSource<T, A>>>,
    config: LoaderConfig,
    state: watch::Sender<ResourceState<T>>,
    in_flight: AtomicUsize,
    issued: AtomicU64,
    active: AtomicBool,
    resource: &'static str,
}

/// Handle to one page's list state. Clones share the same state.
pub struct ResourceLoader<T, A = ()> {
    shared: Arc<Shared<T, A>>,
}

impl<T, A> Clone for ResourceLoader<T, A> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

/// One outstanding fetch. Dropping it releases the loading flag.
struct Ticket<T, A> {
    tag: u64,
    shared: Arc<Shared<T, A>>,
}

impl<T, A> Drop for Ticket<T, A> {
    fn drop(&mut self) {
        let in_flight = &self.shared.in_flight;
        self.shared.state.send_modify(|state| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            state.loading = remaining > 0;
        });
    }
}

impl<T, A> ResourceLoader<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Builds a loader around `source`.
    ///
    /// `None` is accepted: pages that build a loader before its dependency is ready
    /// get an empty list and a [`ConsoleError::MissingFetchOperation`] instead of a
    /// crash. With `auto_fetch` the first fetch is spawned on the current Tokio
    /// runtime; outside a runtime it is skipped with a warning.
    pub fn new(source: Option<Arc<dyn ListSource<T, A>>>, config: LoaderConfig) -> Self
    where
        A: Default,
    {
        let (state, _) = watch::channel(ResourceState::default());
        let resource = short_type_name::<T>();
        let loader = Self {
            shared: Arc::new(Shared {
                source,
                config,
                state,
                in_flight: AtomicUsize::new(0),
                issued: AtomicU64::new(0),
                active: AtomicBool::new(true),
                resource,
            }),
        };

        if config.auto_fetch {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let ticket = loader.begin();
                    let task = loader.clone();
                    handle.spawn(async move {
                        let _ = task.run(ticket, A::default()).await;
                    });
                }
                Err(_) => warn!(resource, "No runtime available; initial fetch skipped"),
            }
        }

        loader
    }

    /// Shorthand for a loader with a concrete source.
    pub fn with_source(source: impl ListSource<T, A> + 'static, config: LoaderConfig) -> Self
    where
        A: Default,
    {
        Self::new(Some(Arc::new(source)), config)
    }

    /// Runs the fetch operation with `args` and stores the normalized result.
    ///
    /// On failure `data` is reset to an empty list and the error is both stored and
    /// returned, so callers can chain on either outcome.
    pub async fn refetch(&self, args: A) -> Result<Vec<T>, ConsoleError> {
        let ticket = self.begin();
        self.run(ticket, args).await
    }

    /// Waits until no fetch is in flight.
    pub async fn settled(&self) {
        let mut receiver = self.shared.state.subscribe();
        let _ = receiver.wait_for(|state| !state.loading).await;
    }

    pub fn state(&self) -> ResourceState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn data(&self) -> Vec<T> {
        self.shared.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    pub fn error(&self) -> Option<ConsoleError> {
        self.shared.state.borrow().error.clone()
    }

    /// A receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.shared.state.subscribe()
    }

    /// Marks the owning page as gone. Pending fetches still finish, but their
    /// results are no longer applied.
    pub fn close(&self) {
        if self.shared.active.swap(false, Ordering::SeqCst) {
            info!(resource = self.shared.resource, "Loader closed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Ticket<T, A> {
        let shared = &self.shared;
        let mut tag = 0;
        shared.state.send_modify(|state| {
            shared.in_flight.fetch_add(1, Ordering::SeqCst);
            tag = shared.issued.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        debug!(resource = shared.resource, tag, "Fetch started");
        Ticket {
            tag,
            shared: shared.clone(),
        }
    }

    async fn run(&self, ticket: Ticket<T, A>, args: A) -> Result<Vec<T>, ConsoleError> {
        let shared = &self.shared;
        let result = match &shared.source {
            Some(source) => source
                .fetch(args)
                .await
                .map(|fetched| fetched.normalize(shared.config.single_record)),
            None => Err(ConsoleError::MissingFetchOperation),
        };
        self.apply(ticket.tag, &result);
        drop(ticket);
        result
    }

    fn apply(&self, tag: u64, result: &Result<Vec<T>, ConsoleError>) {
        let shared = &self.shared;
        let resource = shared.resource;
        if !shared.active.load(Ordering::SeqCst) {
            debug!(resource, tag, "Loader closed; result discarded");
            return;
        }

        shared.state.send_if_modified(|state| {
            if shared.config.ordering == ResponseOrdering::LatestRequestWins
                && tag != shared.issued.load(Ordering::SeqCst)
            {
                debug!(resource, tag, "Stale response discarded");
                return false;
            }
            match result {
                Ok(rows) => {
                    info!(resource, tag, rows = rows.len(), "Fetched");
                    state.data = rows.clone();
                    state.error = None;
                }
                Err(e) => {
                    warn!(resource, tag, error = %e, "Fetch failed");
                    state.data = Vec::new();
                    state.error = Some(e.clone());
                }
            }
            true
        });
    }
}
