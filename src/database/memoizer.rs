//! Single-flight, process-wide cache for the one external database handle.
//!
//! The slot moves through `Unset -> Pending -> Ready`, falling back to `Unset`
//! when an attempt fails. Every caller that arrives while an attempt is
//! pending awaits the same shared future, so concurrent callers never start
//! their own connect.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::manager::DatabaseError;

/// Establishes the underlying connection. Implemented by [`PgConnector`](super::manager::PgConnector)
/// and by fakes in tests.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, DatabaseError>;
}

type Acquisition<H> = Shared<BoxFuture<'static, Result<H, DatabaseError>>>;

enum Slot<H> {
    Unset,
    Pending { attempt: u64, future: Acquisition<H> },
    Ready(H),
}

/// Observable lifecycle of the cached connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Connected,
}

pub struct ConnectionMemoizer<C: Connector> {
    connector: Arc<C>,
    slot: Mutex<Slot<C::Handle>>,
    attempts: AtomicU64,
}

impl<C: Connector> ConnectionMemoizer<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            slot: Mutex::new(Slot::Unset),
            attempts: AtomicU64::new(0),
        }
    }

    /// Returns the cached handle, joins the in-flight attempt, or starts one.
    pub async fn get(&self) -> Result<C::Handle, DatabaseError> {
        // The lock is released before the await below; registration of a new
        // attempt happens under it so a concurrent caller can only join.
        let (attempt, acquisition) = {
            let mut slot = self.slot.lock();
            match &*slot {
                Slot::Ready(handle) => return Ok(handle.clone()),
                Slot::Pending { attempt, future } => (*attempt, future.clone()),
                Slot::Unset => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let connector = Arc::clone(&self.connector);
                    let future = async move { connector.connect().await }.boxed().shared();
                    *slot = Slot::Pending {
                        attempt,
                        future: future.clone(),
                    };
                    debug!(attempt, "Starting database connection attempt");
                    (attempt, future)
                }
            }
        };

        let outcome = acquisition.await;

        let mut slot = self.slot.lock();
        let still_current = matches!(&*slot, Slot::Pending { attempt: current, .. } if *current == attempt);
        if still_current {
            *slot = match &outcome {
                Ok(handle) => {
                    info!(attempt, "Database connection established");
                    Slot::Ready(handle.clone())
                }
                Err(e) => {
                    warn!(attempt, "Database connection attempt failed: {}", e);
                    Slot::Unset
                }
            };
        }

        outcome
    }

    /// [`get`](Self::get) for callers that must not queue behind a pending
    /// attempt. With `buffer_commands` off, a call made while an attempt is in
    /// flight fails with [`DatabaseError::NotReady`]; otherwise it joins the
    /// attempt. A call on an unset slot still starts the connect.
    pub async fn acquire(&self, buffer_commands: bool) -> Result<C::Handle, DatabaseError> {
        if !buffer_commands && self.state() == ConnectionState::Connecting {
            return Err(DatabaseError::NotReady);
        }
        self.get().await
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.slot.lock() {
            Slot::Unset => ConnectionState::Uninitialized,
            Slot::Pending { .. } => ConnectionState::Connecting,
            Slot::Ready(_) => ConnectionState::Connected,
        }
    }

    /// Number of underlying connect operations started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Drops the cached handle so the next call reconnects. Used on shutdown.
    pub fn take(&self) -> Option<C::Handle> {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Unset) {
            Slot::Ready(handle) => Some(handle),
            pending @ Slot::Pending { .. } => {
                *slot = pending;
                None
            }
            Slot::Unset => None,
        }
    }
}
