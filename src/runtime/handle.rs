use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

use crate::{
    formation::{FormationDraft, SavedFormation},
    persist::{FormationStore, PersistError},
    types::FormationId,
};

use super::events::LibraryEvent;

/// Failures of formation library requests.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The store rejected the request.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The library task has shut down.
    #[error("formation library task has stopped")]
    ChannelClosed,
}

/// Sizing of the library task's channels.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Pending requests before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber.
    pub event_capacity: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 64,
            event_capacity: 256,
        }
    }
}

/// Async front for a [`FormationStore`].
///
/// One task owns the store and runs commands strictly in arrival order,
/// so at most one storage operation is in flight.
pub struct FormationLibraryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LibraryEvent>,
}

impl Clone for FormationLibraryHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Save {
        draft: FormationDraft,
        resp: oneshot::Sender<Result<SavedFormation, RuntimeError>>,
    },
    Load {
        id: FormationId,
        resp: oneshot::Sender<Result<Option<SavedFormation>, RuntimeError>>,
    },
    List {
        resp: oneshot::Sender<Result<Vec<SavedFormation>, RuntimeError>>,
    },
    Remove {
        id: FormationId,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    Rename {
        id: FormationId,
        name: String,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

type SharedStore = Arc<Mutex<Box<dyn FormationStore>>>;

/// Spawns the library task on the current tokio runtime.
pub fn spawn_library(
    store: Box<dyn FormationStore>,
    config: LibraryConfig,
) -> FormationLibraryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<LibraryEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();
    let store: SharedStore = Arc::new(Mutex::new(store));

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &store, &events_tx_loop).await {
                break;
            }
        }
        log::debug!("formation library task stopped");
    });

    FormationLibraryHandle { cmd_tx, events_tx }
}

impl FormationLibraryHandle {
    /// Receives events for every successful write.
    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events_tx.subscribe()
    }

    /// Saves a new formation at the front of the listing.
    pub async fn save(&self, draft: FormationDraft) -> Result<SavedFormation, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Save { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Loads one formation; unknown ids give `None`.
    pub async fn load(
        &self,
        id: impl Into<FormationId>,
    ) -> Result<Option<SavedFormation>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Load {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// All readable formations, most recent first.
    pub async fn list(&self) -> Result<Vec<SavedFormation>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::List { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Removes a formation; returns whether it existed.
    pub async fn remove(&self, id: impl Into<FormationId>) -> Result<bool, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Remove {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Renames a formation; returns whether it existed.
    pub async fn rename(
        &self,
        id: impl Into<FormationId>,
        name: impl Into<String>,
    ) -> Result<bool, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Rename {
                id: id.into(),
                name: name.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the library task once queued requests are done.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    store: &SharedStore,
    events_tx: &broadcast::Sender<LibraryEvent>,
) -> bool {
    match cmd {
        Command::Save { draft, resp } => {
            let res = run_blocking(store, move |s| s.save(draft))
                .await
                .and_then(|r| r.map_err(RuntimeError::from));
            match &res {
                Ok(formation) => {
                    let _ = events_tx.send(LibraryEvent::Saved {
                        id: formation.id.clone(),
                    });
                }
                Err(err) => log::warn!("saving formation failed: {err}"),
            }
            let _ = resp.send(res);
        }
        Command::Load { id, resp } => {
            let res = run_blocking(store, move |s| s.load(&id)).await;
            let _ = resp.send(res);
        }
        Command::List { resp } => {
            let res = run_blocking(store, |s| s.list()).await;
            let _ = resp.send(res);
        }
        Command::Remove { id, resp } => {
            let event_id = id.clone();
            let res = run_blocking(store, move |s| s.remove(&id))
                .await
                .and_then(|r| r.map_err(RuntimeError::from));
            if matches!(res, Ok(true)) {
                let _ = events_tx.send(LibraryEvent::Removed { id: event_id });
            }
            let _ = resp.send(res);
        }
        Command::Rename { id, name, resp } => {
            let event_id = id.clone();
            let res = run_blocking(store, move |s| s.rename(&id, &name))
                .await
                .and_then(|r| r.map_err(RuntimeError::from));
            if matches!(res, Ok(true)) {
                let _ = events_tx.send(LibraryEvent::Renamed { id: event_id });
            }
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

async fn run_blocking<T, F>(store: &SharedStore, f: F) -> Result<T, RuntimeError>
where
    T: Send + 'static,
    F: FnOnce(&mut Box<dyn FormationStore>) -> T + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut guard = store.blocking_lock();
        f(&mut guard)
    })
    .await
    .map_err(|e| RuntimeError::Persist(PersistError::Message(format!("join error: {e}"))))
}
