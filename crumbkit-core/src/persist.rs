//! Fire-and-forget persistence.
//!
//! The manager mutates its queue synchronously and hands the resulting
//! snapshot to a [`Persister`]. A background persister owns one worker thread
//! fed by an unbounded channel; an inline persister writes on the caller's
//! thread and is used where the medium is synchronous or threads are absent.
//!
//! Every write replaces the whole record, so the worker coalesces whatever is
//! queued when it wakes and applies only the latest write.

use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};

use crate::event::Event;
use crate::storage::BreadcrumbStore;

enum Command {
    Save(Vec<Event>),
    Clear,
    Flush(oneshot::Sender<()>),
}

enum Write {
    Save(Vec<Event>),
    Clear,
}

impl Write {
    fn apply(self, store: &BreadcrumbStore) {
        match self {
            Self::Save(events) => store.save(&events),
            Self::Clear => store.clear(),
        }
    }
}

enum Dispatch {
    Inline(BreadcrumbStore),
    Background {
        sender: Option<mpsc::UnboundedSender<Command>>,
        worker: Option<JoinHandle<()>>,
    },
}

/// Applies breadcrumb writes to a [`BreadcrumbStore`].
///
/// Dropping a background persister closes its channel and joins the worker,
/// so every write scheduled before the drop reaches the medium.
pub struct Persister {
    dispatch: Dispatch,
}

impl std::fmt::Debug for Persister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister")
            .field("background", &self.is_background())
            .finish()
    }
}

impl Persister {
    /// Writes on the calling thread.
    #[must_use]
    pub const fn inline(store: BreadcrumbStore) -> Self {
        Self {
            dispatch: Dispatch::Inline(store),
        }
    }

    /// Starts a worker thread that owns `store`.
    ///
    /// Falls back to inline writes if the thread cannot be spawned.
    #[must_use]
    pub fn spawn(store: BreadcrumbStore) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker_store = store.clone();
        match std::thread::Builder::new()
            .name("crumbkit-persister".to_string())
            .spawn(move || run(&worker_store, receiver))
        {
            Ok(worker) => Self {
                dispatch: Dispatch::Background {
                    sender: Some(sender),
                    worker: Some(worker),
                },
            },
            Err(err) => {
                log::warn!("failed to start breadcrumb persister, writing inline: {err}");
                Self::inline(store)
            }
        }
    }

    /// Whether writes run on a worker thread.
    #[must_use]
    pub const fn is_background(&self) -> bool {
        matches!(self.dispatch, Dispatch::Background { .. })
    }

    /// Schedules replacing the record with `events`.
    pub fn save(&self, events: Vec<Event>) {
        self.submit(Write::Save(events));
    }

    /// Schedules deleting the record.
    pub fn clear(&self) {
        self.submit(Write::Clear);
    }

    /// Blocks until every write scheduled so far has been applied.
    ///
    /// Must not be called from within an async runtime worker.
    pub fn flush(&self) {
        let Dispatch::Background {
            sender: Some(sender),
            ..
        } = &self.dispatch
        else {
            return;
        };
        let (ack, done) = oneshot::channel();
        if sender.send(Command::Flush(ack)).is_ok() {
            // An error means the worker is gone; nothing is left to wait for.
            let _ = done.blocking_recv();
        }
    }

    fn submit(&self, write: Write) {
        match &self.dispatch {
            Dispatch::Inline(store) => write.apply(store),
            Dispatch::Background { sender, .. } => {
                let command = match write {
                    Write::Save(events) => Command::Save(events),
                    Write::Clear => Command::Clear,
                };
                let delivered = sender
                    .as_ref()
                    .is_some_and(|sender| sender.send(command).is_ok());
                if !delivered {
                    log::warn!("breadcrumb persister stopped, write dropped");
                }
            }
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        if let Dispatch::Background { sender, worker } = &mut self.dispatch {
            drop(sender.take());
            if let Some(worker) = worker.take() {
                if worker.join().is_err() {
                    log::warn!("breadcrumb persister panicked");
                }
            }
        }
    }
}

fn run(store: &BreadcrumbStore, mut receiver: mpsc::UnboundedReceiver<Command>) {
    while let Some(first) = receiver.blocking_recv() {
        let mut latest = None;
        let mut next = Some(first);
        while let Some(command) = next {
            match command {
                Command::Save(events) => latest = Some(Write::Save(events)),
                Command::Clear => latest = Some(Write::Clear),
                Command::Flush(ack) => {
                    if let Some(write) = latest.take() {
                        write.apply(store);
                    }
                    let _ = ack.send(());
                }
            }
            next = receiver.try_recv().ok();
        }
        if let Some(write) = latest {
            write.apply(store);
        }
    }
}
