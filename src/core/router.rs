use crate::core::playback::PlaybackController;
use crate::domain::model::{Command, CommandOrigin, PlaybackState, Slot, SlotIndex};
use crate::domain::ports::{MediaPlayer, SettingsStore};
use crate::utils::error::{Result, SoundboardError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Message travelling through the router queue.
#[derive(Debug)]
pub enum Envelope {
    /// Commands applied back to back (one serial frame, one HTTP request, ...).
    Commands {
        origin: CommandOrigin,
        commands: Vec<Command>,
    },
    BackendVolume(i32),
    AssignSlot {
        index: SlotIndex,
        file_path: Option<PathBuf>,
    },
    Snapshot(oneshot::Sender<PlaybackState>),
    Slots(oneshot::Sender<Vec<Slot>>),
}

/// 建立指令佇列：多個輸入來源，單一消費者
pub fn channel(capacity: usize) -> (RouterHandle, mpsc::Receiver<Envelope>) {
    let (sender, inbox) = mpsc::channel(capacity);
    (RouterHandle { sender }, inbox)
}

/// Cloneable producer side of the router queue.
#[derive(Debug, Clone)]
pub struct RouterHandle {
    sender: mpsc::Sender<Envelope>,
}

impl RouterHandle {
    async fn send(&self, envelope: Envelope) -> Result<()> {
        self.sender
            .send(envelope)
            .await
            .map_err(|_| SoundboardError::RouterClosed)
    }

    pub async fn submit(&self, origin: CommandOrigin, command: Command) -> Result<()> {
        self.submit_all(origin, vec![command]).await
    }

    pub async fn submit_all(&self, origin: CommandOrigin, commands: Vec<Command>) -> Result<()> {
        self.send(Envelope::Commands { origin, commands }).await
    }

    pub async fn report_backend_volume(&self, level: i32) -> Result<()> {
        self.send(Envelope::BackendVolume(level)).await
    }

    pub async fn assign_slot(&self, index: SlotIndex, file_path: Option<PathBuf>) -> Result<()> {
        self.send(Envelope::AssignSlot { index, file_path }).await
    }

    /// Current state, observed after every previously submitted message.
    pub async fn snapshot(&self) -> Result<PlaybackState> {
        let (reply, response) = oneshot::channel();
        self.send(Envelope::Snapshot(reply)).await?;
        response.await.map_err(|_| SoundboardError::RouterClosed)
    }

    pub async fn slots(&self) -> Result<Vec<Slot>> {
        let (reply, response) = oneshot::channel();
        self.send(Envelope::Slots(reply)).await?;
        response.await.map_err(|_| SoundboardError::RouterClosed)
    }
}

/// Single funnel in front of the [`PlaybackController`].
///
/// Applies everything in arrival order, without reordering or deduplication.
/// Not meant to be shared between threads: run it as the only consumer of the
/// queue created by [`channel`].
pub struct CommandRouter<M: MediaPlayer> {
    controller: PlaybackController<M>,
    settings: Option<Arc<dyn SettingsStore>>,
    writer: Option<mpsc::UnboundedSender<Vec<Slot>>>,
}

impl<M: MediaPlayer> CommandRouter<M> {
    pub fn new(controller: PlaybackController<M>) -> Self {
        Self {
            controller,
            settings: None,
            writer: None,
        }
    }

    pub fn with_settings_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.settings = Some(Arc::new(store));
        self
    }

    pub fn controller(&self) -> &PlaybackController<M> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<M> {
        &mut self.controller
    }

    pub fn submit(&mut self, command: Command) {
        tracing::debug!("Applying {:?}", command);
        self.controller.apply(command);
    }

    pub fn submit_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.submit(command);
        }
    }

    pub fn dispatch(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::Commands { origin, commands } => {
                tracing::debug!("📥 {} command(s) from {}", commands.len(), origin);
                self.submit_all(commands);
            }
            Envelope::BackendVolume(level) => self.controller.apply_backend_volume(level),
            Envelope::AssignSlot { index, file_path } => {
                self.controller.assign_slot(index, file_path);
                self.persist_slots();
            }
            Envelope::Snapshot(reply) => {
                // 請求者可能已經放棄等待
                let _ = reply.send(self.controller.state());
            }
            Envelope::Slots(reply) => {
                let _ = reply.send(self.controller.slots().slots());
            }
        }
    }

    /// Drains the queue until every [`RouterHandle`] is dropped.
    ///
    /// Slot assignments are saved by a background writer; pending saves are
    /// flushed before this returns.
    pub async fn run(mut self, mut inbox: mpsc::Receiver<Envelope>) -> Self {
        tracing::info!("🎛️ Command router started");
        let writer_task = self.settings.clone().map(|store| {
            let (writer, task) = spawn_slot_writer(store);
            self.writer = Some(writer);
            task
        });

        while let Some(envelope) = inbox.recv().await {
            self.dispatch(envelope);
        }

        self.writer = None;
        if let Some(task) = writer_task {
            if let Err(e) = task.await {
                tracing::error!("❌ Slot writer failed: {}", e);
            }
        }
        tracing::info!("Command router stopped, all inputs closed");
        self
    }

    fn persist_slots(&self) {
        let Some(store) = &self.settings else {
            return;
        };
        let mut slots = self.controller.slots().slots();
        if let Some(writer) = &self.writer {
            match writer.send(slots) {
                Ok(()) => return,
                Err(mpsc::error::SendError(unsent)) => {
                    tracing::warn!("⚠️ Slot writer is gone, saving inline");
                    slots = unsent;
                }
            }
        }
        save_slots(store.as_ref(), &slots);
    }
}

fn save_slots(store: &dyn SettingsStore, slots: &[Slot]) {
    if let Err(e) = store.save_slots(slots) {
        tracing::error!("❌ Failed to save slot assignments: {}", e);
    }
}

/// Runs settings writes on the blocking pool, in submission order. Only the
/// newest queued snapshot is written.
fn spawn_slot_writer(
    store: Arc<dyn SettingsStore>,
) -> (mpsc::UnboundedSender<Vec<Slot>>, JoinHandle<()>) {
    let (writer, mut queue) = mpsc::unbounded_channel::<Vec<Slot>>();
    let task = tokio::task::spawn_blocking(move || {
        while let Some(mut slots) = queue.blocking_recv() {
            while let Ok(newer) = queue.try_recv() {
                slots = newer;
            }
            save_slots(store.as_ref(), &slots);
        }
    });
    (writer, task)
}
