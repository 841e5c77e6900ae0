//! Task that owns a `CustomizationStore` and serializes writes to it.
//!
//! Commands arrive over an mpsc channel. After every applied command the
//! actor publishes a fresh `Arc<CustomizationState>` over a watch channel;
//! readers only ever see whole snapshots. Drag-style commands (sliders and
//! colour pickers) pass through a `Throttle` per edited target first.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::SendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::state::CustomizationState;
use super::store::{CustomizationStore, StoreCommand};
use super::throttle::{Throttle, THROTTLE_MS};

const CHANNEL_CAPACITY: usize = 64;

/// What a throttled command edits. Drags on different targets do not
/// swallow each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ThrottleKey {
    HslShift,
    SingleColor,
    SolidOverride(String),
    GradientStop(String, usize),
    CollapsedStop(String, usize),
}

impl ThrottleKey {
    fn of(command: &StoreCommand) -> Option<Self> {
        match command {
            StoreCommand::SetHslShift(_) => Some(Self::HslShift),
            StoreCommand::SetSingleColor(_) => Some(Self::SingleColor),
            StoreCommand::SetSolidOverride { original, .. } => {
                Some(Self::SolidOverride(original.clone()))
            }
            StoreCommand::SetGradientStop { hash, index, .. } => {
                Some(Self::GradientStop(hash.clone(), *index))
            }
            StoreCommand::SetCollapsedStop {
                signature,
                ui_index,
                ..
            } => Some(Self::CollapsedStop(signature.clone(), *ui_index)),
            _ => None,
        }
    }
}

/// Cloneable front end of a running `StoreActor`.
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::Sender<StoreCommand>,
    snapshots: watch::Receiver<Arc<CustomizationState>>,
}

impl StoreHandle {
    pub async fn send(&self, command: StoreCommand) -> Result<(), SendError<StoreCommand>> {
        self.commands.send(command).await
    }

    /// The latest published state.
    pub fn snapshot(&self) -> Arc<CustomizationState> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CustomizationState>> {
        self.snapshots.clone()
    }
}

pub struct StoreActor {
    store: CustomizationStore,
    commands: mpsc::Receiver<StoreCommand>,
    snapshots: watch::Sender<Arc<CustomizationState>>,
    window: Duration,
    throttles: HashMap<ThrottleKey, Throttle<StoreCommand>>,
}

impl StoreActor {
    /// Spawn with the default throttle window.
    pub fn spawn(store: CustomizationStore) -> (StoreHandle, JoinHandle<CustomizationStore>) {
        Self::spawn_with_window(store, Duration::from_millis(THROTTLE_MS))
    }

    /// Spawn the actor. The task ends, returning the store, once every
    /// handle is dropped.
    pub fn spawn_with_window(
        store: CustomizationStore,
        window: Duration,
    ) -> (StoreHandle, JoinHandle<CustomizationStore>) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(store.state().clone()));

        let actor = StoreActor {
            store,
            commands: command_rx,
            snapshots: snapshot_tx,
            window,
            throttles: HashMap::new(),
        };
        let task = tokio::spawn(actor.run());

        let handle = StoreHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self) -> CustomizationStore {
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command, Instant::now()),
                    None => break,
                },
                _ = wait_until(deadline) => self.poll(Instant::now()),
            }
        }

        let pending: Vec<StoreCommand> =
            self.throttles.values_mut().filter_map(Throttle::flush).collect();
        for command in pending {
            self.store.apply(command);
        }
        self.publish();
        debug!("customization store actor stopped");
        self.store
    }

    fn handle(&mut self, command: StoreCommand, now: Instant) {
        if let Some(key) = ThrottleKey::of(&command) {
            let window = self.window;
            let throttle = self.throttles.entry(key).or_insert_with(|| Throttle::new(window));
            if let Some(command) = throttle.offer(command, now) {
                self.store.apply(command);
                self.publish();
            }
            return;
        }

        match command {
            StoreCommand::Reset | StoreCommand::Load(_) => {
                // Pending drags belong to the state being replaced
                self.throttles.clear();
                self.store.apply(command);
                self.publish();
            }
            StoreCommand::ClearSolidOverride(ref original) => {
                if let Some(throttle) = self
                    .throttles
                    .get_mut(&ThrottleKey::SolidOverride(original.clone()))
                {
                    throttle.flush();
                }
                self.store.apply(command);
                self.publish();
            }
            command => {
                self.store.apply(command);
                self.publish();
            }
        }
    }

    fn poll(&mut self, now: Instant) {
        let due: Vec<StoreCommand> = self
            .throttles
            .values_mut()
            .filter_map(|throttle| throttle.poll(now))
            .collect();
        self.throttles.retain(|_, throttle| !throttle.is_idle(now));
        if due.is_empty() {
            return;
        }
        for command in due {
            self.store.apply(command);
        }
        self.publish();
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.throttles.values().filter_map(Throttle::deadline).min()
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::new(self.store.state().clone()));
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending::<()>().await,
    }
}
