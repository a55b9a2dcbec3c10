use super::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Write state of one document.
#[derive(Debug, Default)]
struct Slot {
    in_flight: bool,
    pending: Option<Vec<u8>>,
}

/// Background writer with at most one write per document in flight.
///
/// A request for a document that is already being written replaces any
/// earlier pending content; the in-flight task picks it up when it
/// finishes, so repeated saves collapse into one trailing write.
pub struct Writer {
    storage: Arc<dyn Storage>,
    slots: Arc<Mutex<BTreeMap<String, Slot>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Writer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            slots: Arc::new(Mutex::new(BTreeMap::new())),
            tasks: Mutex::new(Vec::new()),
        }
    }
    /// Schedule `bytes` to become the contents of `name`.
    pub async fn write(&self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(name.clone()).or_default();
            if slot.in_flight {
                log::debug!("[writer] {} busy, coalescing", name);
                slot.pending = Some(bytes);
                return;
            }
            slot.in_flight = true;
        }
        let storage = self.storage.clone();
        let slots = self.slots.clone();
        let task = tokio::spawn(Self::drain(storage, slots, name, bytes));
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }
    /// Wait for every scheduled write, including coalesced ones.
    pub async fn flush(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                log::error!("[writer] write task failed: {}", e);
            }
        }
    }
    async fn drain(
        storage: Arc<dyn Storage>,
        slots: Arc<Mutex<BTreeMap<String, Slot>>>,
        name: String,
        mut bytes: Vec<u8>,
    ) {
        loop {
            if let Err(e) = storage.write(&name, bytes).await {
                log::error!("[writer] failed to write {}: {}", name, e);
            }
            let mut slots = slots.lock().await;
            let Some(slot) = slots.get_mut(&name) else {
                return;
            };
            match slot.pending.take() {
                Some(next) => bytes = next,
                None => {
                    slot.in_flight = false;
                    return;
                }
            }
        }
    }
}
