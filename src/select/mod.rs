//! The reactive core: turns a category selection into one atomically
//! published update of all three derived views, suppressing the results of
//! superseded selections so a slow-then-fast sequence can never render
//! out of order.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use tokio::{sync::mpsc, task};
use tracing::{debug, info};

use crate::{
    error::{SelectError, UnknownCategoryError},
    series::{self, DashboardUpdate},
    store::DatasetStore,
};

/// Published updates that may queue before the consumer drains them.
const CHANNEL_DEPTH: usize = 16;

pub struct SelectionController {
    store: Arc<DatasetStore>,
    /// Monotonic selection counter; a computation may only publish if this
    /// still holds the value it started with.
    generation: AtomicU64,
    current: Mutex<Option<Arc<DashboardUpdate>>>,
    tx: mpsc::Sender<Arc<DashboardUpdate>>,
}

impl SelectionController {
    /// Build a controller plus the receiving end for the single consumer
    /// on the presentation side.
    pub fn new(store: Arc<DatasetStore>) -> (Arc<Self>, mpsc::Receiver<Arc<DashboardUpdate>>) {
        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
        let controller = Arc::new(Self {
            store,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            tx,
        });
        (controller, rx)
    }

    /// Derive and publish the three views for `category`.
    ///
    /// Returns the published update, or `Ok(None)` when a newer selection
    /// began while this one was computing; its result is discarded, never
    /// published. On an unknown category nothing is published and the
    /// previously published update stays current.
    pub async fn select(
        &self,
        category: &str,
    ) -> Result<Option<Arc<DashboardUpdate>>, SelectError> {
        let generation = self.begin();
        let store = Arc::clone(&self.store);
        let requested = category.to_string();

        // The derivation is pure CPU work; keep it off the async runtime.
        let update = task::spawn_blocking(move || compute_update(&store, &requested)).await??;

        Ok(self.publish(generation, update))
    }

    /// The last published update, if any selection has completed yet.
    pub fn current(&self) -> Option<Arc<DashboardUpdate>> {
        self.current.lock().unwrap().clone()
    }

    /// Start a new selection cycle, superseding any still in flight.
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish `update` unless a newer cycle began after `generation`.
    fn publish(&self, generation: u64, update: DashboardUpdate) -> Option<Arc<DashboardUpdate>> {
        let update = Arc::new(update);
        {
            // Checking the generation under the same lock that guards
            // `current` keeps a superseded publisher from overwriting a
            // newer update it lost the race to.
            let mut current = self.current.lock().unwrap();
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(category = %update.category, "discarding superseded selection");
                return None;
            }
            *current = Some(Arc::clone(&update));
        }

        if let Err(err) = self.tx.try_send(Arc::clone(&update)) {
            debug!(%err, "subscriber not draining, update dropped from channel");
        }
        info!(
            category = %update.category,
            cities = update.cities.len(),
            years = update.years.len(),
            markers = update.markers.len(),
            "published selection"
        );
        Some(update)
    }
}

/// One full derivation pass. The projector output feeds the joiner, so all
/// three views come from the same category in the same pass.
fn compute_update(
    store: &DatasetStore,
    category: &str,
) -> Result<DashboardUpdate, UnknownCategoryError> {
    let cities = series::project(store.cities(), category)?;
    let years = series::aggregate(store.years(), category)?;
    let markers = series::join(&cities, store.geo());
    Ok(DashboardUpdate {
        category: category.to_string(),
        cities,
        years,
        markers,
    })
}
