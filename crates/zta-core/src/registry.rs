// ── Device registry client ──
//
// Client-side mirror of the gateway's device table. The gateway is the
// source of truth: every mutation is followed by a full re-list, and the
// local list is only ever replaced wholesale.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use zta_api::{ApiClient, NewDevice};

use crate::convert::devices_from_records;
use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceMode, DeviceType};
use crate::store::{ResourceState, ResourceView};

/// Cached device list plus the operations that keep it in sync.
pub struct DeviceRegistry {
    api: Arc<ApiClient>,
    state: ResourceState<Vec<Device>>,
    /// Held by `add`/`remove` from dispatch until the resync settles.
    mutation: Mutex<()>,
}

impl DeviceRegistry {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: ResourceState::new(),
            mutation: Mutex::new(()),
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch every device and replace the cached list.
    ///
    /// Returns what this call fetched. If a later-issued `list` has already
    /// been applied, the cache keeps that newer list and this result is
    /// dropped from it. On failure the cache is kept and the error is
    /// recorded in the view.
    pub async fn list(&self) -> Result<Arc<Vec<Device>>, CoreError> {
        let ticket = self.state.begin();
        let seq = ticket.seq();

        match self.api.list_devices().await {
            Ok(records) => {
                let received = records.len();
                let devices = Arc::new(devices_from_records(records));
                let skipped = received - devices.len();
                if ticket.succeed_partial(Arc::clone(&devices), skipped) {
                    debug!(seq, count = devices.len(), skipped, "device list applied");
                } else {
                    debug!(seq, "device list superseded, discarded");
                }
                Ok(devices)
            }
            Err(source) => {
                let err = CoreError::Fetch {
                    resource: "devices",
                    source,
                };
                ticket.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Register a device, then re-list.
    ///
    /// A blank id is refused before anything is sent. The cache is left
    /// untouched if the gateway refuses the device.
    pub async fn add(
        &self,
        device_id: &str,
        device_type: DeviceType,
        mode: DeviceMode,
    ) -> Result<(), CoreError> {
        let device_id = DeviceId::new(device_id)?;
        let _guard = self
            .mutation
            .try_lock()
            .map_err(|_| CoreError::MutationInFlight { operation: "add" })?;

        self.create(&device_id, device_type, mode).await?;
        self.resync("add").await;
        Ok(())
    }

    /// Delete a device, then re-list.
    ///
    /// The cache is left untouched if the delete fails.
    pub async fn remove(&self, device_id: &str) -> Result<(), CoreError> {
        let device_id = DeviceId::new(device_id)?;
        let _guard = self
            .mutation
            .try_lock()
            .map_err(|_| CoreError::MutationInFlight {
                operation: "remove",
            })?;

        self.delete(&device_id).await?;
        self.resync("remove").await;
        Ok(())
    }

    async fn create(
        &self,
        device_id: &DeviceId,
        device_type: DeviceType,
        mode: DeviceMode,
    ) -> Result<(), CoreError> {
        let payload = NewDevice {
            device_id: device_id.as_str(),
            device_type: device_type.as_str(),
            mode: mode.as_str(),
        };

        match self.api.create_device(&payload).await {
            Ok(_) => {
                info!(%device_id, %device_type, %mode, "device added");
                self.state.mark_stale();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::create(device_id.as_str(), e);
                self.state.report_error(err.to_string());
                Err(err)
            }
        }
    }

    async fn delete(&self, device_id: &DeviceId) -> Result<(), CoreError> {
        match self.api.delete_device(device_id.as_str()).await {
            Ok(()) => {
                info!(%device_id, "device removed");
                self.state.mark_stale();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::remove(device_id.as_str(), e);
                self.state.report_error(err.to_string());
                Err(err)
            }
        }
    }

    /// The mutation already happened on the gateway; a failed re-list only
    /// leaves the view stale with its error set.
    async fn resync(&self, operation: &'static str) {
        if let Err(e) = self.list().await {
            warn!(operation, error = %e, "resync after mutation failed");
        }
    }

    // ── State accessors ──────────────────────────────────────────────

    /// Cached devices. Empty until the first successful `list`.
    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.state.data().unwrap_or_default()
    }

    pub fn device(&self, device_id: &str) -> Option<Device> {
        self.devices()
            .iter()
            .find(|d| d.device_id.as_str() == device_id)
            .cloned()
    }

    pub fn view(&self) -> ResourceView<Vec<Device>> {
        self.state.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceView<Vec<Device>>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.view().error
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.view().last_updated
    }

    /// Gateway records missing from [`devices`](Self::devices) because
    /// their type or mode is not one this client knows.
    pub fn skipped_records(&self) -> usize {
        self.view().skipped
    }

    /// Whether an `add` or `remove` is between dispatch and resync.
    pub fn is_mutating(&self) -> bool {
        self.mutation.try_lock().is_err()
    }

    /// Discard the results of every request issued so far.
    pub fn detach(&self) {
        self.state.detach();
    }
}
