// Device registry endpoints
//
// Listing, creation and deletion under `/devices`. The gateway holds the
// registry; nothing here caches.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DeviceRecord, NewDevice};

impl ApiClient {
    /// List all registered devices.
    ///
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.endpoint(&["devices"])?;
        let body = self.send(Method::GET, url, None).await?;
        decode(&body)
    }

    /// Register a new device.
    ///
    /// `POST /devices` with `{device_id, device_type, mode}`. The gateway
    /// answers `{"message", "device"}`; the echoed record is returned when
    /// it can be read, minus any server-generated secret.
    pub async fn create_device(&self, device: &NewDevice<'_>) -> Result<Option<DeviceRecord>, Error> {
        let url = self.endpoint(&["devices"])?;
        debug!(device_id = device.device_id, "creating device");
        let payload = serde_json::to_value(device).map_err(|e| Error::Deserialization {
            message: format!("failed to encode device: {e}"),
            body: String::new(),
        })?;
        let body = self.send(Method::POST, url, Some(&payload)).await?;

        let record = body.get("device").unwrap_or(&body);
        Ok(DeviceRecord::deserialize(record).ok())
    }

    /// Delete a device by id.
    ///
    /// `DELETE /devices/{device_id}`. Unknown ids come back as HTTP 404.
    pub async fn delete_device(&self, device_id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["devices", device_id])?;
        debug!(device_id, "deleting device");
        let _: Value = self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}

fn decode(body: &Value) -> Result<Vec<DeviceRecord>, Error> {
    Vec::<DeviceRecord>::deserialize(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_string(),
    })
}
