use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::schedule::model::LightState;

// The device's two light-state operations, as seen by the sync controller.
pub trait LightStateTransport: Send + Sync {
    fn read(&self) -> Result<LightState, DeviceError>;
    fn update(&self, state: &LightState) -> Result<LightState, DeviceError>;
}

#[derive(Debug, Clone)]
pub struct DeviceClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl DeviceClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub struct DeviceClient {
    http: Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(config: DeviceClientConfig) -> Result<Self, DeviceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| DeviceError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn read_light_state(&self) -> Result<LightState, DeviceError> {
        let url = self.url("/rgbLightState");
        debug!("GET {url}");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Network(format!(
                "device answered HTTP {status} for {url}"
            )));
        }
        Ok(response.json()?)
    }

    pub fn update_light_state(&self, state: &LightState) -> Result<LightState, DeviceError> {
        let url = self.url("/rgbLightState");
        debug!("POST {url}");
        let response = self.http.post(&url).json(state).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeviceError::Validation(format!(
                "HTTP {status}: {}",
                body.trim()
            )));
        }
        Ok(response.json()?)
    }

    pub fn read_ntp_status(&self) -> Result<NtpStatus, DeviceError> {
        let url = self.url("/ntpStatus");
        debug!("GET {url}");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Network(format!(
                "device answered HTTP {status} for {url}"
            )));
        }
        Ok(response.json()?)
    }

    pub fn set_device_time(&self, local_time: &str) -> Result<(), DeviceError> {
        let url = self.url("/time");
        debug!("POST {url}");
        let request = TimeSetRequest {
            local_time: local_time.to_string(),
        };
        let response = self.http.post(&url).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeviceError::Validation(format!(
                "HTTP {status}: {}",
                body.trim()
            )));
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl LightStateTransport for DeviceClient {
    fn read(&self) -> Result<LightState, DeviceError> {
        self.read_light_state()
    }

    fn update(&self, state: &LightState) -> Result<LightState, DeviceError> {
        self.update_light_state(state)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NtpSyncStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NtpStatus {
    pub status: NtpSyncStatus,
    pub local_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TimeSetRequest {
    pub(crate) local_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = DeviceClient::new(DeviceClientConfig::new("http://192.168.4.1/rest/"))
            .expect("client builds");
        assert_eq!(
            client.url("/rgbLightState"),
            "http://192.168.4.1/rest/rgbLightState"
        );
    }

    #[test]
    fn ntp_status_decodes_wire_strings() {
        let status = serde_json::from_str::<NtpStatus>(
            r#"{ "status": "INACTIVE", "local_time": "2026-08-04T10:15:00" }"#,
        )
        .expect("valid status");
        assert_eq!(status.status, NtpSyncStatus::Inactive);
        assert_eq!(status.local_time, "2026-08-04T10:15:00");
    }

    #[test]
    fn unknown_ntp_status_fails_to_decode() {
        let result = serde_json::from_str::<NtpStatus>(
            r#"{ "status": "SOMETIMES", "local_time": "2026-08-04T10:15:00" }"#,
        );
        assert!(result.is_err());
    }
}
