use chrono::{Local, NaiveDateTime};
use log::{info, warn};

use crate::device::{DeviceClient, NtpStatus, NtpSyncStatus};
use crate::error::DeviceError;
use crate::timeutil::EDITABLE_FORMAT;

pub const MAX_CLOCK_DRIFT_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClockCorrection {
    NtpActive,
    InSync,
    Corrected,
}

// When the device has no NTP, its clock free-runs; push the panel's local
// time whenever the reported drift exceeds MAX_CLOCK_DRIFT_SECONDS.
pub fn correct_device_clock(client: &DeviceClient) -> Result<ClockCorrection, DeviceError> {
    let status = client.read_ntp_status()?;
    if status.status == NtpSyncStatus::Active {
        return Ok(ClockCorrection::NtpActive);
    }
    match pending_correction(&status, Local::now().naive_local())? {
        Some(local_time) => {
            warn!(
                "device clock drifted more than {MAX_CLOCK_DRIFT_SECONDS}s while NTP is inactive, setting {local_time}"
            );
            client.set_device_time(&local_time)?;
            info!("device time set to the panel's current local time");
            Ok(ClockCorrection::Corrected)
        }
        None => Ok(ClockCorrection::InSync),
    }
}

pub(crate) fn pending_correction(
    status: &NtpStatus,
    now: NaiveDateTime,
) -> Result<Option<String>, DeviceError> {
    if status.status == NtpSyncStatus::Active {
        return Ok(None);
    }
    let device_time = parse_device_local_time(&status.local_time)?;
    let drift_seconds = (now - device_time).num_seconds().abs();
    if drift_seconds <= MAX_CLOCK_DRIFT_SECONDS {
        return Ok(None);
    }
    Ok(Some(now.format(EDITABLE_FORMAT).to_string()))
}

fn parse_device_local_time(raw: &str) -> Result<NaiveDateTime, DeviceError> {
    // The device may append fractional seconds or a zone suffix; only the
    // leading YYYY-MM-DDTHH:MM:SS is meaningful.
    let head = raw.get(..19).unwrap_or(raw);
    NaiveDateTime::parse_from_str(head, EDITABLE_FORMAT)
        .map_err(|_| DeviceError::Decode(format!("unparseable device local time '{raw}'")))
}
