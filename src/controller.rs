use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::device::LightStateTransport;
use crate::error::{OperationKind, SyncError};
use crate::schedule::editor::ScheduleEditor;
use crate::schedule::model::{LightState, RgbColor, RgbPins};

#[derive(Debug, Clone)]
pub struct LightDraft {
    pub pins: RgbPins,
    pub color: RgbColor,
    pub schedules: ScheduleEditor,
}

impl LightDraft {
    fn from_state(state: LightState) -> Self {
        Self {
            pins: state.pins,
            color: state.color,
            schedules: ScheduleEditor::from_schedules(state.schedules),
        }
    }

    pub fn to_state(&self) -> LightState {
        LightState {
            pins: self.pins,
            color: self.color,
            schedules: self.schedules.to_schedules(),
        }
    }
}

pub struct LightStateController {
    transport: Box<dyn LightStateTransport>,
    draft: Mutex<Option<LightDraft>>,
    load_in_flight: InFlight,
    save_in_flight: InFlight,
}

impl LightStateController {
    pub fn new(transport: Box<dyn LightStateTransport>) -> Self {
        Self {
            transport,
            draft: Mutex::new(None),
            load_in_flight: InFlight::new(OperationKind::Load),
            save_in_flight: InFlight::new(OperationKind::Save),
        }
    }

    // Replaces the draft wholesale on success; a failed load leaves any
    // existing draft untouched.
    pub fn load(&self) -> Result<LightState, SyncError> {
        let _guard = self.load_in_flight.begin()?;
        let state = self.transport.read()?;
        info!("loaded light state with {} schedule(s)", state.schedules.len());
        *self.lock_draft() = Some(LightDraft::from_state(state.clone()));
        Ok(state)
    }

    pub fn mutate(&self, apply: impl FnOnce(&mut LightDraft)) {
        let mut draft = self.lock_draft();
        if let Some(draft) = draft.as_mut() {
            apply(draft);
        }
    }

    // Transmits the flattened draft verbatim and returns the device's echo.
    // The draft itself is never written by save, success or failure.
    pub fn save(&self) -> Result<LightState, SyncError> {
        let _guard = self.save_in_flight.begin()?;
        let payload = self
            .lock_draft()
            .as_ref()
            .ok_or(SyncError::NothingLoaded)?
            .to_state();
        debug!("submitting {} schedule(s)", payload.schedules.len());
        let echoed = self.transport.update(&payload)?;
        info!("device acknowledged the submitted light state");
        Ok(echoed)
    }

    pub fn with_draft<R>(&self, read: impl FnOnce(&LightDraft) -> R) -> Option<R> {
        self.lock_draft().as_ref().map(read)
    }

    pub fn snapshot(&self) -> Option<LightState> {
        self.lock_draft().as_ref().map(LightDraft::to_state)
    }

    pub fn has_draft(&self) -> bool {
        self.lock_draft().is_some()
    }

    fn lock_draft(&self) -> MutexGuard<'_, Option<LightDraft>> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct InFlight {
    kind: OperationKind,
    flag: AtomicBool,
}

impl InFlight {
    fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            flag: AtomicBool::new(false),
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, SyncError> {
        if self.flag.swap(true, Ordering::SeqCst) {
            return Err(SyncError::Busy(self.kind));
        }
        Ok(InFlightGuard { flag: &self.flag })
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
