use std::fmt;

use uuid::Uuid;

use crate::schedule::model::Schedule;

// Minted once when an entry enters the session and carried for the entry's
// whole lifetime; never derived from list position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    id: EntryId,
    pub schedule: Schedule,
}

impl ScheduleEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleEditor {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schedules(schedules: Vec<Schedule>) -> Self {
        Self {
            entries: schedules
                .into_iter()
                .map(|schedule| ScheduleEntry {
                    id: EntryId::mint(),
                    schedule,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Schedule> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.schedule)
    }

    pub fn add(&mut self, schedule: Schedule) -> EntryId {
        let id = EntryId::mint();
        self.entries.push(ScheduleEntry { id, schedule });
        id
    }

    pub fn update(&mut self, id: EntryId, apply: impl FnOnce(&mut Schedule)) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                apply(&mut entry.schedule);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Schedule> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).schedule)
    }

    pub fn to_schedules(&self) -> Vec<Schedule> {
        self.entries
            .iter()
            .map(|entry| entry.schedule.clone())
            .collect()
    }
}
