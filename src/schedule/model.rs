use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RgbPins {
    #[serde(rename = "rPin", default = "default_r_pin")]
    pub r_pin: u8,
    #[serde(rename = "gPin", default = "default_g_pin")]
    pub g_pin: u8,
    #[serde(rename = "bPin", default = "default_b_pin")]
    pub b_pin: u8,
}

impl Default for RgbPins {
    fn default() -> Self {
        Self {
            r_pin: default_r_pin(),
            g_pin: default_g_pin(),
            b_pin: default_b_pin(),
        }
    }
}

fn default_r_pin() -> u8 {
    25
}

fn default_g_pin() -> u8 {
    26
}

fn default_b_pin() -> u8 {
    27
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub start: i64,
    pub end: i64,
    pub color: RgbColor,
    #[serde(rename = "daysActive", default)]
    pub days_active: Vec<String>,
}

impl Schedule {
    pub fn is_recurring(&self) -> bool {
        !self.days_active.is_empty()
    }

    // Day names outside WEEKDAY_NAMES are carried as-is and simply never match.
    pub fn runs_on(&self, day: Weekday) -> bool {
        let name = weekday_name(day);
        self.days_active.iter().any(|entry| entry == name)
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    #[serde(default)]
    pub pins: RgbPins,
    #[serde(default)]
    pub color: RgbColor,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}
