use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// User-selected operating mode of the system.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ArmingStatus {
    #[default]
    #[strum(to_string = "disarmed", serialize = "off")]
    Disarmed,
    #[strum(to_string = "armed_home", serialize = "home")]
    ArmedHome,
    #[strum(to_string = "armed_away", serialize = "away")]
    ArmedAway,
}

impl ArmingStatus {
    /// Whether this mode watches the sensors at all
    pub fn is_armed(self) -> bool {
        !matches!(self, ArmingStatus::Disarmed)
    }
}

/// The controller's judgment of danger.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    PendingAlarm,
    Alarm,
}
