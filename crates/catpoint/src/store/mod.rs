//! Repository implementations.
//!
//! Both stores keep the same [`StoredState`] document; the file store
//! additionally writes it to disk after every mutation.

mod file;
mod memory;

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

pub use file::FileRepository;
pub use memory::MemoryRepository;

use crate::security::AlarmStatus;
use crate::security::ArmingStatus;
use crate::security::RepositoryError;
use crate::security::Sensor;

/// Everything a repository persists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub arming_status: ArmingStatus,

    #[serde(default)]
    pub alarm_status: AlarmStatus,

    #[serde(default)]
    pub sensors: BTreeSet<Sensor>,
}

impl StoredState {
    fn sensors(&self) -> Vec<Sensor> {
        self.sensors.iter().cloned().collect()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        if self.sensors.contains(&sensor) {
            return Err(RepositoryError::DuplicateSensor(sensor.to_string()));
        }
        self.sensors.insert(sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) {
        self.sensors.remove(sensor);
    }

    fn update_sensor(&mut self, sensor: &Sensor) {
        self.sensors.replace(sensor.clone());
    }
}
