use std::path::PathBuf;

use super::sensor::Sensor;
use super::status::AlarmStatus;
use super::status::ArmingStatus;

/// Errors raised by repository implementations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Failed to access repository file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse repository file {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to serialize repository state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Sensor already exists: {0}")]
    DuplicateSensor(String),
}

/// Storage for the sensor set and the two status values.
///
/// The repository is the only source of truth for persisted state. Sensor
/// identity is `(name, sensor_type)`; `update_sensor` replaces the stored
/// copy, inserting it if the repository has not seen it before.
pub trait SecurityRepository: Send {
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError>;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError>;

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError>;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError>;

    /// All sensors, ordered by identity
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError>;

    /// Add a new sensor. Fails with `DuplicateSensor` if it is already known.
    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError>;

    /// Remove a sensor. Unknown sensors are ignored.
    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError>;

    /// Persist the sensor's current activation flag
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError>;
}

impl<T: SecurityRepository + ?Sized> SecurityRepository for Box<T> {
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        (**self).arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        (**self).set_arming_status(status)
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        (**self).alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        (**self).set_alarm_status(status)
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        (**self).sensors()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        (**self).remove_sensor(sensor)
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        (**self).update_sensor(sensor)
    }
}

/// Mock repository for testing
///
/// Holds state in plain fields and records every write so tests can assert on
/// exactly which persistence calls the controller made.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockRepository {
    pub arming: ArmingStatus,
    pub alarm: AlarmStatus,
    pub sensors: Vec<Sensor>,
    pub alarm_writes: Vec<AlarmStatus>,
    pub arming_writes: Vec<ArmingStatus>,
    pub sensor_updates: Vec<Sensor>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MockRepository {
    pub fn new(arming: ArmingStatus, alarm: AlarmStatus) -> Self {
        Self {
            arming,
            alarm,
            ..Self::default()
        }
    }

    pub fn with_sensors(mut self, sensors: impl IntoIterator<Item = Sensor>) -> Self {
        self.sensors.extend(sensors);
        self
    }

    /// Stored copy of a sensor
    pub fn sensor(&self, sensor: &Sensor) -> Option<&Sensor> {
        self.sensors.iter().find(|s| *s == sensor)
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Io(
                PathBuf::from("mock"),
                std::io::Error::other("storage unavailable"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl SecurityRepository for MockRepository {
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.arming)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.arming_writes.push(status);
        self.arming = status;
        Ok(())
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.alarm)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.alarm_writes.push(status);
        self.alarm = status;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.sensors.clone())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.check_writable()?;
        if self.sensors.contains(&sensor) {
            return Err(RepositoryError::DuplicateSensor(sensor.to_string()));
        }
        self.sensors.push(sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.sensors.retain(|s| s != sensor);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.sensor_updates.push(sensor.clone());
        match self.sensors.iter_mut().find(|s| *s == sensor) {
            Some(stored) => stored.active = sensor.active,
            None => self.sensors.push(sensor.clone()),
        }
        Ok(())
    }
}
