use super::StoredState;
use crate::security::AlarmStatus;
use crate::security::ArmingStatus;
use crate::security::RepositoryError;
use crate::security::SecurityRepository;
use crate::security::Sensor;

/// Repository that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: StoredState,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state
    pub fn with_state(state: StoredState) -> Self {
        Self { state }
    }
}

impl SecurityRepository for MemoryRepository {
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.state.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.state.arming_status = status;
        Ok(())
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.state.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.state.alarm_status = status;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.state.sensors())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.state.add_sensor(sensor)
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.state.remove_sensor(sensor);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.state.update_sensor(sensor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::SensorType;

    #[test]
    fn test_defaults() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.arming_status().unwrap(), ArmingStatus::Disarmed);
        assert_eq!(repo.alarm_status().unwrap(), AlarmStatus::NoAlarm);
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn test_sensors_sorted_by_identity() {
        let mut repo = MemoryRepository::new();
        repo.add_sensor(Sensor::new("Window B", SensorType::Window))
            .unwrap();
        repo.add_sensor(Sensor::new("Door A", SensorType::Door))
            .unwrap();

        let names: Vec<String> = repo
            .sensors()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Door A", "Window B"]);
    }

    #[test]
    fn test_update_unknown_sensor_inserts_it() {
        let mut repo = MemoryRepository::new();
        repo.update_sensor(&Sensor::new("Porch", SensorType::Motion).with_active(true))
            .unwrap();

        let sensors = repo.sensors().unwrap();
        assert_eq!(sensors.len(), 1);
        assert!(sensors[0].active);
    }

    #[test]
    fn test_remove_unknown_sensor_is_noop() {
        let mut repo = MemoryRepository::new();
        repo.add_sensor(Sensor::new("Porch", SensorType::Motion))
            .unwrap();
        repo.remove_sensor(&Sensor::new("Porch", SensorType::Door))
            .unwrap();
        assert_eq!(repo.sensors().unwrap().len(), 1);
    }
}
