use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use super::StoredState;
use crate::security::AlarmStatus;
use crate::security::ArmingStatus;
use crate::security::RepositoryError;
use crate::security::SecurityRepository;
use crate::security::Sensor;

/// Repository persisted as a JSON document.
///
/// The whole document is rewritten after every mutation: first to a sibling
/// `.tmp` file, then renamed over the original, so a crash never leaves a
/// half-written state behind.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    state: StoredState,
}

impl FileRepository {
    /// Open the repository at `path`. A missing file starts from the default
    /// state; an unreadable or corrupt one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();

        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| RepositoryError::Parse(path.clone(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No repository at {}, starting empty", path.display());
                StoredState::default()
            }
            Err(e) => return Err(RepositoryError::Io(path, e)),
        };

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(&self.state).map_err(RepositoryError::Serialize)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|e| RepositoryError::Io(tmp.clone(), e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| RepositoryError::Io(self.path.clone(), e))?;

        debug!("Saved repository to {}", self.path.display());
        Ok(())
    }
}

impl SecurityRepository for FileRepository {
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.state.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.state.arming_status = status;
        self.save()
    }

    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.state.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.state.alarm_status = status;
        self.save()
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.state.sensors())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.state.add_sensor(sensor)?;
        self.save()
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.state.remove_sensor(sensor);
        self.save()
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.state.update_sensor(sensor);
        self.save()
    }
}
