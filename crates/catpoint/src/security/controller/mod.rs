//! Alarm decision logic.
//!
//! The controller turns sensor events, camera classifications and arming
//! changes into alarm status transitions. It holds no persistent state of its
//! own: every decision reads the current statuses and sensor set from the
//! repository and writes the outcome back through it. The only thing the
//! controller remembers between calls is the result of the last image
//! classification.
//!
//! ```text
//!              sensor on (armed)          sensor on
//!   NO_ALARM ──────────────────► PENDING ───────────► ALARM
//!      ▲                            │                   │
//!      │   last sensor off          │                   │
//!      └────────────────────────────┘                   │
//!      ▲                                                │
//!      └──────── disarm, or no cat and all sensors off ─┘
//! ```
//!
//! `ALARM` ignores sensor changes entirely. A cat seen while armed home goes
//! straight to `ALARM`, as does arming home while a cat is still in view.

use std::sync::Arc;

use catpoint_image::ClassifierError;
use catpoint_image::ImageClassifier;
use tracing::debug;
use tracing::info;

use super::listener::same_listener;
use super::listener::StatusListener;
use super::repository::RepositoryError;
use super::repository::SecurityRepository;
use super::sensor::Sensor;
use super::status::AlarmStatus;
use super::status::ArmingStatus;


/// Failures surfaced by controller operations.
///
/// Collaborator errors pass through untouched so callers see exactly what the
/// repository or classifier reported.
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Home security controller
///
/// Owns the listener set and the remembered cat-detection state; everything
/// else lives in the repository.
pub struct SecurityController<R, C> {
    repository: R,
    classifier: C,
    listeners: Vec<Arc<dyn StatusListener>>,
    cat_detected: bool,
}

impl<R: SecurityRepository, C: ImageClassifier> SecurityController<R, C> {
    /// Create a controller over a repository and classifier.
    ///
    /// Starting statuses are whatever the repository reports.
    pub fn new(repository: R, classifier: C) -> Self {
        Self {
            repository,
            classifier,
            listeners: Vec::new(),
            cat_detected: false,
        }
    }

    /// Register a listener. Registering the same listener twice has no effect.
    pub fn add_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        if !self.listeners.iter().any(|l| same_listener(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    /// Deregister a listener. Unknown listeners are ignored.
    pub fn remove_status_listener(&mut self, listener: &Arc<dyn StatusListener>) {
        self.listeners.retain(|l| !same_listener(l, listener));
    }

    /// Write the alarm status and notify every listener.
    ///
    /// All alarm status changes, internal or external, go through here.
    pub fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), SecurityError> {
        self.repository.set_alarm_status(status)?;
        info!(%status, "alarm status set");
        self.notify(|l| l.alarm_status_changed(status));
        Ok(())
    }

    /// Change the arming mode.
    ///
    /// Arming deactivates every sensor. Going from an armed mode to disarmed
    /// clears the alarm; arming home while the last image showed a cat raises
    /// it immediately.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), SecurityError> {
        let current = self.repository.arming_status()?;

        if status.is_armed() {
            for sensor in self.repository.sensors()? {
                self.repository.update_sensor(&sensor.with_active(false))?;
            }
        }

        if status == ArmingStatus::Disarmed && current.is_armed() {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        } else if self.cat_detected && status == ArmingStatus::ArmedHome {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        }

        self.repository.set_arming_status(status)?;
        info!(from = %current, to = %status, "arming status changed");
        self.notify(|l| l.sensor_status_changed());
        Ok(())
    }

    /// Arm (or disarm) the system and make sure no sensor is left active.
    ///
    /// The extra reset only touches sensors that are still active, so after
    /// `set_arming_status` has already cleared them it writes nothing.
    pub fn arm_system(&mut self, status: ArmingStatus) -> Result<(), SecurityError> {
        self.set_arming_status(status)?;
        if status.is_armed() {
            self.reset_active_sensors()?;
        }
        Ok(())
    }

    fn reset_active_sensors(&mut self) -> Result<(), SecurityError> {
        for sensor in self.repository.sensors()? {
            if sensor.active {
                debug!(%sensor, "resetting sensor left active after arming");
                self.repository.update_sensor(&sensor.with_active(false))?;
            }
        }
        Ok(())
    }

    /// Record a sensor's new activation state, updating the alarm status if
    /// the flag actually flips.
    pub fn change_sensor_activation_status(
        &mut self,
        sensor: &Sensor,
        active: bool,
    ) -> Result<(), SecurityError> {
        let alarm = self.repository.alarm_status()?;
        let arming = self.repository.arming_status()?;
        let sensors = self.repository.sensors()?;

        // The stored flag wins over the caller's copy when the sensor is known.
        let was_active = sensors
            .iter()
            .find(|s| *s == sensor)
            .map_or(sensor.active, |s| s.active);

        if was_active == active {
            debug!(%sensor, active, "sensor activation unchanged");
        } else if alarm == AlarmStatus::Alarm {
            debug!(%sensor, active, "alarm active, ignoring sensor change");
        } else if active {
            self.handle_sensor_activated(arming, alarm)?;
        } else {
            let all_inactive = sensors.iter().filter(|s| *s != sensor).all(|s| !s.active);
            self.handle_sensor_deactivated(alarm, all_inactive)?;
        }

        self.repository
            .update_sensor(&sensor.clone().with_active(active))?;
        info!(%sensor, active, "sensor activation changed");
        Ok(())
    }

    fn handle_sensor_activated(
        &mut self,
        arming: ArmingStatus,
        alarm: AlarmStatus,
    ) -> Result<(), SecurityError> {
        if arming.is_armed() && alarm == AlarmStatus::NoAlarm {
            self.set_alarm_status(AlarmStatus::PendingAlarm)?;
        } else if alarm == AlarmStatus::PendingAlarm {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        }
        Ok(())
    }

    fn handle_sensor_deactivated(
        &mut self,
        alarm: AlarmStatus,
        all_inactive: bool,
    ) -> Result<(), SecurityError> {
        if !all_inactive {
            return Ok(());
        }
        // Alarm returned early, so without a cat this re-asserts NoAlarm.
        if alarm == AlarmStatus::PendingAlarm || !self.cat_detected {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }
        Ok(())
    }

    /// Classify the current camera image and react to the result.
    ///
    /// A cat while armed home raises the alarm. No cat with every sensor
    /// inactive clears it. Returns whether a cat was seen.
    pub fn process_image(&mut self) -> Result<bool, SecurityError> {
        let cat = self.classifier.image_contains_cat()?;
        self.cat_detected = cat;
        debug!(cat, "image classified");

        if cat && self.repository.arming_status()? == ArmingStatus::ArmedHome {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        } else if !cat
            && self.all_sensors_inactive()?
            && self.repository.alarm_status()? != AlarmStatus::NoAlarm
        {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }

        self.notify(|l| l.cat_detected(cat));
        Ok(cat)
    }

    fn all_sensors_inactive(&self) -> Result<bool, SecurityError> {
        Ok(self.repository.sensors()?.iter().all(|s| !s.active))
    }

    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), SecurityError> {
        info!(%sensor, "adding sensor");
        Ok(self.repository.add_sensor(sensor)?)
    }

    pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), SecurityError> {
        info!(%sensor, "removing sensor");
        Ok(self.repository.remove_sensor(sensor)?)
    }

    pub fn alarm_status(&self) -> Result<AlarmStatus, SecurityError> {
        Ok(self.repository.alarm_status()?)
    }

    pub fn arming_status(&self) -> Result<ArmingStatus, SecurityError> {
        Ok(self.repository.arming_status()?)
    }

    pub fn sensors(&self) -> Result<Vec<Sensor>, SecurityError> {
        Ok(self.repository.sensors()?)
    }

    /// Result of the most recent image classification
    pub fn cat_detected(&self) -> bool {
        self.cat_detected
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn notify(&self, event: impl Fn(&dyn StatusListener)) {
        for listener in &self.listeners {
            event(listener.as_ref());
        }
    }
}
