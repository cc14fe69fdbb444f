mod controller;
mod listener;
mod repository;
mod sensor;
mod status;

pub use controller::SecurityController;
pub use controller::SecurityError;
pub use listener::StatusListener;
pub use listener::TracingListener;
pub use repository::RepositoryError;
pub use repository::SecurityRepository;
pub use sensor::Sensor;
pub use sensor::SensorType;
pub use status::AlarmStatus;
pub use status::ArmingStatus;

#[cfg(test)]
pub(crate) use listener::testing;
#[cfg(test)]
pub(crate) use repository::MockRepository;
