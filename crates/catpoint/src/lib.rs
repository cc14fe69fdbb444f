pub mod cli;
pub mod config;
pub mod daemon;
pub mod security;
pub mod store;

pub use config::Config;
pub use config::LogLevel;
pub use security::AlarmStatus;
pub use security::ArmingStatus;
pub use security::SecurityController;
pub use security::SecurityError;
pub use security::SecurityRepository;
pub use security::Sensor;
pub use security::SensorType;
pub use security::StatusListener;
