use std::sync::Arc;

use tracing::info;
use tracing::warn;

use super::status::AlarmStatus;

/// Observer of controller events.
///
/// Callbacks run synchronously on the caller's thread, once per event per
/// registered listener.
pub trait StatusListener: Send + Sync {
    /// The alarm status was written
    fn alarm_status_changed(&self, status: AlarmStatus);

    /// Sensor states may have changed; listeners should refresh their view
    fn sensor_status_changed(&self);

    /// An image was classified
    fn cat_detected(&self, cat: bool);
}

/// Whether two handles refer to the same listener allocation
pub(crate) fn same_listener(a: &Arc<dyn StatusListener>, b: &Arc<dyn StatusListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Listener that reports every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl StatusListener for TracingListener {
    fn alarm_status_changed(&self, status: AlarmStatus) {
        if status == AlarmStatus::Alarm {
            warn!("ALARM raised");
        } else {
            info!(%status, "alarm status changed");
        }
    }

    fn sensor_status_changed(&self) {
        info!("sensor status changed");
    }

    fn cat_detected(&self, cat: bool) {
        if cat {
            info!("cat detected in camera image");
        } else {
            info!("no cat in camera image");
        }
    }
}
