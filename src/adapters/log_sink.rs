//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing motion events through the `log`
//! facade, one tagged line per event.  A display adapter would implement
//! the same trait and redraw on [`MotionEvent::DisplayRefresh`].

use log::{debug, info, warn};

use crate::app::events::MotionEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`MotionEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MotionEvent) {
        match event {
            MotionEvent::HomingStarted(axes) => info!("HOME | start axes={axes}"),
            MotionEvent::HomingSkipped => info!("HOME | skipped, position known"),
            MotionEvent::CurrentOverride {
                axis,
                from_ma,
                to_ma,
            } => debug!("HOME | {axis} current {from_ma}mA -> {to_ma}mA"),
            MotionEvent::ZRaised { to_mm } => debug!("HOME | raise Z to {to_mm:.3}"),
            MotionEvent::AxisHomed { axis, position_mm } => {
                info!("HOME | {axis} at {position_mm:.3}");
            }
            MotionEvent::QuickHomeComplete => info!("HOME | XY quick home done"),
            MotionEvent::HomingFinished(axes) => info!("HOME | done axes={axes}"),
            MotionEvent::HomingAborted(e) => warn!("HOME | aborted: {e}"),
            MotionEvent::PositionReport(p) => {
                info!("POS | X:{:.2} Y:{:.2} Z:{:.2}", p.x, p.y, p.z);
            }
            MotionEvent::JointReport(j) => {
                info!("JOINT | Theta:{:.2} Psi:{:.2} Z:{:.2}", j.theta, j.psi, j.z);
            }
            MotionEvent::DisplayRefresh => debug!("UI | refresh"),
        }
    }
}
