//! Ordered homing plan.
//!
//! A pure function of the request and the machine profile, so the ordering
//! rules can be tested without any hardware:
//!
//! ```text
//!   Z away from bed?  ──▶ HomeAxis(Z)
//!   X | Y | z_safe    ──▶ RaiseZ
//!   quick && X && Y   ──▶ QuickHomeXY      (as requested)
//!   else              ──▶ HomeAxis(X/Y) in configured order,
//!                         codependent X/Y expanded to both
//!   Z toward bed?     ──▶ HomeAxis(Z)
//! ```

use heapless::Vec;

use crate::config::MachineConfig;
use crate::motion::{Axis, AxisFlags, AxisSet};

/// Upper bound on plan length (Z, raise, X, Y).
pub const MAX_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingStep {
    /// Pre-raise Z.  Whether it moves is decided at run time from the
    /// current Z; it never lowers.
    RaiseZ,
    /// Combined XY homing.
    QuickHomeXY,
    /// Individual homing of one axis.
    HomeAxis(Axis),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomingPlan {
    axes: AxisFlags,
    steps: Vec<HomingStep, MAX_STEPS>,
}

impl HomingPlan {
    pub fn build(request: &AxisSet, cfg: &MachineConfig) -> Self {
        let h = &cfg.homing;
        let requested = request.effective();
        let quick = h.quick_home && requested.contains(Axis::X) && requested.contains(Axis::Y);
        let mut axes = requested;
        if h.codependent_xy && (axes.contains(Axis::X) || axes.contains(Axis::Y)) {
            axes.insert(Axis::X);
            axes.insert(Axis::Y);
        }
        let (do_x, do_y, do_z) = (
            axes.contains(Axis::X),
            axes.contains(Axis::Y),
            axes.contains(Axis::Z),
        );
        let z_away = cfg.z_homes_away_from_bed();

        let mut plan = Self {
            axes,
            steps: Vec::new(),
        };

        if do_z && z_away {
            plan.push(HomingStep::HomeAxis(Axis::Z));
        }
        if do_x || do_y || h.z_safe_homing {
            plan.push(HomingStep::RaiseZ);
        }
        if quick {
            plan.push(HomingStep::QuickHomeXY);
        } else {
            let order = if h.home_y_before_x {
                [Axis::Y, Axis::X]
            } else {
                [Axis::X, Axis::Y]
            };
            for axis in order {
                if axes.contains(axis) {
                    plan.push(HomingStep::HomeAxis(axis));
                }
            }
        }
        if do_z && !z_away {
            plan.push(HomingStep::HomeAxis(Axis::Z));
        }
        plan
    }

    /// Axes this plan homes.
    pub fn axes(&self) -> AxisFlags {
        self.axes
    }

    pub fn steps(&self) -> &[HomingStep] {
        &self.steps
    }

    fn push(&mut self, step: HomingStep) {
        // Each branch above pushes at most one step per slot.
        let _ = self.steps.push(step);
    }
}
