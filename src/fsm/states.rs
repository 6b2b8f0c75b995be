//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[check due ∧ dry ∧ water ∧ temp ok]──▶ RUNNING
//!    ▲                                              │
//!    └──────────────[motor duration elapsed]────────┘
//!
//!  any ──[testmotor]──▶ OVERRIDE ──[duration elapsed ∨ stopmotor]──▶ IDLE
//! ```
//!
//! `Override` is entered only through `Fsm::force_transition` from the
//! service's command handler.

use super::context::{should_irrigate, ControlContext, TriggerReason};
use super::{StateDescriptor, StateId};
use log::info;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
        StateDescriptor {
            id: StateId::Override,
            name: "Override",
            on_enter: Some(override_enter),
            on_exit: Some(override_exit),
            on_update: override_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut ControlContext) {
    ctx.commands.motor_on = false;
    ctx.trigger = None;
}

fn idle_update(ctx: &mut ControlContext) -> Option<StateId> {
    if !ctx.check_due() {
        return None;
    }
    ctx.last_check_ms = ctx.now_ms;

    if should_irrigate(&ctx.reading, &ctx.thresholds) {
        info!(
            "IDLE: humidity {}% < {}% → irrigating",
            ctx.reading.humidity_pct,
            ctx.thresholds.humidity_pct()
        );
        return Some(StateId::Running);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING: timed irrigation run, sensors ignored until it ends
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut ControlContext) {
    ctx.run_started_ms = ctx.now_ms;
    ctx.trigger = Some(TriggerReason::LowHumidity);
    ctx.commands.motor_on = true;
    info!("RUNNING: motor on for {} ms", ctx.config.motor_duration_ms);
}

fn running_exit(ctx: &mut ControlContext) {
    ctx.commands.motor_on = false;
    ctx.trigger = None;
}

fn running_update(ctx: &mut ControlContext) -> Option<StateId> {
    if ctx.now_ms.wrapping_sub(ctx.run_started_ms) >= ctx.config.motor_duration_ms {
        info!("RUNNING: run complete, motor off");
        return Some(StateId::Idle);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OVERRIDE: maintenance motor test
// ═══════════════════════════════════════════════════════════════════════════

fn override_enter(ctx: &mut ControlContext) {
    ctx.cancel_override = false;
    ctx.trigger = None;
    ctx.commands.motor_on = true;
    info!("OVERRIDE: motor test on for {} ms", ctx.config.override_duration_ms);
}

fn override_exit(ctx: &mut ControlContext) {
    ctx.cancel_override = false;
    ctx.commands.motor_on = false;
}

fn override_update(ctx: &mut ControlContext) -> Option<StateId> {
    if ctx.cancel_override {
        info!("OVERRIDE: cancelled");
        return Some(StateId::Idle);
    }
    if ctx.ms_in_state() >= ctx.config.override_duration_ms {
        info!("OVERRIDE: motor test finished");
        return Some(StateId::Idle);
    }
    None
}
