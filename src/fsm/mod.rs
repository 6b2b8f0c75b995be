//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌──────────┬───────────┬──────────┬──────────────────┐  │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update        │  │
//! │  ├──────────┼───────────┼──────────┼──────────────────┤  │
//! │  │ Idle     │ fn(ctx)   │   -      │ fn(ctx)->Option  │  │
//! │  │ Running  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option  │  │
//! │  │ Override │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option  │  │
//! │  └──────────┴───────────┴──────────┴──────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut ControlContext`, which
//! holds the averaged reading, thresholds, timing, and actuator commands.
//!
//! Time is wall-clock milliseconds (`ctx.now_ms`), not tick counts: the
//! irrigation policy is specified in milliseconds and the loop period
//! may jitter.

pub mod context;
pub mod states;

use context::ControlContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible controller states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Motor off, trigger evaluated every check interval.
    Idle = 0,
    /// Irrigation run in progress for the configured motor duration.
    Running = 1,
    /// Maintenance motor test; policy bypassed.
    Override = 2,
}

impl StateId {
    pub const COUNT: usize = 3;

    /// Convert a table index back to `StateId`.  Out-of-range indices
    /// fall back to `Idle` (motor off).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Override,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut ControlContext);

/// Per-tick update handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut ControlContext) -> Option<StateId>;

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControlContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_entered_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one control cycle.  `ctx.now_ms` and `ctx.reading`
    /// must already be updated.  Returns the new state on a transition.
    pub fn tick(&mut self, ctx: &mut ControlContext) -> Option<StateId> {
        let next = (self.table[self.current].on_update)(ctx)?;
        self.transition(next, ctx);
        Some(next)
    }

    /// Jump to `next` immediately, running exit/enter actions.  No-op if
    /// already there.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut ControlContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut ControlContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.state_entered_ms = ctx.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
