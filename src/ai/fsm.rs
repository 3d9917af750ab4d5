//! Finite State Machine for AI Behavior
//!
//! Provides a generic, statically dispatched state machine for managing AI
//! entity behavior. States are plain values (usually an enum with one variant
//! per behavior) with enter/update/exit lifecycle hooks.
//!
//! # Design Principles
//!
//! - **Plain data**: States are values owned by the machine, no boxing
//! - **Deferred switching**: A transition decided during `update()` is applied
//!   after it returns, so the new state first updates on the next tick
//! - **Interrupts**: `transition()` switches immediately from outside the tick
//! - **Debuggability**: States have names for logging/debugging
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug)]
//! enum Guard { Idle, Alert }
//!
//! impl StateName for Guard {
//!     fn name(&self) -> &'static str {
//!         match self { Guard::Idle => "Idle", Guard::Alert => "Alert" }
//!     }
//! }
//!
//! impl State<Sensors> for Guard {
//!     fn update(&mut self, ctx: &mut Sensors) -> Transition<Self> {
//!         match self {
//!             Guard::Idle if ctx.noise => Transition::To(Guard::Alert),
//!             _ => Transition::None,
//!         }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new(Guard::Idle);
//! fsm.update(&mut sensors);  // May switch to Alert, effective next tick
//! ```

use std::fmt;

// ============================================================================
// State Trait
// ============================================================================

/// Human-readable state identity, independent of the update context.
pub trait StateName {
    /// State name for debugging and logging.
    fn name(&self) -> &'static str;
}

/// A state in the finite state machine.
///
/// The lifecycle is:
///
/// 1. `enter()` - Called once when this state becomes current
/// 2. `update()` - Called each tick while this state is current
/// 3. `exit()` - Called once when this state is replaced
pub trait State<Ctx>: StateName + fmt::Debug + Sized {
    /// Called when entering this state.
    fn enter(&mut self, _ctx: &mut Ctx) {}

    /// Called each tick while in this state.
    ///
    /// Returns a `Transition` to indicate whether to stay or change states.
    fn update(&mut self, ctx: &mut Ctx) -> Transition<Self>;

    /// Called when exiting this state.
    fn exit(&mut self, _ctx: &mut Ctx) {}
}

// ============================================================================
// Transition
// ============================================================================

/// Represents a state transition decision returned from `State::update()`.
#[derive(Debug)]
pub enum Transition<S> {
    /// Stay in the current state.
    None,
    /// Switch to a new state once the current update has finished.
    To(S),
}

/// Record of a completed switch, for logging and event emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// Name of the state that was exited
    pub from: &'static str,
    /// Name of the state that was entered
    pub to: &'static str,
}

// ============================================================================
// State Machine
// ============================================================================

/// A finite state machine that owns exactly one current state.
pub struct StateMachine<S> {
    /// Current active state
    current: S,
    /// Whether enter() has been called on current state
    entered: bool,
}

impl<S> StateMachine<S> {
    /// Create a new state machine with an initial state.
    ///
    /// The initial state is entered by `start()`, or at the latest by the
    /// first `update()` or `transition()`.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            entered: false,
        }
    }

    /// Borrow the current state.
    #[must_use]
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Whether the current state has been entered.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.entered
    }

    /// Enter the initial state. Does nothing once started.
    pub fn start<Ctx>(&mut self, ctx: &mut Ctx)
    where
        S: State<Ctx>,
    {
        if !self.entered {
            self.current.enter(ctx);
            self.entered = true;
        }
    }

    /// Update the state machine.
    ///
    /// Starts the machine if needed, then calls `update()` on the current state.
    /// A returned transition exits the old state and enters the new one; the
    /// new state is not updated until the next call.
    pub fn update<Ctx>(&mut self, ctx: &mut Ctx) -> Option<StateChange>
    where
        S: State<Ctx>,
    {
        self.start(ctx);

        match self.current.update(ctx) {
            Transition::None => None,
            Transition::To(next) => Some(self.switch(ctx, next)),
        }
    }

    /// Force a transition to a new state.
    ///
    /// Immediately exits the current state and enters the new one. An
    /// unstarted machine enters its initial state first, so every switch
    /// pairs one `exit()` with the `enter()` before it.
    pub fn transition<Ctx>(&mut self, ctx: &mut Ctx, new_state: S) -> StateChange
    where
        S: State<Ctx>,
    {
        self.switch(ctx, new_state)
    }

    fn switch<Ctx>(&mut self, ctx: &mut Ctx, mut next: S) -> StateChange
    where
        S: State<Ctx>,
    {
        self.start(ctx);
        let from = self.current.name();
        self.current.exit(ctx);

        next.enter(ctx);
        let to = next.name();
        self.current = next;

        log::debug!("state switch {from} -> {to}");
        StateChange { from, to }
    }

    /// Get the name of the current state.
    #[must_use]
    pub fn current_state_name(&self) -> &'static str
    where
        S: StateName,
    {
        self.current.name()
    }

    /// Check if the FSM is in a state with the given name.
    #[must_use]
    pub fn is_in_state(&self, name: &str) -> bool
    where
        S: StateName,
    {
        self.current.name() == name
    }
}

impl<S: fmt::Debug> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("entered", &self.entered)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
