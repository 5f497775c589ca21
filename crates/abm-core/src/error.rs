//! Error plumbing shared by every user-supplied hook.
//!
//! Agent, environment, and observer hooks are written by model code, so their
//! failures can be of any type.  Hooks return [`HookResult`]; the driver wraps
//! a failure with the phase and time at which it happened and aborts the run.
//! No recovery is attempted on behalf of user code.

/// Type-erased error returned by user hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type of every agent / environment / observer hook.
pub type HookResult = Result<(), BoxError>;
