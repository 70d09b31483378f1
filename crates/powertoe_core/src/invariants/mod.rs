//! Properties every [`GameSession`] must satisfy between operations.
//!
//! Invariants are checked after each mutating session operation in debug
//! builds and can be tested on their own.

mod session;

pub use session::{CooldownConsistent, FreezeTargetsIdlePlayer, PhaseMatchesBoard};

use crate::session::GameSession;
use derive_more::Display;
use tracing::error;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: &'static str,
}

/// Invariants checked together. Implemented for 2- and 3-tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation {
            description: I::description(),
        });
    }
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        collect(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        check::<S, I3>(state, &mut violations);
        collect(violations)
    }
}

/// All session invariants.
pub type SessionInvariants = (CooldownConsistent, PhaseMatchesBoard, FreezeTargetsIdlePlayer);

/// Debug-build check run after every mutating session operation.
pub(crate) fn assert_invariants(session: &GameSession) {
    if !cfg!(debug_assertions) {
        return;
    }
    if let Err(violations) = SessionInvariants::check_all(session) {
        for violation in &violations {
            error!(%violation, "Session invariant violated");
        }
        panic!("session invariants violated: {violations:?}");
    }
}
