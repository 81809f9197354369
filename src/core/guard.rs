//! Guard predicates for controlling state transitions.
//!
//! A guard wraps a transition target behind a single predicate. When the
//! predicate holds, resolution continues into the wrapped target; when it
//! does not, the event is consumed without any transition.

use super::target::Target;

/// Pure predicate over the machine context.
pub type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Conditional wrapper around a transition target.
///
/// # Example
///
/// ```rust
/// use gentle::core::{Guard, StateId, Target};
///
/// struct Ctx {
///     enabled: bool,
/// }
///
/// let guard = Guard::new(|ctx: &Ctx| ctx.enabled, Target::State(StateId::from_index(1)));
///
/// assert!(guard.check(&Ctx { enabled: true }));
/// assert!(!guard.check(&Ctx { enabled: false }));
/// ```
pub struct Guard<C> {
    predicate: Predicate<C>,
    target: Box<Target<C>>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate and the target it protects.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F, target: Target<C>) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            target: Box::new(target),
        }
    }

    /// Evaluate the predicate against the context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }

    /// The target reached when the predicate holds.
    pub fn target(&self) -> &Target<C> {
        &self.target
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").field("target", &self.target).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;

    struct Ctx {
        count: u32,
    }

    #[test]
    fn guard_allows_matching_context() {
        let guard = Guard::new(|c: &Ctx| c.count > 2, Target::Null);

        assert!(guard.check(&Ctx { count: 3 }));
        assert!(!guard.check(&Ctx { count: 2 }));
    }

    #[test]
    fn guard_is_deterministic() {
        let ctx = Ctx { count: 7 };
        let guard = Guard::new(|c: &Ctx| c.count % 2 == 1, Target::Null);

        assert_eq!(guard.check(&ctx), guard.check(&ctx));
    }

    #[test]
    fn guard_exposes_wrapped_target() {
        let target = StateId::from_index(4);
        let guard = Guard::new(|_: &Ctx| true, Target::State(target));

        assert!(matches!(guard.target(), Target::State(id) if *id == target));
    }
}
