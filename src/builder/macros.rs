//! Macros for ergonomic transition-table wiring.

/// Fill in one state's transition table.
///
/// Expands to one [`MachineBuilder::transition`](crate::builder::MachineBuilder::transition)
/// call per entry and propagates errors with `?`, so it must be used inside a
/// function returning a `Result` whose error converts from
/// [`BuildError`](crate::builder::BuildError).
///
/// # Example
///
/// ```
/// use gentle::builder::{BuildError, MachineBuilder};
/// use gentle::core::{Event, Target};
/// use gentle::transitions;
///
/// fn wire() -> Result<(), BuildError> {
///     let input = Event::new("input activity");
///     let timeout = Event::new("timeout");
///
///     let mut builder = MachineBuilder::<()>::new();
///     let here = builder.state("at computer");
///     let away = builder.state("away");
///
///     transitions!(builder, here => {
///         input => here,
///         timeout => away,
///     });
///     transitions!(builder, away => {
///         input => here,
///         timeout => Target::Null,
///     });
///
///     builder.initial(here);
///     builder.build(())?;
///     Ok(())
/// }
///
/// wire().unwrap();
/// ```
#[macro_export]
macro_rules! transitions {
    ($builder:ident, $from:expr => { $($event:expr => $target:expr),* $(,)? }) => {{
        let from = $from;
        $(
            $builder.transition(from, &$event, $target)?;
        )*
    }};
}
