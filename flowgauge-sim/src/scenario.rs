//! Contracts linking simulated scenarios and the bots that drive them.
//!
//! Both traits are consumed, never implemented, by this crate. Scenario
//! and bot randomness must come from seeds threaded through construction
//! so runs replay deterministically; nothing in the kernel reaches for
//! ambient randomness on their behalf.

/// Minimal capability set a simulated scenario must expose to the trial
/// runner.
///
/// `level` is the one optional capability: scenarios without a level
/// ladder keep the default `None`, and downstream analysis omits level
/// statistics instead of reporting zero. The capability is explicit in
/// the signature rather than probed at runtime.
pub trait Scenario {
    /// Input token consumed by [`Scenario::step`].
    type Input;

    /// Return the scenario to its initial state for a fresh trial.
    fn reset(&mut self);

    /// Advance one tick, applying the bot input if any.
    fn step(&mut self, input: Option<Self::Input>);

    /// Whether the scenario is still alive.
    fn is_running(&self) -> bool;

    /// Current score.
    fn score(&self) -> f64;

    /// Current difficulty in `0.0..=1.0`.
    fn difficulty(&self) -> f64 {
        0.5
    }

    /// Display name used in analysis records.
    fn name(&self) -> &str;

    /// Current level, for scenarios that track one.
    fn level(&self) -> Option<f64> {
        None
    }
}

/// Decision-making bot driving a [`Scenario`] one input at a time.
pub trait BotPolicy<S: Scenario> {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Produce the next input given the current scenario state.
    fn decide(&mut self, scenario: &S) -> Option<S::Input>;

    /// Clear per-episode state before a new trial begins.
    fn reset_episode(&mut self) {}
}
