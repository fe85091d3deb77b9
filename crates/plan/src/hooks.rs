//! Plan execution hooks for observability.
//!
//! Hooks observe a plan run without changing it.
//!
//! ## Events
//!
//! - `on_plan_start`: Before the first step, once inputs are bound
//! - `on_step_start`: Before a step combines its inputs
//! - `on_step_end`: After a step's result is bound
//! - `on_plan_end`: After the output is read back
//! - `on_error`: When the run stops on an error
//!
//! ## Example
//!
//! ```ignore
//! struct PrintSteps;
//!
//! impl PlanHook for PrintSteps {
//!     fn on_step_start(&self, key: &InferenceKey, position: usize) {
//!         println!("step {}: {}", position, key);
//!     }
//! }
//! ```

use axial_core::NamedContainer;
use tracing::{debug, error, info};

use crate::error::PlanError;
use crate::inference::InferenceKey;

// ============================================================================
// Plan Hook Trait
// ============================================================================

/// Trait for observing plan execution events.
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
pub trait PlanHook: Send + Sync {
    /// Called once the run has its order.
    ///
    /// # Arguments
    /// * `steps` - Number of steps about to run
    fn on_plan_start(&self, _steps: usize) {}

    /// Called before a step runs.
    ///
    /// # Arguments
    /// * `key` - The step's key
    /// * `position` - Position in the execution order (0-indexed)
    fn on_step_start(&self, _key: &InferenceKey, _position: usize) {}

    /// Called after a step's result is bound to its inferred concept.
    fn on_step_end(&self, _key: &InferenceKey, _result: &NamedContainer) {}

    /// Called with the output of a successful run.
    fn on_plan_end(&self, _output: &NamedContainer) {}

    /// Called when a run fails.
    fn on_error(&self, _error: &PlanError) {}
}

// ============================================================================
// Null Hook (Default)
// ============================================================================

/// A no-op hook implementation for when no observation is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl PlanHook for NullHook {}

// ============================================================================
// Logging Hook
// ============================================================================

/// A hook that forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook {
    /// Also log the data of each step result
    pub verbose: bool,
}

impl LoggingHook {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl PlanHook for LoggingHook {
    fn on_plan_start(&self, steps: usize) {
        info!(steps, "plan starting");
    }

    fn on_step_start(&self, key: &InferenceKey, position: usize) {
        debug!(%key, position, "step starting");
    }

    fn on_step_end(&self, key: &InferenceKey, result: &NamedContainer) {
        if self.verbose {
            debug!(%key, %result, "step finished");
        } else {
            debug!(%key, shape = %result.shape(), "step finished");
        }
    }

    fn on_plan_end(&self, output: &NamedContainer) {
        info!(shape = %output.shape(), "plan finished");
    }

    fn on_error(&self, err: &PlanError) {
        error!(error = %err, "plan failed");
    }
}

// ============================================================================
// Composite Hook
// ============================================================================

/// A hook that delegates to multiple inner hooks.
#[derive(Default)]
pub struct CompositeHook {
    hooks: Vec<Box<dyn PlanHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the composite.
    pub fn with<H: PlanHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }
}

impl PlanHook for CompositeHook {
    fn on_plan_start(&self, steps: usize) {
        for hook in &self.hooks {
            hook.on_plan_start(steps);
        }
    }

    fn on_step_start(&self, key: &InferenceKey, position: usize) {
        for hook in &self.hooks {
            hook.on_step_start(key, position);
        }
    }

    fn on_step_end(&self, key: &InferenceKey, result: &NamedContainer) {
        for hook in &self.hooks {
            hook.on_step_end(key, result);
        }
    }

    fn on_plan_end(&self, output: &NamedContainer) {
        for hook in &self.hooks {
            hook.on_plan_end(output);
        }
    }

    fn on_error(&self, error: &PlanError) {
        for hook in &self.hooks {
            hook.on_error(error);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHook {
        step_starts: Arc<AtomicUsize>,
        errors: Arc<AtomicUsize>,
    }

    impl CountingHook {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let step_starts = Arc::new(AtomicUsize::new(0));
            let errors = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    step_starts: Arc::clone(&step_starts),
                    errors: Arc::clone(&errors),
                },
                step_starts,
                errors,
            )
        }
    }

    impl PlanHook for CountingHook {
        fn on_step_start(&self, _key: &InferenceKey, _position: usize) {
            self.step_starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_error(&self, _error: &PlanError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn key() -> InferenceKey {
        InferenceKey {
            perception: vec!["a".into()],
            actuation: "f".into(),
            inferred: "b".into(),
        }
    }

    #[test]
    fn test_null_hook() {
        let hook = NullHook;
        // Should not panic
        hook.on_plan_start(3);
        hook.on_plan_end(&NamedContainer::scalar(1));
    }

    #[test]
    fn test_counting_hook() {
        let (hook, starts, errors) = CountingHook::new();

        hook.on_step_start(&key(), 0);
        hook.on_step_start(&key(), 1);
        hook.on_error(&PlanError::IoNotConfigured);

        assert_eq!(starts.load(Ordering::SeqCst), 2);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_composite_hook() {
        let (hook1, starts1, _) = CountingHook::new();
        let (hook2, starts2, _) = CountingHook::new();

        let composite = CompositeHook::new()
            .with(hook1)
            .with(hook2)
            .with(LoggingHook::verbose());

        composite.on_step_start(&key(), 0);

        assert_eq!(starts1.load(Ordering::SeqCst), 1);
        assert_eq!(starts2.load(Ordering::SeqCst), 1);
    }
}
