//! Scenario state for publish behavioural tests.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

/// Outcome of a publish run.
#[derive(Debug, Clone)]
pub(crate) enum PublishOutcome {
    /// Both references were pushed.
    Published {
        /// The versioned reference reported by the pipeline.
        versioned: String,
    },
    /// The pipeline stopped with an error.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct PublishState {
    /// Project directory; kept alive for the whole scenario.
    pub(crate) project_dir: Slot<Arc<TempDir>>,
    pub(crate) npm_token: Slot<String>,
    pub(crate) build_exit_code: Slot<i32>,
    pub(crate) daemon_available: Slot<bool>,
    pub(crate) build_args: Slot<Vec<Vec<String>>>,
    pub(crate) build_tags: Slot<Vec<String>>,
    pub(crate) pushed: Slot<Vec<String>>,
    pub(crate) outcome: Slot<PublishOutcome>,
}

#[fixture]
pub(crate) fn publish_state() -> PublishState {
    let state = PublishState::default();
    state.build_exit_code.set(0);
    state.daemon_available.set(true);
    state
}
