//! Assertion helpers for publish behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{PublishOutcome, PublishState};

fn outcome(publish_state: &PublishState) -> StepResult<PublishOutcome> {
    publish_state
        .outcome
        .get()
        .ok_or_else(|| String::from("outcome should be set"))
}

#[then("publishing succeeds")]
fn publishing_succeeds(publish_state: &PublishState) -> StepResult<()> {
    match outcome(publish_state)? {
        PublishOutcome::Published { .. } => Ok(()),
        PublishOutcome::Failed(msg) => Err(format!("expected success, got error: {msg}")),
    }
}

#[then("publishing fails mentioning {expected}")]
fn publishing_fails(publish_state: &PublishState, expected: String) -> StepResult<()> {
    match outcome(publish_state)? {
        PublishOutcome::Failed(msg) if msg.contains(&expected) => Ok(()),
        PublishOutcome::Failed(msg) => Err(format!(
            "expected error containing '{expected}', got: {msg}"
        )),
        PublishOutcome::Published { versioned } => {
            Err(format!("expected failure, but {versioned} was published"))
        }
    }
}

#[then("the build targets {tag}")]
fn build_targets(publish_state: &PublishState, tag: String) -> StepResult<()> {
    let tags = publish_state.build_tags.get().unwrap_or_default();
    if tags == [tag.clone()] {
        Ok(())
    } else {
        Err(format!("expected one build tagged {tag}, got {tags:?}"))
    }
}

#[then("the pushed images are {first} then {second}")]
fn pushed_in_order(publish_state: &PublishState, first: String, second: String) -> StepResult<()> {
    let pushed = publish_state.pushed.get().unwrap_or_default();
    if pushed == [first.clone(), second.clone()] {
        Ok(())
    } else {
        Err(format!("expected pushes [{first}, {second}], got {pushed:?}"))
    }
}

#[then("the build arguments contain {argument} exactly once")]
fn build_argument_once(publish_state: &PublishState, argument: String) -> StepResult<()> {
    let builds = publish_state.build_args.get().unwrap_or_default();
    let [args] = builds.as_slice() else {
        return Err(format!("expected exactly one build, got {}", builds.len()));
    };
    let count = args.iter().filter(|arg| **arg == argument).count();
    if count == 1 {
        Ok(())
    } else {
        Err(format!(
            "expected {argument} once, found {count} times in {args:?}"
        ))
    }
}

#[then("nothing was built")]
fn nothing_built(publish_state: &PublishState) -> StepResult<()> {
    let builds = publish_state.build_args.get().unwrap_or_default();
    if builds.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no build, got {builds:?}"))
    }
}

#[then("nothing was pushed")]
fn nothing_pushed(publish_state: &PublishState) -> StepResult<()> {
    let pushed = publish_state.pushed.get().unwrap_or_default();
    if pushed.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no pushes, got {pushed:?}"))
    }
}
