//! Shared fixtures and helper functions for config tests.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::fixture;

use crate::config::{ActionConfig, input_env_var};

/// Build a `MockEnv` that serves the given action inputs by input name.
pub fn env_with_inputs(inputs: &[(&str, &str)]) -> MockEnv {
    let values: HashMap<String, String> = inputs
        .iter()
        .map(|(name, value)| (input_env_var(name), String::from(*value)))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .returning(move |key| values.get(key).cloned());
    env
}

/// Fixture providing a `MockEnv` with no inputs set.
#[fixture]
pub fn empty_env() -> MockEnv {
    env_with_inputs(&[])
}

/// Fixture providing a `MockEnv` carrying every required input.
#[fixture]
pub fn required_inputs_env() -> MockEnv {
    env_with_inputs(&[
        ("username", "ci-bot"),
        ("password", "s3cret"),
        ("registry", "reg.example.com"),
        ("owner", "acme"),
    ])
}

/// Fixture providing an `ActionConfig` with every required input present.
#[fixture]
pub fn complete_action_config() -> ActionConfig {
    ActionConfig {
        username: Some(String::from("ci-bot")),
        password: Some(String::from("s3cret")),
        registry: Some(String::from("reg.example.com")),
        owner: Some(String::from("acme")),
        ..ActionConfig::default()
    }
}
