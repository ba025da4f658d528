//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: application defaults, action inputs,
//! command-line arguments. Layers are composed by hand with `MergeComposer`
//! because action inputs do not follow the `PREFIX_FIELD` environment naming
//! that `OrthoConfig`'s own environment layer expects.
//!
//! # Action inputs
//!
//! The CI runner exposes each declared input `name` as the environment
//! variable `INPUT_<NAME>`, upper-cased with spaces replaced by underscores.
//! Values are trimmed and an empty value counts as "not supplied". The
//! `verbose` input is a flag: it is enabled only by the exact value `true`.

use ortho_config::MergeComposer;
use ortho_config::serde_json::{self, Map, Value};

use crate::config::{ActionConfig, Cli};
use crate::error::{ConfigError, Result};

/// How an input's raw string is turned into a configuration value.
#[derive(Clone, Copy)]
enum InputType {
    /// Passed through as a string.
    String,
    /// `true` when the value is exactly `true`, otherwise `false`.
    Flag,
}

/// Mapping from an action input to a configuration field.
struct InputSpec {
    /// The input name as declared by the action.
    name: &'static str,
    /// The `ActionConfig` field it populates.
    field: &'static str,
    /// The expected value type.
    input_type: InputType,
}

const INPUT_SPECS: &[InputSpec] = &[
    InputSpec {
        name: "username",
        field: "username",
        input_type: InputType::String,
    },
    InputSpec {
        name: "password",
        field: "password",
        input_type: InputType::String,
    },
    InputSpec {
        name: "registry",
        field: "registry",
        input_type: InputType::String,
    },
    InputSpec {
        name: "owner",
        field: "owner",
        input_type: InputType::String,
    },
    InputSpec {
        name: "path",
        field: "path",
        input_type: InputType::String,
    },
    InputSpec {
        name: "npm_token",
        field: "npm_token",
        input_type: InputType::String,
    },
    InputSpec {
        name: "verbose",
        field: "verbose",
        input_type: InputType::Flag,
    },
];

/// Return the environment variable name carrying the action input `name`.
#[must_use]
pub fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Returns the environment variable names of every recognised action input.
///
/// Useful for tests that need to clear the inputs to ensure isolation.
#[must_use]
pub fn input_env_var_names() -> Vec<String> {
    INPUT_SPECS
        .iter()
        .map(|spec| input_env_var(spec.name))
        .collect()
}

/// Reads action inputs through an environment provider.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct ActionInputs<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> ActionInputs<'a, E> {
    /// Creates a new input reader over the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Return the trimmed value of input `name`, or `None` when it is unset
    /// or blank.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.env
            .string(&input_env_var(name))
            .map(|raw| String::from(raw.trim()))
            .filter(|value| !value.is_empty())
    }

    /// Collect every recognised input into a JSON layer.
    ///
    /// Returns `Value::Null` when no input is set.
    #[must_use]
    pub fn collect(&self) -> Value {
        let mut root = Map::new();

        for spec in INPUT_SPECS {
            let Some(raw_value) = self.get(spec.name) else {
                continue;
            };

            let json_value = match spec.input_type {
                InputType::String => Value::String(raw_value),
                InputType::Flag => Value::Bool(raw_value == "true"),
            };
            root.insert(spec.field.to_owned(), json_value);
        }

        if root.is_empty() {
            Value::Null
        } else {
            Value::Object(root)
        }
    }
}

/// Load configuration with full layer precedence.
///
/// # Errors
///
/// Returns `ConfigError` if the defaults cannot be serialised or the merged
/// layers do not deserialise into [`ActionConfig`]. Missing required inputs
/// are not an error here; see [`ActionConfig::resolve`].
pub fn load_config<E: mockable::Env>(cli: &Cli, env: &E) -> Result<ActionConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults.
    let defaults =
        serde_json::to_value(ActionConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Action inputs.
    let inputs = ActionInputs::new(env).collect();
    if !inputs.is_null() {
        composer.push_environment(inputs);
    }

    // Layer 3: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        ActionConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    let string_flags = [
        ("username", cli.username.as_deref()),
        ("password", cli.password.as_deref()),
        ("registry", cli.registry.as_deref()),
        ("owner", cli.owner.as_deref()),
        ("path", cli.path.as_deref().map(camino::Utf8Path::as_str)),
        ("npm_token", cli.npm_token.as_deref()),
    ];
    for (field, value) in string_flags {
        if let Some(text) = value {
            overrides.insert(field.to_owned(), Value::String(String::from(text)));
        }
    }

    // Absent flag leaves the input layer in charge.
    if cli.verbose {
        overrides.insert("verbose".to_owned(), Value::Bool(true));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
