//! Given/when steps for publish scenarios.

use std::fs;
use std::io;
use std::sync::{Arc, Mutex};

use bollard::auth::DockerCredentials;
use bollard::errors::Error as BollardError;
use bollard::models::PushImageInfo;
use camino::Utf8PathBuf;
use futures_util::stream;
use imagepub::api::{PublishParams, publish};
use imagepub::build::{BuildCommand, BuildExit, BuildFuture, BuildRunner};
use imagepub::config::{PublishConfig, RegistryCredentials};
use imagepub::engine::{ImageRegistryClient, PushImageStream, TagImageFuture};
use imagepub::error::{ContainerError, PublishError};
use mockall::mock;
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;

use super::StepResult;
use super::state::{PublishOutcome, PublishState};

mock! {
    Runner {}

    impl BuildRunner for Runner {
        fn run(&self, command: &BuildCommand) -> BuildFuture<'_>;
    }
}

mock! {
    Registry {}

    impl ImageRegistryClient for Registry {
        fn tag_image(&self, source: &str, repository: &str, tag: &str) -> TagImageFuture<'_>;
        fn push_image(
            &self,
            repository: &str,
            tag: &str,
            credentials: DockerCredentials,
        ) -> PushImageStream<'_>;
    }
}

type Recorder<T> = Arc<Mutex<Vec<T>>>;

fn new_project(publish_state: &PublishState) -> StepResult<Arc<TempDir>> {
    let dir = Arc::new(TempDir::new().map_err(|e| format!("failed to create project: {e}"))?);
    fs::write(dir.path().join("Dockerfile"), "FROM scratch\n")
        .map_err(|e| format!("failed to write Dockerfile: {e}"))?;
    publish_state.project_dir.set(Arc::clone(&dir));
    Ok(dir)
}

#[given("a project named {name} at version {version}")]
fn given_project(publish_state: &PublishState, name: String, version: String) -> StepResult<()> {
    let dir = new_project(publish_state)?;
    let package = format!(r#"{{"name": "{name}", "version": "{version}"}}"#);
    fs::write(dir.path().join("package.json"), package)
        .map_err(|e| format!("failed to write package.json: {e}"))
}

#[given("a project without a package descriptor")]
fn given_project_without_package(publish_state: &PublishState) -> StepResult<()> {
    new_project(publish_state).map(|_| ())
}

#[given("the build number is {number}")]
fn given_build_number(publish_state: &PublishState, number: u64) -> StepResult<()> {
    let dir = publish_state
        .project_dir
        .get()
        .ok_or_else(|| String::from("project should be created first"))?;
    fs::write(
        dir.path().join("build-info.json"),
        format!(r#"{{"buildNumber": {number}}}"#),
    )
    .map_err(|e| format!("failed to write build-info.json: {e}"))
}

#[given("the npm token is {token}")]
fn given_npm_token(publish_state: &PublishState, token: String) {
    publish_state.npm_token.set(token);
}

#[given("the build exits with status {code}")]
fn given_build_exit(publish_state: &PublishState, code: i32) {
    publish_state.build_exit_code.set(code);
}

#[given("no container engine is reachable")]
fn given_no_engine(publish_state: &PublishState) {
    publish_state.daemon_available.set(false);
}

fn recording_runner(
    exit_code: i32,
    args: &Recorder<Vec<String>>,
    tags: &Recorder<String>,
) -> MockRunner {
    let args = Arc::clone(args);
    let tags = Arc::clone(tags);
    let mut runner = MockRunner::new();
    runner.expect_run().returning(move |command| {
        if let Ok(mut seen) = args.lock() {
            seen.push(command.args());
        }
        if let Ok(mut seen) = tags.lock() {
            seen.push(String::from(command.tag()));
        }
        let exit = if exit_code == 0 {
            BuildExit::Success
        } else {
            BuildExit::Code(exit_code)
        };
        Box::pin(async move { Ok::<_, io::Error>(exit) })
    });
    runner
}

fn recording_registry(pushed: &Recorder<String>) -> MockRegistry {
    let pushed = Arc::clone(pushed);
    let mut registry = MockRegistry::new();
    registry
        .expect_tag_image()
        .returning(|_, _, _| Box::pin(async { Ok::<(), BollardError>(()) }));
    registry.expect_push_image().returning(move |repository, tag, _| {
        if let Ok(mut seen) = pushed.lock() {
            seen.push(format!("{repository}:{tag}"));
        }
        let records: Vec<Result<PushImageInfo, BollardError>> =
            vec![Ok(PushImageInfo::default())];
        Box::pin(stream::iter(records))
    });
    registry
}

fn drain<T: Clone>(recorder: &Recorder<T>) -> Vec<T> {
    recorder
        .lock()
        .map(|seen| seen.clone())
        .unwrap_or_default()
}

#[when("the image is published to {registry} for owner {owner}")]
fn when_published(
    publish_state: &PublishState,
    registry: String,
    owner: String,
) -> StepResult<()> {
    let dir = publish_state
        .project_dir
        .get()
        .ok_or_else(|| String::from("project should be created first"))?;
    let context_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| format!("non UTF-8 project path: {}", path.display()))?;
    let config = PublishConfig {
        credentials: RegistryCredentials {
            username: String::from("ci-bot"),
            password: String::from("s3cret"),
            server_address: registry,
        },
        owner,
        context_path,
        npm_token: publish_state.npm_token.get(),
        verbose: false,
    };

    let build_args: Recorder<Vec<String>> = Arc::default();
    let build_tags: Recorder<String> = Arc::default();
    let pushed: Recorder<String> = Arc::default();
    let exit_code = publish_state.build_exit_code.get().unwrap_or(0);
    let runner = recording_runner(exit_code, &build_args, &build_tags);
    let registry_client = recording_registry(&pushed);
    let daemon_available = publish_state.daemon_available.get().unwrap_or(true);

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let result = runtime.block_on(publish(PublishParams {
        config: &config,
        build_runner: &runner,
        connect_registry: || {
            if daemon_available {
                Ok(registry_client)
            } else {
                Err(PublishError::from(ContainerError::SocketNotFound {
                    path: Utf8PathBuf::from("/var/run/docker.sock"),
                }))
            }
        },
        progress: &mut io::sink(),
    }));

    publish_state.build_args.set(drain(&build_args));
    publish_state.build_tags.set(drain(&build_tags));
    publish_state.pushed.set(drain(&pushed));
    publish_state.outcome.set(match result {
        Ok(images) => PublishOutcome::Published {
            versioned: images.versioned,
        },
        Err(e) => PublishOutcome::Failed(e.to_string()),
    });
    Ok(())
}
