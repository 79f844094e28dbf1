use crate::config::ServiceConfig;
use crate::error::{Result, TaggerError};
use crate::publish::ArtifactPublisher;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, instrument};

/// Publishes images by shelling out to the `docker` CLI
pub struct DockerPublisher {
    service: ServiceConfig,
    workdir: PathBuf,
    program: String,
}

impl DockerPublisher {
    /// Publisher for `service`, running builds relative to `workdir`
    pub fn new(service: ServiceConfig, workdir: impl Into<PathBuf>) -> Self {
        DockerPublisher {
            service,
            workdir: workdir.into(),
            program: "docker".to_string(),
        }
    }

    /// Use a different executable (e.g. `podman`)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for `docker build`
    pub fn build_args(&self, tag: &str) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "-t".to_string(),
            self.service.image_ref(tag),
        ];
        if let Some(dockerfile) = &self.service.dockerfile {
            args.push("-f".to_string());
            args.push(dockerfile.clone());
        }
        args.push(self.service.context.clone());
        args
    }

    /// Arguments for `docker push`
    pub fn push_args(&self, tag: &str) -> Vec<String> {
        vec!["push".to_string(), self.service.image_ref(tag)]
    }

    /// Arguments for `docker tag`
    pub fn alias_args(&self, source_tag: &str, alias: &str) -> Vec<String> {
        vec![
            "tag".to_string(),
            self.service.image_ref(source_tag),
            self.service.image_ref(alias),
        ]
    }

    fn run(&self, args: &[String]) -> Result<()> {
        run_command(&self.program, args, &self.workdir)
    }
}

impl ArtifactPublisher for DockerPublisher {
    #[instrument(skip(self))]
    fn build(&self, tag: &str) -> Result<()> {
        self.run(&self.build_args(tag))
    }

    #[instrument(skip(self))]
    fn push(&self, tag: &str) -> Result<()> {
        self.run(&self.push_args(tag))
    }

    #[instrument(skip(self))]
    fn tag_alias(&self, source_tag: &str, alias: &str) -> Result<()> {
        self.run(&self.alias_args(source_tag, alias))
    }
}

/// Run `program args...` in `workdir`; any non-zero exit is a publish failure.
fn run_command(program: &str, args: &[String], workdir: &Path) -> Result<()> {
    debug!(program, ?args, "running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(|e| TaggerError::publish(format!("Failed to execute {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(TaggerError::publish(format!(
            "{} {} failed with exit code {}\nStdout: {}\nStderr: {}",
            program,
            args.first().map(String::as_str).unwrap_or_default(),
            output.status.code().unwrap_or(-1),
            stdout,
            stderr
        )));
    }

    Ok(())
}
