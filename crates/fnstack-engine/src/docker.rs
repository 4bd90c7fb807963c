//! Image builder backed by the `docker` command-line client.
//!
//! Builds stage a context directory from the language template and the
//! function handler, then shell out to `docker build`. Pushes run
//! `docker push`. Output is captured and logged under the function's
//! span so parallel builds stay readable.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

use fnstack_common::config::BuildOptions;
use fnstack_common::constants::{BUILD_DIR, FUNCTION_SUBDIR, TEMPLATE_DIR};
use fnstack_common::error::{FnstackError, Result};
use fnstack_common::types::{ResolvedFunctionSpec, is_path_segment};

use crate::collaborator::ImageBuilder;

/// Lines of stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 5;

/// [`ImageBuilder`] that invokes the local `docker` binary.
#[derive(Debug, Clone)]
pub struct DockerCli {
    workdir: PathBuf,
    binary: String,
}

impl DockerCli {
    /// Creates a builder rooted at `workdir`, where `template/` and
    /// `build/` are looked up and handler paths are resolved.
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            binary: "docker".into(),
        }
    }

    /// Overrides the name or path of the docker executable.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Prepares the build context for `spec` and returns its path.
    ///
    /// When `template/<lang>` exists the template is copied to
    /// `build/<name>/` and the handler into its `function/` subdirectory.
    /// Otherwise the handler directory is used as the context directly.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Build`] if the handler directory is missing,
    /// the name or language would leave `build/` or `template/`, or the
    /// context cannot be written.
    pub fn stage_context(&self, spec: &ResolvedFunctionSpec) -> Result<PathBuf> {
        let handler = self.workdir.join(&spec.handler);
        if !handler.is_dir() {
            return Err(build_error(
                spec,
                format!("handler directory not found: {}", handler.display()),
            ));
        }

        let template = child_dir(&self.workdir.join(TEMPLATE_DIR), &spec.language)
            .ok_or_else(|| build_error(spec, format!("invalid language: {:?}", spec.language)))?;
        if !template.is_dir() {
            tracing::debug!(
                template = %template.display(),
                "no language template, building handler directly"
            );
            return Ok(handler);
        }

        let context = child_dir(&self.workdir.join(BUILD_DIR), &spec.name)
            .ok_or_else(|| build_error(spec, format!("invalid function name: {:?}", spec.name)))?;
        if context.exists() {
            std::fs::remove_dir_all(&context)
                .map_err(|e| build_error(spec, format!("clearing {}: {e}", context.display())))?;
        }
        copy_dir(&template, &context).map_err(|e| build_error(spec, e.to_string()))?;
        copy_dir(&handler, &context.join(FUNCTION_SUBDIR))
            .map_err(|e| build_error(spec, e.to_string()))?;
        tracing::info!(context = %context.display(), language = %spec.language, "staged build context");
        Ok(context)
    }

    fn locate(&self) -> std::result::Result<PathBuf, String> {
        which::which(&self.binary).map_err(|e| format!("{} not found on PATH: {e}", self.binary))
    }

    fn run(&self, args: &[String]) -> std::result::Result<(), String> {
        let program = self.locate()?;
        tracing::debug!(program = %program.display(), ?args, "running builder command");

        let output = Command::new(&program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| format!("failed to run {}: {e}", program.display()))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!(target: "fnstack::docker", "{line}");
        }
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Err(format!("exit status {code}: {}", tail(&stderr, STDERR_TAIL_LINES)))
    }
}

impl ImageBuilder for DockerCli {
    fn build(&self, spec: &ResolvedFunctionSpec, options: BuildOptions) -> Result<()> {
        let context = self.stage_context(spec)?;
        let args = build_args(&spec.image, &context, options);
        tracing::info!(image = %spec.image, no_cache = options.no_cache, squash = options.squash, "building image");
        self.run(&args).map_err(|message| build_error(spec, message))
    }

    fn push(&self, image: &str) -> Result<()> {
        tracing::info!(image, "pushing image");
        let args = vec!["push".to_string(), image.to_string()];
        self.run(&args).map_err(|message| FnstackError::Push {
            image: image.to_string(),
            message,
        })
    }
}

/// Arguments for `docker build`.
#[must_use]
pub fn build_args(image: &str, context: &Path, options: BuildOptions) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-t".to_string(), image.to_string()];
    if options.no_cache {
        args.push("--no-cache".into());
    }
    if options.squash {
        args.push("--squash".into());
    }
    args.push(context.to_string_lossy().into_owned());
    args
}

fn build_error(spec: &ResolvedFunctionSpec, message: String) -> FnstackError {
    FnstackError::Build {
        name: spec.name.clone(),
        message,
    }
}

/// Joins `segment` onto `root` only if the result is a direct child of it.
fn child_dir(root: &Path, segment: &str) -> Option<PathBuf> {
    if !is_path_segment(segment) {
        return None;
    }
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => Some(root.join(part)),
        _ => None,
    }
}

fn tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}

fn copy_dir(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            let _ = std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
