use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{EnvMap, RunConfig};
use crate::consts::{GENERATOR_GUIDANCE, GENERATOR_STEPS, SEED_MODULUS};
use crate::error::{AppError, InvokeError};

/// Arguments for one generator run
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunInvocation {
    pub(crate) prompt: String,
    pub(crate) seed: u64,
    pub(crate) bucket: String,
    pub(crate) region: String,
    pub(crate) steps: u32,
    pub(crate) guidance: f64,
    pub(crate) organized: bool,
    pub(crate) public: bool,
}

impl RunInvocation {
    pub(crate) fn new(prompt: &str, seed: u64, bucket: &str, region: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            seed,
            bucket: bucket.to_string(),
            region: region.to_string(),
            steps: GENERATOR_STEPS,
            guidance: GENERATOR_GUIDANCE,
            organized: true,
            public: true,
        }
    }

    pub(crate) fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--bucket".to_string(),
            self.bucket.clone(),
            "--prompt".to_string(),
            self.prompt.clone(),
        ];
        if self.organized {
            args.push("--organized".to_string());
        }
        if self.public {
            args.push("--public".to_string());
        }
        args.extend([
            "--region".to_string(),
            self.region.clone(),
            "--steps".to_string(),
            self.steps.to_string(),
            "--guidance".to_string(),
            self.guidance.to_string(),
            "--seed".to_string(),
            self.seed.to_string(),
        ]);
        args
    }
}

/// Seed in `[0, 999999)`. Varies per second, not random.
pub(crate) fn seed_from_unix(secs: u64) -> u64 {
    secs % SEED_MODULUS
}

pub(crate) fn current_seed() -> u64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    seed_from_unix(secs)
}

/// Captured result of a finished generator process
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captured {
    pub(crate) exit_code: i32,
    /// stdout and stderr interleaved as the process wrote them
    pub(crate) output: String,
}

/// How to start the generator: venv interpreter + script
#[derive(Debug, Clone)]
pub(crate) struct Launcher {
    pub(crate) program: PathBuf,
    pub(crate) script: PathBuf,
    pub(crate) working_dir: PathBuf,
    pub(crate) env: EnvMap,
}

pub(crate) fn venv_interpreter(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}

impl Launcher {
    pub(crate) fn from_config(config: &RunConfig) -> Self {
        Self {
            program: venv_interpreter(&config.venv_path),
            script: config.script_path.clone(),
            working_dir: config.project_dir.clone(),
            env: config.child_env.clone(),
        }
    }

    /// Refuse to start when the interpreter or script is missing.
    pub(crate) fn check(&self) -> Result<(), AppError> {
        if !self.program.is_file() {
            return Err(AppError::Setup(format!(
                "virtualenv interpreter not found at {}",
                self.program.display()
            )));
        }
        if !self.script.is_file() {
            return Err(AppError::Setup(format!(
                "generator script not found at {}",
                self.script.display()
            )));
        }
        if !self.working_dir.is_dir() {
            return Err(AppError::Setup(format!(
                "project directory not found at {}",
                self.working_dir.display()
            )));
        }
        Ok(())
    }

    /// Printable command line, for dry runs and the run log
    pub(crate) fn display(&self, invocation: &RunInvocation) -> String {
        let mut parts = vec![
            quote(&self.program.display().to_string()),
            quote(&self.script.display().to_string()),
        ];
        parts.extend(invocation.args().iter().map(|a| quote(a)));
        parts.join(" ")
    }

    /// Run to completion. Blocks for as long as the generator does.
    pub(crate) fn run(&self, invocation: &RunInvocation) -> Result<Captured, InvokeError> {
        let (mut reader, writer) = std::io::pipe().map_err(InvokeError::Pipe)?;
        let stderr_writer = writer.try_clone().map_err(InvokeError::Pipe)?;

        // The Command owns our copies of the write end; it must be gone
        // before reading or the pipe never reports EOF.
        let mut child = {
            let mut cmd = Command::new(&self.program);
            cmd.arg(&self.script)
                .args(invocation.args())
                .envs(&self.env)
                .current_dir(&self.working_dir)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr_writer);
            cmd.spawn().map_err(|source| InvokeError::Spawn {
                program: self.program.clone(),
                source,
            })?
        };

        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(InvokeError::Read(e));
        }
        let status = child.wait().map_err(InvokeError::Wait)?;

        Ok(Captured {
            // Killed by a signal: no code, count it as a plain failure
            exit_code: status.code().unwrap_or(1),
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
