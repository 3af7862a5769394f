//! Run configuration
//!
//! Built once at startup from layered sources. For every key the first
//! layer that defines a non-empty value wins:
//!
//! 1. process environment
//! 2. preferred env file (`ENV_FILE`, default `<PROJECT_DIR>/secrets.env`)
//! 3. fallback env file (`FALLBACK_ENV`, default `<PROJECT_DIR>/.env`)
//! 4. built-in default
//!
//! CLI flags sit above all of these for the few keys they cover.

pub(crate) mod envfile;
pub(crate) mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::consts::{
    DEFAULT_BUCKET, DEFAULT_NOTIFY_TIMEOUT_SECS, DEFAULT_REGION, DEFAULT_RETENTION_DAYS,
    FALLBACK_ENV_FILE, HISTORY_FILE_NAME, PREFERRED_ENV_FILE,
};
use crate::error::{AppError, ConfigError};
use crate::prompt::PromptCatalog;
use crate::utils::Timezone;

pub(crate) use envfile::EnvMap;
use envfile::load_env_file;
use settings::{SETTINGS_PATH_ENV, Settings};

/// Values taken from the command line
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub(crate) project_dir: Option<PathBuf>,
    pub(crate) env_file: Option<PathBuf>,
    pub(crate) fallback_env: Option<PathBuf>,
    pub(crate) timezone: Option<String>,
    pub(crate) no_notify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TelegramCredentials {
    pub(crate) bot_token: String,
    pub(crate) chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AwsCredentials {
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: Option<String>,
}

/// Amazon SES v2 sender, recipients and signing identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SesConfig {
    pub(crate) from: String,
    pub(crate) to: Vec<String>,
    pub(crate) region: String,
    pub(crate) credentials: AwsCredentials,
}

#[derive(Debug, Clone)]
pub(crate) struct NotifyConfig {
    pub(crate) enabled: bool,
    pub(crate) timeout: Duration,
    pub(crate) telegram: Option<TelegramCredentials>,
    pub(crate) slack_webhook: Option<String>,
    pub(crate) discord_webhook: Option<String>,
    pub(crate) ses: Option<SesConfig>,
}

#[derive(Debug, Clone)]
pub(crate) struct RunConfig {
    pub(crate) project_dir: PathBuf,
    pub(crate) venv_path: PathBuf,
    pub(crate) script_path: PathBuf,
    pub(crate) log_dir: PathBuf,
    pub(crate) history_file: PathBuf,
    pub(crate) preferred_env: PathBuf,
    pub(crate) fallback_env: PathBuf,
    pub(crate) bucket: String,
    pub(crate) region: String,
    pub(crate) timezone: Timezone,
    pub(crate) retention_days: u64,
    pub(crate) catalog: PromptCatalog,
    pub(crate) notify: NotifyConfig,
    /// File-provided variables the process environment doesn't already set;
    /// handed to the generator subprocess.
    pub(crate) child_env: EnvMap,
    pub(crate) settings_path: Option<PathBuf>,
    /// Non-fatal problems seen while resolving, logged once logging is up
    pub(crate) warnings: Vec<String>,
}

struct Layers<'a> {
    process: &'a EnvMap,
    preferred: &'a EnvMap,
    fallback: &'a EnvMap,
}

impl Layers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        [self.process, self.preferred, self.fallback]
            .into_iter()
            .find_map(|layer| layer.get(key).map(String::as_str).filter(|v| !v.is_empty()))
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// SES needs a sender, at least one recipient and a key pair
    fn ses(&self, default_region: &str) -> Option<SesConfig> {
        let from = self.get("AWS_SES_FROM")?;
        let to: Vec<String> = self
            .get("AWS_SES_TO")?
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect();
        if to.is_empty() {
            return None;
        }
        let credentials = AwsCredentials {
            access_key_id: self.get("AWS_ACCESS_KEY_ID")?.to_string(),
            secret_access_key: self.get("AWS_SECRET_ACCESS_KEY")?.to_string(),
            session_token: self.get("AWS_SESSION_TOKEN").map(str::to_string),
        };
        let region = ["AWS_SES_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]
            .into_iter()
            .find_map(|key| self.get(key))
            .unwrap_or(default_region);
        Some(SesConfig {
            from: from.to_string(),
            to,
            region: region.to_string(),
            credentials,
        })
    }
}

fn process_value(env: &EnvMap, key: &str) -> Option<PathBuf> {
    env.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn load_layer(path: &Path, warnings: &mut Vec<String>) -> EnvMap {
    match load_env_file(path) {
        Ok(Some(vars)) => vars,
        Ok(None) => EnvMap::new(),
        Err(e) => {
            warnings.push(format!("Failed to read env file {}: {}", path.display(), e));
            EnvMap::new()
        }
    }
}

impl RunConfig {
    pub(crate) fn from_process(overrides: &Overrides) -> Result<Self, AppError> {
        let env: EnvMap = std::env::vars().collect();
        let cwd = std::env::current_dir().map_err(|e| AppError::io("read", ".", e))?;
        Ok(Self::resolve(&env, &cwd, overrides)?)
    }

    pub(crate) fn resolve(
        env: &EnvMap,
        cwd: &Path,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mut warnings = Vec::new();

        let project_dir = overrides
            .project_dir
            .clone()
            .or_else(|| process_value(env, "PROJECT_DIR"))
            .unwrap_or_else(|| cwd.to_path_buf());

        let preferred_env = overrides
            .env_file
            .clone()
            .or_else(|| process_value(env, "ENV_FILE"))
            .unwrap_or_else(|| project_dir.join(PREFERRED_ENV_FILE));
        let fallback_env = overrides
            .fallback_env
            .clone()
            .or_else(|| process_value(env, "FALLBACK_ENV"))
            .unwrap_or_else(|| project_dir.join(FALLBACK_ENV_FILE));

        let preferred_vars = load_layer(&preferred_env, &mut warnings);
        let fallback_vars = load_layer(&fallback_env, &mut warnings);
        let layers = Layers {
            process: env,
            preferred: &preferred_vars,
            fallback: &fallback_vars,
        };

        let venv_path = layers
            .path("VENV_PATH")
            .unwrap_or_else(|| project_dir.join("venv"));
        let script_path = layers
            .path("SCRIPT_PATH")
            .unwrap_or_else(|| project_dir.join("main.py"));
        let log_dir = layers
            .path("LOG_DIR")
            .unwrap_or_else(|| project_dir.join("logs"));
        let history_file = layers
            .path("HISTORY_FILE")
            .unwrap_or_else(|| log_dir.join(HISTORY_FILE_NAME));
        let bucket = layers.get("S3_BUCKET").unwrap_or(DEFAULT_BUCKET).to_string();
        let region = layers.get("S3_REGION").unwrap_or(DEFAULT_REGION).to_string();

        let candidates =
            Settings::candidate_paths(&project_dir, env.get(SETTINGS_PATH_ENV).map(String::as_str));
        let (settings, settings_path) = match Settings::load(&candidates, &mut warnings) {
            Some((settings, path)) => (settings, Some(path)),
            None => (Settings::default(), None),
        };

        let retention_days = settings.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS);
        if retention_days == 0 {
            // Zero would delete the log of the run that is still writing it
            return Err(ConfigError::Settings {
                path: settings_path.unwrap_or_default(),
                message: "retention_days must be at least 1".to_string(),
            });
        }

        let catalog = match settings.prompts {
            Some(prompts) => PromptCatalog::new(prompts)?,
            None => PromptCatalog::builtin(),
        };

        let timezone = Timezone::parse(
            overrides
                .timezone
                .as_deref()
                .or_else(|| layers.get("DAILYSHOT_TZ"))
                .or(settings.timezone.as_deref()),
        )?;

        let telegram = match (layers.get("TELEGRAM_BOT_TOKEN"), layers.get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramCredentials {
                bot_token: token.to_string(),
                chat_id: chat_id.to_string(),
            }),
            _ => None,
        };
        let notify = NotifyConfig {
            enabled: !overrides.no_notify,
            timeout: Duration::from_secs(
                settings
                    .notify_timeout_secs
                    .unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS),
            ),
            telegram,
            slack_webhook: layers.get("SLACK_WEBHOOK_URL").map(str::to_string),
            discord_webhook: layers.get("DISCORD_WEBHOOK_URL").map(str::to_string),
            ses: layers.ses(&region),
        };

        // Preferred file beats fallback; anything already in the process
        // environment is inherited by the child as-is.
        let mut child_env = fallback_vars.clone();
        child_env.extend(preferred_vars.clone());
        child_env.retain(|key, _| !env.contains_key(key));

        Ok(Self {
            project_dir,
            venv_path,
            script_path,
            log_dir,
            history_file,
            preferred_env,
            fallback_env,
            bucket,
            region,
            timezone,
            retention_days,
            catalog,
            notify,
            child_env,
            settings_path,
            warnings,
        })
    }
}
