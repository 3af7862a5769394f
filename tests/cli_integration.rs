use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const CORAL_REEF: &str = "underwater coral reef with exotic fish, vibrant colors, nature photography";

// Variables that would leak the developer's own setup into a run
const SCRUBBED_ENV: &[&str] = &[
    "PROJECT_DIR",
    "VENV_PATH",
    "SCRIPT_PATH",
    "LOG_DIR",
    "ENV_FILE",
    "FALLBACK_ENV",
    "HISTORY_FILE",
    "S3_BUCKET",
    "S3_REGION",
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
    "SLACK_WEBHOOK_URL",
    "DISCORD_WEBHOOK_URL",
    "AWS_SES_FROM",
    "AWS_SES_TO",
    "AWS_SES_REGION",
    "DAILYSHOT_TZ",
    "DAILYSHOT_LOG",
];

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "dailyshot-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

struct Output {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_dailyshot(project: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let bin = std::env::var("CARGO_BIN_EXE_dailyshot").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("dailyshot.exe");
        } else {
            path.push("dailyshot");
        }
        path.to_string_lossy().into_owned()
    });
    let mut cmd = Command::new(bin);
    cmd.args(args);
    for key in SCRUBBED_ENV {
        cmd.env_remove(key);
    }
    cmd.env("PROJECT_DIR", project);
    cmd.env("DAILYSHOT_CONFIG", project.join("dailyshot.toml"));
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("run dailyshot");
    Output {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

fn log_files(project: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(project.join("logs")) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .collect()
}

fn plant_old_log(project: &Path, days: u64) -> PathBuf {
    let path = project
        .join("logs")
        .join("generation_20240101_070000.log");
    write_file(&path, "old run\n");
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60))
        .unwrap();
    path
}

/// Lay out a project whose "venv python" is /bin/sh and whose main.py is a
/// shell script, so the generator can be faked without Python.
#[cfg(unix)]
fn fake_project(prefix: &str, script: &str) -> PathBuf {
    let root = unique_temp_dir(prefix);
    let python = root.join("venv").join("bin").join("python");
    fs::create_dir_all(python.parent().unwrap()).expect("create venv");
    std::os::unix::fs::symlink("/bin/sh", &python).expect("link interpreter");
    write_file(&root.join("main.py"), script);
    root
}

const SUCCESS_SCRIPT: &str = r#"printf '%s\n' "$@" > args.txt
echo "token=$REPLICATE_API_TOKEN" > env.txt
echo "INFO - Uploading to s3://bucket/img1.png" >&2
echo "s3://bucket/img1.png"
echo "s3://bucket/img2.png"
echo "Public URL: https://example.com/img2.png"
echo "Filename: img2.png"
echo "Generated: 2024-05-01T10:00:00Z"
"#;

#[test]
fn prompt_for_day_45_is_coral_reef() {
    let root = unique_temp_dir("prompt");
    let out = run_dailyshot(&root, &["prompt", "--day", "45", "--json"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let json: Value = serde_json::from_str(&out.stdout).expect("json");
    assert_eq!(json["day"], 45);
    assert_eq!(json["index"], 3);
    assert_eq!(json["prompt"], CORAL_REEF);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn prompt_rejects_out_of_range_day() {
    let root = unique_temp_dir("prompt-range");
    let out = run_dailyshot(&root, &["prompt", "--day", "367"], &[]);
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("Invalid day of year 367"), "stderr: {}", out.stderr);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn empty_prompt_catalog_is_fatal() {
    let root = unique_temp_dir("empty-catalog");
    write_file(&root.join("dailyshot.toml"), "prompts = []\n");
    let out = run_dailyshot(&root, &["prompt"], &[]);
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("Prompt catalog is empty"), "stderr: {}", out.stderr);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn custom_catalog_from_settings() {
    let root = unique_temp_dir("custom-catalog");
    write_file(
        &root.join("dailyshot.toml"),
        "prompts = [\"a lighthouse in a storm\", \"a desert at dusk\"]\n",
    );
    let out = run_dailyshot(&root, &["prompt", "--day", "3"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("a desert at dusk"));
    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn successful_run_records_history_and_log() {
    let root = fake_project("run-ok", SUCCESS_SCRIPT);
    write_file(
        &root.join("secrets.env"),
        "REPLICATE_API_TOKEN=r8_secret\nS3_BUCKET=from-secrets\n",
    );
    write_file(&root.join(".env"), "S3_BUCKET=from-fallback\nS3_REGION=us-east-2\n");

    let out = run_dailyshot(&root, &["run", "--day", "45", "--no-notify"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let history = fs::read_to_string(root.join("logs").join("generated_images.txt"))
        .expect("history written");
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(&format!(" | https://example.com/img2.png | {CORAL_REEF}")));

    let args = fs::read_to_string(root.join("args.txt")).expect("args recorded");
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(&args[..4], &["--bucket", "from-secrets", "--prompt", CORAL_REEF]);
    assert!(args.contains(&"--organized"));
    assert!(args.contains(&"--public"));
    assert!(args.windows(2).any(|w| w == ["--region", "us-east-2"]));
    assert!(args.windows(2).any(|w| w == ["--steps", "28"]));
    assert!(args.windows(2).any(|w| w == ["--guidance", "3.5"]));
    let seed: u64 = args.last().unwrap().parse().expect("numeric seed");
    assert!(seed < 999_999);

    let env = fs::read_to_string(root.join("env.txt")).expect("env recorded");
    assert_eq!(env.trim(), "token=r8_secret");

    let logs = log_files(&root);
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(&logs[0]).expect("read run log");
    assert!(log.contains("Public URL: https://example.com/img2.png"));
    assert!(log.contains("Stored at s3://bucket/img2.png"));

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn second_run_appends_rather_than_rewrites() {
    let root = fake_project("run-twice", SUCCESS_SCRIPT);
    write_file(
        &root.join("logs").join("generated_images.txt"),
        "2024-04-30 07:00:00 | https://example.com/img1.png | yesterday\n",
    );

    let out = run_dailyshot(&root, &["run", "--day", "45", "--no-notify"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let history = fs::read_to_string(root.join("logs").join("generated_images.txt")).unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("| yesterday"));

    let listed = run_dailyshot(&root, &["history", "--json", "-n", "1"], &[]);
    assert_eq!(listed.code, Some(0), "stderr: {}", listed.stderr);
    let json: Value = serde_json::from_str(&listed.stdout).expect("json");
    let arr = json.as_array().expect("array");
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["public_url"], "https://example.com/img2.png");
    assert_eq!(arr[0]["prompt"], CORAL_REEF);

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn private_image_skips_history() {
    let root = fake_project(
        "run-private",
        "echo 's3://bucket/img.png'\necho 'Image is private.'\n",
    );
    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(!root.join("logs").join("generated_images.txt").exists());
    assert!(out.stderr.contains("presumed private"), "stderr: {}", out.stderr);
    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn generator_failure_exit_code_is_mirrored() {
    let root = fake_project(
        "run-fail",
        "echo 'Public URL: https://example.com/never.png'\necho 'ValueError: Invalid Replicate token' >&2\nexit 3\n",
    );
    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(3), "stderr: {}", out.stderr);
    assert!(!root.join("logs").join("generated_images.txt").exists());

    let logs = log_files(&root);
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(&logs[0]).unwrap();
    assert!(log.contains("exit code 3"));
    assert!(log.contains("diagnostic: ValueError: Invalid Replicate token"));

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn run_json_summary() {
    let root = fake_project("run-json", SUCCESS_SCRIPT);
    let out = run_dailyshot(&root, &["run", "--day", "45", "--json", "--no-notify"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let json: Value = serde_json::from_str(&out.stdout).expect("json");
    assert_eq!(json["status"], "success");
    assert_eq!(json["prompt"], CORAL_REEF);
    assert_eq!(json["outcome"]["storage_uri"], "s3://bucket/img2.png");
    assert_eq!(json["outcome"]["filename"], "img2.png");
    assert_eq!(json["outcome"]["generated_at"], "2024-05-01T10:00:00Z");

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn successful_run_prunes_old_logs() {
    let root = fake_project("run-prune-ok", SUCCESS_SCRIPT);
    let old = plant_old_log(&root, 31);

    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(!old.exists());
    // Only this run's log is left
    let logs = log_files(&root);
    assert_eq!(logs.len(), 1);
    assert_ne!(logs[0], old);

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn failed_run_still_prunes_old_logs() {
    let root = fake_project("run-prune-fail", "echo 'ERROR: no GPU' >&2\nexit 2\n");
    let old = plant_old_log(&root, 31);

    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(2), "stderr: {}", out.stderr);
    assert!(!old.exists());
    assert_eq!(log_files(&root).len(), 1);

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn unreachable_webhook_does_not_change_outcome() {
    let root = fake_project("run-bad-webhook", SUCCESS_SCRIPT);
    let out = run_dailyshot(
        &root,
        &["run", "--day", "45"],
        &[("SLACK_WEBHOOK_URL", "http://127.0.0.1:9/hook")],
    );
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(
        out.stderr.contains("Notification via slack failed"),
        "stderr: {}",
        out.stderr
    );

    let history = fs::read_to_string(root.join("logs").join("generated_images.txt"))
        .expect("history written");
    assert_eq!(history.lines().count(), 1);
    assert!(history.contains("https://example.com/img2.png"));

    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn unreachable_webhook_keeps_failure_code() {
    let root = fake_project("run-bad-webhook-fail", "echo 'ERROR: quota' >&2\nexit 4\n");
    let out = run_dailyshot(
        &root,
        &["run"],
        &[("SLACK_WEBHOOK_URL", "http://127.0.0.1:9/hook")],
    );
    assert_eq!(out.code, Some(4), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("Notification via slack failed"));
    let _ = fs::remove_dir_all(root);
}

#[test]
fn zero_retention_is_refused_before_running() {
    let root = unique_temp_dir("zero-retention");
    write_file(&root.join("dailyshot.toml"), "retention_days = 0\n");
    let old = plant_old_log(&root, 40);

    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(1));
    assert!(
        out.stderr.contains("retention_days must be at least 1"),
        "stderr: {}",
        out.stderr
    );
    // Nothing ran, so nothing was rotated
    assert!(old.exists());
    assert_eq!(log_files(&root), vec![old]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_venv_is_a_setup_error() {
    let root = unique_temp_dir("no-venv");
    write_file(&root.join("main.py"), "print('hi')\n");
    let out = run_dailyshot(&root, &["run", "--no-notify"], &[]);
    assert_eq!(out.code, Some(1));
    assert!(
        out.stderr.contains("virtualenv interpreter not found"),
        "stderr: {}",
        out.stderr
    );
    let _ = fs::remove_dir_all(root);
}

#[test]
fn dry_run_prints_command_without_running() {
    let root = unique_temp_dir("dry-run");
    let out = run_dailyshot(
        &root,
        &["run", "--dry-run", "--day", "45"],
        &[("S3_BUCKET", "dry-bucket")],
    );
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("main.py --bucket dry-bucket"));
    assert!(out.stdout.contains(&format!("--prompt '{CORAL_REEF}'")));
    assert!(out.stdout.contains("--steps 28 --guidance 3.5 --seed "));
    assert!(log_files(&root).is_empty());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn rotate_removes_logs_past_retention() {
    let root = unique_temp_dir("rotate");
    let logs = root.join("logs");
    let old = plant_old_log(&root, 31);
    let fresh = logs.join("generation_20240301_070000.log");
    write_file(&fresh, "fresh run\n");

    let out = run_dailyshot(&root, &["rotate"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Removed 1 log file(s)"));
    assert!(!old.exists());
    assert!(fresh.exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn history_without_file() {
    let root = unique_temp_dir("history-empty");
    let out = run_dailyshot(&root, &["history"], &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("No images recorded"));
    let _ = fs::remove_dir_all(root);
}
