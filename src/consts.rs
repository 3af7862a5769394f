/// Timestamp format for history lines: "2025-01-15 07:00:03"
pub(crate) const HISTORY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-run log file stamp: "20250115_070003"
pub(crate) const LOG_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub(crate) const LOG_FILE_PREFIX: &str = "generation_";
pub(crate) const LOG_FILE_EXT: &str = "log";

pub(crate) const DEFAULT_BUCKET: &str = "daily-sd-images";
pub(crate) const DEFAULT_REGION: &str = "eu-central-1";
pub(crate) const DEFAULT_RETENTION_DAYS: u64 = 30;
pub(crate) const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

pub(crate) const PREFERRED_ENV_FILE: &str = "secrets.env";
pub(crate) const FALLBACK_ENV_FILE: &str = ".env";
pub(crate) const HISTORY_FILE_NAME: &str = "generated_images.txt";
pub(crate) const SETTINGS_FILE_NAME: &str = "dailyshot.toml";

/// Upper bound (exclusive) of the generator seed
pub(crate) const SEED_MODULUS: u64 = 999_999;

pub(crate) const GENERATOR_STEPS: u32 = 28;
pub(crate) const GENERATOR_GUIDANCE: f64 = 3.5;

/// Built-in rotation, indexed by `day_of_year % len`
pub(crate) const DEFAULT_PROMPTS: [&str; 7] = [
    "majestic mountain landscape at sunrise, golden hour lighting, ultra detailed",
    "futuristic cityscape at night with neon lights, cyberpunk style, cinematic",
    "serene japanese garden with cherry blossoms, soft morning light, watercolor style",
    "underwater coral reef with exotic fish, vibrant colors, nature photography",
    "cozy cabin in a snowy forest, warm light glowing from windows, winter evening",
    "astronaut floating above earth, stars in the background, photorealistic",
    "ancient library with towering bookshelves, magical atmosphere, fantasy art",
];
