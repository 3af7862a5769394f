//! Best-effort parsing of the generator's console output
//!
//! The generator prints human-oriented lines such as
//!
//! ```text
//! Public URL:  https://bucket.s3.eu-central-1.amazonaws.com/images/2025/05/01/sd3_2025-05-01.png
//! Filename:    sd3_2025-05-01.png
//! Generated:   2025-05-01T07:00:12.345678
//! s3://bucket/images/2025/05/01/sd3_2025-05-01.png
//! ```
//!
//! Every field is optional. A missing or reshaped line leaves the field
//! unset and never turns a run into a failure; the exit code alone decides
//! success.

use serde::Serialize;

const STORAGE_URI_PREFIX: &str = "s3://";
const PUBLIC_URL_LABEL: &str = "Public URL:";
const FILENAME_LABEL: &str = "Filename:";
const GENERATED_LABEL: &str = "Generated:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Extracted {
    pub(crate) storage_uri: Option<String>,
    pub(crate) public_url: Option<String>,
    pub(crate) filename: Option<String>,
    pub(crate) generated_at: Option<String>,
}

impl Extracted {
    /// Names of the fields that were not found, for warnings
    pub(crate) fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.storage_uri.is_none() {
            missing.push("storage URI");
        }
        if self.public_url.is_none() {
            missing.push("public URL");
        }
        if self.filename.is_none() {
            missing.push("filename");
        }
        if self.generated_at.is_none() {
            missing.push("generation timestamp");
        }
        missing
    }
}

/// Token right after `label` on the first line containing it
fn labelled_value(output: &str, label: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains(label))?;
    let (_, rest) = line.split_once(label)?;
    rest.split_whitespace().next().map(str::to_string)
}

pub(crate) fn extract(output: &str) -> Extracted {
    // The generator may log an intermediate URI before the final one.
    let storage_uri = output
        .lines()
        .map(str::trim)
        .rfind(|line| line.starts_with(STORAGE_URI_PREFIX))
        .map(str::to_string);

    Extracted {
        storage_uri,
        public_url: labelled_value(output, PUBLIC_URL_LABEL),
        filename: labelled_value(output, FILENAME_LABEL),
        generated_at: labelled_value(output, GENERATED_LABEL),
    }
}

/// Lines mentioning "error" in any case, for failure diagnostics
pub(crate) fn error_lines(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|line| line.to_lowercase().contains("error"))
        .collect()
}
