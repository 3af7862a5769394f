//! Generator boundary: invocation of the external script and parsing of
//! what it prints.

pub(crate) mod extract;
pub(crate) mod invoke;

use serde::Serialize;

pub(crate) use extract::{Extracted, error_lines, extract};
pub(crate) use invoke::{Captured, Launcher, RunInvocation, current_seed};

/// Everything known about one finished generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RunOutcome {
    pub(crate) exit_code: i32,
    #[serde(skip)]
    pub(crate) raw_output: String,
    #[serde(flatten)]
    pub(crate) fields: Extracted,
}

impl RunOutcome {
    pub(crate) fn from_captured(captured: Captured) -> Self {
        let fields = extract(&captured.output);
        Self {
            exit_code: captured.exit_code,
            raw_output: captured.output,
            fields,
        }
    }

    /// The exit code is the only success signal.
    pub(crate) fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
