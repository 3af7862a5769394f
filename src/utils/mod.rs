pub(crate) mod date;
pub(crate) mod logging;
pub(crate) mod timezone;

pub(crate) use date::validate_day;
pub(crate) use logging::{LogLevel, init_logging};
pub(crate) use timezone::Timezone;
