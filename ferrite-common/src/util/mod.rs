use std::fmt::{self, Display};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3600;
pub const SECONDS_PER_DAY: i64 = 86400;

/// A duration token that looked numeric but did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError(pub String);

impl Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration: {}", self.0)
    }
}

impl std::error::Error for ParseDurationError {}

/// Parses a duration token: `10m`, `2h`, `3d`, or a bare count of seconds.
///
/// The suffix is case-insensitive. Any other trailing letter is an error,
/// never silently treated as seconds, and so is a count whose seconds
/// value does not fit in an `i64`.
pub fn parse_duration_seconds(token: &str) -> Result<i64, ParseDurationError> {
    let lowered = token.to_ascii_lowercase();
    let (digits, multiplier) = match lowered.as_bytes().last() {
        Some(b'm') => (&lowered[..lowered.len() - 1], SECONDS_PER_MINUTE),
        Some(b'h') => (&lowered[..lowered.len() - 1], SECONDS_PER_HOUR),
        Some(b'd') => (&lowered[..lowered.len() - 1], SECONDS_PER_DAY),
        _ => (lowered.as_str(), 1),
    };

    digits
        .parse::<i64>()
        .ok()
        .and_then(|v| v.checked_mul(multiplier))
        .ok_or_else(|| ParseDurationError(token.to_owned()))
}

/// Renders a duration in the largest unit that divides it evenly: days,
/// then hours, then minutes.
///
/// Unit names are always plural ("1 minutes") and never combined. A count
/// that not even minutes divide evenly is shown as-is, labelled minutes.
pub fn format_duration(seconds: i64) -> String {
    if seconds >= SECONDS_PER_DAY && seconds % SECONDS_PER_DAY == 0 {
        format!("{} days", seconds / SECONDS_PER_DAY)
    } else if seconds >= SECONDS_PER_HOUR && seconds % SECONDS_PER_HOUR == 0 {
        format!("{} hours", seconds / SECONDS_PER_HOUR)
    } else if seconds >= SECONDS_PER_MINUTE && seconds % SECONDS_PER_MINUTE == 0 {
        format!("{} minutes", seconds / SECONDS_PER_MINUTE)
    } else {
        format!("{seconds} minutes")
    }
}

/// Seconds since the unix epoch.
pub fn unix_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Attempts to extract resident memory usage of this process, in bytes.
pub fn get_memory_usage() -> Option<usize> {
    let field = 1;
    let contents = std::fs::read("/proc/self/statm").ok()?;
    let contents = String::from_utf8(contents).ok()?;
    let s = contents.split_whitespace().nth(field)?;
    let npages = s.parse::<usize>().ok()?;
    Some(npages * 4096)
}
