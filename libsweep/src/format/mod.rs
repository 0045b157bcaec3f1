//! Human-readable formatting for image listings.

use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;


/// Number of digest characters shown in listings.
pub const SHORT_DIGEST_LEN: usize = 16;

/// Formats a creation time as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use libsweep::format::format_created;
///
/// let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
/// assert_eq!(format_created(&t), "2024-03-05 07:08:09");
/// ```
pub fn format_created(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a timestamp relative to now, e.g. "a day ago".
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.humanize()
}

/// The first [`SHORT_DIGEST_LEN`] characters of a digest.
///
/// # Examples
///
/// ```
/// use libsweep::format::short_digest;
///
/// assert_eq!(
///     short_digest("sha256:7173b809ca12ec5dee4506cd86be934c"),
///     "sha256:7173b809c"
/// );
/// assert_eq!(short_digest("sha256:ab"), "sha256:ab");
/// ```
pub fn short_digest(digest: &str) -> &str {
    match digest.char_indices().nth(SHORT_DIGEST_LEN) {
        Some((end, _)) => &digest[..end],
        None => digest,
    }
}
