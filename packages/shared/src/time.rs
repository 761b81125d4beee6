use chrono::{DateTime, FixedOffset, Utc};

/// JST is UTC+9
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Get current Unix timestamp (milliseconds)
///
/// Unix milliseconds do not depend on the zone; JST only matters when rendering.
pub fn get_jst_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as an RFC 3339 string in JST.
///
/// Falls back to the raw number when the timestamp is out of chrono's range.
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    let Some(jst) = FixedOffset::east_opt(JST_OFFSET_SECS) else {
        return millis.to_string();
    };
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&jst).to_rfc3339(),
        None => millis.to_string(),
    }
}

/// Render a Unix timestamp (milliseconds) as `HH:MM:SS` in JST.
pub fn timestamp_to_jst_clock(millis: i64) -> String {
    let Some(jst) = FixedOffset::east_opt(JST_OFFSET_SECS) else {
        return millis.to_string();
    };
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&jst).format("%H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}
