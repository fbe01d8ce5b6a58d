//! Chain time.
//!
//! Transaction timestamps count seconds since [`EPOCH_BEGINNING`]
//! (2013-11-24 12:00:00 UTC), not since the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};

use crate::config::EPOCH_BEGINNING;

/// Current time in chain seconds, stamped the way other wallets on the
/// chain stamp it. See [`stamp_time`].
pub fn epoch_time() -> u32 {
    stamp_time(Utc::now())
}

/// Transaction timestamp for a transaction created at `at`: half a second
/// is added before rounding, so the result is the whole second after `at`.
pub fn stamp_time(at: DateTime<Utc>) -> u32 {
    to_epoch_time(at + chrono::Duration::milliseconds(500))
}

/// Chain seconds for `at`, rounded to the nearest second. Instants before the chain epoch map to 0 and
/// instants past `u32::MAX` saturate.
pub fn to_epoch_time(at: DateTime<Utc>) -> u32 {
    let millis = at.timestamp_millis() - EPOCH_BEGINNING * 1000;
    let seconds = (millis + 500).div_euclid(1000);
    u32::try_from(seconds.max(0)).unwrap_or(u32::MAX)
}

/// Wall-clock instant of a chain timestamp.
pub fn timestamp_to_datetime(timestamp: u32) -> DateTime<Utc> {
    let epoch = Utc
        .timestamp_opt(EPOCH_BEGINNING, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    epoch + chrono::Duration::seconds(i64::from(timestamp))
}
