//! Encoded play-time arithmetic.
//!
//! Accumulated play time is stored as a minutes.seconds encoding, not as
//! decimal minutes: the integer part is whole minutes and the fractional
//! part times 100 (rounded) is seconds, so `1.30` means 1 minute 30
//! seconds. Existing stored data uses this scheme, so the merge must
//! reproduce it exactly -- integer seconds, base-60 re-normalization,
//! base-100 fraction. A seconds part outside 0-59 is never produced.

/// Split an encoded value into (whole minutes, seconds).
pub fn decompose(encoded: f32) -> (i64, i64) {
    let minutes = encoded as i64;
    let fractional = encoded - minutes as f32;
    let seconds = (fractional * 100.0).round() as i64;
    (minutes, seconds)
}

/// Total seconds represented by an encoded value.
pub fn total_seconds(encoded: f32) -> i64 {
    let (minutes, seconds) = decompose(encoded);
    minutes * 60 + seconds
}

/// Re-encode a non-negative second count.
pub fn encode(total_secs: i64) -> f32 {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    minutes as f32 + seconds as f32 / 100.0
}

/// Merge `delta_secs` newly elapsed seconds into an encoded value.
pub fn merge(encoded: f32, delta_secs: i64) -> f32 {
    encode(total_seconds(encoded) + delta_secs)
}
