//! Tag extraction from decoded payloads.
//!
//! Payloads are expected to look like paths (`warehouse/zoneA/item42`); the
//! tag is the segment just before the last one (`zoneA`).

/// Return the second-to-last `/`-separated segment of `payload`, or `""` if
/// the payload has fewer than two segments.
pub fn extract_tag(payload: &str) -> &str {
    let mut segments = payload.rsplit('/');
    segments.next();
    segments.next().unwrap_or("")
}
