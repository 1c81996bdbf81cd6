//! Scroll-Mount Telemetry Parser
//!
//! The accessory sends one short UTF-8 token per notification:
//!
//! | Token          | Meaning                  |
//! |----------------|--------------------------|
//! | `OK`           | violin seated in mount   |
//! | `ScrollLoose`  | scroll came loose        |
//! | `ViolinTilted` | violin tilted in mount   |
//! | `Height:<cm>`  | scroll height, integer   |
//!
//! Surrounding whitespace is ignored. Anything else yields `None` and is
//! dropped without error, so newer accessory firmware can add tokens without
//! breaking older monitors.

use crate::types::TelemetryEventKind;

/// Token reported when the violin is seated.
pub const TOKEN_MOUNTED: &str = "OK";
/// Token reported when the scroll is loose.
pub const TOKEN_SCROLL_LOOSE: &str = "ScrollLoose";
/// Token reported when the violin is tilted.
pub const TOKEN_VIOLIN_TILTED: &str = "ViolinTilted";
/// Prefix of height reports.
pub const HEIGHT_PREFIX: &str = "Height:";

/// Parse a raw notification payload.
pub fn parse_payload(payload: &[u8]) -> Option<TelemetryEventKind> {
    let text = std::str::from_utf8(payload).ok()?;
    parse_token(text)
}

/// Parse a payload that has already been decoded to text.
pub fn parse_token(text: &str) -> Option<TelemetryEventKind> {
    let token = text.trim();
    match token {
        TOKEN_MOUNTED => Some(TelemetryEventKind::Mounted),
        TOKEN_SCROLL_LOOSE => Some(TelemetryEventKind::ScrollLoose),
        TOKEN_VIOLIN_TILTED => Some(TelemetryEventKind::ViolinTilted),
        _ => token
            .strip_prefix(HEIGHT_PREFIX)
            .and_then(|rest| rest.trim().parse::<i32>().ok())
            .map(TelemetryEventKind::HeightReport),
    }
}
