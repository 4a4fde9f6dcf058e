//! Text wire format sent to the game, one datagram per frame:
//!
//! ```text
//! <x>,<y>,<isFist>,<isThumbsUp>,<isOpenHand>
//! ```
//!
//! x and y carry exactly three fractional digits, flags are `0` or `1`.

use crate::ControlSignal;
use anyhow::{bail, Context, Result};

/// Sent verbatim for frames without a hand. This is a fixed literal, not the
/// formatted form of any [`ControlSignal`].
pub const NO_HAND_PAYLOAD: &str = "0.0,0.0,0,0,0";

pub const FIELD_COUNT: usize = 5;
/// Older receivers only understood `x,y,isFist`.
pub const LEGACY_FIELD_COUNT: usize = 3;

pub fn encode(signal: &ControlSignal) -> String {
    format!(
        "{:.3},{:.3},{},{},{}",
        signal.x,
        signal.y,
        flag(signal.is_fist),
        flag(signal.is_thumbs_up),
        flag(signal.is_open_hand)
    )
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Parses a payload back into a signal. Accepts the current five-field form
/// and the legacy three-field form.
pub fn decode(payload: &str) -> Result<ControlSignal> {
    let parts: Vec<&str> = payload.trim_end_matches('\0').trim().split(',').collect();

    match parts.len() {
        FIELD_COUNT | LEGACY_FIELD_COUNT => {}
        n => bail!(
            "Expected {} or {} fields, got {}",
            FIELD_COUNT,
            LEGACY_FIELD_COUNT,
            n
        ),
    }

    let x = parse_axis(parts[0], "x")?;
    let y = parse_axis(parts[1], "y")?;
    let is_fist = parse_flag(parts[2], "isFist")?;
    let (is_thumbs_up, is_open_hand) = if parts.len() == FIELD_COUNT {
        (
            parse_flag(parts[3], "isThumbsUp")?,
            parse_flag(parts[4], "isOpenHand")?,
        )
    } else {
        (false, false)
    };

    Ok(ControlSignal {
        x,
        y,
        is_fist,
        is_thumbs_up,
        is_open_hand,
    })
}

fn parse_axis(field: &str, name: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid {} value {:?}", name, field))
}

fn parse_flag(field: &str, name: &str) -> Result<bool> {
    match field.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => bail!("Invalid {} flag {:?}", name, other),
    }
}
