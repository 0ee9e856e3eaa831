use std::str::FromStr;

use super::document::Element;

/// Get the Spine color for an element's stroke.
///
/// Returns lowercase `rrggbb`, with an `aa` alpha byte appended when the
/// stroke opacity is below 1. Paint servers, `none` and unparseable values
/// give no color.
pub fn stroke_color(element: &Element) -> Option<String> {
    let stroke = element.presentation("stroke")?;
    let color = svgtypes::Color::from_str(stroke).ok()?;

    let mut hex = format!("{:02x}{:02x}{:02x}", color.red, color.green, color.blue);

    let opacity = element
        .presentation("stroke-opacity")
        .and_then(|o| o.trim().parse::<f64>().ok())
        .map(|o| o.clamp(0.0, 1.0));
    if let Some(alpha) = opacity
        && alpha < 1.0
    {
        hex.push_str(&format!("{:02x}", (alpha * 255.0) as u8));
    }

    Some(hex)
}
