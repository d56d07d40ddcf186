//! Readability adjustment for source accent colors.
//!
//! Source colors come from a fixed brand palette tuned for light backgrounds;
//! in night mode the dark ones disappear into the background, so anything
//! below the luminance cutoff gets brightened.

/// Perceived-luminance threshold below which a color is considered too dark
/// for a dark background.
pub const LUMINANCE_CUTOFF: f64 = 0.4;

fn normalize_hex(color: &str) -> Option<&str> {
    let hex = color.strip_prefix('#')?;
    match hex.len() {
        6 => Some(hex),
        // 8-digit hex carries an alpha suffix we ignore
        8 => Some(&hex[..6]),
        _ => None,
    }
}

/// Parse `#rrggbb`, `#rrggbbaa` or `rgb(r, g, b)` into channels.
pub fn parse_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim();
    if let Some(hex) = normalize_hex(color) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some((r, g, b));
    }
    let inner = color.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

/// Rec. 601 perceived luminance, normalized to 0.0–1.0.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

/// Return a readable variant of `color` for the given background. Light
/// backgrounds and already-bright colors pass through untouched; dark colors
/// on a dark background are scaled and offset, saturating per channel.
pub fn accessible_color(color: &str, dark_background: bool) -> String {
    if !dark_background {
        return color.to_string();
    }
    let Some((r, g, b)) = parse_rgb(color) else {
        return color.to_string();
    };
    if luminance(r, g, b) >= LUMINANCE_CUTOFF {
        return color.to_string();
    }
    let lift = |c: u8| -> u8 { (f64::from(c) * 1.6 + 60.0).round().min(255.0) as u8 };
    format!("rgb({}, {}, {})", lift(r), lift(g), lift(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_color_is_lifted_on_dark_background() {
        assert_eq!(accessible_color("#000000", true), "rgb(60, 60, 60)");
        // 0x1e = 30 -> 30*1.6+60 = 108
        assert_eq!(accessible_color("#1e1e1e", true), "rgb(108, 108, 108)");
    }

    #[test]
    fn bright_color_passes_through() {
        assert_eq!(accessible_color("#ffffff", true), "#ffffff");
        assert_eq!(accessible_color("#fbbf24", true), "#fbbf24");
    }

    #[test]
    fn light_background_never_changes_anything() {
        assert_eq!(accessible_color("#000000", false), "#000000");
    }

    #[test]
    fn channels_saturate_independently() {
        // 0xc8 = 200 -> 200*1.6+60 = 380, clamped; blue stays in range
        assert_eq!(accessible_color("rgb(200, 0, 30)", true), "rgb(255, 60, 108)");
    }

    #[test]
    fn alpha_suffix_is_ignored() {
        assert_eq!(
            accessible_color("#000000ff", true),
            accessible_color("#000000", true)
        );
    }

    #[test]
    fn unparseable_input_passes_through() {
        assert_eq!(accessible_color("tomato", true), "tomato");
        assert!(parse_rgb("rgb(1, 2)").is_none());
        assert_eq!(parse_rgb("rgb(10, 20, 30)"), Some((10, 20, 30)));
    }
}
