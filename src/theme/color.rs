use gpui::Rgba;

/// Parses the color notations accepted in field configuration:
/// hex (`#rgb`, `#rrggbb`, `#rrggbbaa`), `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// and a handful of keywords.
pub fn parse_color(raw: &str) -> Option<Rgba> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "white" => return Some(rgba(255.0, 255.0, 255.0, 1.0)),
        "black" => return Some(rgba(0.0, 0.0, 0.0, 1.0)),
        "transparent" => return Some(rgba(0.0, 0.0, 0.0, 0.0)),
        _ => {}
    }

    if value.starts_with('#') {
        return Rgba::try_from(value).ok();
    }

    let lower = value.to_ascii_lowercase();
    let (body, expects_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts = body
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect::<Option<Vec<_>>>()?;
    match (parts.as_slice(), expects_alpha) {
        ([r, g, b], false) => channel_triplet(*r, *g, *b, 1.0),
        ([r, g, b, a], true) => channel_triplet(*r, *g, *b, *a),
        _ => None,
    }
}

fn channel_triplet(r: f32, g: f32, b: f32, a: f32) -> Option<Rgba> {
    let in_range = |channel: f32| channel.is_finite() && (0.0..=255.0).contains(&channel);
    if !(in_range(r) && in_range(g) && in_range(b)) {
        return None;
    }
    if !a.is_finite() || !(0.0..=1.0).contains(&a) {
        return None;
    }
    Some(rgba(r, g, b, a))
}

fn rgba(r: f32, g: f32, b: f32, a: f32) -> Rgba {
    Rgba {
        r: r / 255.0,
        g: g / 255.0,
        b: b / 255.0,
        a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_functional_notation() {
        let tint = parse_color("rgb(0, 145, 234)").expect("rgb should parse");
        assert!((tint.g - 145.0 / 255.0).abs() < 1e-5);
        assert_eq!(tint.a, 1.0);

        let translucent = parse_color("rgba(213, 0, 0, 0.5)").expect("rgba should parse");
        assert_eq!(translucent.a, 0.5);
    }

    #[test]
    fn parses_hex_and_keywords() {
        let base = parse_color("#949494").expect("hex should parse");
        assert!((base.r - 148.0 / 255.0).abs() < 1e-3);
        assert!(parse_color("white").is_some());
        assert_eq!(parse_color("transparent").map(|c| c.a), Some(0.0));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_color("rgb(0, 145)").is_none());
        assert!(parse_color("rgb(0, 145, 300)").is_none());
        assert!(parse_color("rgba(0, 0, 0, 2)").is_none());
        assert!(parse_color("blurple").is_none());
        assert!(parse_color("#zzzzzz").is_none());
    }
}
