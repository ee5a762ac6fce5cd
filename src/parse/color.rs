//! Parsing SVG color and opacity attributes.

use super::grammar::extract_url_reference;
use super::state::{FrameProps, ParseState};
use crate::models::{Paint, Rgba};

/// SVG 1.1 recognized color keywords.
fn x11_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "aliceblue" => (240, 248, 255),
        "antiquewhite" => (250, 235, 215),
        "aqua" => (0, 255, 255),
        "aquamarine" => (127, 255, 212),
        "azure" => (240, 255, 255),
        "beige" => (245, 245, 220),
        "bisque" => (255, 228, 196),
        "black" => (0, 0, 0),
        "blanchedalmond" => (255, 235, 205),
        "blue" => (0, 0, 255),
        "blueviolet" => (138, 43, 226),
        "brown" => (165, 42, 42),
        "burlywood" => (222, 184, 135),
        "cadetblue" => (95, 158, 160),
        "chartreuse" => (127, 255, 0),
        "chocolate" => (210, 105, 30),
        "coral" => (255, 127, 80),
        "cornflowerblue" => (100, 149, 237),
        "cornsilk" => (255, 248, 220),
        "crimson" => (220, 20, 60),
        "cyan" => (0, 255, 255),
        "darkblue" => (0, 0, 139),
        "darkcyan" => (0, 139, 139),
        "darkgoldenrod" => (184, 134, 11),
        "darkgray" => (169, 169, 169),
        "darkgreen" => (0, 100, 0),
        "darkkhaki" => (189, 183, 107),
        "darkmagenta" => (139, 0, 139),
        "darkolivegreen" => (85, 107, 47),
        "darkorange" => (255, 140, 0),
        "darkorchid" => (153, 50, 204),
        "darkred" => (139, 0, 0),
        "darksalmon" => (233, 150, 122),
        "darkseagreen" => (143, 188, 143),
        "darkslateblue" => (72, 61, 139),
        "darkslategray" => (47, 79, 79),
        "darkturquoise" => (0, 206, 209),
        "darkviolet" => (148, 0, 211),
        "deeppink" => (255, 20, 147),
        "deepskyblue" => (0, 191, 255),
        "dimgray" => (105, 105, 105),
        "dodgerblue" => (30, 144, 255),
        "firebrick" => (178, 34, 34),
        "floralwhite" => (255, 250, 240),
        "forestgreen" => (34, 139, 34),
        "fuchsia" => (255, 0, 255),
        "gainsboro" => (220, 220, 220),
        "ghostwhite" => (248, 248, 255),
        "gold" => (255, 215, 0),
        "goldenrod" => (218, 165, 32),
        "gray" => (128, 128, 128),
        "green" => (0, 128, 0),
        "greenyellow" => (173, 255, 47),
        "honeydew" => (240, 255, 240),
        "hotpink" => (255, 105, 180),
        "indianred" => (205, 92, 92),
        "indigo" => (75, 0, 130),
        "ivory" => (255, 255, 240),
        "khaki" => (240, 230, 140),
        "lavender" => (230, 230, 250),
        "lavenderblush" => (255, 240, 245),
        "lawngreen" => (124, 252, 0),
        "lemonchiffon" => (255, 250, 205),
        "lightblue" => (173, 216, 230),
        "lightcoral" => (240, 128, 128),
        "lightcyan" => (224, 255, 255),
        "lightgoldenrodyellow" => (250, 250, 210),
        "lightgreen" => (144, 238, 144),
        "lightgrey" => (211, 211, 211),
        "lightpink" => (255, 182, 193),
        "lightsalmon" => (255, 160, 122),
        "lightseagreen" => (32, 178, 170),
        "lightskyblue" => (135, 206, 250),
        "lightslategray" => (119, 136, 153),
        "lightsteelblue" => (176, 196, 222),
        "lightyellow" => (255, 255, 224),
        "lime" => (0, 255, 0),
        "limegreen" => (50, 205, 50),
        "linen" => (250, 240, 230),
        "magenta" => (255, 0, 255),
        "maroon" => (128, 0, 0),
        "mediumaquamarine" => (102, 205, 170),
        "mediumblue" => (0, 0, 205),
        "mediumorchid" => (186, 85, 211),
        "mediumpurple" => (147, 112, 219),
        "mediumseagreen" => (60, 179, 113),
        "mediumslateblue" => (123, 104, 238),
        "mediumspringgreen" => (0, 250, 154),
        "mediumturquoise" => (72, 209, 204),
        "mediumvioletred" => (199, 21, 133),
        "midnightblue" => (25, 25, 112),
        "mintcream" => (245, 255, 250),
        "mistyrose" => (255, 228, 225),
        "moccasin" => (255, 228, 181),
        "navajowhite" => (255, 222, 173),
        "navy" => (0, 0, 128),
        "oldlace" => (253, 245, 230),
        "olive" => (128, 128, 0),
        "olivedrab" => (107, 142, 35),
        "orange" => (255, 165, 0),
        "orangered" => (255, 69, 0),
        "orchid" => (218, 112, 214),
        "palegoldenrod" => (238, 232, 170),
        "palegreen" => (152, 251, 152),
        "paleturquoise" => (175, 238, 238),
        "palevioletred" => (219, 112, 147),
        "papayawhip" => (255, 239, 213),
        "peachpuff" => (255, 218, 185),
        "peru" => (205, 133, 63),
        "pink" => (255, 192, 203),
        "plum" => (221, 160, 221),
        "powderblue" => (176, 224, 230),
        "purple" => (128, 0, 128),
        "red" => (255, 0, 0),
        "rosybrown" => (188, 143, 143),
        "royalblue" => (65, 105, 225),
        "saddlebrown" => (139, 69, 19),
        "salmon" => (250, 128, 114),
        "sandybrown" => (244, 164, 96),
        "seagreen" => (46, 139, 87),
        "seashell" => (255, 245, 238),
        "sienna" => (160, 82, 45),
        "silver" => (192, 192, 192),
        "skyblue" => (135, 206, 235),
        "slateblue" => (106, 90, 205),
        "slategray" => (112, 128, 144),
        "snow" => (255, 250, 250),
        "springgreen" => (0, 255, 127),
        "steelblue" => (70, 130, 180),
        "tan" => (210, 180, 140),
        "teal" => (0, 128, 128),
        "thistle" => (216, 191, 216),
        "tomato" => (255, 99, 71),
        "turquoise" => (64, 224, 208),
        "violet" => (238, 130, 238),
        "wheat" => (245, 222, 179),
        "white" => (255, 255, 255),
        "whitesmoke" => (245, 245, 245),
        "yellow" => (255, 255, 0),
        "yellowgreen" => (154, 205, 50),
        _ => return None,
    };
    Some(rgb)
}

/// CSS2 system color keywords, kept for SVG 1.1 test files.
/// The values mimic the classic Hot Dog Stand theme.
fn system_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "ActiveBorder" => (0, 0, 0),
        "ActiveCaption" => (0, 0, 0),
        "AppWorkspace" => (255, 255, 0),
        "Background" => (255, 255, 0),
        "ButtonFace" => (198, 198, 198),
        "ButtonHighlight" => (255, 255, 255),
        "ButtonShadow" => (0, 0, 0),
        "ButtonText" => (0, 0, 0),
        "CaptionText" => (255, 255, 255),
        "GrayText" => (132, 132, 132),
        "Highlight" => (0, 0, 0),
        "HighlightText" => (0, 0, 0),
        "InactiveBorder" => (255, 255, 0),
        "InactiveCaption" => (255, 255, 0),
        "InactiveCaptionText" => (255, 255, 255),
        "InfoBackground" => (255, 255, 255),
        "InfoText" => (0, 0, 0),
        "Menu" => (255, 255, 255),
        "MenuText" => (0, 0, 0),
        "Scrollbar" => (198, 198, 198),
        "ThreeDDarkShadow" => (0, 0, 0),
        "ThreeDFace" => (255, 255, 255),
        "ThreeDHighlight" => (255, 255, 255),
        "ThreeDLightShadow" => (132, 132, 132),
        "ThreeDShadow" => (0, 0, 0),
        "Window" => (255, 0, 0),
        "WindowFrame" => (0, 0, 0),
        "WindowText" => (0, 0, 0),
        _ => return None,
    };
    Some(rgb)
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    x11_color(name).or_else(|| system_color(name))
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Parses the component list of an rgb() specification. A fourth
/// integer component overrides the opacity with an explicit alpha.
fn parse_rgb_components(inner: &str, opacity: f64) -> Option<Rgba> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    match parts.len() {
        4 => {
            let mut values = [0i64; 4];
            for (value, part) in values.iter_mut().zip(&parts) {
                *value = part.parse().ok()?;
            }
            Some(Rgba::rgba(
                clamp_channel(values[0]),
                clamp_channel(values[1]),
                clamp_channel(values[2]),
                clamp_channel(values[3]),
            ))
        }
        3 => {
            let mut channels = [0u8; 3];
            if parts.iter().any(|part| part.ends_with('%')) {
                for (channel, part) in channels.iter_mut().zip(&parts) {
                    let percent: f64 = part.trim_end_matches('%').parse().ok()?;
                    *channel = clamp_channel((255.0 * percent / 100.0).round() as i64);
                }
            } else {
                for (channel, part) in channels.iter_mut().zip(&parts) {
                    *channel = clamp_channel(part.parse().ok()?);
                }
            }
            Some(Rgba::rgb(channels[0], channels[1], channels[2]).faded(opacity))
        }
        _ => None,
    }
}

/// Parses a #RGB or #RRGGBB hexadecimal color.
fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Parses an opacity attribute value, clamped to [0, 1]. Unparsable
/// values give a warning and full opacity.
pub fn parse_opacity(value_str: &str, props: &FrameProps) -> f64 {
    match value_str.trim().parse::<f64>() {
        Ok(value) => value.clamp(0.0, 1.0),
        Err(_) => {
            props.add_warning(format!("Failed parsing opacity: {}", value_str));
            1.0
        }
    }
}

/// Parses a named, hexadecimal or rgb() color specification.
/// Unrecognized colors give a warning and black.
pub fn parse_color_noref(color_str: &str, opacity: f64, state: &ParseState) -> Rgba {
    let color_str = color_str.trim();
    if color_str == "currentColor" || color_str == "inherit" {
        return state.current_color.faded(opacity);
    }

    let parsed = if let Some(rest) = color_str.strip_prefix("rgb") {
        let inner = rest.replace('(', "").replace(')', "");
        parse_rgb_components(&inner, opacity)
    } else if color_str.starts_with('#') {
        parse_hex_color(color_str).map(|(r, g, b)| Rgba::rgb(r, g, b).faded(opacity))
    } else {
        named_color(color_str).map(|(r, g, b)| Rgba::rgb(r, g, b).faded(opacity))
    };

    parsed.unwrap_or_else(|| {
        state
            .props()
            .add_warning(format!("Failed parsing color: {}", color_str));
        Rgba::black().faded(opacity)
    })
}

/// Parses a paint attribute string, which is either a color
/// specification or a url() reference to a gradient or pattern.
pub fn parse_color(color_str: &str, opacity_str: &str, state: &ParseState) -> Paint {
    let color_str = color_str.trim();
    if color_str.starts_with("url") {
        if let Some(id) = extract_url_reference(color_str) {
            state.note_reference(id);
            if let Some(paint) = state.lookup_paint(id) {
                return paint;
            }
        }
        state
            .props()
            .add_warning(format!("Failed retrieving reference: {}", color_str));
        return Paint::Color(Rgba::black());
    }
    let opacity = parse_opacity(opacity_str, state.props());
    Paint::Color(parse_color_noref(color_str, opacity, state))
}
