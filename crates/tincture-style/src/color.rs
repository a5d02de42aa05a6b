#![forbid(unsafe_code)]

//! CSS color parsing and the accent math used by palette derivation.
//!
//! [`Rgba`] holds 8-bit channels plus a floating alpha. Lightness operations
//! ([`Rgba::darken`], [`Rgba::lighten`]) round-trip through HSL and scale the
//! lightness relative to its current value, so `darken(0.2)` on a color with
//! 50% lightness yields 40% lightness, not 30%.
//!
//! # Accepted syntax
//!
//! | Form | Example |
//! |------|---------|
//! | Hex | `#0078D7`, `#FFF`, `#0078D780`, `#FFF8` |
//! | RGB | `rgb(0, 120, 215)`, `rgba(0, 0, 0, .2)`, `rgb(0 120 215 / 50%)` |
//! | HSL | `hsl(206, 100%, 42%)`, `hsla(206, 100%, 42%, 0.5)` |
//! | Named | `rebeccapurple`, `transparent` |

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ahash::AHashMap;

/// Luminance weights for the text contrast test: green, red, blue.
const CONTRAST_WEIGHTS: (u32, u32, u32) = (5, 2, 1);
/// A weighted sum at or below this value counts as a dark surface.
const CONTRAST_THRESHOLD: u32 = 8 * 128;

/// Failure to parse a CSS color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("invalid {function}() color `{input}`")]
    InvalidFunction {
        function: &'static str,
        input: String,
    },
    #[error("unknown color `{0}`")]
    Unknown(String),
}

/// Which text color reads best on top of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextOn {
    /// The surface is dark; put white text on it.
    White,
    /// The surface is light; put black text on it.
    Black,
}

impl TextOn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for TextOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0.0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any supported CSS color form.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        input.parse()
    }

    /// Convert to HSL with all components as fractions in `0.0..=1.0`,
    /// except hue which is in degrees `0.0..360.0`.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }

    /// Build from HSL components (see [`Rgba::to_hsl`] for ranges).
    #[must_use]
    pub fn from_hsl(hsl: Hsl, a: f32) -> Self {
        let Hsl { h, s, l } = hsl.clamped();
        if s == 0.0 {
            let v = channel(l);
            return Self::rgba(v, v, v, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;
        Self::rgba(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
            a,
        )
    }

    /// Reduce lightness by `ratio` of its current value.
    #[must_use]
    pub fn darken(self, ratio: f64) -> Self {
        let mut hsl = self.to_hsl();
        hsl.l -= hsl.l * ratio;
        Self::from_hsl(hsl, self.a)
    }

    /// Increase lightness by `ratio` of its current value, saturating at white.
    #[must_use]
    pub fn lighten(self, ratio: f64) -> Self {
        let mut hsl = self.to_hsl();
        hsl.l += hsl.l * ratio;
        Self::from_hsl(hsl, self.a)
    }

    /// Reduce alpha by `ratio` of its current value.
    #[must_use]
    pub fn fade(self, ratio: f32) -> Self {
        Self {
            a: (self.a - self.a * ratio).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Weighted channel test: `5g + 2r + b <= 1024`. Alpha is ignored.
    #[must_use]
    pub fn is_dark(self) -> bool {
        let (wg, wr, wb) = CONTRAST_WEIGHTS;
        u32::from(self.g) * wg + u32::from(self.r) * wr + u32::from(self.b) * wb
            <= CONTRAST_THRESHOLD
    }

    #[must_use]
    pub fn text_on(self) -> TextOn {
        if self.is_dark() {
            TextOn::White
        } else {
            TextOn::Black
        }
    }

    /// `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                round_alpha(self.a)
            )
        }
    }

    /// `#RRGGBB`, dropping alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(input.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(open) = lower.find('(') {
            let name = lower[..open].trim();
            let body = lower[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| invalid_function(name, input))?;
            return match name {
                "rgb" | "rgba" => {
                    parse_rgb_body(body).ok_or_else(|| invalid_function("rgb", input))
                }
                "hsl" | "hsla" => {
                    parse_hsl_body(body).ok_or_else(|| invalid_function("hsl", input))
                }
                _ => Err(ColorParseError::Unknown(input.to_string())),
            };
        }

        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        named_colors()
            .get(lower.as_str())
            .map(|&(r, g, b)| Self::rgb(r, g, b))
            .ok_or_else(|| ColorParseError::Unknown(input.to_string()))
    }
}

/// HSL triple. Hue in degrees, saturation and lightness as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    fn clamped(self) -> Self {
        Self {
            h: self.h.rem_euclid(360.0),
            s: self.s.clamp(0.0, 1.0),
            l: self.l.clamp(0.0, 1.0),
        }
    }
}

fn invalid_function(name: &str, input: &str) -> ColorParseError {
    let function = if name.starts_with("hsl") { "hsl" } else { "rgb" };
    ColorParseError::InvalidFunction {
        function,
        input: input.to_string(),
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn round_alpha(a: f32) -> f32 {
    (a * 100.0).round() / 100.0
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::rgba(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f32::from(nibble(3)?) / 255.0,
        )),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

/// Split a functional-notation body on commas, slashes, and whitespace.
fn components(body: &str) -> Vec<&str> {
    body.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_alpha(part: Option<&&str>) -> Option<f32> {
    match part {
        None => Some(1.0),
        Some(raw) => {
            let value = match raw.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().ok()? / 100.0,
                None => raw.parse::<f32>().ok()?,
            };
            value.is_finite().then(|| value.clamp(0.0, 1.0))
        }
    }
}

fn parse_rgb_body(body: &str) -> Option<Rgba> {
    let parts = components(body);
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let rgb_channel = |raw: &str| -> Option<u8> {
        let value = match raw.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0 * 255.0,
            None => raw.parse::<f64>().ok()?,
        };
        value.is_finite().then(|| value.clamp(0.0, 255.0).round() as u8)
    };
    Some(Rgba::rgba(
        rgb_channel(parts[0])?,
        rgb_channel(parts[1])?,
        rgb_channel(parts[2])?,
        parse_alpha(parts.get(3))?,
    ))
}

fn parse_hsl_body(body: &str) -> Option<Rgba> {
    let parts = components(body);
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let h = parts[0].strip_suffix("deg").unwrap_or(parts[0]).parse::<f64>().ok()?;
    let pct = |raw: &str| -> Option<f64> {
        let value = raw.strip_suffix('%').unwrap_or(raw).parse::<f64>().ok()?;
        value.is_finite().then_some(value / 100.0)
    };
    if !h.is_finite() {
        return None;
    }
    Some(Rgba::from_hsl(
        Hsl {
            h,
            s: pct(parts[1])?,
            l: pct(parts[2])?,
        },
        parse_alpha(parts.get(3))?,
    ))
}

fn named_colors() -> &'static AHashMap<&'static str, (u8, u8, u8)> {
    static NAMED: OnceLock<AHashMap<&'static str, (u8, u8, u8)>> = OnceLock::new();
    NAMED.get_or_init(|| NAMED_COLORS.iter().copied().collect())
}

/// CSS Color Module Level 4 named colors.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("aliceblue", (240, 248, 255)),
    ("antiquewhite", (250, 235, 215)),
    ("aqua", (0, 255, 255)),
    ("aquamarine", (127, 255, 212)),
    ("azure", (240, 255, 255)),
    ("beige", (245, 245, 220)),
    ("bisque", (255, 228, 196)),
    ("black", (0, 0, 0)),
    ("blanchedalmond", (255, 235, 205)),
    ("blue", (0, 0, 255)),
    ("blueviolet", (138, 43, 226)),
    ("brown", (165, 42, 42)),
    ("burlywood", (222, 184, 135)),
    ("cadetblue", (95, 158, 160)),
    ("chartreuse", (127, 255, 0)),
    ("chocolate", (210, 105, 30)),
    ("coral", (255, 127, 80)),
    ("cornflowerblue", (100, 149, 237)),
    ("cornsilk", (255, 248, 220)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkcyan", (0, 139, 139)),
    ("darkgoldenrod", (184, 134, 11)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkgrey", (169, 169, 169)),
    ("darkkhaki", (189, 183, 107)),
    ("darkmagenta", (139, 0, 139)),
    ("darkolivegreen", (85, 107, 47)),
    ("darkorange", (255, 140, 0)),
    ("darkorchid", (153, 50, 204)),
    ("darkred", (139, 0, 0)),
    ("darksalmon", (233, 150, 122)),
    ("darkseagreen", (143, 188, 143)),
    ("darkslateblue", (72, 61, 139)),
    ("darkslategray", (47, 79, 79)),
    ("darkslategrey", (47, 79, 79)),
    ("darkturquoise", (0, 206, 209)),
    ("darkviolet", (148, 0, 211)),
    ("deeppink", (255, 20, 147)),
    ("deepskyblue", (0, 191, 255)),
    ("dimgray", (105, 105, 105)),
    ("dimgrey", (105, 105, 105)),
    ("dodgerblue", (30, 144, 255)),
    ("firebrick", (178, 34, 34)),
    ("floralwhite", (255, 250, 240)),
    ("forestgreen", (34, 139, 34)),
    ("fuchsia", (255, 0, 255)),
    ("gainsboro", (220, 220, 220)),
    ("ghostwhite", (248, 248, 255)),
    ("gold", (255, 215, 0)),
    ("goldenrod", (218, 165, 32)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("greenyellow", (173, 255, 47)),
    ("grey", (128, 128, 128)),
    ("honeydew", (240, 255, 240)),
    ("hotpink", (255, 105, 180)),
    ("indianred", (205, 92, 92)),
    ("indigo", (75, 0, 130)),
    ("ivory", (255, 255, 240)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("lavenderblush", (255, 240, 245)),
    ("lawngreen", (124, 252, 0)),
    ("lemonchiffon", (255, 250, 205)),
    ("lightblue", (173, 216, 230)),
    ("lightcoral", (240, 128, 128)),
    ("lightcyan", (224, 255, 255)),
    ("lightgoldenrodyellow", (250, 250, 210)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightgrey", (211, 211, 211)),
    ("lightpink", (255, 182, 193)),
    ("lightsalmon", (255, 160, 122)),
    ("lightseagreen", (32, 178, 170)),
    ("lightskyblue", (135, 206, 250)),
    ("lightslategray", (119, 136, 153)),
    ("lightslategrey", (119, 136, 153)),
    ("lightsteelblue", (176, 196, 222)),
    ("lightyellow", (255, 255, 224)),
    ("lime", (0, 255, 0)),
    ("limegreen", (50, 205, 50)),
    ("linen", (250, 240, 230)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("mediumaquamarine", (102, 205, 170)),
    ("mediumblue", (0, 0, 205)),
    ("mediumorchid", (186, 85, 211)),
    ("mediumpurple", (147, 112, 219)),
    ("mediumseagreen", (60, 179, 113)),
    ("mediumslateblue", (123, 104, 238)),
    ("mediumspringgreen", (0, 250, 154)),
    ("mediumturquoise", (72, 209, 204)),
    ("mediumvioletred", (199, 21, 133)),
    ("midnightblue", (25, 25, 112)),
    ("mintcream", (245, 255, 250)),
    ("mistyrose", (255, 228, 225)),
    ("moccasin", (255, 228, 181)),
    ("navajowhite", (255, 222, 173)),
    ("navy", (0, 0, 128)),
    ("oldlace", (253, 245, 230)),
    ("olive", (128, 128, 0)),
    ("olivedrab", (107, 142, 35)),
    ("orange", (255, 165, 0)),
    ("orangered", (255, 69, 0)),
    ("orchid", (218, 112, 214)),
    ("palegoldenrod", (238, 232, 170)),
    ("palegreen", (152, 251, 152)),
    ("paleturquoise", (175, 238, 238)),
    ("palevioletred", (219, 112, 147)),
    ("papayawhip", (255, 239, 213)),
    ("peachpuff", (255, 218, 185)),
    ("peru", (205, 133, 63)),
    ("pink", (255, 192, 203)),
    ("plum", (221, 160, 221)),
    ("powderblue", (176, 224, 230)),
    ("purple", (128, 0, 128)),
    ("rebeccapurple", (102, 51, 153)),
    ("red", (255, 0, 0)),
    ("rosybrown", (188, 143, 143)),
    ("royalblue", (65, 105, 225)),
    ("saddlebrown", (139, 69, 19)),
    ("salmon", (250, 128, 114)),
    ("sandybrown", (244, 164, 96)),
    ("seagreen", (46, 139, 87)),
    ("seashell", (255, 245, 238)),
    ("sienna", (160, 82, 45)),
    ("silver", (192, 192, 192)),
    ("skyblue", (135, 206, 235)),
    ("slateblue", (106, 90, 205)),
    ("slategray", (112, 128, 144)),
    ("slategrey", (112, 128, 144)),
    ("snow", (255, 250, 250)),
    ("springgreen", (0, 255, 127)),
    ("steelblue", (70, 130, 180)),
    ("tan", (210, 180, 140)),
    ("teal", (0, 128, 128)),
    ("thistle", (216, 191, 216)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("wheat", (245, 222, 179)),
    ("white", (255, 255, 255)),
    ("whitesmoke", (245, 245, 245)),
    ("yellow", (255, 255, 0)),
    ("yellowgreen", (154, 205, 50)),
];
