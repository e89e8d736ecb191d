use serde::{Deserialize, Serialize};

/// 8-bit sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_u32),
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
                Some(Self::new(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Brightens by `0.7^-k`.
    ///
    /// Channels below 30 (other than zero) are lifted to 30 first and pure
    /// black becomes `(30, 30, 30)`, so dark colours still visibly change.
    /// Results truncate to integers and saturate at 255.
    pub fn brighter(self, k: f64) -> Self {
        const FLOOR: f64 = 30.0;
        let k = 0.7f64.powf(k);
        if self.r == 0 && self.g == 0 && self.b == 0 {
            return Self::new(30, 30, 30);
        }
        let lift = |c: u8| {
            let c = f64::from(c);
            let c = if c > 0.0 && c < FLOOR { FLOOR } else { c };
            (c / k).min(255.0) as u8
        };
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }

    /// Per-channel linear blend, rounded.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let (a, b) = (f64::from(a), f64::from(b));
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid colour {value:?}"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Twenty-colour categorical palette used for base fills.
pub const CATEGORY20C: [Rgb; 20] = [
    Rgb::from_u32(0x3182bd),
    Rgb::from_u32(0x6baed6),
    Rgb::from_u32(0x9ecae1),
    Rgb::from_u32(0xc6dbef),
    Rgb::from_u32(0xe6550d),
    Rgb::from_u32(0xfd8d3c),
    Rgb::from_u32(0xfdae6b),
    Rgb::from_u32(0xfdd0a2),
    Rgb::from_u32(0x31a354),
    Rgb::from_u32(0x74c476),
    Rgb::from_u32(0xa1d99b),
    Rgb::from_u32(0xc7e9c0),
    Rgb::from_u32(0x756bb1),
    Rgb::from_u32(0x9e9ac8),
    Rgb::from_u32(0xbcbddc),
    Rgb::from_u32(0xdadaeb),
    Rgb::from_u32(0x636363),
    Rgb::from_u32(0x969696),
    Rgb::from_u32(0xbdbdbd),
    Rgb::from_u32(0xd9d9d9),
];

/// Deterministic palette colour for an identifier key.
///
/// Stable across runs and platforms: the key is hashed with BLAKE3 and the
/// first eight bytes pick the palette slot.
pub fn base_color(key: &str) -> Rgb {
    let hash = blake3::hash(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    let slot = u64::from_le_bytes(head) % CATEGORY20C.len() as u64;
    CATEGORY20C[slot as usize]
}

/// Outline of a country path.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub width: f64,
}

/// Fixed colours of the fill policy and outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPalette {
    /// Muted fill for countries outside the active set.
    pub unvisited: Rgb,
    /// Fill for lived-in countries in the lived view.
    pub lived_highlight: Rgb,
    /// Brightening factor applied on hover.
    pub hover_brighten: f64,
    pub hover_stroke: StrokeStyle,
    pub default_stroke: StrokeStyle,
    /// Sea disk behind the countries.
    pub sea: Rgb,
}

impl Default for FillPalette {
    fn default() -> Self {
        Self {
            unvisited: Rgb::from_u32(0x3f4453),
            lived_highlight: Rgb::from_u32(0xffb703),
            hover_brighten: 1.1,
            hover_stroke: StrokeStyle {
                color: Rgb::from_u32(0xffffff),
                width: 2.2,
            },
            default_stroke: StrokeStyle {
                color: Rgb::from_u32(0x1a1a1a),
                width: 0.6,
            },
            sea: Rgb::from_u32(0xadd8e6),
        }
    }
}
