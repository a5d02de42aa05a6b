#![forbid(unsafe_code)]

//! Stock accent colors offered by palette pickers.

/// Accent used when neither the component nor any provider sets one.
pub const DEFAULT_ACCENT: &str = "#0078D7";

/// The 48 Windows accent swatches, in picker order.
pub const DEFAULT_ACCENTS: [&str; 48] = [
    "#FFB900", "#FF8C00", "#F7630C", "#CA5010", "#DA3B01", "#EF6950", "#D13438", "#FF4343",
    "#E74856", "#E81123", "#EA005E", "#C30052", "#E3008C", "#BF0077", "#C239B3", "#9A0089",
    "#0078D7", "#0063B1", "#8E8CD8", "#6B69D6", "#8764B8", "#744DA9", "#B146C2", "#881798",
    "#0099BC", "#2D7D9A", "#00B7C3", "#038387", "#00B294", "#018574", "#00CC6A", "#10893E",
    "#7A7574", "#5D5A58", "#68768A", "#515C6B", "#567C73", "#486860", "#498205", "#107C10",
    "#767676", "#4C4A48", "#69797E", "#4A5459", "#647C64", "#525E54", "#847574", "#7E735F",
];

/// Iterate the stock swatches in picker order.
pub fn default_accents() -> impl Iterator<Item = &'static str> {
    DEFAULT_ACCENTS.iter().copied()
}

/// Whether `color` is one of the stock swatches (exact, case-sensitive).
#[must_use]
pub fn is_default_accent(color: &str) -> bool {
    DEFAULT_ACCENTS.contains(&color)
}
