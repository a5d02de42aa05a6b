#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tincture_style::{Rgba, Role, Theme, derive_palette};

#[derive(Debug, Arbitrary)]
struct Input {
    r: u8,
    g: u8,
    b: u8,
    alpha: Option<u8>,
    short: bool,
    dark: bool,
}

fuzz_target!(|input: Input| {
    let accent = match (input.short, input.alpha) {
        (true, _) => format!("#{:X}{:X}{:X}", input.r >> 4, input.g >> 4, input.b >> 4),
        (false, Some(a)) => format!("#{:02X}{:02X}{:02X}{:02X}", input.r, input.g, input.b, a),
        (false, None) => format!("#{:02X}{:02X}{:02X}", input.r, input.g, input.b),
    };
    let theme = if input.dark { Theme::Dark } else { Theme::Light };

    let palette = derive_palette(&accent, theme).expect("hex accents always derive");

    assert_eq!(palette.accent(), accent);
    assert_eq!(palette.background(), theme.select("#FFF", "#000"));
    for role in Role::ALL {
        let color = Rgba::parse(palette.color(role)).expect("every role color parses");
        assert_eq!(palette.text_on(role), color.text_on(), "{role} contrast mismatch");
    }

    // Same inputs, same palette.
    let again = derive_palette(&accent, theme).expect("repeat derive");
    assert!(Role::ALL.iter().all(|&r| again.color(r) == palette.color(r)));
});
