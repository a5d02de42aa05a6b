#![no_main]

use libfuzzer_sys::fuzz_target;
use tincture_style::Rgba;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(color) = Rgba::parse(input) else {
        return;
    };

    // Anything we accept must survive our own serializations.
    let css = color.to_css();
    let reparsed = Rgba::parse(&css).expect("to_css output must parse");
    assert_eq!((reparsed.r, reparsed.g, reparsed.b), (color.r, color.g, color.b));
    assert!(Rgba::parse(&color.to_hex()).is_ok(), "to_hex output must parse");

    for step in [0.0_f32, 0.2, 0.4, 0.6, 1.0] {
        let d = color.darken(f64::from(step));
        let l = color.lighten(f64::from(step));
        let f = color.fade(step);
        assert!((0.0..=1.0).contains(&f.a), "fade alpha out of range: {}", f.a);
        assert!(Rgba::parse(&d.to_css()).is_ok());
        assert!(Rgba::parse(&l.to_css()).is_ok());
    }
});
