#![forbid(unsafe_code)]

//! UWP color palette derivation.
//!
//! [`derive_palette`] turns an accent color and a [`Theme`] into a
//! [`Palette`]: a fixed set of named color [`Role`]s following the Windows
//! "color palette building blocks", plus a per-role [`TextOn`] table telling
//! callers whether white or black text reads best on each role.
//!
//! # Invariants
//!
//! 1. Derivation is pure: identical `(accent, theme)` yields an equal palette.
//! 2. Every role has a non-empty color and a text contrast entry.
//! 3. `Role::Accent` holds the accent exactly as the caller spelled it.
//! 4. Aliases (`primaryText`, `secondaryText`, `disabledUI`) are copies of
//!    `baseHigh`, `baseMedium`, and `baseMediumLow`.

use std::fmt;
use std::ops::Index;

use tracing::debug;

use crate::color::{ColorParseError, Rgba, TextOn};
use crate::theme::Theme;

/// Lightness steps for the three darker and three lighter accent shades.
const ACCENT_STEPS: [f64; 3] = [0.2, 0.4, 0.6];
/// Alpha reductions for the accent-tinted list rows.
const LIST_ACCENT_FADES: [f32; 3] = [0.4, 0.6, 0.7];

/// A named color slot in a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Accent,
    AccentDark1,
    AccentDark2,
    AccentDark3,
    AccentLight1,
    AccentLight2,
    AccentLight3,
    Background,
    Foreground,
    BaseLow,
    BaseMediumLow,
    BaseMedium,
    BaseMediumHigh,
    BaseHigh,
    AltLow,
    AltMediumLow,
    AltMedium,
    AltMediumHigh,
    AltHigh,
    ListLow,
    ListMedium,
    ListAccentLow,
    ListAccentMedium,
    ListAccentHigh,
    ChromeLow,
    ChromeMediumLow,
    ChromeMedium,
    ChromeHigh,
    ChromeAltLow,
    ChromeDisabledLow,
    ChromeDisabledHigh,
    ChromeBlackLow,
    ChromeBlackMediumLow,
    ChromeBlackMedium,
    ChromeBlackHigh,
    ChromeWhite,
}

impl Role {
    pub const COUNT: usize = 36;

    pub const ALL: [Role; Self::COUNT] = [
        Role::Accent,
        Role::AccentDark1,
        Role::AccentDark2,
        Role::AccentDark3,
        Role::AccentLight1,
        Role::AccentLight2,
        Role::AccentLight3,
        Role::Background,
        Role::Foreground,
        Role::BaseLow,
        Role::BaseMediumLow,
        Role::BaseMedium,
        Role::BaseMediumHigh,
        Role::BaseHigh,
        Role::AltLow,
        Role::AltMediumLow,
        Role::AltMedium,
        Role::AltMediumHigh,
        Role::AltHigh,
        Role::ListLow,
        Role::ListMedium,
        Role::ListAccentLow,
        Role::ListAccentMedium,
        Role::ListAccentHigh,
        Role::ChromeLow,
        Role::ChromeMediumLow,
        Role::ChromeMedium,
        Role::ChromeHigh,
        Role::ChromeAltLow,
        Role::ChromeDisabledLow,
        Role::ChromeDisabledHigh,
        Role::ChromeBlackLow,
        Role::ChromeBlackMediumLow,
        Role::ChromeBlackMedium,
        Role::ChromeBlackHigh,
        Role::ChromeWhite,
    ];

    /// camelCase key, as used by style sheets and prop names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accent => "accent",
            Self::AccentDark1 => "accentDark1",
            Self::AccentDark2 => "accentDark2",
            Self::AccentDark3 => "accentDark3",
            Self::AccentLight1 => "accentLight1",
            Self::AccentLight2 => "accentLight2",
            Self::AccentLight3 => "accentLight3",
            Self::Background => "background",
            Self::Foreground => "foreground",
            Self::BaseLow => "baseLow",
            Self::BaseMediumLow => "baseMediumLow",
            Self::BaseMedium => "baseMedium",
            Self::BaseMediumHigh => "baseMediumHigh",
            Self::BaseHigh => "baseHigh",
            Self::AltLow => "altLow",
            Self::AltMediumLow => "altMediumLow",
            Self::AltMedium => "altMedium",
            Self::AltMediumHigh => "altMediumHigh",
            Self::AltHigh => "altHigh",
            Self::ListLow => "listLow",
            Self::ListMedium => "listMedium",
            Self::ListAccentLow => "listAccentLow",
            Self::ListAccentMedium => "listAccentMedium",
            Self::ListAccentHigh => "listAccentHigh",
            Self::ChromeLow => "chromeLow",
            Self::ChromeMediumLow => "chromeMediumLow",
            Self::ChromeMedium => "chromeMedium",
            Self::ChromeHigh => "chromeHigh",
            Self::ChromeAltLow => "chromeAltLow",
            Self::ChromeDisabledLow => "chromeDisabledLow",
            Self::ChromeDisabledHigh => "chromeDisabledHigh",
            Self::ChromeBlackLow => "chromeBlackLow",
            Self::ChromeBlackMediumLow => "chromeBlackMediumLow",
            Self::ChromeBlackMedium => "chromeBlackMedium",
            Self::ChromeBlackHigh => "chromeBlackHigh",
            Self::ChromeWhite => "chromeWhite",
        }
    }

    /// Reverse of [`Role::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Roles whose color depends only on the theme: `(role, light, dark)`.
const THEMED: &[(Role, &str, &str)] = &[
    (Role::Background, "#FFF", "#000"),
    (Role::Foreground, "#000", "#FFF"),
    (Role::BaseLow, "rgba(0, 0, 0, .2)", "rgba(255, 255, 255, .2)"),
    (Role::BaseMediumLow, "rgba(0, 0, 0, .4)", "rgba(255, 255, 255, .4)"),
    (Role::BaseMedium, "rgba(0, 0, 0, .6)", "rgba(255, 255, 255, .6)"),
    (Role::BaseMediumHigh, "rgba(0, 0, 0, .8)", "rgba(255, 255, 255, .8)"),
    (Role::BaseHigh, "#000", "#FFF"),
    (Role::AltLow, "rgba(255, 255, 255, .2)", "rgba(0, 0, 0, .2)"),
    (Role::AltMediumLow, "rgba(255, 255, 255, .4)", "rgba(0, 0, 0, .4)"),
    (Role::AltMedium, "rgba(255, 255, 255, .6)", "rgba(0, 0, 0, .6)"),
    (Role::AltMediumHigh, "rgba(255, 255, 255, .8)", "rgba(0, 0, 0, .8)"),
    (Role::AltHigh, "#FFF", "#000"),
    (Role::ListLow, "rgba(0, 0, 0, .1)", "rgba(255, 255, 255, .1)"),
    (Role::ListMedium, "rgba(0, 0, 0, .2)", "rgba(255, 255, 255, .2)"),
    (Role::ChromeLow, "#F2F2F2", "#171717"),
    (Role::ChromeMediumLow, "#F2F2F2", "#2B2B2B"),
    (Role::ChromeMedium, "#E6E6E6", "#1F1F1F"),
    (Role::ChromeHigh, "#CCC", "#767676"),
    (Role::ChromeAltLow, "#171717", "#F2F2F2"),
    (Role::ChromeDisabledLow, "#7A7A7A", "#858585"),
    (Role::ChromeDisabledHigh, "#CCC", "#333"),
];

/// Roles that are the same in both themes.
const INVARIANT: &[(Role, &str)] = &[
    (Role::ChromeBlackLow, "rgba(0, 0, 0, .2)"),
    (Role::ChromeBlackMediumLow, "rgba(0, 0, 0, .4)"),
    (Role::ChromeBlackMedium, "rgba(0, 0, 0, .8)"),
    (Role::ChromeBlackHigh, "#000"),
    (Role::ChromeWhite, "#FFF"),
];

/// A fully derived palette for one `(accent, theme)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    accent: String,
    theme: Theme,
    colors: [String; Role::COUNT],
    text_on: [TextOn; Role::COUNT],
}

impl Palette {
    /// The accent as passed to [`derive_palette`].
    #[must_use]
    pub fn accent(&self) -> &str {
        &self.accent
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn color(&self, role: Role) -> &str {
        &self.colors[role.index()]
    }

    /// Recommended text color on top of `role`.
    #[must_use]
    pub fn text_on(&self, role: Role) -> TextOn {
        self.text_on[role.index()]
    }

    #[must_use]
    pub fn background(&self) -> &str {
        self.color(Role::Background)
    }

    #[must_use]
    pub fn foreground(&self) -> &str {
        self.color(Role::Foreground)
    }

    #[must_use]
    pub fn primary_text(&self) -> &str {
        self.color(Role::BaseHigh)
    }

    #[must_use]
    pub fn secondary_text(&self) -> &str {
        self.color(Role::BaseMedium)
    }

    #[must_use]
    pub fn disabled_ui(&self) -> &str {
        self.color(Role::BaseMediumLow)
    }

    /// Look up a color by camelCase key, including the semantic aliases.
    /// `"theme"` yields the theme tag.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "theme" => Some(self.theme.as_str()),
            "primaryText" => Some(self.primary_text()),
            "secondaryText" => Some(self.secondary_text()),
            "disabledUI" => Some(self.disabled_ui()),
            other => Role::from_name(other).map(|role| self.color(role)),
        }
    }

    /// `(role, color)` pairs in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        Role::ALL
            .into_iter()
            .map(move |role| (role, self.color(role)))
    }

    /// `(role, text color)` pairs in [`Role::ALL`] order.
    pub fn text_on_iter(&self) -> impl Iterator<Item = (Role, TextOn)> + '_ {
        Role::ALL
            .into_iter()
            .map(move |role| (role, self.text_on(role)))
    }
}

impl Index<Role> for Palette {
    type Output = str;

    fn index(&self, role: Role) -> &str {
        self.color(role)
    }
}

/// Derive the full palette for `accent` under `theme`.
///
/// Fails only when `accent` is not a parseable color; there is no fallback.
pub fn derive_palette(accent: &str, theme: Theme) -> Result<Palette, ColorParseError> {
    let base = Rgba::parse(accent)?;

    let mut colors: [String; Role::COUNT] = std::array::from_fn(|_| String::new());
    let mut set = |role: Role, value: String| colors[role.index()] = value;

    set(Role::Accent, accent.to_string());

    let darks = [Role::AccentDark1, Role::AccentDark2, Role::AccentDark3];
    let lights = [Role::AccentLight1, Role::AccentLight2, Role::AccentLight3];
    for ((dark, light), step) in darks.into_iter().zip(lights).zip(ACCENT_STEPS) {
        set(dark, base.darken(step).to_css());
        set(light, base.lighten(step).to_css());
    }

    let list_accents = [
        Role::ListAccentLow,
        Role::ListAccentMedium,
        Role::ListAccentHigh,
    ];
    for (role, fade) in list_accents.into_iter().zip(LIST_ACCENT_FADES) {
        set(role, base.fade(fade).to_css());
    }

    for &(role, light, dark) in THEMED {
        set(role, theme.select(light, dark).to_string());
    }
    for &(role, color) in INVARIANT {
        set(role, color.to_string());
    }

    let mut text_on = [TextOn::Black; Role::COUNT];
    for role in Role::ALL {
        let parsed = if role == Role::Accent {
            base
        } else {
            Rgba::parse(&colors[role.index()])?
        };
        text_on[role.index()] = parsed.text_on();
    }

    debug!(accent, theme = theme.as_str(), "derived palette");

    Ok(Palette {
        accent: accent.to_string(),
        theme,
        colors,
        text_on,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accents::{DEFAULT_ACCENT, DEFAULT_ACCENTS};
    use tracing_test::traced_test;

    #[test]
    fn role_table_is_complete_and_ordered() {
        for (i, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), i);
            assert_eq!(Role::from_name(role.name()), Some(role));
        }
        assert_eq!(Role::from_name("primaryText"), None);
    }

    #[test]
    fn light_and_dark_backgrounds() {
        let light = derive_palette(DEFAULT_ACCENT, Theme::Light).unwrap();
        let dark = derive_palette(DEFAULT_ACCENT, Theme::Dark).unwrap();
        assert_eq!(light.background(), "#FFF");
        assert_eq!(light.foreground(), "#000");
        assert_eq!(dark.background(), "#000");
        assert_eq!(dark.foreground(), "#FFF");
    }

    #[test]
    fn accent_shades_follow_darken_and_lighten() {
        let accent = "#0078D7";
        let base = Rgba::parse(accent).unwrap();
        let palette = derive_palette(accent, Theme::Light).unwrap();
        assert_eq!(palette.color(Role::AccentDark1), base.darken(0.2).to_css());
        assert_eq!(palette.color(Role::AccentDark2), base.darken(0.4).to_css());
        assert_eq!(palette.color(Role::AccentDark3), base.darken(0.6).to_css());
        assert_eq!(palette.color(Role::AccentLight1), base.lighten(0.2).to_css());
        assert_eq!(palette.color(Role::AccentLight3), base.lighten(0.6).to_css());
        assert_eq!(palette.color(Role::AccentDark1), "rgb(0, 96, 172)");
    }

    #[test]
    fn accent_is_kept_verbatim() {
        let palette = derive_palette("rebeccapurple", Theme::Dark).unwrap();
        assert_eq!(palette.accent(), "rebeccapurple");
        assert_eq!(&palette[Role::Accent], "rebeccapurple");
    }

    #[test]
    fn list_accents_are_faded() {
        let palette = derive_palette("#0078D7", Theme::Light).unwrap();
        assert_eq!(
            palette.color(Role::ListAccentLow),
            "rgba(0, 120, 215, 0.6)"
        );
        assert_eq!(
            palette.color(Role::ListAccentMedium),
            "rgba(0, 120, 215, 0.4)"
        );
        assert_eq!(
            palette.color(Role::ListAccentHigh),
            "rgba(0, 120, 215, 0.3)"
        );
    }

    #[test]
    fn base_and_alt_ramps_invert_between_themes() {
        let light = derive_palette(DEFAULT_ACCENT, Theme::Light).unwrap();
        let dark = derive_palette(DEFAULT_ACCENT, Theme::Dark).unwrap();
        assert_eq!(light.color(Role::BaseLow), dark.color(Role::AltLow));
        assert_eq!(light.color(Role::AltMedium), dark.color(Role::BaseMedium));
        assert_eq!(light.color(Role::ChromeLow), "#F2F2F2");
        assert_eq!(dark.color(Role::ChromeLow), "#171717");
    }

    #[test]
    fn chrome_black_and_white_are_theme_invariant() {
        let light = derive_palette(DEFAULT_ACCENT, Theme::Light).unwrap();
        let dark = derive_palette(DEFAULT_ACCENT, Theme::Dark).unwrap();
        for role in [
            Role::ChromeBlackLow,
            Role::ChromeBlackMediumLow,
            Role::ChromeBlackMedium,
            Role::ChromeBlackHigh,
            Role::ChromeWhite,
        ] {
            assert_eq!(light.color(role), dark.color(role), "{role}");
        }
    }

    #[test]
    fn text_on_uses_luminance_threshold() {
        let light = derive_palette(DEFAULT_ACCENT, Theme::Light).unwrap();
        // #000 needs white text, #FFF needs black text.
        assert_eq!(light.text_on(Role::Foreground), TextOn::White);
        assert_eq!(light.text_on(Role::Background), TextOn::Black);
        assert_eq!(light.text_on(Role::ChromeBlackHigh), TextOn::White);
        assert_eq!(light.text_on(Role::ChromeWhite), TextOn::Black);
        // Alpha is ignored: translucent white reads as white.
        let dark = derive_palette(DEFAULT_ACCENT, Theme::Dark).unwrap();
        assert_eq!(dark.text_on(Role::BaseLow), TextOn::Black);
        // 5*120 + 0 + 215 = 815 <= 1024
        assert_eq!(light.text_on(Role::Accent), TextOn::White);
    }

    #[test]
    fn aliases_copy_base_roles() {
        let palette = derive_palette(DEFAULT_ACCENT, Theme::Dark).unwrap();
        assert_eq!(palette.primary_text(), palette.color(Role::BaseHigh));
        assert_eq!(palette.secondary_text(), palette.color(Role::BaseMedium));
        assert_eq!(palette.disabled_ui(), palette.color(Role::BaseMediumLow));
        assert_eq!(palette.get("primaryText"), Some("#FFF"));
        assert_eq!(palette.get("disabledUI"), Some("rgba(255, 255, 255, .4)"));
        assert_eq!(palette.get("theme"), Some("dark"));
        assert_eq!(palette.get("nope"), None);
    }

    #[test]
    fn every_role_is_populated_for_every_stock_accent() {
        for accent in DEFAULT_ACCENTS {
            for theme in Theme::ALL {
                let palette = derive_palette(accent, theme).unwrap();
                assert_eq!(palette.iter().count(), Role::COUNT);
                for (role, color) in palette.iter() {
                    assert!(!color.is_empty(), "{accent}/{theme}: {role} empty");
                }
            }
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_palette("#E81123", Theme::Dark).unwrap();
        let b = derive_palette("#E81123", Theme::Dark).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unparseable_accent_fails_fast() {
        let err = derive_palette("#XYZ", Theme::Light).unwrap_err();
        assert!(matches!(err, ColorParseError::InvalidHex(_)));
        assert!(derive_palette("", Theme::Light).is_err());
    }

    #[test]
    #[traced_test]
    fn derivation_is_logged() {
        let _ = derive_palette("#FF4343", Theme::Light).unwrap();
        assert!(logs_contain("derived palette"));
    }
}
