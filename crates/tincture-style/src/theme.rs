#![forbid(unsafe_code)]

//! Light/dark theme tag.

use std::fmt;
use std::str::FromStr;

/// Base color polarity of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    /// Dark content on a white background.
    #[default]
    Light,
    /// Light content on a black background.
    Dark,
}

/// A theme tag other than `"light"` or `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`, expected \"light\" or \"dark\"")]
pub struct ThemeParseError(pub String);

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn is_light(self) -> bool {
        matches!(self, Self::Light)
    }

    /// The opposite polarity.
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Pick between a light-theme and a dark-theme value.
    #[inline]
    #[must_use]
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_tags_only() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(
            "Dark".parse::<Theme>(),
            Err(ThemeParseError("Dark".to_string()))
        );
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn display_round_trips() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
    }

    #[test]
    fn inverted_flips() {
        assert_eq!(Theme::Light.inverted(), Theme::Dark);
        assert_eq!(Theme::Dark.inverted().inverted(), Theme::Dark);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let parsed: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(parsed, Theme::Light);
    }
}
