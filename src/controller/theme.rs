use crate::storage::{Preferences, StorageError};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `dark` is light.
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label and tooltip for the button that switches away from this theme.
    pub fn toggle_button(self) -> (&'static str, &'static str) {
        match self {
            Theme::Dark => ("☀️", "Switch to light mode"),
            Theme::Light => ("🌙", "Switch to dark mode"),
        }
    }

    pub fn restore(prefs: &Preferences) -> Self {
        match prefs.get(THEME_KEY) {
            Ok(value) => value.as_deref().map(Theme::parse).unwrap_or_default(),
            Err(e) => {
                log::warn!("could not read theme preference: {e}");
                Theme::default()
            }
        }
    }

    pub fn persist(self, prefs: &Preferences) -> Result<(), StorageError> {
        prefs.set(THEME_KEY, self.as_str())
    }

    /// Flips the theme, storing the new value before returning it.
    pub fn toggle(self, prefs: &Preferences) -> Result<Self, StorageError> {
        let next = self.toggled();
        next.persist(prefs)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light() {
        let prefs = Preferences::open_in_memory().unwrap();
        assert_eq!(Theme::restore(&prefs), Theme::Light);
        prefs.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(Theme::restore(&prefs), Theme::Light);
    }

    #[test]
    fn double_toggle_restores_original() {
        let prefs = Preferences::open_in_memory().unwrap();
        for start in [Theme::Light, Theme::Dark] {
            let back = start.toggle(&prefs).unwrap().toggle(&prefs).unwrap();
            assert_eq!(back, start);
            assert_eq!(Theme::restore(&prefs), start);
        }
    }

    #[test]
    fn toggle_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.sqlite");
        {
            let prefs = Preferences::open(&path).unwrap();
            let theme = Theme::restore(&prefs);
            assert_eq!(theme.toggle(&prefs).unwrap(), Theme::Dark);
        }
        let prefs = Preferences::open(&path).unwrap();
        assert_eq!(Theme::restore(&prefs), Theme::Dark);
        assert_eq!(Theme::Dark.toggle_button().0, "☀️");
    }
}
