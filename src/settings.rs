use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const TYPOGRAPHY_KEY: &str = "typo";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct ParseSettingError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseSettingError {
                kind: THEME_KEY,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Typography {
    #[default]
    System,
    Serif,
    Mono,
}

impl Typography {
    pub const ALL: [Typography; 3] = [Self::System, Self::Serif, Self::Mono];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Serif => "serif",
            Self::Mono => "mono",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System Sans",
            Self::Serif => "Serif",
            Self::Mono => "Monospace",
        }
    }

    /// Value for the `--font-sans` custom property.
    pub fn font_stack(self) -> &'static str {
        match self {
            Self::System => {
                "system-ui, -apple-system, 'Segoe UI', Roboto, 'Helvetica Neue', Arial"
            }
            Self::Serif => "Georgia, 'Times New Roman', Times, serif",
            Self::Mono => "SFMono-Regular, Menlo, Monaco, 'Roboto Mono', 'Courier New', monospace",
        }
    }
}

impl fmt::Display for Typography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Typography {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseSettingError {
                kind: TYPOGRAPHY_KEY,
                value: s.to_string(),
            })
    }
}

/// Persistent key/value storage for user preferences.
pub trait SettingsStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// In-process store, used while rendering on the server and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl SettingsStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.0.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.0.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    Theme(Theme),
    Typography(Typography),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(SettingChange) + Send + Sync>;

/// Typed view over an injected [`SettingsStore`] with change notification.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
    listeners: Arc<Mutex<Vec<(ListenerId, Listener)>>>,
    next_listener: Arc<AtomicU64>,
}

impl Settings {
    pub fn new(store: impl SettingsStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            listeners: Arc::default(),
            next_listener: Arc::default(),
        }
    }

    fn parsed<T: FromStr<Err = ParseSettingError>>(&self, key: &str) -> Option<T> {
        let raw = self.store.read(key)?;
        if raw.is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("ignoring stored preference: {e}");
                None
            }
        }
    }

    /// The explicit choice, if the user ever made one.
    pub fn theme_preference(&self) -> Option<Theme> {
        self.parsed(THEME_KEY)
    }

    pub fn typography(&self) -> Typography {
        self.parsed(TYPOGRAPHY_KEY).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.write(THEME_KEY, theme.as_str());
        self.notify(SettingChange::Theme(theme));
    }

    pub fn set_typography(&self, typography: Typography) {
        self.store.write(TYPOGRAPHY_KEY, typography.as_str());
        self.notify(SettingChange::Typography(typography));
    }

    pub fn subscribe(&self, listener: impl Fn(SettingChange) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(listener)));
        }
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(lid, _)| *lid != id);
        }
    }

    fn notify(&self, change: SettingChange) {
        // listeners may subscribe or unsubscribe while being called
        let listeners = match self.listeners.lock() {
            Ok(l) => l.iter().map(|(_, f)| f.clone()).collect::<Vec<_>>(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(change);
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("theme", &self.theme_preference())
            .field("typography", &self.typography())
            .finish()
    }
}

/// Explicit preference layered over the OS color scheme. Without a
/// preference the OS value is mirrored live; once one exists it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    preference: Option<Theme>,
    system: Theme,
}

impl ThemeState {
    pub fn new(preference: Option<Theme>, system_dark: bool) -> Self {
        Self {
            preference,
            system: Theme::from_dark(system_dark),
        }
    }

    pub fn active(&self) -> Theme {
        self.preference.unwrap_or(self.system)
    }

    pub fn preference(&self) -> Option<Theme> {
        self.preference
    }

    pub fn restore(&mut self, preference: Option<Theme>) {
        self.preference = preference;
    }

    pub fn choose(&mut self, theme: Theme) {
        self.preference = Some(theme);
    }

    /// Flips the active theme and pins it as the explicit choice.
    pub fn toggle(&mut self) -> Theme {
        let next = self.active().toggled();
        self.choose(next);
        next
    }

    /// Returns true when the active theme changed as a result.
    pub fn system_changed(&mut self, system_dark: bool) -> bool {
        let before = self.active();
        self.system = Theme::from_dark(system_dark);
        before != self.active()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_os_preference_until_user_chooses() {
        let settings = Settings::new(MemoryStore::default());
        let mut theme = ThemeState::new(settings.theme_preference(), true);
        assert_eq!(theme.active(), Theme::Dark);

        // tracks live OS changes without a stored choice
        assert!(theme.system_changed(false));
        assert_eq!(theme.active(), Theme::Light);
        assert!(theme.system_changed(true));

        let chosen = theme.toggle();
        settings.set_theme(chosen);
        assert_eq!(chosen, Theme::Light);

        // OS flips are ignored now
        assert!(!theme.system_changed(true));
        assert_eq!(theme.active(), Theme::Light);
        assert_eq!(settings.theme_preference(), Some(Theme::Light));
    }

    #[test]
    fn test_stored_preference_wins_on_load() {
        let store = MemoryStore::default();
        store.write(THEME_KEY, "light");
        let settings = Settings::new(store);
        let theme = ThemeState::new(settings.theme_preference(), true);
        assert_eq!(theme.active(), Theme::Light);
    }

    #[test]
    fn test_bad_stored_values_are_ignored() {
        let store = MemoryStore::default();
        store.write(THEME_KEY, "sepia");
        store.write(TYPOGRAPHY_KEY, "comic");
        let settings = Settings::new(store);
        assert_eq!(settings.theme_preference(), None);
        assert_eq!(settings.typography(), Typography::System);
    }

    #[test]
    fn test_typography_round_trips_through_store() {
        let settings = Settings::new(MemoryStore::default());
        assert_eq!(settings.typography(), Typography::System);
        settings.set_typography(Typography::Mono);
        assert_eq!(settings.typography(), Typography::Mono);
        assert!(Typography::Mono.font_stack().contains("monospace"));
    }

    #[test]
    fn test_listeners_are_notified_until_unsubscribed() {
        let settings = Settings::new(MemoryStore::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let id = {
            let seen = seen.clone();
            settings.subscribe(move |change| seen.lock().unwrap().push(change))
        };
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = calls.clone();
            settings.subscribe(move |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            });
        }

        settings.set_theme(Theme::Dark);
        settings.set_typography(Typography::Serif);
        settings.unsubscribe(id);
        settings.set_theme(Theme::Light);

        assert_eq!(
            *seen.lock().unwrap(),
            [
                SettingChange::Theme(Theme::Dark),
                SettingChange::Typography(Typography::Serif)
            ]
        );
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_clones_share_store_and_listeners() {
        let settings = Settings::new(MemoryStore::default());
        let other = settings.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = calls.clone();
            other.subscribe(move |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            });
        }
        settings.set_theme(Theme::Dark);
        assert_eq!(other.theme_preference(), Some(Theme::Dark));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!("serif".parse::<Typography>(), Ok(Typography::Serif));
    }
}
