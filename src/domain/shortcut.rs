use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Platform family the shortcut is displayed on.
///
/// Shortcuts are stored with platform-neutral modifier names and only
/// rendered with platform glyphs at display time, so a spec saved on one
/// platform loads cleanly on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Detect the platform this process is running on.
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::MacOs
        }

        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Platform::Linux
        }
    }
}

/// Modifier keys in canonical order.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// storage and display order: Super, Control, Shift, Alt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKey {
    Super,
    Control,
    Shift,
    Alt,
}

impl ModifierKey {
    /// Platform-neutral name used on the wire and in persisted specs.
    #[must_use]
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ModifierKey::Super => "Super",
            ModifierKey::Control => "Control",
            ModifierKey::Shift => "Shift",
            ModifierKey::Alt => "Alt",
        }
    }

    /// Parse a modifier name, accepting the historical aliases the backend
    /// accepts (cmd/meta for Super, ctrl for Control, option for Alt).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cmd" | "super" | "meta" => Some(ModifierKey::Super),
            "ctrl" | "control" => Some(ModifierKey::Control),
            "shift" => Some(ModifierKey::Shift),
            "alt" | "option" => Some(ModifierKey::Alt),
            _ => None,
        }
    }

    /// Display glyph or label for the platform.
    #[must_use]
    pub fn glyph(&self, platform: Platform) -> &'static str {
        if platform == Platform::MacOs {
            match self {
                ModifierKey::Super => "\u{2318}",
                ModifierKey::Control => "\u{2303}",
                ModifierKey::Shift => "\u{21e7}",
                ModifierKey::Alt => "\u{2325}",
            }
        } else {
            match self {
                ModifierKey::Super => "Super",
                ModifierKey::Control => "Ctrl",
                ModifierKey::Shift => "Shift",
                ModifierKey::Alt => "Alt",
            }
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl Serialize for ModifierKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_name())
    }
}

impl<'de> Deserialize<'de> for ModifierKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ModifierKey::parse(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown modifier '{name}'")))
    }
}

/// A raw keydown as reported by the host input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Key name in the host's convention ("a", " ", "Enter", "F9", "Shift").
    pub key: String,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    /// Modifier flags mapped to canonical modifiers, deduplicated and in
    /// canonical order.
    #[must_use]
    pub fn modifiers(&self) -> Vec<ModifierKey> {
        let mut mods = Vec::with_capacity(4);
        if self.meta {
            mods.push(ModifierKey::Super);
        }
        if self.ctrl {
            mods.push(ModifierKey::Control);
        }
        if self.shift {
            mods.push(ModifierKey::Shift);
        }
        if self.alt {
            mods.push(ModifierKey::Alt);
        }
        mods
    }
}

/// Fixed mapping from named raw keys to canonical key names.
static NAMED_KEYS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (" ", "SPACE"),
        ("Space", "SPACE"),
        ("Spacebar", "SPACE"),
        ("Enter", "ENTER"),
        ("Return", "ENTER"),
        ("Tab", "TAB"),
        ("Escape", "ESCAPE"),
        ("Esc", "ESCAPE"),
    ])
});

/// Raw key names that are modifiers on their own. A keydown reporting one
/// of these carries no terminal key and is ignored by the capture editor.
const MODIFIER_NAMES: [&str; 11] = [
    "Meta", "Control", "Ctrl", "Shift", "Alt", "AltGraph", "Super", "Hyper", "OS", "Command",
    "Option",
];

/// Normalize a raw key name to its canonical form.
///
/// Returns `None` for modifier-only keydowns. Named keys use the fixed
/// table; everything else (printable characters, function keys such as
/// "f12") falls back to the upper-cased raw name.
pub fn normalize_key(raw: &str) -> Option<String> {
    if MODIFIER_NAMES.contains(&raw) {
        return None;
    }
    if let Some(named) = NAMED_KEYS.get(raw) {
        return Some((*named).to_string());
    }
    Some(raw.to_uppercase())
}

/// A portable global-shortcut specification.
///
/// Modifiers are unique and kept in canonical order; `key` must be
/// non-empty before the spec may be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutSpec {
    pub modifiers: Vec<ModifierKey>,
    pub key: String,
}

impl ShortcutSpec {
    /// Create a spec, deduplicating modifiers and sorting them into
    /// canonical order.
    pub fn new(modifiers: impl IntoIterator<Item = ModifierKey>, key: impl Into<String>) -> Self {
        let mut mods: Vec<ModifierKey> = modifiers.into_iter().collect();
        mods.sort();
        mods.dedup();
        Self {
            modifiers: mods,
            key: key.into(),
        }
    }

    /// Build a spec from a raw keydown. Returns `None` when the keydown
    /// consists solely of modifiers.
    pub fn from_key_press(press: &KeyPress) -> Option<Self> {
        let key = normalize_key(&press.key)?;
        Some(Self::new(press.modifiers(), key))
    }

    /// The default toggle shortcut for a platform.
    #[must_use]
    pub fn default_for(platform: Platform) -> Self {
        let primary = if platform == Platform::MacOs {
            ModifierKey::Super
        } else {
            ModifierKey::Control
        };
        Self::new([primary, ModifierKey::Shift], "F9")
    }

    /// Whether the spec is complete enough to persist.
    #[must_use]
    pub fn is_savable(&self) -> bool {
        !self.key.is_empty()
    }

    /// Render the spec with platform glyphs.
    ///
    /// The same mapping is used for interactively captured specs and for
    /// specs loaded from storage, so both render identically.
    #[must_use]
    pub fn display(&self, platform: Platform) -> String {
        let separator = if platform == Platform::MacOs { "" } else { "+" };
        let mut parts: Vec<&str> = self.modifiers.iter().map(|m| m.glyph(platform)).collect();
        parts.push(&self.key);
        parts.join(separator)
    }
}

impl<'de> Deserialize<'de> for ShortcutSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            modifiers: Vec<ModifierKey>,
            #[serde(default)]
            key: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(ShortcutSpec::new(raw.modifiers, raw.key))
    }
}
