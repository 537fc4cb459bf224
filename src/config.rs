//! User configuration: key bindings, scroll tuning, and persistence.
//!
//! Stored as a line-oriented `key = value` file at
//! `$XDG_CONFIG_HOME/scroll-gallery/config.toml` (default
//! `~/.config/scroll-gallery/config.toml`).  Unknown keys are ignored and
//! out-of-range numbers are clamped, so a hand-edited file never stops the
//! gallery from starting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{gallery::ACTIVATION_THROTTLE_MS, scroll::SCROLL_SAMPLE_MS};

// ───────────────────────────────────────── actions ───────────

/// Every keyboard-driven action in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    NextSection,
    PrevSection,
    ScrollToTop,
    ScrollToBottom,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::NextSection,
        Action::PrevSection,
        Action::ScrollToTop,
        Action::ScrollToBottom,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::NextSection => "next_section",
            Action::PrevSection => "prev_section",
            Action::ScrollToTop => "scroll_to_top",
            Action::ScrollToBottom => "scroll_to_bottom",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A key code plus the CTRL/ALT/SHIFT modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers: modifiers & MODIFIER_MASK,
        }
    }

    /// Character keys ignore SHIFT: terminals report `G` as `Char('G')`
    /// with or without the modifier depending on the platform.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = MODIFIER_MASK;
        if matches!(self.code, KeyCode::Char(_)) {
            mask.remove(KeyModifiers::SHIFT);
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Short label for the status bar (e.g. `"↓"`, `"Ctrl+d"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        let name = match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".to_string(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::PageUp, true) => "PgUp".into(),
            (KeyCode::PageDown, true) => "PgDn".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::PageUp, false) => "PageUp".into(),
            (KeyCode::PageDown, false) => "PageDown".into(),
            (KeyCode::Left, _) => "Left".into(),
            (KeyCode::Right, _) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&name);
        s
    }

    /// Parse `"Ctrl+d"`, `"PageDown"`, `"j"`, `"Space"`, …
    fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.rsplit_once('+') {
            // a bare "+" is the plus key itself
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some(split) => split,
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = match key.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            lower if lower.starts_with('f') && lower.len() > 1 => KeyCode::F(lower[1..].parse().ok()?),
            // keep the original case so `G` and `g` stay distinct
            _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
            _ => return None,
        };

        Some(KeyBind::new(code, modifiers))
    }
}

// ───────────────────────────────────────── config ────────────

/// Key bindings plus scroll and timing tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Virtual pixels represented by one terminal row.
    pub px_per_row: u32,
    /// Distance moved by one wheel notch or one line-scroll key press.
    pub wheel_step_px: u32,
    /// Sampling interval for raw scroll events.
    pub scroll_sample_ms: u64,
    /// Minimum spacing between accepted section activations.
    pub activation_ms: u64,
    /// Smooth-scroll damping per frame, in percent.
    pub smooth_speed_pct: u8,
    /// Frame interval of the render loop.
    pub frame_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            px_per_row: 16,
            wheel_step_px: 48,
            scroll_sample_ms: SCROLL_SAMPLE_MS,
            activation_ms: ACTIVATION_THROTTLE_MS,
            smooth_speed_pct: 25,
            frame_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::{Char, Down, End, Esc, Home, Left, Right, Up};
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;

        HashMap::from([
            (ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]),
            (ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]),
            (
                Action::PageDown,
                vec![
                    KeyBind::new(KeyCode::PageDown, n),
                    KeyBind::new(Char(' '), n),
                    KeyBind::new(Char('d'), ctrl),
                ],
            ),
            (Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('u'), ctrl)]),
            (NextSection, vec![KeyBind::new(Char('n'), n), KeyBind::new(Right, n)]),
            (PrevSection, vec![KeyBind::new(Char('p'), n), KeyBind::new(Left, n)]),
            (ScrollToTop, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]),
            (ScrollToBottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), n)]),
            (Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]),
        ])
    }

    /// Action bound to `event`; the binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}/{}: section | 1-9: jump | {}: top | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::NextSection),
            self.short_binding(Action::PrevSection),
            self.short_binding(Action::ScrollToTop),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from `path`; a missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                }
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    pub fn parse(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if cfg.apply_tuning(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };
            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                cfg.bindings.insert(action, parsed);
            }
        }

        cfg
    }

    /// Apply a numeric tuning entry.  Returns `false` if `key` is not one.
    fn apply_tuning(&mut self, key: &str, value: &str) -> bool {
        match key {
            "px_per_row" => {
                if let Ok(v) = value.parse::<u32>() {
                    self.px_per_row = v.clamp(4, 64);
                }
            }
            "wheel_step_px" => {
                if let Ok(v) = value.parse::<u32>() {
                    self.wheel_step_px = v.clamp(1, 2000);
                }
            }
            "scroll_sample_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.scroll_sample_ms = v.min(1000);
                }
            }
            "activation_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.activation_ms = v.min(5000);
                }
            }
            "smooth_speed_pct" => {
                if let Ok(v) = value.parse::<u8>() {
                    self.smooth_speed_pct = v.clamp(5, 95);
                }
            }
            "frame_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.frame_ms = v.clamp(8, 100);
                }
            }
            _ => return false,
        }
        true
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scroll-gallery configuration".to_string(),
            String::new(),
            "# Scroll tuning".to_string(),
            format!("px_per_row = {}", self.px_per_row),
            format!("wheel_step_px = {}", self.wheel_step_px),
            format!("scroll_sample_ms = {}", self.scroll_sample_ms),
            format!("activation_ms = {}", self.activation_ms),
            format!("smooth_speed_pct = {}", self.smooth_speed_pct),
            format!("frame_ms = {}", self.frame_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/scroll-gallery/config.toml`.
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scroll-gallery").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_match_core_timing() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scroll_sample_ms, 10);
        assert_eq!(cfg.activation_ms, 150);
    }

    #[test]
    fn parses_tuning_and_clamps() {
        let cfg = AppConfig::parse(
            "# comment\npx_per_row = 200\nwheel_step_px = 30\nactivation_ms = abc\nframe_ms = 1\n",
        );
        assert_eq!(cfg.px_per_row, 64);
        assert_eq!(cfg.wheel_step_px, 30);
        assert_eq!(cfg.activation_ms, 150);
        assert_eq!(cfg.frame_ms, 8);
    }

    #[test]
    fn rebinding_replaces_defaults_for_that_action_only() {
        let cfg = AppConfig::parse("quit = Ctrl+x, F10\nbogus = q\n");
        assert_eq!(cfg.match_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), Some(Action::Quit));
        assert_eq!(cfg.match_key(key(KeyCode::F(10), KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(cfg.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
        assert_eq!(cfg.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Action::ScrollDown));
    }

    #[test]
    fn uppercase_char_matches_with_or_without_shift() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::ScrollToBottom)
        );
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('G'), KeyModifiers::NONE)),
            Some(Action::ScrollToBottom)
        );
        assert_eq!(cfg.match_key(key(KeyCode::Char('g'), KeyModifiers::NONE)), Some(Action::ScrollToTop));
    }

    #[test]
    fn page_keys_map_to_page_actions() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.match_key(key(KeyCode::PageDown, KeyModifiers::NONE)), Some(Action::PageDown));
        assert_eq!(cfg.match_key(key(KeyCode::PageUp, KeyModifiers::NONE)), Some(Action::PageUp));
        assert_eq!(cfg.match_key(key(KeyCode::Char(' '), KeyModifiers::NONE)), Some(Action::PageDown));
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::PageUp)
        );
    }

    #[test]
    fn ctrl_binding_wins_over_plain() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(Action::PageDown)
        );
        assert_eq!(cfg.match_key(key(KeyCode::Char('d'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.px_per_row = 20;
        cfg.bindings.insert(Action::NextSection, vec![KeyBind::new(KeyCode::Tab, KeyModifiers::NONE)]);
        cfg.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), cfg);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load_from(&dir.path().join("absent.toml")), AppConfig::default());
    }

    #[test]
    fn parse_key_strings() {
        assert_eq!(
            KeyBind::parse("Ctrl+Shift+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::CONTROL | KeyModifiers::SHIFT))
        );
        assert_eq!(KeyBind::parse("Space"), Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("+"), Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }
}
