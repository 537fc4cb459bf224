//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn page_bg() -> Color {
        Color::Rgb(12, 12, 20)
    }

    pub fn hero_title_style() -> Style {
        Style::default()
            .fg(Color::Rgb(224, 231, 255))
            .add_modifier(Modifier::BOLD)
    }

    pub fn hero_text_style() -> Style {
        Style::default().fg(Color::Rgb(230, 230, 240))
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::Rgb(170, 170, 185))
    }

    pub fn button_style(hovered: bool) -> Style {
        let base = Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(79, 70, 229))
            .add_modifier(Modifier::BOLD);
        if hovered {
            base.bg(Color::Rgb(124, 58, 237))
        } else {
            base
        }
    }

    // ── section cards ──────────────────────────────────────────
    pub fn card_bg() -> Color {
        Color::Rgb(24, 24, 36)
    }

    pub fn card_border_style(active: bool) -> Style {
        if active {
            Style::default().fg(Color::White).bg(Self::card_bg())
        } else {
            Style::default().fg(Color::Rgb(90, 90, 110)).bg(Self::card_bg())
        }
    }

    pub fn card_subtitle_style() -> Style {
        Style::default()
            .fg(Color::Rgb(160, 160, 175))
            .bg(Self::card_bg())
    }

    pub fn card_body_style() -> Style {
        Style::default()
            .fg(Color::Rgb(215, 215, 225))
            .bg(Self::card_bg())
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn dot_style(active: bool, hovered: bool) -> Style {
        match (active, hovered) {
            (true, _) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::White),
            (false, false) => Style::default().fg(Color::Rgb(140, 140, 150)),
        }
    }

    pub fn tooltip_style() -> Style {
        Style::default().fg(Color::White).bg(Color::Rgb(0, 0, 0))
    }

    pub fn track_style() -> Style {
        Style::default().fg(Color::Rgb(60, 60, 70))
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn loading_text_style() -> Style {
        Style::default().fg(Color::Rgb(210, 210, 220))
    }
}

/// Gradient used by the top progress bar and the loading bar.
pub const PROGRESS_GRADIENT: [Color; 2] = [Color::Rgb(59, 130, 246), Color::Rgb(168, 85, 247)];

/// Representative colour for a palette hue name (`purple`, `cyan`, ...).
fn hue(name: &str) -> Option<Color> {
    let rgb = match name {
        "purple" => (147, 51, 234),
        "pink" => (219, 39, 119),
        "blue" => (37, 99, 235),
        "cyan" => (6, 182, 212),
        "indigo" => (79, 70, 229),
        "emerald" => (16, 185, 129),
        "teal" => (20, 184, 166),
        "green" => (34, 197, 94),
        "red" => (220, 38, 38),
        "orange" => (234, 88, 12),
        "amber" => (245, 158, 11),
        "yellow" => (234, 179, 8),
        "violet" => (124, 58, 237),
        "rose" => (225, 29, 72),
        "sky" => (14, 165, 233),
        "white" => (255, 255, 255),
        _ => return None,
    };
    Some(Color::Rgb(rgb.0, rgb.1, rgb.2))
}

/// Colour for an accent tag such as `accent-purple`.
pub fn accent_color(tag: &str) -> Color {
    tag.strip_prefix("accent-")
        .and_then(hue)
        .unwrap_or(Color::Rgb(199, 210, 254))
}

/// Colour stops of a gradient tag like `from-cyan-500 via-blue-500 to-indigo-600`.
/// Unknown hues are skipped; an empty result means "no gradient".
pub fn gradient_stops(tag: &str) -> Vec<Color> {
    tag.split_whitespace()
        .filter_map(|token| {
            let rest = token
                .strip_prefix("from-")
                .or_else(|| token.strip_prefix("via-"))
                .or_else(|| token.strip_prefix("to-"))?;
            let name = rest.split('-').next()?;
            hue(name)
        })
        .collect()
}

/// Sample a gradient at `t` in `[0, 1]`.
pub fn gradient_at(stops: &[Color], t: f64) -> Color {
    match stops {
        [] => Color::White,
        [only] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
            let i = (t.floor() as usize).min(stops.len() - 2);
            lerp(stops[i], stops[i + 1], t - i as f64)
        }
    }
}

fn lerp(a: Color, b: Color, t: f64) -> Color {
    match (a, b) {
        (Color::Rgb(ar, ag, ab), Color::Rgb(br, bg, bb)) => {
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
            Color::Rgb(mix(ar, br), mix(ag, bg), mix(ab, bb))
        }
        _ if t < 0.5 => a,
        _ => b,
    }
}
