use ratatui::style::{Color, Modifier, Style};

use shelfdesk_core::ToastKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(88, 120, 176);
pub const SUCCESS: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for an input field, brighter when it has focus
pub fn input_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White).bg(HIGHLIGHT)
    } else {
        Style::default().fg(MUTED)
    }
}

/// Quantity column style: low-stock entries stand out
pub fn quantity_style(quantity: i64) -> Style {
    if quantity == 0 {
        error_style().add_modifier(Modifier::BOLD)
    } else {
        success_style()
    }
}

/// Toast styling by kind
pub fn toast_style(kind: ToastKind) -> Style {
    match kind {
        ToastKind::Success => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(32, 72, 32)),
        ToastKind::Error => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(88, 32, 32)),
    }
}
