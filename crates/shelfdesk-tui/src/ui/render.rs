use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use shelfdesk_core::ToastKind;

use crate::app::{App, AppState, AuthMode, BookFormFocus, IssueFocus, LoginFocus, Tab};

use super::styles;
use super::tabs::{books, loans, members};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::AddingBook => render_add_book_overlay(frame, app),
        AppState::RegisteringMember => render_register_member_overlay(frame, app),
        AppState::IssuingBook => render_issue_overlay(frame, app),
        AppState::ConfirmingDelete => render_confirm_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }

    // Toasts draw above everything, including overlays
    render_toasts(frame, app);
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  Shelfdesk";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Books, Tab::Members, Tab::Loans];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        spans.push(Span::styled(label, styles::tab_style(app.current_tab == *tab)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Books => books::render(frame, app, area),
        Tab::Members => members::render(frame, app, area),
        Tab::Loans => loans::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = format!(" {} ", app.server_url);
    let right_text = " [u]pdate | [o] logout | [q]uit ";

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

/// Centered rectangle with fixed width/height, clamped to the frame
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// One labeled input line for form overlays
fn input_line<'a>(label: &'a str, value: &str, focused: bool, mask: bool) -> Line<'a> {
    let shown = if mask {
        "\u{25cf}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!("{:<10}", label), styles::muted_style()),
        Span::styled(format!(" {}{} ", shown, cursor), styles::input_style(focused)),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let is_signup = app.auth_mode == AuthMode::Signup;
    let height = if is_signup { 13 } else { 12 };
    let area = centered_rect(52, height, frame.area());

    frame.render_widget(Clear, area);

    let title = if is_signup { " Sign up " } else { " Log in " };
    let button = if is_signup { "[ Sign up ]" } else { "[ Log in ]" };

    let mut lines = vec![
        Line::from(""),
        input_line(
            "Username:",
            &app.login_username,
            app.login_focus == LoginFocus::Username,
            false,
        ),
    ];

    if is_signup {
        lines.push(input_line(
            "Email:",
            &app.login_email,
            app.login_focus == LoginFocus::Email,
            false,
        ));
    }

    lines.push(input_line(
        "Password:",
        &app.login_password,
        app.login_focus == LoginFocus::Password,
        true,
    ));
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            button,
            if app.login_focus == LoginFocus::Button {
                styles::selected_style()
            } else {
                styles::list_item_style()
            },
        ))
        .alignment(Alignment::Center),
    );
    lines.push(Line::from(""));

    if let Some(ref error) = app.login_error {
        lines.push(
            Line::from(Span::styled(error.clone(), styles::error_style()))
                .alignment(Alignment::Center),
        );
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    let toggle_hint = if is_signup {
        "[Tab] next  [F2] log in instead  [Esc] cancel"
    } else {
        "[Tab] next  [F2] create account  [Esc] cancel"
    };
    lines.push(
        Line::from(Span::styled(toggle_hint, styles::muted_style()))
            .alignment(Alignment::Center),
    );

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_add_book_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(52, 10, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        input_line(
            "Title:",
            &app.book_title_input,
            app.book_form_focus == BookFormFocus::Title,
            false,
        ),
        input_line(
            "Author:",
            &app.book_author_input,
            app.book_form_focus == BookFormFocus::Author,
            false,
        ),
        input_line(
            "Quantity:",
            &app.book_quantity_input,
            app.book_form_focus == BookFormFocus::Quantity,
            false,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] next  [Enter] add  [Esc] cancel",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Add book ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_register_member_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(52, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        input_line("Name:", &app.member_name_input, true, false),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] register  [Esc] cancel",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Register member ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_issue_overlay(frame: &mut Frame, app: &App) {
    let frame_area = frame.area();
    let area = centered_rect(
        frame_area.width.saturating_sub(10).min(90),
        frame_area.height.saturating_sub(6).min(24),
        frame_area,
    );
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .title(" Issue book ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(inner);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let book_items: Vec<ListItem> = app
        .books
        .iter()
        .map(|b| ListItem::new(format!("{} (qty: {})", b.title, b.quantity)))
        .collect();
    let mut book_state = ListState::default();
    book_state.select(Some(app.issue_book_selection));
    let book_list = List::new(book_items)
        .block(
            Block::default()
                .title(" Book ")
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.issue_focus == IssueFocus::Books)),
        )
        .highlight_style(styles::selected_style());
    frame.render_stateful_widget(book_list, panes[0], &mut book_state);

    let member_items: Vec<ListItem> = app
        .members
        .iter()
        .map(|m| ListItem::new(m.name.clone()))
        .collect();
    let mut member_state = ListState::default();
    member_state.select(Some(app.issue_member_selection));
    let member_list = List::new(member_items)
        .block(
            Block::default()
                .title(" Member ")
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.issue_focus == IssueFocus::Members)),
        )
        .highlight_style(styles::selected_style());
    frame.render_stateful_widget(member_list, panes[1], &mut member_state);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "[Tab] switch pane  [Enter] issue  [Esc] cancel",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_confirm_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let title = app
        .selected_book()
        .map(|b| b.title.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(format!(
            "Delete \"{}\" from the catalog?",
            title
        )))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", styles::help_key_style()),
            Span::raw(" delete   "),
            Span::styled("[n]", styles::help_key_style()),
            Span::raw(" keep"),
        ])
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Delete book ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw("Quit Shelfdesk?")).alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", styles::help_key_style()),
            Span::raw(" quit   "),
            Span::styled("[n]", styles::help_key_style()),
            Span::raw(" stay"),
        ])
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Quit ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(56, 18, frame.area());
    frame.render_widget(Clear, area);

    let key = styles::help_key_style();
    let desc = styles::help_desc_style();

    let entry = |k: &'static str, d: &'static str| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<12}", k), key),
            Span::styled(d, desc),
        ])
    };

    let lines = vec![
        Line::from(""),
        entry("1 / 2 / 3", "Switch to Books / Members / Loans"),
        entry("\u{2190} / \u{2192}", "Previous / next tab"),
        entry("\u{2191} / \u{2193}", "Move selection (j/k also work)"),
        entry("a", "Add book / register member"),
        entry("d", "Delete selected book"),
        entry("i", "Issue a book (Loans tab)"),
        entry("r", "Return selected loan (Loans tab)"),
        entry("u", "Refresh all data"),
        entry("o", "Log out"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw active toasts stacked above the status bar, newest at the
/// bottom. Each removes itself when its lifetime runs out; overlapping
/// toasts simply coexist.
fn render_toasts(frame: &mut Frame, app: &App) {
    let area = frame.area();

    for (i, toast) in app.toasts.iter().rev().enumerate() {
        let mark = match toast.kind {
            ToastKind::Success => "\u{2713}",
            ToastKind::Error => "\u{2715}",
        };
        let text = format!(" {} {} ", mark, toast.message);
        let width = (text.chars().count() as u16).min(area.width.saturating_sub(2));
        let y_offset = 3 + i as u16;
        if y_offset >= area.height {
            break;
        }

        let toast_area = Rect {
            x: area.width.saturating_sub(width + 1),
            y: area.height - y_offset,
            width,
            height: 1,
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(text).style(styles::toast_style(toast.kind)),
            toast_area,
        );
    }
}
