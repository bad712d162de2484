use ratatui::{
    layout::{Alignment, Constraint, Rect},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Members tab
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Members ({}) - [a]dd ", app.members.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.members.is_empty() {
        let empty = Paragraph::new("No members registered yet.")
            .style(styles::muted_style())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([Cell::from("ID"), Cell::from("Name")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .members
        .iter()
        .map(|member| {
            Row::new(vec![
                Cell::from(member.id.to_string()),
                Cell::from(member.name.clone()),
            ])
        })
        .collect();

    let widths = [Constraint::Length(6), Constraint::Fill(1)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.members_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
