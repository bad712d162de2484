use ratatui::{
    layout::{Alignment, Constraint, Rect},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Loans tab - active (unreturned) transactions only
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Loans ({}) - [i]ssue [r]eturn ", app.loans.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.loans.is_empty() {
        let empty = Paragraph::new("No books are currently issued.")
            .style(styles::muted_style())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([
        Cell::from("ID"),
        Cell::from("Book"),
        Cell::from("Member"),
        Cell::from("Issued"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .loans
        .iter()
        .map(|loan| {
            Row::new(vec![
                Cell::from(loan.id.to_string()),
                Cell::from(loan.book_label()),
                Cell::from(loan.member_label()),
                Cell::from(loan.issue_date.format("%b %d, %Y").to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.loans_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
