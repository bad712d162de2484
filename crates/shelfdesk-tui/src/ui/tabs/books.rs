use ratatui::{
    layout::{Alignment, Constraint, Rect},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Books tab - the catalog with per-title copy counts
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Books ({}) - [a]dd [d]elete ", app.books.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.books.is_empty() {
        let empty = Paragraph::new("No books in catalog yet.")
            .style(styles::muted_style())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([
        Cell::from("ID"),
        Cell::from("Title"),
        Cell::from("Author"),
        Cell::from("Qty"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .books
        .iter()
        .map(|book| {
            Row::new(vec![
                Cell::from(book.id.to_string()),
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(format!("{:>3}", book.quantity))
                    .style(styles::quantity_style(book.quantity)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.books_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
