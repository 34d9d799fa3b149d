use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::experiment::MappingEntry;

/// One text line per learned motor mapping.
#[must_use]
pub fn mapping_lines(mappings: &[MappingEntry]) -> Vec<String> {
    mappings
        .iter()
        .map(|entry| {
            format!(
                "m{} ({:>2},{:>2}) -> ({:>2},{:>2})  p={:.2}",
                entry.motor,
                entry.displacement.dx,
                entry.displacement.dy,
                entry.offset.dx,
                entry.offset.dy,
                entry.permanence
            )
        })
        .collect()
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, mapping: Vec<String>, hud_info: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Body
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let field: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();
    let field = Paragraph::new(field)
        .block(Block::default().borders(Borders::ALL).title("visits"))
        .style(Style::default().fg(Color::White).bg(Color::Black));
    f.render_widget(field, body[0]);

    let table: Vec<Line> = mapping
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();
    let table = Paragraph::new(table)
        .block(Block::default().borders(Borders::ALL).title("motor -> offset"));
    f.render_widget(table, body[1]);
}
