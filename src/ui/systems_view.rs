use crate::sim::colony::{Colony, StorageCapPolicy};
use crate::ui::format_amount;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, colony: &Colony) {
    let sections = Layout::vertical([Constraint::Length(7), Constraint::Min(3)]).split(area);

    let stats_block = Block::default().title("Systems").borders(Borders::ALL);
    let stats_area = stats_block.inner(sections[0]);
    frame.render_widget(stats_block, sections[0]);

    let policy = match colony.cap_policy() {
        StorageCapPolicy::Uncapped => "uncapped",
        StorageCapPolicy::CapToStorage => "capped to depot",
    };
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Depot capacity", Style::default().fg(Color::LightGreen)),
            Span::raw(format!(
                ": {} ({policy})",
                format_amount(colony.storage_capacity() as f64)
            )),
        ]),
        Line::from(vec![Span::raw(format!(
            "Energy cap: {}",
            format_amount(colony.state.resources.energy_max)
        ))]),
        Line::from(vec![Span::raw(format!(
            "Upgrades in flight: {}",
            colony.state.queue.len()
        ))]),
        Line::from(vec![Span::raw(format!(
            "Hourly yield: {} metal, {} crystal, {} energy",
            colony.state.production.metal,
            colony.state.production.crystal,
            colony.state.production.energy
        ))]),
    ];
    let paragraph = Paragraph::new(stats_lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, stats_area);

    let log_block = Block::default().title("Event Log").borders(Borders::ALL);
    let log_area = log_block.inner(sections[1]);
    frame.render_widget(log_block, sections[1]);

    let mut items: Vec<ListItem> = colony
        .messages()
        .map(|message| ListItem::new(message.clone()))
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("All quiet on the frontier."));
    }
    frame.render_widget(List::new(items), log_area);
}
