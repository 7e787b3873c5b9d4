use crate::app::{App, FocusTarget};
use crate::sim::colony::Colony;
use crate::ui::format_duration;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, colony: &Colony) {
    let highlight = app.focus() == FocusTarget::Queue;
    let border_style = if highlight {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let queue = &colony.state.queue;
    let mut items: Vec<ListItem> = queue
        .iter()
        .map(|item| {
            let title = Line::from(vec![
                Span::styled(item.building.label(), Style::default().fg(Color::Yellow)),
                Span::raw(format!("  Lv.{} → {}", item.from_level, item.to_level)),
            ]);
            let remaining = item.remaining_secs.ceil() as u64;
            let detail = Line::from(vec![Span::raw(format!(
                "{} remaining • {:.0}%",
                format_duration(remaining),
                item.progress() * 100.0
            ))]);
            ListItem::new(vec![title, detail])
        })
        .collect();

    if items.is_empty() {
        items.push(ListItem::new(Line::from(vec![Span::raw(
            "Construction bays idle.",
        )])));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title("Construction Queue")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !queue.is_empty() {
        state.select(Some(app.selected_queue_item.min(queue.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
