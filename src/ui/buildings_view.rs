use crate::app::{App, FocusTarget};
use crate::sim::catalog::{Output, definition};
use crate::sim::colony::{BuildingView, Colony};
use crate::ui::{format_amount, format_duration};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, colony: &Colony) {
    let highlight = app.focus() == FocusTarget::Buildings;
    let border_style = if highlight {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let views = colony.building_views();
    let items: Vec<ListItem> = views.iter().map(list_item).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Buildings")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_building.min(views.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn list_item(view: &BuildingView) -> ListItem<'static> {
    let title = Line::from(vec![
        Span::styled(view.kind.label(), Style::default().fg(Color::Yellow)),
        Span::raw(format!("  Lv.{}", view.level)),
        Span::raw(format!(
            "  | {} M / {} C",
            format_amount(view.cost.metal as f64),
            format_amount(view.cost.crystal as f64)
        )),
        Span::raw(format!(" | {}", format_duration(view.cost.time_secs))),
    ]);

    let mut detail_spans = vec![Span::raw(output_summary(view))];
    if view.energy_use_next > 0 {
        detail_spans.push(Span::raw(format!(" • -{}/h energy", view.energy_use_next)));
    }
    detail_spans.push(Span::raw(" • "));
    detail_spans.push(match &view.block {
        None => Span::styled("Ready", Style::default().fg(Color::LightGreen)),
        Some(block) => Span::styled(block.to_string(), Style::default().fg(Color::Red)),
    });

    ListItem::new(vec![title, Line::from(detail_spans)])
}

fn output_summary(view: &BuildingView) -> String {
    match definition(view.kind).output {
        Output::Metal { .. } => format!("{} → {} metal/h", view.output_now, view.output_next),
        Output::Crystal { .. } => format!("{} → {} crystal/h", view.output_now, view.output_next),
        Output::Energy { .. } => format!("{} → {} energy/h", view.output_now, view.output_next),
        Output::Capacity { .. } => format!(
            "{} → {} capacity",
            format_amount(view.output_now as f64),
            format_amount(view.output_next as f64)
        ),
        Output::None => view.kind.description().to_string(),
    }
}
