use crate::app::App;
use crate::sim::colony::Colony;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub mod buildings_view;
pub mod queue_view;
pub mod systems_view;

pub fn render(frame: &mut Frame, app: &App, colony: &Colony) {
    let size = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    render_header(frame, layout[0], colony);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(layout[1]);

    buildings_view::render(frame, columns[0], app, colony);
    queue_view::render(frame, columns[1], app, colony);
    systems_view::render(frame, columns[2], colony);

    render_footer(frame, layout[2]);
}

fn render_header(frame: &mut Frame, area: Rect, colony: &Colony) {
    let resources = &colony.state.resources;
    let production = &colony.state.production;

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Galactic Outpost",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  Metal: "),
            Span::styled(
                format!("{} (+{}/h)", format_amount(resources.metal), production.metal),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  •  Crystal: "),
            Span::styled(
                format!(
                    "{} (+{}/h)",
                    format_amount(resources.crystal),
                    production.crystal
                ),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  •  Energy: "),
            Span::styled(
                format!(
                    "{}/{} (+{}/h)",
                    format_amount(resources.energy),
                    format_amount(resources.energy_max),
                    production.energy
                ),
                Style::default().fg(Color::LightGreen),
            ),
        ]),
        Line::from(vec![Span::raw(
            "Use Tab to shift focus, Enter to start the highlighted upgrade.",
        )]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let instructions = Paragraph::new(Line::from(vec![
        Span::raw("Hotkeys: "),
        Span::styled("[J/K]", Style::default().fg(Color::Yellow)),
        Span::raw(" navigate  •  "),
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" switch focus  •  "),
        Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
        Span::raw(" upgrade  •  "),
        Span::styled("[P]", Style::default().fg(Color::Yellow)),
        Span::raw(" storage policy  •  "),
        Span::styled("[Q]", Style::default().fg(Color::Yellow)),
        Span::raw(" save & quit"),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(instructions, area);
}

/// K/M suffixes past a thousand, floored below it.
pub fn format_amount(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.floor() as u64)
    }
}

pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_floor_below_a_thousand() {
        assert_eq!(format_amount(999.9), "999");
        assert_eq!(format_amount(1_200.0), "1.2K");
        assert_eq!(format_amount(2_500_000.0), "2.5M");
    }

    #[test]
    fn durations_split_into_units() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(150), "2m 30s");
        assert_eq!(format_duration(11_100), "3h 5m");
    }
}
