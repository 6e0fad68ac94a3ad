use evaldash_core::chart::{BarChartSpec, ChartSpec, RadarChartSpec, ScoreBand, ScoreTier};
use evaldash_core::display::{format_bytes, format_percent, format_timestamp};
use evaldash_core::model::{max_score, min_score, EvaluationResult, IndicatorCategory, TaskStatus};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;

use super::app::{field_value, DashApp, FormField, FormKind, InputMode, Notice, View};

pub fn draw(f: &mut Frame<'_>, app: &DashApp) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    match app.view {
        View::Tasks => draw_tasks(f, chunks[1], app),
        View::Analysis => draw_analysis(f, chunks[1], app),
        View::System => draw_system(f, chunks[1], app),
    }
    draw_footer(f, chunks[2], app);

    if app.input_mode == InputMode::Form {
        draw_form_overlay(f, size, app);
    }
    if let Some(action) = app.forms.pending_action() {
        draw_confirm_overlay(f, size, &action.prompt());
    }
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let tab = |label: &str, view: View| {
        if app.view == view {
            Span::styled(
                format!(" {label} "),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
        }
    };
    let line = Line::from(vec![
        Span::styled("evaldash", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        tab("[1] Tasks", View::Tasks),
        tab("[2] Analysis", View::Analysis),
        tab("[3] System", View::System),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Pending => Color::Gray,
        TaskStatus::Running => Color::Cyan,
        TaskStatus::Completed => Color::Green,
        TaskStatus::Failed => Color::Red,
        TaskStatus::Cancelled => Color::DarkGray,
    };
    Style::default().fg(color)
}

fn draw_tasks(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let store = app.store.lock();
    let header = Row::new(["ID", "Name", "Status", "Progress", "Samples", "Updated"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = store
        .tasks
        .iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.id.to_string()),
                Cell::from(task.name.clone()),
                Cell::from(Span::styled(task.status.label(), status_style(task.status))),
                Cell::from(task.progress.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format!("{}/{}", task.processed_samples, task.total_samples)),
                Cell::from(format_timestamp(task.updated_at.as_deref().unwrap_or(""))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Tasks"))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !store.tasks.is_empty() {
        state.select(Some(app.selected.min(store.tasks.len() - 1)));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_analysis(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let store = app.store.lock();
    let Some(result) = store.selected_result.as_ref() else {
        let hint = Paragraph::new("No result selected. Pick a completed task and press Enter.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Analysis"));
        f.render_widget(hint, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_result_summary(f, chunks[0], result);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_radar_panel(f, panels[0], app);
    draw_bar_panel(f, panels[1], app);
}

fn draw_result_summary(f: &mut Frame<'_>, area: Rect, result: &EvaluationResult) {
    let mut parts = Vec::new();
    if let Some(overall) = result.overall_score {
        let tier = ScoreTier::from_score(overall);
        parts.push(Span::raw("Overall: "));
        parts.push(Span::styled(
            format!("{} ({})", format_percent(overall), tier.label()),
            band_style(tier.band()).add_modifier(Modifier::BOLD),
        ));
        parts.push(Span::raw("  "));
    }
    parts.push(Span::raw(format!(
        "best {}  worst {}  indicators {}",
        format_percent(max_score(&result.result_items)),
        format_percent(min_score(&result.result_items)),
        result.result_items.len()
    )));
    let summary = Paragraph::new(Line::from(parts)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Result #{} (task {})", result.id, result.task_id)),
    );
    f.render_widget(summary, area);
}

fn band_style(band: ScoreBand) -> Style {
    let color = match band {
        ScoreBand::Success => Color::Green,
        ScoreBand::Warning => Color::Yellow,
        ScoreBand::Danger => Color::Red,
    };
    Style::default().fg(color)
}

fn draw_radar_panel(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let block = Block::default().borders(Borders::ALL).title("Radar");
    let Some(ChartSpec::Radar(spec)) = app.charts.radar().instance().map(|i| i.spec()) else {
        f.render_widget(
            Paragraph::new("preparing charts...").block(block),
            area,
        );
        return;
    };
    f.render_widget(Paragraph::new(radar_lines(spec)).block(block).wrap(Wrap { trim: false }), area);
}

/// Textual projection of the radar descriptor: one row per axis, one
/// percentage column per series.
fn radar_lines(spec: &RadarChartSpec) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if spec.datasets.len() > 1 {
        let names = spec
            .datasets
            .iter()
            .map(|d| d.label.clone())
            .collect::<Vec<_>>()
            .join("  /  ");
        lines.push(Line::from(Span::styled(
            names,
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    for (axis, label) in spec.labels.iter().enumerate() {
        let mut parts = vec![Span::raw(format!("{label:<24} "))];
        for series in &spec.datasets {
            let Some(value) = series.values.get(axis) else {
                continue;
            };
            let tier = ScoreTier::from_score(*value);
            parts.push(Span::styled(
                format!("{:>7} ", format_percent(*value)),
                band_style(tier.band()),
            ));
        }
        lines.push(Line::from(parts));
    }
    if lines.is_empty() {
        lines.push(Line::from("no radar data"));
    }
    lines
}

fn draw_bar_panel(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let block = Block::default().borders(Borders::ALL).title("Scores");
    let Some(ChartSpec::Bar(spec)) = app.charts.bar().instance().map(|i| i.spec()) else {
        f.render_widget(
            Paragraph::new("preparing charts...").block(block),
            area,
        );
        return;
    };
    f.render_widget(bar_chart(spec).block(block), area);
}

fn bar_chart(spec: &BarChartSpec) -> BarChart<'static> {
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|bar| {
            Bar::default()
                .value(bar.value.round() as u64)
                .text_value(format!("{:.1}", bar.value))
                .label(Line::from(bar.label.clone()))
                .style(band_style(bar.band))
        })
        .collect();
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1)
        .max(spec.axis_max.round() as u64)
}

fn draw_system(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let store = app.store.lock();
    let block = Block::default().borders(Borders::ALL).title("System");
    let Some(stats) = store.system_stats.as_ref() else {
        f.render_widget(
            Paragraph::new("No statistics loaded. Press r to refresh.").block(block),
            area,
        );
        return;
    };
    let lines = vec![
        Line::from(format!(
            "CPU     {:.1}%{}",
            stats.cpu.percent,
            stats
                .cpu
                .count
                .map(|c| format!("  ({c} cores)"))
                .unwrap_or_default()
        )),
        Line::from(format!(
            "Memory  {} / {}  ({:.1}%)",
            format_bytes(stats.memory.used),
            format_bytes(stats.memory.total),
            stats.memory.percent
        )),
        Line::from(format!(
            "Disk    {} used, {} free of {}",
            format_bytes(stats.disk.used),
            format_bytes(stats.disk.free),
            format_bytes(stats.disk.total)
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &DashApp) {
    let hint = match app.input_mode {
        InputMode::Form => {
            "Tab: next field  Space: toggle indicator  Enter: save  Esc: cancel".to_string()
        }
        InputMode::Normal => match app.view {
            View::Tasks => {
                "j/k: move  Enter: result  n: new  e: edit  s: start  d: delete  r: refresh  q: quit"
                    .to_string()
            }
            View::Analysis => "1: back to tasks  q: quit".to_string(),
            View::System => "r: refresh  1: tasks  q: quit".to_string(),
        },
    };
    let mut lines = vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(notice) = &app.notice {
        let span = match notice {
            Notice::Info(msg) => Span::styled(msg.clone(), Style::default().fg(Color::Green)),
            Notice::Error(msg) => Span::styled(msg.clone(), Style::default().fg(Color::Red)),
        };
        lines.insert(0, Line::from(span));
    }
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

fn draw_form_overlay(f: &mut Frame<'_>, size: Rect, app: &DashApp) {
    let (title, draft) = match app.form_kind {
        Some(FormKind::Create) => ("New task".to_string(), app.forms.create_draft()),
        Some(FormKind::Edit) => match app.forms.edit_draft() {
            Some((id, draft)) => (format!("Edit task {id}"), Some(draft)),
            None => return,
        },
        None => return,
    };
    let Some(draft) = draft else {
        return;
    };

    let area = centered_rect(70, 80, size);
    f.render_widget(Clear, area);

    let mut lines = Vec::new();
    for field in [
        FormField::Name,
        FormField::Description,
        FormField::ApiEndpoint,
        FormField::ApiKey,
        FormField::DatasetType,
        FormField::DatasetPath,
    ] {
        let focused = app.form_field == field;
        let marker = if focused { "▸ " } else { "  " };
        let value = match field {
            FormField::ApiKey => {
                let raw = field_value(draft, field).unwrap_or_default();
                if raw.is_empty() && app.form_kind == Some(FormKind::Edit) {
                    "(unchanged)".to_string()
                } else {
                    "•".repeat(raw.chars().count())
                }
            }
            _ => field_value(draft, field).unwrap_or_default().to_string(),
        };
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<16}", field.label()), style),
            Span::raw(value),
        ]));
    }

    lines.push(Line::from(""));
    let indicators_focused = app.form_field == FormField::Indicators;
    let marker = if indicators_focused { "▸ " } else { "  " };
    lines.push(Line::from(Span::styled(
        format!("{marker}Indicators"),
        if indicators_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        },
    )));

    let store = app.store.lock();
    let mut position = 0usize;
    for category in IndicatorCategory::ALL {
        let members = store.indicators_in(category);
        if members.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            format!("    {}", category.label()),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for indicator in members {
            let checked = draft.selected_indicators.contains(&indicator.id);
            let cursor = indicators_focused && position == app.indicator_cursor;
            let weight = draft
                .indicator_weights
                .get(&indicator.id.to_string())
                .map(|w| format!("  w={w}"))
                .unwrap_or_default();
            let text = format!(
                "    {} [{}] {}{}",
                if cursor { ">" } else { " " },
                if checked { "x" } else { " " },
                indicator.display_name,
                weight
            );
            let style = if cursor {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(text, style)));
            position += 1;
        }
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(form, area);
}

fn draw_confirm_overlay(f: &mut Frame<'_>, size: Rect, prompt: &str) {
    let area = centered_rect(50, 20, size);
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[y] confirm    [n] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    f.render_widget(modal, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
