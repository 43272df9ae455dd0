use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::{
    app::App,
    judge::Tier,
    session::SessionOutcome,
    ui::{
        bold,
        charting::{compute_chart_params, format_label, offset_points},
        dim, italic, tier_color, HORIZONTAL_MARGIN, VERTICAL_MARGIN,
    },
    util,
};

fn outcome_title(outcome: SessionOutcome) -> Span<'static> {
    match outcome {
        SessionOutcome::Cleared => Span::styled("Cleared!", bold().fg(Color::Green)),
        SessionOutcome::Failed => Span::styled("Failed", bold().fg(Color::Red)),
        other => Span::styled(other.to_string(), bold()),
    }
}

pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(snapshot) = app.snapshot.as_ref() else {
        return;
    };
    let offsets = app
        .session
        .as_ref()
        .map(|s| s.hit_offsets().to_vec())
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // outcome + map
            Constraint::Length(1), // score line
            Constraint::Length(1), // tier counts
            Constraint::Length(1), // offsets summary
            Constraint::Min(1),    // chart
            Constraint::Length(1), // legend
        ])
        .split(area);

    let map_title = app
        .beatmap
        .as_ref()
        .map(|m| m.display_title())
        .unwrap_or_default();
    Paragraph::new(Line::from(vec![
        outcome_title(snapshot.outcome),
        Span::styled(format!("   {map_title}"), dim()),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "Score {}   Max combo {}   {:.2}% acc",
            snapshot.score, snapshot.max_combo, snapshot.accuracy
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let mut counts = Vec::new();
    for tier in Tier::ALL {
        if !counts.is_empty() {
            counts.push(Span::raw("   "));
        }
        counts.push(Span::styled(
            format!("{} {}", tier, snapshot.counts.get(tier)),
            Style::default().fg(tier_color(tier)),
        ));
    }
    Paragraph::new(Line::from(counts))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let summary = match util::offset_stats(&offsets) {
        Some((mean, sd)) => format!(
            "hit offsets: mean {mean:+.1}ms   sd {sd:.1}ms   UR {:.0}",
            sd * 10.0
        ),
        None => "no hits".to_string(),
    };
    Paragraph::new(Span::styled(summary, italic()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if !offsets.is_empty() {
        render_offset_chart(&offsets, chunks[4], buf);
    }

    Paragraph::new(Span::styled(
        "(r)etry / (m)aps / (esc) menu / (q)uit",
        italic(),
    ))
    .render(chunks[5], buf);
}

fn render_offset_chart(offsets: &[i64], area: Rect, buf: &mut Buffer) {
    let points = offset_points(offsets);
    let (x_bound, y_bound) = compute_chart_params(&points);
    let zero_line = [(1.0, 0.0), (x_bound, 0.0)];

    let datasets = vec![
        Dataset::default()
            .marker(Marker::Dot)
            .style(dim())
            .graph_type(GraphType::Line)
            .data(&zero_line),
        Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Scatter)
            .data(&points),
    ];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("hit")
                .bounds([1.0, x_bound])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(format_label(x_bound), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .bounds([-y_bound, y_bound])
                .labels(vec![
                    Span::styled(format_label(-y_bound), bold()),
                    Span::styled("0", bold()),
                    Span::styled(format_label(y_bound), bold()),
                ]),
        )
        .render(area, buf);
}
