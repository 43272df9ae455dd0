use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context},
        Block, Borders, Gauge, Paragraph, Widget,
    },
};

use crate::{
    app::App,
    beatmap::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH},
    feedback::Feedback,
    judge::CIRCLE_RADIUS,
    snapshot::SessionSnapshot,
    ui::{bold, dim, italic, tier_color},
};

const PARTICLE_COLORS: [Color; 6] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightYellow,
    Color::LightMagenta,
    Color::White,
];

/// Canvas y grows upwards, playfield y grows downwards.
fn flip(y: f64) -> f64 {
    PLAYFIELD_HEIGHT - y
}

fn health_color(ratio: f64) -> Color {
    if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let Some(snapshot) = app.snapshot.as_ref() else {
        return;
    };

    render_hud(snapshot, chunks[0], buf);

    let ratio = snapshot.health_ratio();
    Gauge::default()
        .gauge_style(Style::default().fg(health_color(ratio)).bg(Color::Black))
        .ratio(ratio)
        .label(format!("HP {}/{}", snapshot.health, snapshot.max_health))
        .render(chunks[1], buf);

    let title = app
        .beatmap
        .as_ref()
        .map(|m| format!(" {} ", m.display_title()))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, bold()));
    let inner = block.inner(chunks[2]);
    block.render(chunks[2], buf);

    app.playfield_area.set(inner);
    if inner.width > 0 && inner.height > 0 {
        render_canvas(app, snapshot, inner, buf);
    }

    Paragraph::new(Span::styled(
        "(mouse / z / x) click / (esc) pause / (q)uit",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_hud(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let combo_style = if snapshot.combo > 0 {
        bold().fg(Color::Magenta)
    } else {
        dim()
    };

    let line = Line::from(vec![
        Span::styled(format!("Score {}", snapshot.score), bold()),
        Span::raw("   "),
        Span::styled(format!("Combo {}x", snapshot.combo), combo_style),
        Span::raw("   "),
        Span::styled(format!("{:.2}%", snapshot.accuracy), bold()),
        Span::raw("   "),
        Span::styled(format!("{:.1}s", snapshot.now as f64 / 1000.0), dim()),
    ]);

    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_canvas(app: &App, snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let now = snapshot.now;
    let show_cursor = app.settings.custom_cursor;
    let cursor = app.cursor;
    let feedback = &app.feedback;

    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, PLAYFIELD_WIDTH])
        .y_bounds([0.0, PLAYFIELD_HEIGHT])
        .paint(|ctx| {
            // later targets underneath earlier ones
            for target in snapshot.visible_targets().rev() {
                let (x, y) = (target.position.x, flip(target.position.y));
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: CIRCLE_RADIUS * target.approach_ratio,
                    color: Color::DarkGray,
                });
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: CIRCLE_RADIUS,
                    color: Color::LightBlue,
                });
                ctx.print(
                    x,
                    y,
                    Span::styled(
                        target.sequence_number.to_string(),
                        bold().fg(Color::White),
                    ),
                );
            }

            if show_cursor {
                ctx.print(
                    cursor.x,
                    flip(cursor.y),
                    Span::styled("+", bold().fg(Color::LightRed)),
                );
            }

            ctx.layer();
            paint_feedback(ctx, feedback, now);
        })
        .render(area, buf);
}

fn paint_feedback(ctx: &mut Context, feedback: &Feedback, now: i64) {
    for particle in &feedback.particles {
        let color = PARTICLE_COLORS[particle.color_index % PARTICLE_COLORS.len()];
        let style = if particle.alpha() > 0.5 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        ctx.print(
            particle.x,
            flip(particle.y),
            Span::styled(particle.symbol.to_string(), style),
        );
    }

    for popup in &feedback.popups {
        let mut style = Style::default().fg(tier_color(popup.tier));
        style = if popup.alpha(now) > 0.5 {
            style.add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };
        ctx.print(
            popup.position.x,
            flip(popup.position.y) + popup.rise(now),
            Span::styled(popup.text(), style),
        );
    }
}
