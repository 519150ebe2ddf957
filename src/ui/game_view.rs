use std::rc::Rc;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Rectangle},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::hand::SimulatedHand;
use crate::game::layout::Point;
use crate::game::{Cell, DiscKind, GameOutcome, GameSnapshot, Phase, Player, SoundCue};

fn split(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(4), // Controls
        ])
        .split(area)
}

fn board_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title("Board")
}

/// Terminal cells the board canvas draws into, for a frame of `area`.
pub fn canvas_area(area: Rect) -> Rect {
    board_block().inner(split(area)[1])
}

pub fn render(
    frame: &mut Frame,
    snapshot: &GameSnapshot,
    hand: &SimulatedHand,
    cue: Option<SoundCue>,
    message: &Option<String>,
) {
    let chunks = split(frame.area());

    render_header(frame, snapshot, chunks[0]);
    match snapshot.phase {
        Phase::Landing => render_landing(frame, snapshot, chunks[1]),
        Phase::Playing => render_board(frame, snapshot, hand, chunks[1]),
    }
    render_status(frame, snapshot, hand, cue, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    let (r, g, b) = player.rgb();
    Color::Rgb(r, g, b)
}

fn render_header(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let line = match (snapshot.phase, snapshot.outcome) {
        (Phase::Landing, _) => Line::from("Show a thumbs-up to start"),
        (Phase::Playing, Some(GameOutcome::Winner(player))) => Line::from(Span::styled(
            format!("{} wins!", player.name()),
            Style::default()
                .fg(player_color(player))
                .add_modifier(Modifier::BOLD),
        )),
        (Phase::Playing, Some(GameOutcome::Draw)) => Line::from("Draw"),
        (Phase::Playing, None) => {
            let player = snapshot.current_player;
            let mut spans = vec![
                Span::styled(
                    format!("{}'s turn", player.name()),
                    Style::default()
                        .fg(player_color(player))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "  |  Bombs: {} {}  {} {}",
                    Player::One.name(),
                    snapshot.bombs_for(Player::One),
                    Player::Two.name(),
                    snapshot.bombs_for(Player::Two),
                )),
            ];
            if snapshot.bomb_selected {
                spans.push(Span::styled(
                    "  |  BOMB ARMED",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            }
            Line::from(spans)
        }
    };

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Gesture Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_landing(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let block = board_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let intro = Paragraph::new(vec![
        Line::from("Four in a row, played with your hand."),
        Line::from("Hold a thumbs-up (t) to begin."),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(intro, rows[1]);

    let progress = f64::from(snapshot.landing_progress).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Starting"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    frame.render_widget(gauge, rows[2]);
}

fn render_board(frame: &mut Frame, snapshot: &GameSnapshot, hand: &SimulatedHand, area: Rect) {
    let height = f64::from(snapshot.viewport.height);
    // Screen y grows downward, canvas y grows upward.
    let to_canvas = move |p: Point| (f64::from(p.x), height - f64::from(p.y));

    let canvas = Canvas::default()
        .block(board_block())
        .marker(Marker::Braille)
        .x_bounds([0.0, f64::from(snapshot.viewport.width)])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let cell = f64::from(snapshot.cell_size);
            let radius = cell * 0.4;
            let (left, top) = to_canvas(snapshot.board_origin);
            let board_height = cell * snapshot.rows as f64;
            ctx.draw(&Rectangle {
                x: left,
                y: top - board_height,
                width: cell * snapshot.cols as f64,
                height: board_height,
                color: Color::Blue,
            });

            for row in 0..snapshot.rows {
                for col in 0..snapshot.cols {
                    let x = left + (col as f64 + 0.5) * cell;
                    let y = top - (row as f64 + 0.5) * cell;
                    match snapshot.cell(row, col) {
                        Some(Cell::Occupied(disc)) => {
                            draw_disc(ctx, (x, y), radius, disc.player, disc.kind, disc.rotation)
                        }
                        _ => ctx.draw(&Circle {
                            x,
                            y,
                            radius,
                            color: Color::DarkGray,
                        }),
                    }
                    if snapshot.is_winning(row, col) {
                        ctx.draw(&Circle {
                            x,
                            y,
                            radius: radius * 1.15,
                            color: Color::White,
                        });
                    }
                }
            }

            for disc in &snapshot.falling {
                let center = to_canvas(disc.position);
                draw_disc(ctx, center, f64::from(disc.radius), disc.player, disc.kind, disc.rotation);
            }

            if let Some(preview) = &snapshot.preview {
                let (x, y) = to_canvas(preview.position);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: f64::from(preview.radius),
                    color: Color::Gray,
                });
            }

            if let Some(active) = &snapshot.active {
                let center = to_canvas(active.position);
                draw_disc(ctx, center, f64::from(active.radius), active.player, active.kind, 0.0);
                if active.grabbed {
                    ctx.draw(&Circle {
                        x: center.0,
                        y: center.1,
                        radius: f64::from(active.radius) * 1.2,
                        color: Color::White,
                    });
                }
            }

            for explosion in &snapshot.explosions {
                let (x, y) = to_canvas(explosion.center);
                let color = if explosion.alpha > 0.66 {
                    Color::Yellow
                } else if explosion.alpha > 0.33 {
                    Color::LightRed
                } else {
                    Color::Red
                };
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: f64::from(explosion.radius),
                    color,
                });
            }

            if hand.visible {
                let (x, y) = to_canvas(hand.palm);
                let arm = cell * 0.15;
                let color = if hand.gesture.is_some() {
                    Color::White
                } else {
                    Color::Gray
                };
                ctx.draw(&CanvasLine::new(x - arm, y, x + arm, y, color));
                ctx.draw(&CanvasLine::new(x, y - arm, x, y + arm, color));
            }
        });

    frame.render_widget(canvas, area);
}

/// A disc outline with a tick showing its rotation; bombs get a red core.
fn draw_disc(
    ctx: &mut Context<'_>,
    (x, y): (f64, f64),
    radius: f64,
    player: Player,
    kind: DiscKind,
    rotation: f32,
) {
    let color = player_color(player);
    ctx.draw(&Circle { x, y, radius, color });
    let angle = f64::from(rotation);
    ctx.draw(&CanvasLine::new(
        x,
        y,
        x + radius * angle.cos(),
        y + radius * angle.sin(),
        color,
    ));
    if kind == DiscKind::Bomb {
        ctx.draw(&Circle {
            x,
            y,
            radius: radius * 0.4,
            color: Color::Red,
        });
    }
}

fn render_status(
    frame: &mut Frame,
    snapshot: &GameSnapshot,
    hand: &SimulatedHand,
    cue: Option<SoundCue>,
    message: &Option<String>,
    area: Rect,
) {
    let mut spans = Vec::new();
    if let Some(message) = message {
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(secs) = snapshot.countdown_secs {
        spans.push(Span::raw(format!("  Next game in {secs}s")));
    }
    if snapshot.input_suspended {
        spans.push(Span::styled("  Boom!", Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(
        format!("  Hand: {}", hand.label()),
        Style::default().fg(Color::Cyan),
    ));
    if let Some(cue) = cue {
        spans.push(Span::styled(
            format!("  \u{266a} {}", cue.name()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(status, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("Arrows: Move hand  |  G: Jump to disc  |  F: Fist (grab)  |  Space: Open palm (drop)");
    let line2 = Line::from("V: Victory (bomb)  |  T: Thumb up  |  N: No gesture  |  H: Hide hand  |  Q: Quit");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
