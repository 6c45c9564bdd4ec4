use log::error;
use std::time::Instant;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::confetti::ConfettiLayer;
use crate::components::wheel::{WheelWidget, wheel_area};
use crate::ui::layout::LayoutAreas;

const MODAL_WIDTH: u16 = 44;
const MODAL_HEIGHT: u16 = 9;
const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let now = Instant::now();

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }

        if app.state.loading {
            draw_placeholder(f, layout.wheel, "Loading participants…");
        } else if !app.state.participants.is_empty() {
            draw_pointer(f, layout.pointer);
            f.render_widget(
                WheelWidget {
                    participants: &app.state.participants,
                    rotation: app.wheel_angle(now),
                },
                wheel_area(layout.wheel),
            );
            draw_spin_control(f, layout.control, app);

            if app.state.spin.modal_visible {
                draw_winner_modal(f, f.area(), app);
            }
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        f.render_widget(ConfettiLayer { confetti: &app.state.confetti, now }, f.area());
        draw_loading_spinner(f, f.area(), app);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::Magenta);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [title, count] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("🎉 Lucky Draw 🎉")
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        title,
    );
    f.render_widget(
        Paragraph::new(format!(
            "Total Participants: {}",
            app.state.participants.len()
        ))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center),
        count,
    );
}

fn draw_pointer(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new("▼")
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_spin_control(f: &mut Frame, area: Rect, app: &App) {
    let line = if !app.can_spin() {
        Line::from(Span::styled(
            "[ Spinning... ]",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                "[ SPIN 🎡 ]",
                Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  space/enter", Style::default().fg(Color::DarkGray)),
        ])
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_winner_modal(f: &mut Frame, area: Rect, app: &App) {
    let Some(winner) = app.winner() else {
        return;
    };
    let modal = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    f.render_widget(Clear, modal);

    let block = default_border(Color::Yellow)
        .border_type(BorderType::Double)
        .title(" 🎊 Congratulations! 🎊 ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let drawn_at = app
        .state
        .drawn_at
        .map(|t| format!("drawn at {}", t.format("%H:%M:%S")))
        .unwrap_or_default();

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            winner.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(drawn_at, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled("[Esc] Close", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default().block(default_border(Color::DarkGray).title(" Logs ")),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

/// Only drawn while the load is in flight. A failed load leaves no trace here.
fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App) {
    if !app.state.loading {
        return;
    }
    let spinner_char = SPINNER_CHARS[app.state.spinner_frame % SPINNER_CHARS.len()];
    let spinner = Paragraph::new(spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::White));
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
