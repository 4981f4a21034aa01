use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Context},
    },
};

use super::surface::{Scene, draw_board};
use crate::game::{GameConfig, GameState, RunState};

pub struct Renderer {
    cell_size: u32,
    scene: Scene,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        let side = f64::from(config.canvas_size());
        Self {
            cell_size: config.cell_size,
            scene: Scene::new(side, side),
        }
    }

    /// Repaint the board from the current state
    pub fn redraw(&mut self, state: &GameState) {
        draw_board(&mut self.scene, state, self.cell_size);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Draw the whole screen. `new_high_score` is whether the game that just
    /// ended raised the stored best.
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        high_score: u32,
        new_high_score: bool,
    ) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Board
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

        frame.render_widget(self.render_stats(state, high_score), chunks[0]);

        let board_area = self.board_area(chunks[1], state.grid_count);
        match state.run_state {
            RunState::NotStarted => {
                frame.render_widget(self.render_start_panel(), board_area);
            }
            RunState::Running => {
                frame.render_widget(self.render_board(), board_area);
            }
            RunState::GameOver => {
                frame.render_widget(self.render_board(), board_area);
                let popup = centered(board_area, 36, 9);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_game_over(state, new_high_score), popup);
            }
        }

        frame.render_widget(self.render_controls(state.run_state), chunks[2]);
    }

    /// Two terminal columns per row keeps cells roughly square
    fn board_area(&self, area: Rect, grid_count: usize) -> Rect {
        let (width, height) = board_size(grid_count);
        centered(area, width, height)
    }

    fn render_board(&self) -> Canvas<'_, impl Fn(&mut Context) + '_> {
        let scene = &self.scene;
        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::Braille)
            .background_color(scene.background().unwrap_or(Color::Reset))
            .x_bounds([0.0, scene.width()])
            .y_bounds([0.0, scene.height()])
            .paint(move |ctx| ctx.draw(scene))
    }

    fn render_stats(&self, state: &GameState, high_score: u32) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(high_score.to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start_panel(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_game_over(&self, state: &GameState, new_high_score: bool) -> Paragraph<'_> {
        let cause = state
            .collision
            .map(|collision| format!("The snake {}", collision.describe()))
            .unwrap_or_default();

        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if new_high_score {
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, run_state: RunState) -> Paragraph<'_> {
        let action = match run_state {
            RunState::NotStarted => " | Enter to start | ",
            RunState::Running => " to move | ",
            RunState::GameOver => " | R to restart | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(action),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// Terminal columns and rows the bordered board needs
fn board_size(grid_count: usize) -> (u16, u16) {
    let cells = u16::try_from(grid_count).unwrap_or(u16::MAX);
    (
        cells.saturating_mul(2).saturating_add(2),
        cells.saturating_add(2),
    )
}

/// Rect of at most width x height centered in area
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
