use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use super::scheduler::TickScheduler;
use crate::game::{GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::storage::{HighScore, KeyValueStore};

pub struct HumanMode<S> {
    engine: GameEngine,
    state: GameState,
    high_score: HighScore<S>,
    /// Whether the last finished game raised the best score
    new_high_score: bool,
    scheduler: TickScheduler,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: KeyValueStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        let high_score = HighScore::load(store);
        info!("loaded high score {}", high_score.best());

        let scheduler = TickScheduler::new(config.tick_interval());
        let mut renderer = Renderer::new(&config);
        let mut engine = GameEngine::new(config);
        let state = engine.idle();
        renderer.redraw(&state);

        Self {
            engine,
            state,
            high_score,
            new_high_score: false,
            scheduler,
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        loop {
            terminal
                .draw(|frame| {
                    self.renderer.render(
                        frame,
                        &self.state,
                        self.high_score.best(),
                        self.new_high_score,
                    );
                })
                .context("Failed to draw frame")?;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, pending forever while no game runs
                _ = self.scheduler.tick() => {
                    self.on_tick();
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                if self.engine.set_direction(&mut self.state, direction) {
                    debug!("turn {:?} queued", direction);
                }
            }
            // Both buttons are hidden while a game runs
            KeyAction::Start | KeyAction::Restart => {
                if !self.state.is_running() {
                    self.start_game();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn start_game(&mut self) {
        self.state = self.engine.start();
        self.new_high_score = false;
        self.scheduler.start();
        self.renderer.redraw(&self.state);
    }

    fn on_tick(&mut self) {
        let result = self.engine.tick(&mut self.state);

        if result.is_game_over() {
            self.on_game_over();
            return;
        }

        self.renderer.redraw(&self.state);
    }

    fn on_game_over(&mut self) {
        self.scheduler.stop();
        self.new_high_score = self.high_score.record(self.state.score);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, RunState};
    use crate::storage::{HIGH_SCORE_KEY, MemoryStore};
    use anyhow::bail;

    /// Store whose every read and write fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            bail!("storage unavailable")
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            bail!("storage unavailable")
        }
    }

    fn mode_with_best(best: Option<&str>) -> HumanMode<MemoryStore> {
        let mut store = MemoryStore::new();
        if let Some(best) = best {
            store.set(HIGH_SCORE_KEY, best).unwrap();
        }
        HumanMode::new(GameConfig::default(), store)
    }

    /// Tick until the snake leaves the grid, with food out of its way
    fn run_into_wall<S: KeyValueStore>(mode: &mut HumanMode<S>) {
        for _ in 0..mode.state.grid_count + 1 {
            mode.state.food = Position::new(0, 19);
            mode.on_tick();
        }
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = mode_with_best(None);
        assert_eq!(mode.state.run_state, RunState::NotStarted);
        assert_eq!(mode.high_score.best(), 0);
        assert!(!mode.scheduler.is_running());
    }

    #[tokio::test]
    async fn test_start_key_begins_game() {
        let mut mode = mode_with_best(None);
        mode.handle_action(KeyAction::Start);

        assert!(mode.state.is_running());
        assert_eq!(mode.state.score, 0);
        assert!(mode.scheduler.is_running());
    }

    #[tokio::test]
    async fn test_turn_ignored_before_start() {
        let mut mode = mode_with_best(None);
        mode.handle_action(KeyAction::Turn(Direction::Up));
        assert_eq!(mode.state.pending_direction, None);
    }

    #[tokio::test]
    async fn test_restart_ignored_while_running() {
        let mut mode = mode_with_best(None);
        mode.handle_action(KeyAction::Start);
        mode.state.food = Position::new(6, 5);
        mode.on_tick();
        assert_eq!(mode.state.score, 10);

        mode.handle_action(KeyAction::Restart);
        assert_eq!(mode.state.score, 10);
    }

    #[tokio::test]
    async fn test_wall_collision_stops_scheduler_and_records_score() {
        let mut mode = mode_with_best(Some("5"));
        mode.handle_action(KeyAction::Start);
        mode.state.score = 30;

        run_into_wall(&mut mode);

        assert_eq!(mode.state.run_state, RunState::GameOver);
        assert!(!mode.scheduler.is_running());
        assert_eq!(mode.high_score.best(), 30);
        assert!(mode.new_high_score);
        assert_eq!(
            mode.high_score.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("30")
        );
    }

    #[tokio::test]
    async fn test_lower_score_keeps_stored_best() {
        let mut mode = mode_with_best(Some("100"));
        mode.handle_action(KeyAction::Start);
        mode.state.score = 30;

        run_into_wall(&mut mode);

        assert_eq!(mode.high_score.best(), 100);
        assert!(!mode.new_high_score);
        assert_eq!(
            mode.high_score.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("100")
        );
    }

    #[tokio::test]
    async fn test_tying_the_best_is_not_a_new_high_score() {
        let mut mode = mode_with_best(Some("40"));
        mode.handle_action(KeyAction::Start);
        mode.state.score = 40;

        run_into_wall(&mut mode);

        assert_eq!(mode.state.run_state, RunState::GameOver);
        assert!(!mode.new_high_score);
        assert_eq!(mode.high_score.best(), 40);
    }

    #[tokio::test]
    async fn test_failing_store_does_not_break_game_over() {
        let mut mode = HumanMode::new(GameConfig::default(), BrokenStore);
        assert_eq!(mode.high_score.best(), 0);

        mode.handle_action(KeyAction::Start);
        mode.state.score = 50;
        run_into_wall(&mut mode);

        assert_eq!(mode.state.run_state, RunState::GameOver);
        assert!(!mode.scheduler.is_running());
        assert_eq!(mode.high_score.best(), 50);
        assert!(mode.new_high_score);

        mode.handle_action(KeyAction::Restart);
        assert!(mode.state.is_running());
        assert!(!mode.new_high_score);
    }

    #[tokio::test]
    async fn test_restart_after_game_over() {
        let mut mode = mode_with_best(None);
        mode.handle_action(KeyAction::Start);
        mode.state.score = 20;
        run_into_wall(&mut mode);

        mode.handle_action(KeyAction::Restart);

        assert!(mode.state.is_running());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.collision, None);
        assert!(mode.scheduler.is_running());
        assert_eq!(mode.high_score.best(), 20);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut mode = mode_with_best(None);
        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
