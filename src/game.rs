use std::io::Write;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::config::GameConfig;
use crate::engine::{Engine, TickReport};
use crate::error::Result;
use crate::rendering::{GameGrid, OutputTarget, Viewport};
use crate::terminal_io::InputSource;

pub struct Game {
    engine: Engine,
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    input: InputSource,
    headless: bool,
    max_frames: Option<u64>,
    paused: bool,
    frame_count: u64,
    totals: TickReport,
}

impl Game {
    pub fn new(
        config: GameConfig,
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        input: InputSource,
        headless: bool,
        max_frames: Option<u64>,
    ) -> Self {
        Game {
            engine: Engine::new(config),
            terminal_width,
            terminal_height,
            stdout_target,
            input,
            headless,
            max_frames,
            paused: false,
            frame_count: 0,
            totals: TickReport::default(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn totals(&self) -> TickReport {
        self.totals
    }

    /// Runs until quit is requested or the frame limit is reached.
    pub fn run(&mut self) -> Result<()> {
        let frame_dt = self.engine.config().frame_dt();
        let max_frame_dt = self.engine.config().max_frame_dt;
        let frame_budget = Duration::from_secs_f64(frame_dt);
        let viewport = Viewport::new(self.engine.play_area(), self.terminal_width, self.terminal_height);
        let mut game_grid = GameGrid::new(self.terminal_width, self.terminal_height);

        self.engine.start();
        info!("Game started ({}x{} cells, headless: {}).", self.terminal_width, self.terminal_height, self.headless);

        let mut last_frame = Instant::now();
        while self.max_frames.is_none_or(|max| self.frame_count < max) {
            let input = self.input.collect(self.frame_count, frame_budget)?;
            if input.quit {
                info!("Quit requested at frame {}.", self.frame_count);
                break;
            }
            if input.pause_toggled {
                self.paused = !self.paused;
                info!("{} at frame {}.", if self.paused { "Paused" } else { "Resumed" }, self.frame_count);
            }

            let now = Instant::now();
            let dt = if self.headless {
                frame_dt
            } else {
                now.duration_since(last_frame).as_secs_f64().min(max_frame_dt)
            };
            last_frame = now;

            if !self.paused {
                let report = self.engine.tick(dt, input.controls);
                if !report.is_quiet() {
                    debug!("Frame {}: {:?}", self.frame_count, report);
                }
                self.totals.accumulate(&report);
            }

            self.render(&mut game_grid, &viewport)?;
            self.frame_count += 1;
        }

        info!("Game ended after {} frames: {:?}", self.frame_count, self.totals);
        Ok(())
    }

    fn render(&mut self, game_grid: &mut GameGrid, viewport: &Viewport) -> Result<()> {
        game_grid.clear();
        for view in self.engine.views() {
            game_grid.draw_entity(viewport, &view);
        }
        game_grid.draw_hud(&self.engine.hud());
        game_grid.draw_help();
        if self.paused {
            game_grid.draw_banner("PAUSED");
        }

        game_grid.render(&mut self.stdout_target).map_err(|e| { error!("Failed to render frame: {}", e); e })?;
        self.stdout_target.flush().map_err(|e| { error!("Failed to flush frame: {}", e); e })?;

        if self.headless {
            if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
                sb.print_to_log();
            }
        }
        Ok(())
    }
}
