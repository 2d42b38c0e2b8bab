//! Pulse Blocks entry point
//!
//! Runs the simulation headless on a simulated frame clock with the
//! autopilot at the controls, printing text frames as it goes.
//!
//! Usage: `pulse-blocks [seed] [settings.json]`

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pulse_blocks::consts::{MAX_SUBSTEPS, SIM_DT};
use pulse_blocks::renderer::render_frame;
use pulse_blocks::sim::{GameEvent, GameState, TickInput, tick};
use pulse_blocks::{GameSnapshot, HighScores, Settings};

/// Host frame length (the display refresh the loop is paced to)
const FRAME_DT: Duration = Duration::from_millis(16);
/// Largest frame delta fed to the accumulator
const MAX_FRAME_DT: Duration = Duration::from_millis(100);
/// Print a text frame this often (simulated time)
const PRINT_EVERY: Duration = Duration::from_secs(5);
/// Stop a run that never ends (simulated time)
const MAX_RUN: Duration = Duration::from_secs(60 * 60);

const HIGH_SCORES_PATH: &str = "pulse_blocks_scores.json";

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: Duration,
    input: TickInput,
    since_print: Duration,
}

impl Game {
    fn new(seed: u64, settings: Settings) -> Self {
        Self {
            state: GameState::new(seed, settings),
            accumulator: Duration::ZERO,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            since_print: Duration::ZERO,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, frame_dt: Duration) {
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.pause = false;
            self.input.cannon_move = None;
        }

        for event in self.state.drain_events() {
            log_event(&event);
        }
    }

    /// Print a frame when due
    fn render(&mut self, frame_dt: Duration) {
        self.since_print += frame_dt;
        if self.since_print < PRINT_EVERY || !self.state.running() {
            return;
        }
        self.since_print = Duration::ZERO;
        self.print_frame();
    }

    fn print_frame(&self) {
        let snapshot = GameSnapshot::capture(&self.state);
        println!("{}", render_frame(&snapshot, &self.state.settings));
    }

    /// Game over and every cleared group has finished vanishing
    fn finished(&self) -> bool {
        !self.state.running() && self.state.vanishing.is_empty()
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GroupCleared {
            group_id,
            blocks,
            points,
            variant,
            ..
        } => log::info!(
            "group {} cleared: {} blocks, +{} ({})",
            group_id,
            blocks,
            points,
            variant.as_str()
        ),
        GameEvent::LevelUp { level } => log::info!("level {}", level),
        GameEvent::GameOver { final_score } => log::info!("game over, final score {}", final_score),
        other => log::trace!("{:?}", other),
    }
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Invalid seed {:?}, using the clock", arg);
            unix_time()
        }),
        None => unix_time(),
    };
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Err(e) = settings.validate() {
        log::error!("{}", e);
        std::process::exit(2);
    }

    log::info!("Pulse Blocks starting (seed {})", seed);
    let mut game = Game::new(seed, settings);

    let mut elapsed = Duration::ZERO;
    while !game.finished() && elapsed < MAX_RUN {
        game.update(FRAME_DT);
        game.render(FRAME_DT);
        elapsed += FRAME_DT;
    }

    if game.state.running() {
        log::warn!("Run stopped after {:?} of play", elapsed);
    }

    game.print_frame();
    let score = game.state.score;
    let level = game.state.level;
    println!("Final score: {} (level {})", score, level);

    let mut scores = HighScores::load_or_default(HIGH_SCORES_PATH);
    if scores.report_final_score(score, level, unix_time()) {
        println!("New high score!");
        if let Err(e) = scores.save(HIGH_SCORES_PATH) {
            log::error!("Failed to save high scores: {}", e);
        }
    }
}
