/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::time::Duration;

use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use config::GameConfig;
use domain::entity::FrameInput;
use error::Result;
use sim::event::GameEvent;
use sim::session::GameSession;
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

fn main() {
    init_logging();

    let config = GameConfig::load();
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("world seed {seed}");
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut session = match GameSession::from_config(&config, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            log::error!("could not build levels: {e}");
            eprintln!("Could not build levels: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!(
        "exiting with score {} ({} points claimed)",
        session.score,
        session.store.claimed_total(),
    );
    println!();
    println!("Thanks for playing Gridcrawl!");
    println!("Final Score: {}", session.score);
}

/// The terminal owns stderr, so log records go to a file.
fn init_logging() {
    let path = config::log_path();
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn game_loop(
    session: &mut GameSession,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame = Duration::from_millis(config.frame_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            log::info!("interrupted");
            break;
        }

        let input = read_input(&kb, &gp);
        let events = step::update(session, &input);
        sound::play_events(sound, &events);
        show_messages(renderer, &events);

        renderer.render(session, config, gp.connected)?;

        if session.should_close() {
            break;
        }
        std::thread::sleep(frame);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_TURN_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_TURN_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_FORWARD: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_MENU_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_CANCEL: &[KeyCode] = &[KeyCode::Esc];

/// Merge keyboard and gamepad into one frame's input.
fn read_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    FrameInput {
        turn_left: kb.any_pressed(KEYS_TURN_LEFT) || gp.turn_left_pressed(),
        turn_right: kb.any_pressed(KEYS_TURN_RIGHT) || gp.turn_right_pressed(),
        forward: kb.any_pressed(KEYS_FORWARD) || gp.forward_pressed(),
        menu_up: kb.any_pressed(KEYS_FORWARD) || gp.up_pressed(),
        menu_down: kb.any_pressed(KEYS_MENU_DOWN) || gp.down_pressed(),
        confirm: kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed(),
        cancel: kb.any_pressed(KEYS_CANCEL) || gp.cancel_pressed(),
        pick_level: kb.digit_pressed(),
    }
}

fn show_messages(renderer: &mut Renderer, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PointClaimed { score, .. } => {
                renderer.set_message(&format!("Point collected! Score: {score}"), 90);
            }
            GameEvent::Bumped => renderer.set_message("The way is blocked.", 40),
            _ => {}
        }
    }
}
