use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use crossterm::event::{Event, KeyCode};
use rand::SeedableRng;
use rand::rngs::StdRng;

use earth_defender::config::GameConfig;
use earth_defender::engine::{Controls, Engine};
use earth_defender::entities::Body;
use earth_defender::game::Game;
use earth_defender::rendering::{OutputTarget, ScreenBuffer};
use earth_defender::terminal_io::{InputSource, SimulatedInput};

const FRAME: f64 = 1.0 / 60.0;

fn key(code: KeyCode) -> Event {
    Event::Key(code.into())
}

#[test]
fn shooting_down_the_first_asteroid() {
    let mut engine = Engine::with_rng(GameConfig::default(), StdRng::seed_from_u64(21));
    assert!(engine.asteroids().is_empty());
    assert!(engine.bullets().is_empty());
    let hud = engine.hud();
    assert_eq!((hud.spaceship_health, hud.lives, hud.earth_health), (100.0, 3, 100.0));

    for _ in 0..180 {
        engine.tick(FRAME, Controls::default());
    }
    assert_eq!(engine.asteroids().len(), 1);

    // Swing the ship onto the asteroid's approach ray
    let center = engine.play_area().center();
    let bearing = engine.asteroids()[0].position().sub(center).angle_degrees();
    let speed = engine.config().spaceship_angular_velocity;
    engine.spaceship_mut().rotate_right(bearing / speed);
    engine.tick(0.0, Controls::default());
    assert_abs_diff_eq!(engine.spaceship().angle(), bearing, epsilon = 1e-6);

    let report = engine.tick(0.0, Controls { fire: true, ..Controls::default() });
    assert_eq!(report.bullets_fired, 1);
    assert_eq!(engine.bullets().len(), 1);

    let mut shot = 0;
    for _ in 0..120 {
        shot += engine.tick(FRAME, Controls::default()).asteroids_shot;
        if engine.asteroids().is_empty() {
            break;
        }
    }
    assert_eq!(shot, 1);
    assert_eq!((engine.asteroids().len(), engine.bullets().len()), (0, 0));
    assert_eq!(engine.hud().spaceship_health, 100.0);
    assert_eq!(engine.hud().earth_health, 100.0);
}

#[test]
fn unattended_asteroids_reach_the_planet() {
    let mut engine = Engine::with_rng(GameConfig::default(), StdRng::seed_from_u64(5));
    engine.start();
    let mut earth_hits = 0;
    let mut spaceship_hits = 0;
    // Worst case travel time to the planet surface is under seven seconds
    for _ in 0..(60 * 7) {
        let report = engine.tick(FRAME, Controls::default());
        earth_hits += report.earth_hits;
        spaceship_hits += report.spaceship_hits;
        if earth_hits + spaceship_hits > 0 {
            break;
        }
    }
    assert_eq!(earth_hits + spaceship_hits, 1);
    let hud = engine.hud();
    assert!(hud.earth_health < 100.0 || hud.spaceship_health < 100.0);
}

fn scripted_game(events: HashMap<u64, Vec<Event>>, max_frames: Option<u64>) -> Game {
    let config = GameConfig { seed: Some(1), ..GameConfig::default() };
    let stdout_target = OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24));
    let input = InputSource::Simulated(SimulatedInput::new(events));
    Game::new(config, 80, 24, stdout_target, input, true, max_frames)
}

#[test]
fn pause_freezes_the_simulation_but_keeps_rendering() {
    let mut events = HashMap::new();
    for frame in 0..20 {
        events.insert(frame, vec![key(KeyCode::Right)]);
    }
    events.get_mut(&5).unwrap().push(key(KeyCode::Char('p')));
    events.get_mut(&10).unwrap().push(key(KeyCode::Char('p')));
    events.insert(20, vec![key(KeyCode::Char('q'))]);

    let mut game = scripted_game(events, None);
    game.run().unwrap();

    assert_eq!(game.frame_count(), 20);
    assert!(!game.is_paused());
    // 15 unpaused frames of rotation at 80 degrees per second
    assert_abs_diff_eq!(game.engine().spaceship().angle(), 20.0, epsilon = 1e-9);
    match &game.stdout_target {
        OutputTarget::ScreenBuffer(sb) => {
            assert!(sb.row(0).starts_with("SHIP ["));
            assert!(sb.row(23).starts_with("Left/Right"));
        }
        OutputTarget::Stdout(_) => unreachable!(),
    }
}

#[test]
fn paused_frame_shows_banner() {
    let mut events = HashMap::new();
    events.insert(3, vec![key(KeyCode::Char('p'))]);
    let mut game = scripted_game(events, Some(6));
    game.run().unwrap();

    assert!(game.is_paused());
    assert_eq!(game.frame_count(), 6);
    match &game.stdout_target {
        OutputTarget::ScreenBuffer(sb) => assert!(sb.row(12).contains("PAUSED")),
        OutputTarget::Stdout(_) => unreachable!(),
    }
}
