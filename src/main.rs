//! Colorful Drop headless runner
//!
//! Plays one scripted round without rendering or physics: the marker hops
//! outward through cells its region owns, and "looks at" the color of a
//! neighboring region each frame so that region gets absorbed.
//!
//! Usage: `colorful-drop [easy|normal|hard] [seed]`

use glam::Vec2;

use colorful_drop::scene::format_clear_time;
use colorful_drop::sim::matcher::neighbor_regions;
use colorful_drop::sim::{GameEvent, PlayState, TickInput, tick};
use colorful_drop::{BestTimes, Level, Scene, SceneCommand, Settings};

/// Frame time of the scripted run (ms)
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Give up after this many frames
const MAX_FRAMES: u32 = 100_000;

fn main() {
    env_logger::init();
    log::info!("Colorful Drop (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level = args
        .next()
        .and_then(|s| Level::from_str(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let settings_path = std::env::temp_dir().join("colorful_drop_settings.json");
    let times_path = std::env::temp_dir().join("colorful_drop_times.json");
    let mut settings = Settings::load(&settings_path);
    settings.level = level;

    let mut scene = Scene::Title
        .transition(SceneCommand::Start)
        .transition(SceneCommand::ChooseLevel(level));

    let mut state = PlayState::new(level, Vec2::new(1280.0, 720.0), &settings, seed);
    let mut drops = 0;
    let mut frames = 0;

    while frames < MAX_FRAMES {
        frames += 1;
        let input = scripted_input(&state, frames);
        for event in tick(&mut state, &input, FRAME_MS) {
            match event {
                GameEvent::Drop { region, cells } => {
                    drops += 1;
                    log::debug!("Drop: region {} ({} cells)", region.get(), cells);
                }
                GameEvent::Cleared { elapsed_ms } => {
                    scene = scene.transition(SceneCommand::PlayCleared { elapsed_ms });
                }
                GameEvent::Start | GameEvent::Go => {}
            }
        }
        if state.is_cleared() {
            break;
        }
    }

    let Scene::Clear { elapsed_ms, .. } = scene else {
        log::warn!("Round did not clear within {} frames", MAX_FRAMES);
        return;
    };

    let mut times = BestTimes::load(&times_path);
    let rank = times.record(level, elapsed_ms, 0.0);
    if let Err(e) = times.save(&times_path) {
        log::warn!("Could not save best times: {}", e);
    }
    if let Err(e) = settings.save(&settings_path) {
        log::warn!("Could not save settings: {}", e);
    }

    println!(
        "Cleared {} in {} ({} frames, {} regions absorbed, rank {:?})",
        level.as_str(),
        format_clear_time(elapsed_ms),
        frames,
        drops,
        rank
    );
    scene = scene.transition(SceneCommand::ReturnToTitle);
    log::info!("Back to {:?}", scene);
}

/// Input a player might produce: look at a neighboring color, rotate now and
/// then, and let the marker roll into the outermost owned neighbor cell
fn scripted_input(state: &PlayState, frame: u32) -> TickInput {
    let field = &state.field;
    let cell = field.nearest_cell(state.marker.pos);

    let marker_color = neighbor_regions(cell, &state.adjacency, &state.regions)
        .into_iter()
        .find(|&r| r != state.marker.region)
        .map(|r| {
            let c = state.palette.color(r);
            colorful_drop::sim::Hsva::new(c.h, 80, 100, 255)
        });

    // Outermost neighbor the marker's region already owns
    let next = state
        .adjacency
        .neighbors(cell)
        .iter()
        .copied()
        .filter(|&n| state.regions.region_of(n) == state.marker.region)
        .max_by(|&a, &b| {
            field
                .position(a)
                .length()
                .total_cmp(&field.position(b).length())
        });

    let on_edge = colorful_drop::sim::ring_of(cell) as u32 == field.rings();
    let marker_pos = if on_edge {
        // Roll off the field
        field.position(cell).normalize_or_zero() * field.clear_radius()
    } else {
        next.map_or(state.marker.pos, |n| field.position(n))
    };

    TickInput {
        rotate_left: frame % 240 < 30,
        rotate_right: frame % 240 >= 120 && frame % 240 < 150,
        marker_pos,
        samples: Vec::new(),
        marker_color,
    }
}
