//! Shadow Dimension headless runner
//!
//! Loads a level, plays a fixed number of frames with a scripted input and
//! logs the outcome.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use shadow_dimension::sim::{Direction, TickInput, World};

/// Play a level headless and print the final visual state as JSON
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level definition file (`Kind,x,y` rows)
    level: PathBuf,

    /// Seed for enemy randomization
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Optional JSON balance override
    #[arg(long)]
    tuning: Option<PathBuf>,
}

/// Walk right along the top half, then down toward the goal, swinging every
/// half second
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(frame: u64, refresh_rate: u32) -> TickInput {
    let phase = frame / u64::from(refresh_rate.max(1));
    let direction = if phase % 3 == 2 {
        Direction::Down
    } else {
        Direction::Right
    };
    TickInput {
        attack: frame % u64::from((refresh_rate / 2).max(1)) == 0,
        ..TickInput::moving(direction)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use shadow_dimension::{LevelLoader, Tuning};

    let args = Args::parse();
    env_logger::init();
    log::info!("Shadow Dimension (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let level = LevelLoader::new(args.seed, &tuning).load(&args.level)?;
    if level.skipped_rows > 0 {
        log::warn!("{} malformed rows ignored", level.skipped_rows);
    }
    let mut world = World::from_level(&level, tuning);

    for _ in 0..args.frames {
        let input = scripted_input(world.frame(), world.tuning.refresh_rate);
        world.update(&input);
        if world.is_player_dead() || world.boss_defeated() || world.goal_reached() {
            break;
        }
    }

    let outcome = if world.is_player_dead() {
        "player died"
    } else if world.boss_defeated() {
        "boss defeated"
    } else if world.goal_reached() {
        "goal reached"
    } else {
        "time ran out"
    };
    log::info!(
        "Finished after {} frames: {} (health {}%, {} entities left)",
        world.frame(),
        outcome,
        world.player_health_percentage(),
        world.entities.len()
    );
    println!("{}", serde_json::to_string_pretty(&world.visuals())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on wasm
}
