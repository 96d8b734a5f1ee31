pub mod archive;
pub mod config;
pub mod digger;
pub mod sim;

pub use archive::{ArchiveError, SnapshotFormat};
pub use config::{Command, ConfigError, SimConfig, parse_args, usage};
pub use digger::{DIG_OFFSETS, Digger};
pub use sim::{SimSave, SimStats, Simulation, StepOutcome};

use digforge_core::World;
use tracing::info;

/// Loads or creates a world, runs the configured number of steps and writes the snapshot.
pub fn run(config: &SimConfig) -> Result<SimStats, ArchiveError> {
    let mut simulation = match &config.input {
        Some(path) => {
            let save = archive::load(path)?;
            Simulation::from_save(save, config.fill, config.seed)?
        }
        None => Simulation::new(World::with_fill_policy(config.fill), Vec::new(), config.seed),
    };

    info!(
        iterations = config.iterations,
        seed = config.seed,
        fill = %config.fill,
        blocks = simulation.world().block_count(),
        diggers = simulation.diggers().len(),
        "starting simulation"
    );

    let stats = simulation.run(config.iterations);

    info!(
        spawned = stats.spawned,
        fell = stats.fell,
        dug = stats.dug,
        blocks = simulation.world().block_count(),
        "simulation finished"
    );

    archive::save(&config.output, &simulation.to_save())?;
    info!(path = %config.output.display(), "wrote snapshot");

    Ok(stats)
}
