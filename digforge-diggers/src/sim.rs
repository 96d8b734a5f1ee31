use crate::digger::{DIG_OFFSETS, Digger};
use digforge_core::{FillPolicy, SaveError, World, WorldSave};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROGRESS_EVERY: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Spawned,
    Fell,
    Dug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub spawned: u64,
    pub fell: u64,
    pub dug: u64,
}

impl SimStats {
    fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Spawned => self.spawned += 1,
            StepOutcome::Fell => self.fell += 1,
            StepOutcome::Dug => self.dug += 1,
        }
    }

    pub fn steps(&self) -> u64 {
        self.spawned + self.fell + self.dug
    }
}

/// Everything a simulation persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSave {
    pub world: WorldSave,
    pub diggers: Vec<Digger>,
}

/// Diggers random-walking through a [`World`], clearing the voxels they move into.
pub struct Simulation {
    world: World,
    diggers: Vec<Digger>,
    rng: Rng,
}

impl Simulation {
    pub fn new(world: World, diggers: Vec<Digger>, seed: u64) -> Self {
        Self {
            world,
            diggers,
            rng: Rng::with_seed(seed),
        }
    }

    pub fn from_save(save: SimSave, policy: FillPolicy, seed: u64) -> Result<Self, SaveError> {
        let world = World::from_save(save.world, policy)?;
        Ok(Self::new(world, save.diggers, seed))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn diggers(&self) -> &[Digger] {
        &self.diggers
    }

    /// Two times out of three an existing digger acts: it falls if nothing
    /// solid is below it, otherwise it moves and digs. Otherwise, or while
    /// there are no diggers, a new one spawns at the origin.
    pub fn step(&mut self) -> StepOutcome {
        let act = self.rng.u8(0..3) < 2;
        if act && !self.diggers.is_empty() {
            let index = self.rng.usize(..self.diggers.len());
            let digger = &mut self.diggers[index];

            let below = digger.below();
            if !self.world.get(&digger.x, &digger.y, &below) {
                digger.z = below;
                return StepOutcome::Fell;
            }

            let offset = DIG_OFFSETS[self.rng.usize(..DIG_OFFSETS.len())];
            digger.shift(offset);
            self.world.unset(&digger.x, &digger.y, &digger.z);
            return StepOutcome::Dug;
        }

        self.diggers.push(Digger::default());
        StepOutcome::Spawned
    }

    pub fn run(&mut self, iterations: u64) -> SimStats {
        let mut stats = SimStats::default();
        for iteration in 0..iterations {
            stats.record(self.step());

            if (iteration + 1) % PROGRESS_EVERY == 0 {
                debug!(
                    iteration = iteration + 1,
                    diggers = self.diggers.len(),
                    blocks = self.world.block_count(),
                    "simulation progress"
                );
            }
        }
        stats
    }

    pub fn to_save(&self) -> SimSave {
        SimSave {
            world: self.world.to_save(),
            diggers: self.diggers.clone(),
        }
    }
}
