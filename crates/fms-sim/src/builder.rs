//! Fluent builder for constructing a [`Sim`].

use fms_core::{RandomSource, RunConfig, SimRng};
use fms_vehicle::{VehicleParams, VehicleState};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                        |
/// |------------------------|------------------------------------------------|
/// | `.params(p)`           | `VehicleParams::default()`                     |
/// | `.rng(r)`              | `SimRng::new(config.seed)`                     |
/// | `.initial_state(s)`    | `VehicleState::random` drawn from the rng      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(RunConfig::new(280, seed))
///     .params(params)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: RunConfig,
    params: Option<VehicleParams>,
    state:  Option<VehicleState>,
    rng:    Option<Box<dyn RandomSource>>,
}

impl SimBuilder {
    pub fn new(config: RunConfig) -> Self {
        Self { config, params: None, state: None, rng: None }
    }

    pub fn params(mut self, params: VehicleParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Start from a fixed state instead of a random one.  The run still
    /// ends at `config.end_tick()`, counted from tick zero.
    pub fn initial_state(mut self, state: VehicleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Replace the seeded source, e.g. with a `ReplayRng`.
    pub fn rng<R: RandomSource + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Validate the parameters and draw the initial state if none was given.
    pub fn build(self) -> SimResult<Sim> {
        let params = self.params.unwrap_or_default();
        params.validate()?;

        let mut rng: Box<dyn RandomSource> = match self.rng {
            Some(r) => r,
            None    => Box::new(SimRng::new(self.config.seed)),
        };
        let state = match self.state {
            Some(s) => s,
            None    => VehicleState::random(&params, &mut rng),
        };

        Ok(Sim::new(self.config, params, state, rng))
    }
}
