use crate::V3;

/// Tuning of one simulation step.
///
/// Gravity and damping apply once per `integrate` call and are not scaled by
/// elapsed time; `step` is the duration one call stands for when the
/// simulation is driven through `Springs::advance`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringsConfig {
	/// Relaxation passes over all constraints per step.
	pub iterations: usize,
	pub gravity: V3,
	/// Fraction of the implicit velocity kept per step.
	pub damping: f32,
	pub floor_y: f32,
	/// Seconds per fixed step.
	pub step: f32,
	/// Upper bound of steps run by a single `advance`.
	pub max_steps: usize,
}

impl Default for SpringsConfig {
	fn default() -> Self {
		Self {
			iterations: 5,
			gravity: V3::new(0., -0.01, 0.),
			damping: 0.96,
			floor_y: 0.,
			step: 1. / 60.,
			max_steps: 8,
		}
	}
}

impl SpringsConfig {
	pub fn with_iterations(mut self, iterations: usize) -> Self {
		self.iterations = iterations;
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_damping(mut self, damping: f32) -> Self {
		self.damping = damping;
		self
	}

	pub fn with_floor(mut self, floor_y: f32) -> Self {
		self.floor_y = floor_y;
		self
	}

	pub fn with_step(mut self, step: f32, max_steps: usize) -> Self {
		self.step = step;
		self.max_steps = max_steps.max(1);
		self
	}
}
