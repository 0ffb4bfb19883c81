use tracing::warn;

/// Turns wall-clock frame time into a count of fixed steps.
#[derive(Clone, Debug)]
pub struct StepClock {
	step: f32,
	max_steps: usize,
	accumulator: f32,
}

impl StepClock {
	pub fn new(step: f32, max_steps: usize) -> Self {
		Self {
			step,
			max_steps: max_steps.max(1),
			accumulator: 0.,
		}
	}

	pub fn step(&self) -> f32 {
		self.step
	}

	// leftover time not yet consumed by a step
	pub fn pending(&self) -> f32 {
		self.accumulator
	}

	pub fn reset(&mut self) {
		self.accumulator = 0.;
	}

	pub fn take_steps(&mut self, elapsed: f32) -> usize {
		if !elapsed.is_finite() || elapsed <= 0. || !self.step.is_normal() {
			return 0;
		}
		self.accumulator += elapsed;
		let due = (self.accumulator / self.step).floor();
		let steps = (due as usize).min(self.max_steps);
		if due as usize > self.max_steps {
			warn!(due, max = self.max_steps, "dropping step backlog");
			self.accumulator = 0.;
		} else {
			self.accumulator -= steps as f32 * self.step;
		}
		steps
	}
}
