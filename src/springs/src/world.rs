use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::attachment::AttachmentBinding;
use crate::clock::StepClock;
use crate::config::SpringsConfig;
use crate::constraint::Constraint;
use crate::error::{Result, SpringsError};
use crate::host_event::{EventOutcome, HostEvent};
use crate::point::PRef;
use crate::{MeshRef, V3};
use protocol::pr_model::PrModel;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SatisfyReport {
	pub passes: usize,
	// points the host moved since the last step
	pub resynced: usize,
	// constraint visits skipped because the endpoints coincide
	pub degenerate: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
	pub satisfy: SatisfyReport,
	pub resynced: usize,
}

/// The simulation: points, the constraints between them, and the optional
/// mesh attachment.
///
/// Single threaded. The host feeds lifecycle and selection notifications in and
/// calls [`Springs::integrate`] once per frame.
pub struct Springs {
	config: SpringsConfig,
	clock: StepClock,
	running: bool,
	selecting: bool,

	point_alloc: usize,
	constraint_alloc: usize,
	points: Vec<PRef>,
	constraints: Vec<Constraint>,
	selected: Vec<PRef>,
	attached: Option<AttachmentBinding>,
}

impl Default for Springs {
	fn default() -> Self {
		let config = SpringsConfig::default();
		Self {
			clock: StepClock::new(config.step, config.max_steps),
			config,
			running: false,
			selecting: true,

			point_alloc: 0,
			constraint_alloc: 0,
			points: Vec::new(),
			constraints: Vec::new(),
			selected: Vec::new(),
			attached: None,
		}
	}
}

impl Springs {
	pub fn with_config(mut self, config: SpringsConfig) -> Self {
		self.clock = StepClock::new(config.step, config.max_steps);
		self.config = config;
		self
	}

	pub fn with_running(mut self) -> Self {
		self.running = true;
		self
	}

	pub fn with_iterations(mut self, iterations: usize) -> Self {
		self.config.iterations = iterations;
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.config.gravity = gravity;
		self
	}

	pub fn with_damping(mut self, damping: f32) -> Self {
		self.config.damping = damping;
		self
	}

	pub fn with_floor(mut self, floor_y: f32) -> Self {
		self.config.floor_y = floor_y;
		self
	}

	pub fn config(&self) -> &SpringsConfig {
		&self.config
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn set_running(&mut self, running: bool) {
		if running != self.running {
			info!(running, "simulation toggled");
		}
		self.running = running;
		if !running {
			self.clock.reset();
		}
	}

	pub fn is_selecting(&self) -> bool {
		self.selecting
	}

	pub fn set_selecting(&mut self, selecting: bool) {
		self.selecting = selecting;
	}

	pub fn points(&self) -> &[PRef] {
		&self.points
	}

	pub fn constraints(&self) -> &[Constraint] {
		&self.constraints
	}

	pub fn selection(&self) -> &[PRef] {
		&self.selected
	}

	pub fn attached(&self) -> Option<&AttachmentBinding> {
		self.attached.as_ref()
	}

	fn contains(&self, p: &PRef) -> bool {
		self.points.iter().any(|q| Rc::ptr_eq(q, p))
	}

	pub fn on_point_added(&mut self, p: PRef) -> usize {
		if let Some(q) = self.points.iter().find(|q| Rc::ptr_eq(q, &p)) {
			return q.borrow().get_id();
		}
		let id = self.point_alloc;
		self.point_alloc += 1;
		p.borrow_mut().set_id(id);
		self.points.push(p);
		info!(id, "point added");
		id
	}

	/// Drops the point together with every constraint that references it.
	///
	/// Returns how many constraints went with it.
	pub fn on_point_removed(&mut self, p: &PRef) -> Result<usize> {
		let id = p.borrow().get_id();
		let idx = self
			.points
			.iter()
			.position(|q| Rc::ptr_eq(q, p))
			.ok_or(SpringsError::UnknownPoint(id))?;
		self.points.remove(idx);

		let before = self.constraints.len();
		self.constraints.retain(|c| !c.references(p));
		let dropped = before - self.constraints.len();

		self.selected.retain(|q| !Rc::ptr_eq(q, p));
		p.borrow_mut().selected = false;

		if self.attached.as_ref().map_or(false, |a| a.uses(p)) {
			warn!(id, "control point removed, releasing attached mesh");
			self.detach();
		}
		info!(id, constraints = dropped, "point removed");
		Ok(dropped)
	}

	pub fn on_selection_toggled(&mut self, p: &PRef) -> Result<bool> {
		if !self.selecting {
			return Ok(false);
		}
		if !self.contains(p) {
			return Err(SpringsError::UnknownPoint(p.borrow().get_id()));
		}
		if self.selected.iter().any(|q| Rc::ptr_eq(q, p)) {
			return Ok(false);
		}
		p.borrow_mut().selected = true;
		self.selected.push(p.clone());
		Ok(true)
	}

	pub fn clear_selection(&mut self) {
		for p in self.selected.drain(..) {
			p.borrow_mut().selected = false;
		}
	}

	/// Links consecutive selected points, in selection order.
	pub fn on_build_constraints_requested(&mut self) -> Result<Vec<usize>> {
		if self.selected.len() < 2 {
			return Err(SpringsError::InsufficientSelection {
				required: 2,
				selected: self.selected.len(),
			});
		}
		let mut ids = Vec::with_capacity(self.selected.len() - 1);
		for pair in self.selected.windows(2) {
			let id = self.constraint_alloc;
			self.constraint_alloc += 1;
			self.constraints
				.push(Constraint::new(id, pair[0].clone(), pair[1].clone()));
			ids.push(id);
		}
		info!(count = ids.len(), "constraints built");
		Ok(ids)
	}

	pub fn on_attach_mesh_requested(
		&mut self,
		mesh: Option<MeshRef>,
	) -> Result<()> {
		let mesh = mesh.ok_or_else(|| {
			SpringsError::invalid_target("no mesh selected")
		})?;
		let points: [PRef; 4] = self.selected.clone().try_into().map_err(
			|selected: Vec<PRef>| SpringsError::InsufficientSelection {
				required: 4,
				selected: selected.len(),
			},
		)?;
		// a rejected request leaves the current binding in place
		if let Err(e) = AttachmentBinding::validate(&points) {
			warn!(error = %e, "attach rejected");
			return Err(e);
		}
		if self.attached.as_ref().map_or(false, |a| Rc::ptr_eq(a.mesh(), &mesh)) {
			self.detach();
		}
		let binding = AttachmentBinding::bind(points, mesh)?;
		self.detach();
		self.attached = Some(binding);
		Ok(())
	}

	pub fn detach(&mut self) -> Option<MeshRef> {
		let mesh = self.attached.take()?.release();
		info!("mesh detached");
		Some(mesh)
	}

	pub fn update_attached(&self) {
		if let Some(binding) = self.attached.as_ref() {
			binding.update();
		}
	}

	/// Relaxation passes over every constraint, in insertion order.
	///
	/// Host moves made before the call are resynced first. The relaxation
	/// itself counts as a simulation move, so a later `integrate` keeps the
	/// implicit velocity it carries.
	pub fn satisfy(&mut self) -> SatisfyReport {
		let mut report = SatisfyReport {
			passes: self.config.iterations,
			resynced: 0,
			degenerate: 0,
		};
		for p in self.points.iter() {
			let mut p = p.borrow_mut();
			if p.host_moved() {
				p.resync();
				report.resynced += 1;
			}
		}
		for _ in 0..self.config.iterations {
			for constraint in self.constraints.iter() {
				if !constraint.step() {
					report.degenerate += 1;
				}
			}
		}
		if report.degenerate > 0 {
			debug!(count = report.degenerate, "degenerate constraints skipped");
		}
		for p in self.points.iter() {
			p.borrow_mut().settle();
		}
		report
	}

	/// Advances one fixed step. Does nothing while paused.
	pub fn integrate(&mut self) -> Option<StepReport> {
		if !self.running {
			return None;
		}
		let satisfy = self.satisfy();
		let resynced = satisfy.resynced;

		let SpringsConfig {
			gravity,
			damping,
			floor_y,
			..
		} = self.config;
		for p in self.points.iter() {
			let mut p = p.borrow_mut();
			p.update(gravity, damping, floor_y);
			p.settle();
		}

		self.update_attached();
		Some(StepReport { satisfy, resynced })
	}

	/// Runs as many fixed steps as `elapsed` seconds cover.
	pub fn advance(&mut self, elapsed: f32) -> usize {
		if !self.running {
			return 0;
		}
		let steps = self.clock.take_steps(elapsed);
		for _ in 0..steps {
			self.integrate();
		}
		steps
	}

	pub fn handle(&mut self, event: HostEvent) -> Result<EventOutcome> {
		use HostEvent::*;
		let outcome = match event {
			PointAdded(p) => EventOutcome::PointAdded(self.on_point_added(p)),
			PointRemoved(p) => {
				EventOutcome::PointRemoved(self.on_point_removed(&p)?)
			}
			SelectionToggled(p) => {
				EventOutcome::Selected(self.on_selection_toggled(&p)?)
			}
			SelectionCleared => {
				self.clear_selection();
				EventOutcome::Done
			}
			SetSelecting(on) => {
				self.set_selecting(on);
				EventOutcome::Done
			}
			SetRunning(on) => {
				self.set_running(on);
				EventOutcome::Done
			}
			BuildConstraints => EventOutcome::ConstraintsBuilt(
				self.on_build_constraints_requested()?,
			),
			AttachMesh(mesh) => {
				self.on_attach_mesh_requested(mesh)?;
				EventOutcome::Done
			}
			Detach => {
				self.detach();
				EventOutcome::Done
			}
		};
		Ok(outcome)
	}

	pub fn pr_model(&self) -> PrModel {
		PrModel {
			points: self.points.iter().map(|p| p.borrow().render()).collect(),
			constraints: self.constraints.iter().map(|c| c.render()).collect(),
			mesh: self.attached.as_ref().map(|a| a.render()),
		}
	}
}
