use std::cell::RefCell;
use std::rc::Rc;

use crate::V3;
use protocol::pr_model::PrPoint;

pub type PRef = Rc<RefCell<Point>>;

#[derive(Clone, Debug)]
pub struct Point {
	pub(crate) id: usize, // assigned on adoption
	pub pos: V3,
	pub ppos: V3,
	is_static: bool, // only pin/unpin touch it
	pub selected: bool,
	// where the last step left the point, host moves show up as a mismatch
	settled: V3,
}

impl Point {
	pub fn new(pos: V3) -> Self {
		Self {
			id: 0,
			pos,
			ppos: pos,
			is_static: false,
			selected: false,
			settled: pos,
		}
	}

	pub fn new_ref(pos: V3) -> PRef {
		Rc::new(RefCell::new(Self::new(pos)))
	}

	pub fn new_static_ref(pos: V3) -> PRef {
		let mut p = Self::new(pos);
		p.pin();
		Rc::new(RefCell::new(p))
	}

	pub fn get_id(&self) -> usize {
		self.id
	}

	pub(crate) fn set_id(&mut self, id: usize) {
		self.id = id;
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn add_pos(&mut self, dp: V3) {
		self.pos += dp
	}

	// keeps the implicit velocity
	pub fn offset_pos(&mut self, dp: V3) {
		self.pos += dp;
		self.ppos += dp;
		self.settled += dp;
	}

	// teleport at rest
	pub fn reset_pos(&mut self, p: V3) {
		self.pos = p;
		self.ppos = p;
		self.settled = p;
	}

	pub fn velocity(&self) -> V3 {
		self.pos - self.ppos
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}

	pub fn pin(&mut self) {
		self.is_static = true;
		self.ppos = self.pos;
	}

	pub fn unpin(&mut self) {
		self.is_static = false;
		self.ppos = self.pos;
	}

	pub(crate) fn host_moved(&self) -> bool {
		self.pos != self.settled
	}

	// drop the history of a host move so it does not turn into velocity
	pub(crate) fn resync(&mut self) {
		self.ppos = self.pos;
		self.settled = self.pos;
	}

	pub(crate) fn settle(&mut self) {
		self.settled = self.pos;
	}

	pub fn update(&mut self, gravity: V3, damping: f32, floor_y: f32) {
		if self.is_static {
			self.pos = self.ppos;
			return;
		}
		let ppos = self.pos;
		let dp = (self.pos - self.ppos + gravity) * damping;
		self.pos += dp;
		self.ppos = ppos;
		// clamp only, the vertical history is kept
		if self.pos[1] < floor_y {
			self.pos[1] = floor_y;
		}
	}

	pub fn render(&self) -> PrPoint {
		PrPoint {
			id: self.id,
			pos: self.pos.into(),
			is_static: self.is_static,
			selected: self.selected,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn test_update_from_rest() {
		let mut p = Point::new(V3::new(0., 5., 0.));
		p.update(V3::new(0., -0.01, 0.), 0.96, 0.);
		assert_relative_eq!(p.pos, V3::new(0., 5. - 0.0096, 0.));
		assert_relative_eq!(p.ppos, V3::new(0., 5., 0.));
	}

	#[test]
	fn test_update_keeps_velocity() {
		let mut p = Point::new(V3::new(0., 5., 0.));
		p.ppos = V3::new(-1., 5., 0.);
		p.update(V3::zeros(), 0.5, 0.);
		assert_relative_eq!(p.pos, V3::new(0.5, 5., 0.));
		assert_relative_eq!(p.velocity(), V3::new(0.5, 0., 0.));
	}

	#[test]
	fn test_static_snaps_back() {
		let mut p = Point::new(V3::new(1., 2., 3.));
		p.pin();
		p.add_pos(V3::new(4., 4., 4.));
		p.update(V3::new(0., -0.01, 0.), 0.96, 0.);
		assert_eq!(p.pos, V3::new(1., 2., 3.));
	}

	#[test]
	fn test_pin_while_moving_holds_position() {
		let mut p = Point::new(V3::new(0., 10., 0.));
		for _ in 0..5 {
			p.update(V3::new(0., -0.01, 0.), 0.96, 0.);
		}
		p.pin();
		let marked = p.get_pos();
		assert!(p.is_static());
		for _ in 0..3 {
			p.update(V3::new(0., -0.01, 0.), 0.96, 0.);
		}
		assert_eq!(p.get_pos(), marked);
		p.unpin();
		assert!(!p.is_static());
		assert_eq!(p.velocity(), V3::zeros());
	}

	#[test]
	fn test_floor_clamp() {
		let mut p = Point::new(V3::new(0., 0.1, 0.));
		p.ppos = V3::new(0., 1., 0.);
		p.update(V3::new(0., -0.01, 0.), 0.96, 0.);
		assert_eq!(p.pos[1], 0.);
	}

	#[test]
	fn test_host_move_detection() {
		let mut p = Point::new(V3::zeros());
		assert!(!p.host_moved());
		p.pos = V3::new(1., 0., 0.);
		assert!(p.host_moved());
		p.resync();
		assert!(!p.host_moved());
		assert_eq!(p.velocity(), V3::zeros());
		p.offset_pos(V3::new(0., 1., 0.));
		assert!(!p.host_moved());
	}
}
