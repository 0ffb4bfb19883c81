use std::rc::Rc;

use crate::point::PRef;
use crate::V3;
use protocol::pr_model::PrConstraint;

#[derive(Clone, Debug)]
pub struct Constraint {
	id: usize,
	a: PRef,
	b: PRef,
	rest_length: f32,
}

impl Constraint {
	pub fn new(id: usize, a: PRef, b: PRef) -> Self {
		let l0 = (a.borrow().get_pos() - b.borrow().get_pos()).magnitude();
		Self::new_with_l0(id, a, b, l0)
	}

	// negative and NaN rest lengths collapse to zero
	pub fn new_with_l0(id: usize, a: PRef, b: PRef, rest_length: f32) -> Self {
		Self {
			id,
			a,
			b,
			rest_length: rest_length.max(0.),
		}
	}

	pub fn get_id(&self) -> usize {
		self.id
	}

	pub fn a(&self) -> &PRef {
		&self.a
	}

	pub fn b(&self) -> &PRef {
		&self.b
	}

	pub fn rest_length(&self) -> f32 {
		self.rest_length
	}

	pub fn references(&self, p: &PRef) -> bool {
		Rc::ptr_eq(&self.a, p) || Rc::ptr_eq(&self.b, p)
	}

	pub fn endpoints(&self) -> (V3, V3) {
		(self.a.borrow().get_pos(), self.b.borrow().get_pos())
	}

	pub fn length(&self) -> f32 {
		let (a, b) = self.endpoints();
		(a - b).magnitude()
	}

	/// One relaxation of this constraint.
	///
	/// Both ends move by the same offset along the line between them.
	/// Returns `false` when the distance is degenerate and nothing moved.
	pub fn step(&self) -> bool {
		if Rc::ptr_eq(&self.a, &self.b) {
			return false;
		}
		let mut a = self.a.borrow_mut();
		let mut b = self.b.borrow_mut();
		let dp = a.get_pos() - b.get_pos();
		let l = dp.magnitude();
		if !l.is_normal() {
			return false;
		}
		let correct = dp * (self.rest_length / (self.rest_length + l) - 0.5);
		a.add_pos(correct);
		b.add_pos(-correct);
		true
	}

	pub fn render(&self) -> PrConstraint {
		let a = self.a.borrow();
		let b = self.b.borrow();
		PrConstraint {
			id: self.id,
			points: [a.get_id(), b.get_id()],
			ends: [a.get_pos().into(), b.get_pos().into()],
		}
	}
}
