use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Point3;

use crate::{M4, V3};

pub type MeshRef = Rc<RefCell<Mesh>>;

/// A host-owned mesh: local vertex buffer plus the matrix placing it in the world.
///
/// While `matrix_auto_update` is set the world matrix follows `position`.
/// An attachment clears the flag and writes `matrix_world` directly.
#[derive(Clone, Debug)]
pub struct Mesh {
	pub vertices: Vec<V3>,
	pub position: V3,
	pub matrix_world: M4,
	pub matrix_auto_update: bool,
}

impl Mesh {
	pub fn new(vertices: Vec<V3>) -> Self {
		Self {
			vertices,
			position: V3::zeros(),
			matrix_world: M4::identity(),
			matrix_auto_update: true,
		}
	}

	pub fn with_position(mut self, position: V3) -> Self {
		self.set_position(position);
		self
	}

	pub fn into_ref(self) -> MeshRef {
		Rc::new(RefCell::new(self))
	}

	pub fn set_position(&mut self, position: V3) {
		self.position = position;
		self.update_matrix_world();
	}

	pub fn update_matrix_world(&mut self) {
		if self.matrix_auto_update {
			self.matrix_world = M4::new_translation(&self.position);
		}
	}

	pub fn to_world(&self, v: &V3) -> V3 {
		self.matrix_world.transform_point(&Point3::from(*v)).coords
	}

	pub fn world_vertices(&self) -> Vec<V3> {
		self.vertices.iter().map(|v| self.to_world(v)).collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn test_world_follows_position() {
		let mut mesh = Mesh::new(vec![V3::new(1., 0., 0.)])
			.with_position(V3::new(0., 2., 0.));
		assert_relative_eq!(mesh.world_vertices()[0], V3::new(1., 2., 0.));
		mesh.matrix_auto_update = false;
		mesh.set_position(V3::new(5., 5., 5.));
		// frozen once auto update is off
		assert_relative_eq!(mesh.world_vertices()[0], V3::new(1., 2., 0.));
	}

	#[test]
	fn test_to_world_applies_linear_part() {
		let mut mesh = Mesh::new(vec![]);
		mesh.matrix_auto_update = false;
		mesh.matrix_world = M4::new_nonuniform_scaling(&V3::new(2., 3., 4.));
		assert_relative_eq!(
			mesh.to_world(&V3::new(1., 1., 1.)),
			V3::new(2., 3., 4.)
		);
	}
}
