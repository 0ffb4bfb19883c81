//! Mesh skinning driven by four control points.
//!
//! The points `p0..p3` span a (generally non-orthogonal) frame with origin
//! `p0` and axes `p1 - p0`, `p2 - p0`, `p3 - p0`. Binding re-expresses the
//! mesh's vertices in that frame once; afterwards the mesh world matrix is the
//! frame itself, so the mesh follows any affine motion of the control points.
//!
//! Nothing re-orthogonalizes the frame. If the control points collapse onto a
//! plane after binding, the mesh collapses with them.

use std::rc::Rc;

use tracing::info;

use crate::error::{Result, SpringsError};
use crate::point::PRef;
use crate::{MeshRef, M3, M4, V3};
use protocol::pr_model::PrMesh;

// |det| relative to the product of the axis lengths
const SINGULAR_EPS: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct AttachmentBinding {
	points: [PRef; 4],
	mesh: MeshRef,
}

fn frame(points: &[PRef; 4]) -> (M3, V3) {
	let p0 = points[0].borrow().get_pos();
	let axis = |i: usize| points[i].borrow().get_pos() - p0;
	(M3::from_columns(&[axis(1), axis(2), axis(3)]), p0)
}

// inverse of the frame, or the reason it has none
fn inverse_frame(points: &[PRef; 4]) -> Result<(M4, V3)> {
	let (basis, p0) = frame(points);
	let determinant = basis.determinant();
	let scale = basis.column(0).magnitude()
		* basis.column(1).magnitude()
		* basis.column(2).magnitude();
	if !scale.is_normal() || determinant.abs() <= SINGULAR_EPS * scale {
		return Err(SpringsError::SingularBasis { determinant });
	}
	let inverse = basis
		.to_homogeneous()
		.try_inverse()
		.ok_or(SpringsError::SingularBasis { determinant })?;
	Ok((inverse, p0))
}

impl AttachmentBinding {
	/// Checks that the points span a usable frame without touching any mesh.
	pub fn validate(points: &[PRef; 4]) -> Result<()> {
		inverse_frame(points).map(|_| ())
	}

	pub fn bind(points: [PRef; 4], mesh: MeshRef) -> Result<Self> {
		let (inverse, p0) = inverse_frame(&points)?;

		{
			let mut mesh = mesh.borrow_mut();
			let local: Vec<V3> = mesh
				.vertices
				.iter()
				.map(|v| inverse.transform_vector(&(mesh.to_world(v) - p0)))
				.collect();
			mesh.vertices = local;
			mesh.matrix_auto_update = false;
			info!(vertices = mesh.vertices.len(), "mesh bound to control points");
		}

		let binding = Self { points, mesh };
		binding.update();
		Ok(binding)
	}

	pub fn update(&self) {
		let (basis, p0) = frame(&self.points);
		self.mesh.borrow_mut().matrix_world =
			M4::new_translation(&p0) * basis.to_homogeneous();
	}

	/// Bakes the current deformation into the vertex buffer and hands the
	/// mesh back to its own position.
	pub fn release(self) -> MeshRef {
		{
			let mut mesh = self.mesh.borrow_mut();
			let position = mesh.position;
			let baked: Vec<V3> = mesh
				.world_vertices()
				.into_iter()
				.map(|w| w - position)
				.collect();
			mesh.vertices = baked;
			mesh.matrix_auto_update = true;
			mesh.update_matrix_world();
		}
		self.mesh
	}

	pub fn uses(&self, p: &PRef) -> bool {
		self.points.iter().any(|q| Rc::ptr_eq(q, p))
	}

	pub fn points(&self) -> &[PRef; 4] {
		&self.points
	}

	pub fn mesh(&self) -> &MeshRef {
		&self.mesh
	}

	pub fn render(&self) -> PrMesh {
		PrMesh {
			control_points: [0, 1, 2, 3].map(|i| self.points[i].borrow().get_id()),
			vertices: self
				.mesh
				.borrow()
				.world_vertices()
				.into_iter()
				.map(Into::into)
				.collect(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::point::Point;
	use crate::Mesh;
	use approx::assert_relative_eq;

	fn control(ps: [[f32; 3]; 4]) -> [PRef; 4] {
		ps.map(|p| Point::new_ref(V3::from(p)))
	}

	fn tetra() -> [PRef; 4] {
		control([
			[1., 1., 1.],
			[3., 1., 1.],
			[1., 2., 1.],
			[1.5, 1., 4.],
		])
	}

	fn cube_mesh() -> MeshRef {
		Mesh::new(vec![
			V3::new(-1., -1., -1.),
			V3::new(1., -1., 0.5),
			V3::new(0., 2., 0.),
			V3::new(0.3, 0.2, -0.7),
		])
		.with_position(V3::new(2., 3., -1.))
		.into_ref()
	}

	#[test]
	fn test_bind_then_update_is_identity() {
		let mesh = cube_mesh();
		let before = mesh.borrow().world_vertices();
		let binding = AttachmentBinding::bind(tetra(), mesh.clone()).unwrap();
		binding.update();
		let after = mesh.borrow().world_vertices();
		for (b, a) in before.iter().zip(after.iter()) {
			assert_relative_eq!(*b, *a, epsilon = 1e-4);
		}
		assert!(!mesh.borrow().matrix_auto_update);
	}

	#[test]
	fn test_translation_follows_p0() {
		let points = tetra();
		let mesh = cube_mesh();
		let before = mesh.borrow().world_vertices();
		let binding = AttachmentBinding::bind(points.clone(), mesh.clone()).unwrap();
		let shift = V3::new(0., -2., 5.);
		for p in points.iter() {
			p.borrow_mut().offset_pos(shift);
		}
		binding.update();
		let after = mesh.borrow().world_vertices();
		for (b, a) in before.iter().zip(after.iter()) {
			assert_relative_eq!(b + shift, *a, epsilon = 1e-4);
		}
	}

	#[test]
	fn test_stretch_scales_mesh() {
		let points = control([
			[0., 0., 0.],
			[1., 0., 0.],
			[0., 1., 0.],
			[0., 0., 1.],
		]);
		let mesh = Mesh::new(vec![V3::new(0.5, 0.5, 0.5)]).into_ref();
		let binding = AttachmentBinding::bind(points.clone(), mesh.clone()).unwrap();
		points[1].borrow_mut().reset_pos(V3::new(2., 0., 0.));
		binding.update();
		assert_relative_eq!(
			mesh.borrow().world_vertices()[0],
			V3::new(1., 0.5, 0.5),
			epsilon = 1e-5
		);
	}

	#[test]
	fn test_coplanar_is_rejected() {
		let points = control([
			[0., 0., 0.],
			[1., 0., 0.],
			[0., 1., 0.],
			[1., 1., 0.],
		]);
		let mesh = cube_mesh();
		let before = mesh.borrow().vertices.clone();
		let err = AttachmentBinding::bind(points, mesh.clone()).unwrap_err();
		assert!(matches!(err, SpringsError::SingularBasis { .. }));
		assert_eq!(mesh.borrow().vertices, before);
		assert!(mesh.borrow().matrix_auto_update);
	}

	#[test]
	fn test_validate_leaves_mesh_alone() {
		assert!(AttachmentBinding::validate(&tetra()).is_ok());
		let flat = control([
			[0., 0., 0.],
			[1., 0., 0.],
			[2., 0., 0.],
			[0., 1., 0.],
		]);
		assert!(matches!(
			AttachmentBinding::validate(&flat),
			Err(SpringsError::SingularBasis { .. })
		));
	}

	#[test]
	fn test_coincident_is_rejected() {
		let points = control([[1., 1., 1.]; 4]);
		let err = AttachmentBinding::bind(points, cube_mesh()).unwrap_err();
		assert!(matches!(err, SpringsError::SingularBasis { .. }));
	}

	#[test]
	fn test_release_keeps_shape() {
		let points = tetra();
		let mesh = cube_mesh();
		let binding = AttachmentBinding::bind(points.clone(), mesh.clone()).unwrap();
		points[3].borrow_mut().reset_pos(V3::new(1.5, 2., 6.));
		binding.update();
		let deformed = mesh.borrow().world_vertices();
		let mesh = binding.release();
		let mesh = mesh.borrow();
		assert!(mesh.matrix_auto_update);
		for (d, r) in deformed.iter().zip(mesh.world_vertices().iter()) {
			assert_relative_eq!(*d, *r, epsilon = 1e-4);
		}
	}
}
