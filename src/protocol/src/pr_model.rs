// pr_model: Physical model for rendering

#[derive(Clone, Debug, PartialEq)]
pub struct PrPoint {
	pub id: usize,
	pub pos: [f32; 3],
	pub is_static: bool,
	pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrConstraint {
	pub id: usize,
	pub points: [usize; 2],
	pub ends: [[f32; 3]; 2],
}

// world space vertices of the attached mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrMesh {
	pub control_points: [usize; 4],
	pub vertices: Vec<[f32; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrModel {
	pub points: Vec<PrPoint>,
	pub constraints: Vec<PrConstraint>,
	pub mesh: Option<PrMesh>,
}
