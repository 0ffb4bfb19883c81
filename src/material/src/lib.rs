pub mod mesh;

pub type V3 = nalgebra::Vector3<f32>;
pub type M4 = nalgebra::Matrix4<f32>;
