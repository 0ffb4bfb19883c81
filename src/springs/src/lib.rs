pub mod attachment;
pub mod clock;
pub mod config;
pub mod constraint;
pub mod error;
pub mod host_event;
pub mod point;
pub mod world;

pub use material::mesh::{Mesh, MeshRef};

pub type V3 = nalgebra::Vector3<f32>;
pub type M3 = nalgebra::Matrix3<f32>;
pub type M4 = nalgebra::Matrix4<f32>;
