//! Errors reported back to the host when a request is rejected.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpringsError {
	/// The request needs an exact or minimum number of selected points.
	#[error("insufficient selection: need {required} points, have {selected}")]
	InsufficientSelection { required: usize, selected: usize },

	/// The request named a target that cannot be used.
	#[error("invalid target: {0}")]
	InvalidTarget(String),

	/// The four control points do not span a volume.
	#[error("singular basis: determinant {determinant}")]
	SingularBasis { determinant: f32 },

	/// The point is not part of this simulation.
	#[error("unknown point: {0}")]
	UnknownPoint(usize),
}

impl SpringsError {
	pub fn invalid_target(reason: impl Into<String>) -> Self {
		Self::InvalidTarget(reason.into())
	}
}

pub type Result<T> = std::result::Result<T, SpringsError>;

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_display() {
		let err = SpringsError::InsufficientSelection {
			required: 4,
			selected: 3,
		};
		let msg = format!("{err}");
		assert!(msg.contains('4'));
		assert!(msg.contains('3'));
		let err = SpringsError::invalid_target("no mesh");
		assert!(err.to_string().contains("no mesh"));
	}
}
