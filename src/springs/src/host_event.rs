use crate::point::PRef;
use crate::MeshRef;

/// Notifications and requests a host editor sends to the simulation.
#[derive(Clone, Debug)]
pub enum HostEvent {
	PointAdded(PRef),
	PointRemoved(PRef),
	SelectionToggled(PRef),
	SelectionCleared,
	SetSelecting(bool),
	SetRunning(bool),
	BuildConstraints,
	AttachMesh(Option<MeshRef>),
	Detach,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
	Done,
	PointAdded(usize),
	// incident constraints dropped with the point
	PointRemoved(usize),
	Selected(bool),
	ConstraintsBuilt(Vec<usize>),
}
