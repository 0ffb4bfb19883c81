use std::time::SystemTime;

use springs::point::Point;
use springs::world::Springs;
use springs::V3;

// a grid of ropes hanging from pinned anchors
fn build(world: &mut Springs, ropes: usize, len: usize) {
	for r in 0..ropes {
		world.clear_selection();
		for i in 0..len {
			let pos = V3::new(r as f32, 10.0, i as f32 * 0.5);
			let p = if i == 0 {
				Point::new_static_ref(pos)
			} else {
				Point::new_ref(pos)
			};
			world.on_point_added(p.clone());
			let _ = world.on_selection_toggled(&p);
		}
		let _ = world.on_build_constraints_requested();
	}
	world.clear_selection();
}

fn main() {
	let mut world = Springs::default().with_running();
	build(&mut world, 50, 40);
	let start = SystemTime::now();
	let rframes = 1000;
	let mut degenerate = 0;
	for _ in 0..rframes {
		if let Some(report) = world.integrate() {
			degenerate += report.satisfy.degenerate;
		}
	}
	let duration = SystemTime::now()
		.duration_since(start)
		.map(|d| d.as_micros())
		.unwrap_or_default();
	eprintln!(
		"{} points, {} constraints: {:.1}us/frame, {} degenerate",
		world.points().len(),
		world.constraints().len(),
		duration as f32 / rframes as f32,
		degenerate,
	);
}
