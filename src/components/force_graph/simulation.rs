//! Force-directed layout engine.
//!
//! Follows the d3-force model: every tick decays `alpha`, lets each force nudge
//! node velocities, then integrates velocities into positions with a fixed
//! velocity decay. Pinned nodes (`fx`/`fy`) ignore the integration step.
//! Repulsion and collision are pairwise, which is fine for the
//! neighbourhood-sized graphs the API returns.

use std::f64::consts::PI;

pub const ALPHA_MIN: f64 = 0.001;
/// `1 - 0.001^(1/300)`: settles in roughly 300 ticks.
pub const DEFAULT_ALPHA_DECAY: f64 = 0.0228;
/// Energy given back to a settled layout after a parameter or viewport change.
pub const REHEAT_ALPHA: f64 = 0.3;
const VELOCITY_DECAY: f64 = 0.4;
const DISTANCE_MIN2: f64 = 1.0;
const INITIAL_RADIUS: f64 = 10.0;

/// Faster decay for small graphs so they settle quickly.
pub fn alpha_decay_for(node_count: usize) -> f64 {
	match node_count {
		0..=5 => 0.08,
		6..=20 => 0.05,
		_ => DEFAULT_ALPHA_DECAY,
	}
}

/// Strengths and targets of the four forces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Forces {
	pub link_distance: f64,
	/// Multiplier over the degree-derived per-link strength.
	pub link_strength: f64,
	/// Many-body strength; negative values repel.
	pub charge: f64,
	pub center_x: f64,
	pub center_y: f64,
	pub center_strength: f64,
	pub collide_radius: f64,
	pub collide_strength: f64,
}

impl Default for Forces {
	fn default() -> Self {
		Self {
			link_distance: 30.0,
			link_strength: 1.0,
			charge: -30.0,
			center_x: 0.0,
			center_y: 0.0,
			center_strength: 1.0,
			collide_radius: 0.0,
			collide_strength: 1.0,
		}
	}
}

impl Forces {
	/// Same geometry with every strength at zero.
	pub fn frozen(self) -> Self {
		Self {
			link_strength: 0.0,
			charge: 0.0,
			center_strength: 0.0,
			collide_strength: 0.0,
			..self
		}
	}

	/// `[link, charge, center, collide]`
	pub fn strengths(&self) -> [f64; 4] {
		[
			self.link_strength,
			self.charge,
			self.center_strength,
			self.collide_strength,
		]
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Deterministic stand-in for d3's random jiggle on coincident nodes.
#[derive(Clone, Debug)]
struct Jiggle(u64);

impl Jiggle {
	fn next(&mut self) -> f64 {
		self.0 = self
			.0
			.wrapping_mul(6364136223846793005)
			.wrapping_add(1442695040888963407);
		(((self.0 >> 33) as f64 / (1u64 << 31) as f64) - 0.5) * 1e-6
	}
}

pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<Link>,
	forces: Forces,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
	jiggle: Jiggle,
}

impl Simulation {
	/// Places `node_count` bodies on a phyllotaxis spiral around the center and
	/// resolves `links` (pairs of body indices) into weighted springs.
	pub fn new(node_count: usize, links: &[(usize, usize)], forces: Forces) -> Self {
		let angle_step = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..node_count)
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * angle_step;
				Body {
					x: forces.center_x + radius * angle.cos(),
					y: forces.center_y + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; node_count];
		for &(s, t) in links {
			degree[s] += 1;
			degree[t] += 1;
		}
		let links = links
			.iter()
			.map(|&(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Link {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			bodies,
			links,
			forces,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: alpha_decay_for(node_count),
			running: true,
			jiggle: Jiggle(node_count as u64 + 1),
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn body(&self, idx: usize) -> Option<&Body> {
		self.bodies.get(idx)
	}

	pub fn forces(&self) -> Forces {
		self.forces
	}

	pub fn set_forces(&mut self, forces: Forces) {
		self.forces = forces;
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.forces.center_x = x;
		self.forces.center_y = y;
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn alpha_decay(&self) -> f64 {
		self.alpha_decay
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Sets alpha and restarts the clock.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = alpha;
		self.restart();
	}

	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Moves a body immediately, bypassing the clock.
	pub fn place(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
		}
	}

	pub fn freeze(&mut self) {
		self.forces = self.forces.frozen();
		self.alpha = 0.0;
		self.stop();
	}

	pub fn unfreeze(&mut self, forces: Forces) {
		self.forces = forces;
		self.alpha = 1.0;
		self.alpha_decay = DEFAULT_ALPHA_DECAY;
		self.restart();
	}

	/// Advances one frame if the clock is running. Returns whether a tick ran.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < ALPHA_MIN {
			self.stop();
		}
		true
	}

	/// One tick regardless of the clock.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collide();

		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= 1.0 - VELOCITY_DECAY;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= 1.0 - VELOCITY_DECAY;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self) {
		let Self {
			bodies,
			links,
			forces,
			alpha,
			jiggle,
			..
		} = self;
		if forces.link_strength == 0.0 {
			return;
		}
		for link in links.iter() {
			let (s, t) = (bodies[link.source], bodies[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = jiggle.next();
			}
			if y == 0.0 {
				y = jiggle.next();
			}
			let len = (x * x + y * y).sqrt();
			let k = (len - forces.link_distance) / len * *alpha * link.strength * forces.link_strength;
			let (x, y) = (x * k, y * k);

			let target = &mut bodies[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut bodies[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let Self {
			bodies,
			forces,
			alpha,
			jiggle,
			..
		} = self;
		if forces.charge == 0.0 {
			return;
		}
		let positions: Vec<(f64, f64)> = bodies.iter().map(|b| (b.x, b.y)).collect();
		for (i, body) in bodies.iter_mut().enumerate() {
			for (j, &(xj, yj)) in positions.iter().enumerate() {
				if i == j {
					continue;
				}
				let mut x = xj - positions[i].0;
				let mut y = yj - positions[i].1;
				let mut len2 = x * x + y * y;
				if x == 0.0 {
					x = jiggle.next();
					len2 += x * x;
				}
				if y == 0.0 {
					y = jiggle.next();
					len2 += y * y;
				}
				if len2 < DISTANCE_MIN2 {
					len2 = (DISTANCE_MIN2 * len2).sqrt();
				}
				let w = forces.charge * *alpha / len2;
				body.vx += x * w;
				body.vy += y * w;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 || self.forces.center_strength == 0.0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let shift_x = (sx / n as f64 - self.forces.center_x) * self.forces.center_strength;
		let shift_y = (sy / n as f64 - self.forces.center_y) * self.forces.center_strength;
		for body in &mut self.bodies {
			body.x -= shift_x;
			body.y -= shift_y;
		}
	}

	fn apply_collide(&mut self) {
		let Self {
			bodies,
			forces,
			jiggle,
			..
		} = self;
		let r = forces.collide_radius;
		if r <= 0.0 || forces.collide_strength == 0.0 {
			return;
		}
		// Uniform radius, so each side of a contact takes half the correction.
		let min_dist = 2.0 * r;
		for i in 0..bodies.len() {
			let (xi, yi) = (bodies[i].x + bodies[i].vx, bodies[i].y + bodies[i].vy);
			for j in (i + 1)..bodies.len() {
				let other = bodies[j];
				let mut x = xi - (other.x + other.vx);
				let mut y = yi - (other.y + other.vy);
				let mut len2 = x * x + y * y;
				if len2 >= min_dist * min_dist {
					continue;
				}
				if x == 0.0 {
					x = jiggle.next();
					len2 += x * x;
				}
				if y == 0.0 {
					y = jiggle.next();
					len2 += y * y;
				}
				let len = len2.sqrt();
				let k = (min_dist - len) / len * forces.collide_strength;
				let (x, y) = (x * k * 0.5, y * k * 0.5);
				bodies[i].vx += x;
				bodies[i].vy += y;
				bodies[j].vx -= x;
				bodies[j].vy -= y;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distance(a: &Body, b: &Body) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn centroid(sim: &Simulation) -> (f64, f64) {
		let n = sim.bodies().len() as f64;
		let (sx, sy) = sim
			.bodies()
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		(sx / n, sy / n)
	}

	#[test]
	fn decay_adapts_to_graph_size() {
		assert_eq!(alpha_decay_for(1), 0.08);
		assert_eq!(alpha_decay_for(5), 0.08);
		assert_eq!(alpha_decay_for(6), 0.05);
		assert_eq!(alpha_decay_for(20), 0.05);
		assert_eq!(alpha_decay_for(21), DEFAULT_ALPHA_DECAY);
		assert_eq!(Simulation::new(3, &[], Forces::default()).alpha_decay(), 0.08);
	}

	#[test]
	fn clock_stops_once_alpha_is_spent() {
		let mut sim = Simulation::new(4, &[(0, 1), (1, 2)], Forces::default());
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 1000, "simulation never settled");
		}
		assert!(sim.alpha() < ALPHA_MIN);
		assert!(!sim.is_running());
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let forces = Forces {
			link_distance: 80.0,
			charge: 0.0,
			..Forces::default()
		};
		let mut sim = Simulation::new(2, &[(0, 1)], forces);
		for _ in 0..300 {
			sim.tick();
		}
		let d = distance(&sim.bodies()[0], &sim.bodies()[1]);
		assert!((d - 80.0).abs() < 2.0, "distance was {d}");
	}

	#[test]
	fn repulsion_spreads_unlinked_nodes() {
		let mut sim = Simulation::new(2, &[], Forces {
			charge: -200.0,
			..Forces::default()
		});
		let before = distance(&sim.bodies()[0], &sim.bodies()[1]);
		for _ in 0..50 {
			sim.tick();
		}
		assert!(distance(&sim.bodies()[0], &sim.bodies()[1]) > before);
	}

	#[test]
	fn centering_moves_centroid_to_target() {
		let mut sim = Simulation::new(6, &[], Forces {
			charge: 0.0,
			..Forces::default()
		});
		sim.set_center(400.0, 300.0);
		sim.tick();
		let (cx, cy) = centroid(&sim);
		assert!((cx - 400.0).abs() < 1e-6 && (cy - 300.0).abs() < 1e-6);
	}

	#[test]
	fn collision_separates_overlapping_nodes() {
		let mut sim = Simulation::new(2, &[], Forces {
			charge: 0.0,
			collide_radius: 20.0,
			..Forces::default()
		});
		for _ in 0..100 {
			sim.tick();
		}
		assert!(distance(&sim.bodies()[0], &sim.bodies()[1]) > 35.0);
	}

	#[test]
	fn pinned_body_holds_position() {
		let mut sim = Simulation::new(3, &[(0, 1), (1, 2)], Forces::default());
		sim.pin(1, 50.0, -20.0);
		for _ in 0..20 {
			sim.tick();
		}
		let body = sim.body(1).unwrap();
		assert_eq!((body.x, body.y), (50.0, -20.0));
		sim.unpin(1);
		assert!(sim.body(1).unwrap().fx.is_none());
	}

	#[test]
	fn freeze_halts_and_unfreeze_restores() {
		let forces = Forces {
			link_distance: 60.0,
			charge: -120.0,
			collide_radius: 15.0,
			..Forces::default()
		};
		let mut sim = Simulation::new(5, &[(0, 1), (1, 2), (2, 3)], forces);
		sim.step();
		sim.freeze();
		assert_eq!(sim.forces().strengths(), [0.0; 4]);
		let before = sim.bodies().to_vec();
		assert!(!sim.step());
		assert_eq!(sim.bodies(), before.as_slice());

		sim.unfreeze(forces);
		assert_eq!(sim.forces(), forces);
		assert_eq!(sim.alpha(), 1.0);
		assert_eq!(sim.alpha_decay(), DEFAULT_ALPHA_DECAY);
		assert!(sim.step());
		assert_ne!(sim.bodies(), before.as_slice());
	}
}
