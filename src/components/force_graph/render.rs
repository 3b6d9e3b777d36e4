use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::types::{GraphNode, NodeKind};

pub const CENTRAL_RADIUS: f64 = 17.0;
pub const EXCLUDED_RADIUS: f64 = 15.0;
pub const DEFAULT_RADIUS: f64 = 10.0;
/// Labels sit this far above their node's center.
pub const LABEL_OFFSET: f64 = 15.0;

const BACKGROUND: &str = "#1a1a2e";
const EDGE_COLOR: &str = "rgba(153, 153, 153, 0.6)";
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.85)";
const AUTHOR_FILL: &str = "#1f77b4";
const WORK_FILL: &str = "#ff7f0e";
const EXCLUDED_FILL: &str = "#7f7f7f";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	pub color: &'static str,
	pub width: f64,
}

/// Marks works that carry e-text links.
pub const ETEXT_STROKE: Stroke = Stroke {
	color: "gold",
	width: 4.0,
};
pub const DEFAULT_STROKE: Stroke = Stroke {
	color: "#ffffff",
	width: 1.0,
};

pub fn node_radius(is_central: bool, is_excluded: bool) -> f64 {
	if is_central {
		CENTRAL_RADIUS
	} else if is_excluded {
		EXCLUDED_RADIUS
	} else {
		DEFAULT_RADIUS
	}
}

pub fn node_stroke(node: &GraphNode) -> Stroke {
	if node.kind == NodeKind::Work && node.has_etext_links() {
		ETEXT_STROKE
	} else {
		DEFAULT_STROKE
	}
}

fn node_fill(node: &GraphNode) -> &'static str {
	match (node.is_excluded, node.kind) {
		(true, _) => EXCLUDED_FILL,
		(false, NodeKind::Author) => AUTHOR_FILL,
		(false, NodeKind::Work) => WORK_FILL,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CirclePrimitive {
	pub node_idx: usize,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: &'static str,
	pub stroke: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelPrimitive<'a> {
	pub x: f64,
	pub y: f64,
	pub text: &'a str,
}

/// Graph-space primitives for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene<'a> {
	pub lines: Vec<LinePrimitive>,
	pub circles: Vec<CirclePrimitive>,
	pub labels: Vec<LabelPrimitive<'a>>,
}

pub fn build_scene(state: &ForceGraphState) -> Scene<'_> {
	let bodies = state.simulation.bodies();
	let lines = state
		.edges
		.iter()
		.map(|&(s, t)| LinePrimitive {
			x1: bodies[s].x,
			y1: bodies[s].y,
			x2: bodies[t].x,
			y2: bodies[t].y,
		})
		.collect();

	let mut circles = Vec::with_capacity(state.nodes.len());
	let mut labels = Vec::with_capacity(state.nodes.len());
	for (idx, (node, body)) in state.nodes.iter().zip(bodies).enumerate() {
		circles.push(CirclePrimitive {
			node_idx: idx,
			x: body.x,
			y: body.y,
			radius: node_radius(node.is_central, node.is_excluded),
			fill: node_fill(node),
			stroke: node_stroke(node),
		});
		labels.push(LabelPrimitive {
			x: body.x,
			y: body.y - LABEL_OFFSET,
			text: &node.label,
		});
	}

	Scene {
		lines,
		circles,
		labels,
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let scene = build_scene(state);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_lines(&scene.lines, ctx);
	draw_circles(&scene.circles, ctx);
	draw_labels(&scene.labels, ctx);
	ctx.restore();
}

fn draw_lines(lines: &[LinePrimitive], ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(1.5);
	ctx.begin_path();
	for line in lines {
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(line.x2, line.y2);
	}
	ctx.stroke();
}

fn draw_circles(circles: &[CirclePrimitive], ctx: &CanvasRenderingContext2d) {
	for circle in circles {
		ctx.begin_path();
		let _ = ctx.arc(circle.x, circle.y, circle.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(circle.fill);
		ctx.fill();
		ctx.set_stroke_style_str(circle.stroke.color);
		ctx.set_line_width(circle.stroke.width);
		ctx.stroke();
	}
}

fn draw_labels(labels: &[LabelPrimitive<'_>], ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	for label in labels {
		let _ = ctx.fill_text(label.text, label.x, label.y);
	}
}
