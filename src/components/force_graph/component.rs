use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use super::gesture::{LONG_PRESS_DELAY, MoveOutcome, PointerKind};
use super::render;
use super::session::RenderSession;
use super::state::ForceGraphState;
use super::types::{GraphData, GraphNode};
use crate::config::LayoutSettings;

/// A request to open the node menu at page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMenuRequest {
	pub node: GraphNode,
	pub page_x: f64,
	pub page_y: f64,
}

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn cancel_long_press(timer: &Cell<Option<TimeoutHandle>>) {
	if let Some(handle) = timer.take() {
		handle.clear();
	}
}

/// Force-directed canvas for one graph payload at a time.
///
/// Every new value of `data` tears the previous layout down and starts a fresh
/// simulation; `settings` changes are applied to the running one.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(into)] settings: Signal<LayoutSettings>,
	#[prop(into)] on_node_menu: Callback<NodeMenuRequest>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let session: Rc<RefCell<Option<RenderSession>>> = Rc::new(RefCell::new(None));
	let long_press: Rc<Cell<Option<TimeoutHandle>>> = Rc::new(Cell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (state_init, session_init, long_press_init, animate_init) = (
		state.clone(),
		session.clone(),
		long_press.clone(),
		animate.clone(),
	);
	Effect::new(move |_| {
		let graph = data.get();
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};

		// Full teardown before anything of the new graph exists.
		session_init.borrow_mut().take();
		cancel_long_press(&long_press_init);
		let Some(graph) = graph else {
			*state_init.borrow_mut() = None;
			return;
		};

		let (w, h) = (
			container.client_width() as f64,
			container.client_height() as f64,
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		info!(
			"Rendering graph: {} nodes, {} edges ({w}x{h})",
			graph.nodes.len(),
			graph.edges.len()
		);
		*state_init.borrow_mut() = Some(ForceGraphState::new(
			&graph,
			settings.get_untracked(),
			w,
			h,
		));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		match RenderSession::observe(&container, move |nw, nh| {
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}) {
			Ok(s) => *session_init.borrow_mut() = Some(s),
			Err(err) => warn!("Resize tracking unavailable: {err:?}"),
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(window)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(cb), Some(window)) = (&*animate_init.borrow(), web_sys::window()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_settings = state.clone();
	Effect::new(move |_| {
		let settings = settings.get();
		if let Some(ref mut s) = *state_settings.borrow_mut() {
			s.apply_settings(settings);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_md.borrow_mut() {
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_press(idx, PointerKind::Mouse, x, y),
				None => s.begin_pan(x, y),
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag_to(x, y).is_none() {
				s.pan_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_press();
			s.end_pan();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_press();
			s.end_pan();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		let node = state_cm.borrow().as_ref().and_then(|s| {
			let idx = s.node_at_position(x, y)?;
			s.nodes.get(idx).cloned()
		});
		if let Some(node) = node {
			debug!("Context menu for node {}", node.id);
			on_node_menu.run(NodeMenuRequest {
				node,
				page_x: ev.page_x() as f64,
				page_y: ev.page_y() as f64,
			});
		}
	};

	let (state_ts, long_press_ts) = (state.clone(), long_press.clone());
	let on_touchstart = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		if ev.touches().length() > 1 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		ev.prevent_default();
		let (x, y) = local_point(&canvas, touch.client_x(), touch.client_y());
		let arm = {
			let mut guard = state_ts.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_press(idx, PointerKind::Touch, x, y),
				None => s.begin_pan(x, y),
			}
			s.drag
				.as_ref()
				.is_some_and(|drag| drag.press.wants_long_press_timer())
		};
		if !arm {
			return;
		}

		cancel_long_press(&long_press_ts);
		let state_lp = state_ts.clone();
		let (page_x, page_y) = (touch.page_x() as f64, touch.page_y() as f64);
		let armed = set_timeout_with_handle(
			move || {
				let node = state_lp.borrow_mut().as_mut().and_then(|s| {
					let idx = s.long_press_elapsed()?;
					s.nodes.get(idx).cloned()
				});
				if let Some(node) = node {
					debug!("Long press on node {}", node.id);
					on_node_menu.run(NodeMenuRequest {
						node,
						page_x,
						page_y,
					});
				}
			},
			LONG_PRESS_DELAY,
		);
		match armed {
			Ok(handle) => long_press_ts.set(Some(handle)),
			Err(err) => warn!("Could not arm long-press timer: {err:?}"),
		}
	};

	let (state_tm, long_press_tm) = (state.clone(), long_press.clone());
	let on_touchmove = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		ev.prevent_default();
		let (x, y) = local_point(&canvas, touch.client_x(), touch.client_y());
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			match s.drag_to(x, y) {
				Some(MoveOutcome::StartDrag) => cancel_long_press(&long_press_tm),
				Some(_) => {}
				None => s.pan_to(x, y),
			}
		}
	};

	let (state_te, long_press_te) = (state.clone(), long_press.clone());
	let on_touchend = move |_: TouchEvent| {
		cancel_long_press(&long_press_te);
		if let Some(ref mut s) = *state_te.borrow_mut() {
			s.end_press();
			s.end_pan();
		}
	};
	let on_touchcancel = on_touchend.clone();

	view! {
		<div
			node_ref=container_ref
			class="graph-container"
			style="position: relative; width: 100%; height: 100%; overflow: hidden;"
		>
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:contextmenu=on_contextmenu
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:touchcancel=on_touchcancel
				style="position: absolute; inset: 0; display: block; cursor: grab; touch-action: none;"
			/>
		</div>
	}
}
