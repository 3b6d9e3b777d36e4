use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement, MouseEvent};

use super::model::{MenuAction, MenuEntry, build_menu};
use super::placement::{Rect, Viewport, place_menu, place_submenu};
use super::state::{MenuPath, SubmenuState};
use crate::components::force_graph::{GraphNode, NodeMenuRequest};

const COMPACT_LAYOUT_QUERY: &str = "(max-width: 768px), (hover: none)";
const NO_HOVER_QUERY: &str = "(hover: none)";
const LINK_FEEDBACK: Duration = Duration::from_millis(200);

fn matches_media(query: &str) -> bool {
	web_sys::window()
		.and_then(|w| w.match_media(query).ok().flatten())
		.is_some_and(|m| m.matches())
}

fn viewport() -> Option<Viewport> {
	let window = web_sys::window()?;
	Some(Viewport {
		width: window.inner_width().ok()?.as_f64()?,
		height: window.inner_height().ok()?.as_f64()?,
		scroll_x: window.scroll_x().unwrap_or(0.0),
		scroll_y: window.scroll_y().unwrap_or(0.0),
	})
}

const SUBMENU_STYLE_PROPS: [&str; 7] = [
	"left",
	"right",
	"top",
	"bottom",
	"max-width",
	"max-height",
	"overflow-y",
];

/// Moves an opened submenu so it stays inside the viewport, opening towards
/// the side the menu's `flip-submenus` mode prefers. Compact layouts stack
/// submenus with CSS instead.
fn position_submenu(item: &Element) {
	if matches_media(COMPACT_LAYOUT_QUERY) {
		return;
	}
	let Some(submenu) = item
		.query_selector(":scope > .submenu")
		.ok()
		.flatten()
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};
	let Some(vp) = viewport() else {
		return;
	};
	let style = submenu.style();
	for prop in SUBMENU_STYLE_PROPS {
		let _ = style.remove_property(prop);
	}
	let parent = Rect::from(item.get_bounding_client_rect());
	let natural = Rect::from(submenu.get_bounding_client_rect());
	let prefer_left = item.closest(".flip-submenus").ok().flatten().is_some();
	let placed = place_submenu(parent, natural.width, natural.height, prefer_left, vp);

	// The submenu is absolutely positioned against its parent item.
	let px = |v: f64| format!("{v}px");
	let _ = style.set_property("left", &px(placed.left - parent.left));
	let _ = style.set_property("top", &px(placed.top - parent.top));
	let _ = style.set_property("right", "auto");
	let _ = style.set_property("bottom", "auto");
	if placed.width < natural.width {
		let _ = style.set_property("max-width", &px(placed.width));
	}
	if placed.height < natural.height {
		let _ = style.set_property("max-height", &px(placed.height));
		let _ = style.set_property("overflow-y", "auto");
	}
}

/// Positions once the open class has been applied and the submenu has a box.
fn position_submenu_next_frame(item: Element) {
	request_animation_frame(move || position_submenu(&item));
}

/// Ctrl/cmd-click: open in a background tab, keep the menu open, and dim the
/// link briefly.
fn open_in_background(ev: &MouseEvent, href: &str) {
	ev.prevent_default();
	ev.stop_propagation();
	if let Some(window) = web_sys::window() {
		if let Err(err) = window.open_with_url_and_target(href, "_blank") {
			warn!("Could not open {href}: {err:?}");
		}
	}
	if let Some(link) = ev
		.current_target()
		.and_then(|t| t.dyn_into::<HtmlElement>().ok())
	{
		let _ = link.style().set_property("opacity", "0.5");
		set_timeout(
			move || {
				let _ = link.style().remove_property("opacity");
			},
			LINK_FEEDBACK,
		);
	}
}

#[derive(Clone, Copy)]
struct MenuCtx {
	submenus: RwSignal<SubmenuState>,
	dispatch: Callback<MenuAction>,
	hover_opens: bool,
}

fn render_entries(entries: Vec<MenuEntry>, parent: &[usize], ctx: MenuCtx) -> AnyView {
	entries
		.into_iter()
		.enumerate()
		.map(|(i, entry)| {
			let mut path = parent.to_vec();
			path.push(i);
			render_entry(entry, path, ctx)
		})
		.collect_view()
		.into_any()
}

fn render_entry(entry: MenuEntry, path: MenuPath, ctx: MenuCtx) -> AnyView {
	match entry {
		MenuEntry::Field { name, value } => view! {
			<li>
				<strong>{name}</strong>
				" "
				{value}
			</li>
		}
		.into_any(),
		MenuEntry::Link { label, href } => {
			let target = href.clone();
			view! {
				<li>
					<a
						href=href
						target="_blank"
						rel="noopener"
						on:click=move |ev: MouseEvent| {
							if ev.meta_key() || ev.ctrl_key() {
								open_in_background(&ev, &target);
							}
						}
					>
						{label}
					</a>
				</li>
			}
			.into_any()
		}
		MenuEntry::Action { label, action } => view! {
			<li>
				<button
					class="menu-action"
					on:click=move |ev: MouseEvent| {
						ev.stop_propagation();
						ctx.dispatch.run(action);
					}
				>
					{label}
				</button>
			</li>
		}
		.into_any(),
		MenuEntry::Submenu { title, entries } => {
			let children = render_entries(entries, &path, ctx);
			let (open_path, hover_path) = (path.clone(), path.clone());
			let submenus = ctx.submenus;
			view! {
				<li
					class="has-submenu"
					class:submenu-open=move || submenus.with(|s| s.is_open(&open_path))
					on:mouseenter=move |ev: MouseEvent| {
						if !ctx.hover_opens {
							return;
						}
						submenus.update(|s| s.hover(&hover_path));
						if let Some(item) = ev.current_target().and_then(|t| t.dyn_into::<Element>().ok()) {
							position_submenu_next_frame(item);
						}
					}
				>
					<span on:click=move |ev: MouseEvent| {
						ev.stop_propagation();
						let opened = submenus
							.try_update(|s| {
								s.toggle(&path);
								s.is_open(&path)
							})
							.unwrap_or(false);
						let item = ev
							.current_target()
							.and_then(|t| t.dyn_into::<Element>().ok())
							.and_then(|span| span.parent_element());
						if let (true, Some(item)) = (opened, item) {
							position_submenu_next_frame(item);
						}
					}>{title}</span>
					<ul class="submenu">{children}</ul>
				</li>
			}
			.into_any()
		}
	}
}

/// Per-node menu opened from the graph canvas.
///
/// Closes on any click or touch outside of it. Actions are reported through
/// `on_action`; the owner decides when to close via `on_close` or by clearing
/// `request`.
#[component]
pub fn NodeContextMenu(
	#[prop(into)] request: Signal<Option<NodeMenuRequest>>,
	#[prop(into)] on_action: Callback<(GraphNode, MenuAction)>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let menu_ref = NodeRef::<leptos::html::Div>::new();
	let submenus = RwSignal::new(SubmenuState::default());
	let placement = RwSignal::new(None);

	let dispatch = Callback::new(move |action: MenuAction| {
		if let Some(req) = request.get_untracked() {
			debug!("Menu action {action:?} on node {}", req.node.id);
			on_action.run((req.node, action));
		}
	});

	Effect::new(move |_| {
		let req = request.get();
		submenus.set(SubmenuState::default());
		placement.set(None);
		let Some(req) = req else {
			return;
		};
		request_animation_frame(move || {
			let (Some(menu), Some(vp)) = (menu_ref.get_untracked(), viewport()) else {
				return;
			};
			let rect = menu.get_bounding_client_rect();
			placement.set(Some(place_menu(
				req.page_x,
				req.page_y,
				rect.width(),
				rect.height(),
				vp,
			)));
		});
	});

	let close_if_outside = move |target: Option<EventTarget>| {
		if request.with_untracked(Option::is_none) {
			return;
		}
		let inside = match (menu_ref.get_untracked(), target) {
			(Some(menu), Some(target)) => target
				.dyn_ref::<web_sys::Node>()
				.is_some_and(|node| menu.contains(Some(node))),
			_ => false,
		};
		if !inside {
			submenus.update(SubmenuState::close_all);
			on_close.run(());
		}
	};
	let click = window_event_listener(ev::click, move |ev| close_if_outside(ev.target()));
	let touch = window_event_listener(ev::touchstart, move |ev| close_if_outside(ev.target()));
	on_cleanup(move || {
		click.remove();
		touch.remove();
	});

	let on_mouseleave = move |_: MouseEvent| {
		if !matches_media(NO_HOVER_QUERY) {
			submenus.update(SubmenuState::close_all);
		}
	};

	view! {
		<div
			node_ref=menu_ref
			class="custom-context-menu"
			class:flip-submenus=move || placement.get().is_some_and(|p| p.flip_submenus)
			style:display=move || if request.with(Option::is_some) { "block" } else { "none" }
			style:visibility=move || if placement.with(Option::is_some) { "visible" } else { "hidden" }
			style:left=move || format!("{}px", placement.get().map_or(0.0, |p| p.left))
			style:top=move || format!("{}px", placement.get().map_or(0.0, |p| p.top))
			on:mouseleave=on_mouseleave
		>
			{move || {
				request
					.get()
					.map(|req| {
						let ctx = MenuCtx {
							submenus,
							dispatch,
							hover_opens: !matches_media(NO_HOVER_QUERY),
						};
						view! { <ul class="nested-menu">{render_entries(build_menu(&req.node), &[], ctx)}</ul> }
					})
			}}
		</div>
	}
}
