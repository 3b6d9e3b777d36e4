use leptos::prelude::*;

use super::layout::{FreezeSwitch, SettingSlider};
use super::multi_select::MultiSelect;
use crate::config::{
	CENTER_STRENGTH_RANGE, COLLISION_RADIUS_RANGE, LINK_DISTANCE_RANGE, MAX_HOPS, REPULSION_RANGE,
};
use crate::explorer::Explorer;

/// Query pickers and layout controls.
#[component]
pub fn Sidebar(explorer: Explorer) -> impl IntoView {
	let settings = explorer.settings;
	let hops = explorer.hops;

	let on_hops = move |ev: leptos::ev::Event| {
		if let Ok(value) = event_target_value(&ev).trim().parse::<u32>() {
			hops.set(value.clamp(1, MAX_HOPS));
		}
	};

	view! {
		<button
			class="sidebar-toggle"
			aria-label="Toggle controls"
			on:click=move |_| explorer.sidebar_open.update(|open| *open = !*open)
		>
			"☰"
		</button>
		<aside id="sidebar" class="sidebar" class:open=move || explorer.sidebar_open.get()>
			<section class="query-controls">
				<MultiSelect
					id="authors-dropdown"
					label="Authors"
					placeholder="Authors to include"
					picker=explorer.pickers.authors
				/>
				<MultiSelect
					id="works-dropdown"
					label="Works"
					placeholder="Works to include"
					picker=explorer.pickers.works
				/>
				<MultiSelect
					id="exclude-list-dropdown"
					label="Exclusions"
					placeholder="Entities to not expand"
					picker=explorer.pickers.exclude
				/>
				<div class="hops-control">
					<label for="hops">"Hops"</label>
					<input
						type="number"
						id="hops"
						min="1"
						max=MAX_HOPS.to_string()
						prop:value=move || hops.get().to_string()
						on:change=on_hops
					/>
				</div>
				<button id="fetch-button" on:click=move |_| explorer.fetch_current()>
					"Generate graph"
				</button>
			</section>
			<section class="layout-controls">
				<SettingSlider
					id="linkDistance"
					label="Link distance"
					range=LINK_DISTANCE_RANGE
					step=1.0
					settings=settings
					get=|s| s.link_distance
					set=|s, v| s.link_distance = v
				/>
				<SettingSlider
					id="chargeStrength"
					label="Repulsion"
					range=REPULSION_RANGE
					step=10.0
					settings=settings
					get=|s| s.repulsion
					set=|s, v| s.repulsion = v
				/>
				<SettingSlider
					id="collisionRadius"
					label="Collision radius"
					range=COLLISION_RADIUS_RANGE
					step=1.0
					settings=settings
					get=|s| s.collision_radius
					set=|s, v| s.collision_radius = v
				/>
				<SettingSlider
					id="centerStrength"
					label="Centering"
					range=CENTER_STRENGTH_RANGE
					step=0.05
					settings=settings
					get=|s| s.center_strength.unwrap_or(1.0)
					set=|s, v| s.center_strength = Some(v)
				/>
				<FreezeSwitch settings=settings />
			</section>
		</aside>
	}
}
