use std::ops::RangeInclusive;

use leptos::prelude::*;

use crate::config::LayoutSettings;

/// One slider bound to a field of the layout settings.
#[component]
pub fn SettingSlider(
	id: &'static str,
	label: &'static str,
	range: RangeInclusive<f64>,
	step: f64,
	settings: RwSignal<LayoutSettings>,
	get: fn(&LayoutSettings) -> f64,
	set: fn(&mut LayoutSettings, f64),
) -> impl IntoView {
	let (min, max) = (*range.start(), *range.end());
	let on_input = move |ev: leptos::ev::Event| {
		if let Ok(value) = event_target_value(&ev).parse::<f64>() {
			settings.update(|s| set(s, value.clamp(min, max)));
		}
	};

	view! {
		<div class="slider-control">
			<label for=id>{label} " " <span class="slider-value">{move || settings.with(get)}</span></label>
			<input
				type="range"
				id=id
				min=min.to_string()
				max=max.to_string()
				step=step.to_string()
				prop:value=move || settings.with(get).to_string()
				on:input=on_input
			/>
		</div>
	}
}

#[component]
pub fn FreezeSwitch(settings: RwSignal<LayoutSettings>) -> impl IntoView {
	view! {
		<label class="switch-control" for="freezeSwitch">
			<input
				type="checkbox"
				id="freezeSwitch"
				prop:checked=move || settings.with(|s| s.frozen)
				on:change=move |ev| {
					let frozen = event_target_checked(&ev);
					settings.update(|s| s.frozen = frozen);
				}
			/>
			" Freeze layout"
		</label>
	}
}
