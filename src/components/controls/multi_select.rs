use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::api::EntityOption;
use crate::components::force_graph::NodeId;
use crate::dropdown::Picker;

fn selected_ids(select: &HtmlSelectElement) -> Vec<NodeId> {
	let options = select.selected_options();
	(0..options.length())
		.filter_map(|i| options.item(i))
		.filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
		.map(|option| NodeId::from(option.value()))
		.collect()
}

/// Native multi-select bound to a [`Picker`], with a search box that narrows
/// the listed options and a button that clears the selection.
#[component]
pub fn MultiSelect(
	id: &'static str,
	label: &'static str,
	placeholder: &'static str,
	picker: RwSignal<Picker>,
) -> impl IntoView {
	let filter = RwSignal::new(String::new());
	let on_change = move |ev: leptos::ev::Event| {
		if let Some(select) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
		{
			let ids = selected_ids(&select);
			picker.update(|p| p.set_selected(&ids));
		}
	};

	view! {
		<div class="picker">
			<label for=id>{label}</label>
			<div class="picker-tools">
				<input
					type="search"
					class="picker-search"
					placeholder=placeholder
					aria-controls=id
					prop:value=move || filter.get()
					on:input=move |ev: leptos::ev::Event| filter.set(event_target_value(&ev))
				/>
				<button
					class="picker-clear"
					disabled=move || picker.with(|p| p.selected.is_empty())
					on:click=move |_| {
						filter.set(String::new());
						picker.update(Picker::clear_selection);
					}
				>
					"Clear"
				</button>
			</div>
			<select id=id multiple aria-placeholder=placeholder on:change=on_change>
				<For
					each=move || filter.with(|query| picker.with(|p| p.matching(query)))
					key=|option| option.id.clone()
					children=move |option: EntityOption| {
						let id = option.id.clone();
						view! {
							<option
								value=option.id.to_string()
								prop:selected=move || picker.with(|p| p.selected.contains(&id))
							>
								{option.label}
							</option>
						}
					}
				/>
			</select>
			<span class="picker-count">
				{move || {
					let count = picker.with(|p| p.selected.len());
					if count == 0 { placeholder.to_owned() } else { format!("{count} selected") }
				}}
			</span>
		</div>
	}
}
