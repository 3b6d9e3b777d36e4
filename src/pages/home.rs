use leptos::prelude::*;

use crate::api::ApiClient;
use crate::components::context_menu::{MenuAction, NodeContextMenu};
use crate::components::controls::Sidebar;
use crate::components::force_graph::{ForceGraphCanvas, GraphNode, NodeMenuRequest};
use crate::explorer::Explorer;

#[component]
fn ExplorerView(explorer: Explorer) -> impl IntoView {
	view! {
		<div class="explorer">
			<Sidebar explorer=explorer />
			<main id="graph-container" class="graph-area">
				<ForceGraphCanvas
					data=explorer.graph
					settings=explorer.settings
					on_node_menu=move |request: NodeMenuRequest| explorer.menu.set(Some(request))
				/>
			</main>
			<NodeContextMenu
				request=explorer.menu
				on_action=move |(node, action): (GraphNode, MenuAction)| explorer.handle_menu_action(node, action)
				on_close=move |_: ()| explorer.menu.set(None)
			/>
		</div>
	}
}

/// Explorer page: pickers, the graph canvas and the node menu.
#[component]
pub fn Home() -> impl IntoView {
	let explorer = ApiClient::from_window().map(Explorer::new);
	if let Ok(explorer) = explorer.as_ref() {
		explorer.load();
	}

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{explorer.map(|explorer| view! { <ExplorerView explorer=explorer /> })}
		</ErrorBoundary>
	}
}
