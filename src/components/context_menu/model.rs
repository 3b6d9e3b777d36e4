use super::labels::link_label;
use crate::components::force_graph::{CollectionLinks, GraphNode, LinkList};
use crate::config::{PROFILE_SITE_NAME, profile_url};

/// Hop counts offered under "Recenter".
pub const RECENTER_HOPS: [u32; 3] = [1, 2, 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
	Recenter { hops: u32 },
	Collapse,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MenuEntry {
	/// Bold heading followed by a value.
	Field { name: String, value: String },
	Link { label: String, href: String },
	Action { label: String, action: MenuAction },
	Submenu { title: String, entries: Vec<MenuEntry> },
}

impl MenuEntry {
	fn field(name: &str, value: impl Into<String>) -> Self {
		Self::Field {
			name: name.to_owned(),
			value: value.into(),
		}
	}

	fn submenu(title: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
		Self::Submenu {
			title: title.into(),
			entries,
		}
	}
}

fn link_entries(collection: &str, links: &LinkList) -> Vec<MenuEntry> {
	let total = links.0.len();
	links
		.0
		.iter()
		.enumerate()
		.map(|(idx, href)| MenuEntry::Link {
			label: link_label(collection, href, idx, total),
			href: href.clone(),
		})
		.collect()
}

fn collection_entries(collection: &str, links: &CollectionLinks) -> Vec<MenuEntry> {
	match links {
		CollectionLinks::Flat(list) => link_entries(collection, list),
		CollectionLinks::Categorized(categories) => categories
			.iter()
			.map(|(category, list)| MenuEntry::submenu(category, link_entries(collection, list)))
			.collect(),
	}
}

/// Top-level entries of the menu for `node`.
pub fn build_menu(node: &GraphNode) -> Vec<MenuEntry> {
	let more_info = [
		("Aka:", &node.aka),
		("Social Identifiers:", &node.social_ids),
		("Date:", &node.dates),
		("Discipline:", &node.discipline),
		("Disciplines:", &node.disciplines),
	]
	.into_iter()
	.filter_map(|(name, value)| {
		value
			.as_deref()
			.filter(|v| !v.is_empty())
			.map(|v| MenuEntry::field(name, v))
	})
	.collect();

	let mut view_on = vec![MenuEntry::Link {
		label: PROFILE_SITE_NAME.to_owned(),
		href: profile_url(&node.id),
	}];
	if let Some(etext) = &node.etext_links {
		view_on.extend(
			etext
				.iter()
				.map(|(collection, links)| MenuEntry::submenu(collection, collection_entries(collection, links))),
		);
	}

	let recenter = RECENTER_HOPS
		.iter()
		.map(|&hops| MenuEntry::Action {
			label: if hops == 1 {
				"1 hop".to_owned()
			} else {
				format!("{hops} hops")
			},
			action: MenuAction::Recenter { hops },
		})
		.collect();

	vec![
		MenuEntry::field(&format!("{} ID:", node.kind.title()), node.id.to_string()),
		MenuEntry::submenu("More info", more_info),
		MenuEntry::submenu("View on", view_on),
		MenuEntry::submenu("Recenter", recenter),
		MenuEntry::submenu(
			"Exclusions",
			vec![MenuEntry::Action {
				label: "Collapse".to_owned(),
				action: MenuAction::Collapse,
			}],
		),
	]
}

#[cfg(test)]
mod tests {
	use indexmap::IndexMap;

	use super::*;
	use crate::components::force_graph::NodeKind;

	fn submenu<'a>(entries: &'a [MenuEntry], title: &str) -> &'a [MenuEntry] {
		entries
			.iter()
			.find_map(|e| match e {
				MenuEntry::Submenu { title: t, entries } if t == title => Some(entries.as_slice()),
				_ => None,
			})
			.unwrap_or_else(|| panic!("no submenu {title}"))
	}

	#[test]
	fn work_info_fields_carry_colons_and_skip_blanks() {
		let mut node = GraphNode::new("7", NodeKind::Work, "Kāvyādarśa");
		node.dates = Some("c. 700".into());
		node.discipline = Some("Alaṃkāraśāstra".into());
		node.social_ids = Some(String::new());
		let menu = build_menu(&node);
		assert_eq!(
			submenu(&menu, "More info"),
			[
				MenuEntry::field("Date:", "c. 700"),
				MenuEntry::field("Discipline:", "Alaṃkāraśāstra"),
			]
		);
	}

	#[test]
	fn author_menu_lists_present_fields_only() {
		let mut node = GraphNode::new("42", NodeKind::Author, "Daṇḍin");
		node.aka = Some("Daṇḍī".into());
		node.disciplines = Some("Alaṃkāraśāstra (3)".into());
		let menu = build_menu(&node);

		assert_eq!(menu[0], MenuEntry::field("Author ID:", "42"));
		let info = submenu(&menu, "More info");
		assert_eq!(
			info,
			[
				MenuEntry::field("Aka:", "Daṇḍī"),
				MenuEntry::field("Disciplines:", "Alaṃkāraśāstra (3)"),
			]
		);
		let view_on = submenu(&menu, "View on");
		assert_eq!(
			view_on,
			[MenuEntry::Link {
				label: "Pandit".into(),
				href: "https://www.panditproject.org/node/42".into(),
			}]
		);
	}

	#[test]
	fn recenter_and_collapse_actions() {
		let menu = build_menu(&GraphNode::new("1", NodeKind::Work, "w"));
		let actions: Vec<_> = submenu(&menu, "Recenter")
			.iter()
			.map(|e| match e {
				MenuEntry::Action { label, action } => (label.as_str(), *action),
				other => panic!("unexpected {other:?}"),
			})
			.collect();
		assert_eq!(
			actions,
			[
				("1 hop", MenuAction::Recenter { hops: 1 }),
				("2 hops", MenuAction::Recenter { hops: 2 }),
				("3 hops", MenuAction::Recenter { hops: 3 }),
			]
		);
		assert!(matches!(
			submenu(&menu, "Exclusions"),
			[MenuEntry::Action { action: MenuAction::Collapse, .. }]
		));
	}

	#[test]
	fn collections_become_nested_submenus() {
		let mut node = GraphNode::new("7", NodeKind::Work, "Kāvyādarśa");
		let mut etext = IndexMap::new();
		etext.insert(
			"GRETIL".to_owned(),
			CollectionLinks::Flat(LinkList(vec!["https://gretil/x/sa_kAvyAdarza.htm".into()])),
		);
		let mut categories = IndexMap::new();
		categories.insert(
			"web".to_owned(),
			LinkList(vec!["https://dcs/index.php?IDTextDisplay=165".into()]),
		);
		etext.insert("DCS".to_owned(), CollectionLinks::Categorized(categories));
		node.etext_links = Some(etext);

		let menu = build_menu(&node);
		let view_on = submenu(&menu, "View on");
		assert_eq!(view_on.len(), 3);
		assert_eq!(
			submenu(view_on, "GRETIL"),
			[MenuEntry::Link {
				label: "sa_kAvyAdarza".into(),
				href: "https://gretil/x/sa_kAvyAdarza.htm".into(),
			}]
		);
		let dcs = submenu(view_on, "DCS");
		assert_eq!(
			submenu(dcs, "web"),
			[MenuEntry::Link {
				label: "165".into(),
				href: "https://dcs/index.php?IDTextDisplay=165".into(),
			}]
		);
	}
}
