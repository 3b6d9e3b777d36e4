//! Short display labels for e-text links, per collection.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LAST_SEGMENT_EXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^.]+$").unwrap());
static DCS_TEXT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"IDTextDisplay=(\d+)").unwrap());
static TEXT_ABBREVIATION: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"text_abbrv=([^&]+)").unwrap());
static MIRI_CATALOG_NUMBER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"miri_catalog_number=([^&]+)").unwrap());
static RESOURCES_PATH: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"/resources/([^?#]+?)(/)?$").unwrap());
static DCV_TRANSLATION_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tra_id=(\d+)").unwrap());
static DCV_WORK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"wor_id=(\d+)").unwrap());

/// Collections with a known link shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
	Gretil,
	Dcs,
	Sarit,
	SanskritLibraryTitus,
	VatayanaPramanaNlp,
	MuktabodhaKsts,
	UtaDharmasastra,
	DipalDcv,
	Other,
}

impl Collection {
	pub fn from_name(name: &str) -> Self {
		match name {
			"GRETIL" => Self::Gretil,
			"DCS" => Self::Dcs,
			"SARIT" => Self::Sarit,
			"Sanskrit Library and TITUS" => Self::SanskritLibraryTitus,
			"Vātāyana and Pramāṇa NLP" => Self::VatayanaPramanaNlp,
			"Muktabodha KSTS" => Self::MuktabodhaKsts,
			"UTA Dharmaśāstra" => Self::UtaDharmasastra,
			"DiPAL DCV" => Self::DipalDcv,
			_ => Self::Other,
		}
	}

	/// Label for the `idx`-th of `total` links this collection holds for a work.
	pub fn link_label(self, link: &str, idx: usize, total: usize) -> String {
		match self {
			Self::Gretil | Self::Sarit | Self::SanskritLibraryTitus | Self::Other => basename(link),
			Self::Dcs => first_capture(&DCS_TEXT_ID, link).unwrap_or_else(|| basename(link)),
			Self::VatayanaPramanaNlp => first_capture(&TEXT_ABBREVIATION, link)
				.map(|abbrv| percent_decode(&abbrv))
				.unwrap_or_else(|| basename(link)),
			Self::MuktabodhaKsts => {
				first_capture(&MIRI_CATALOG_NUMBER, link).unwrap_or_else(|| basename(link))
			}
			Self::UtaDharmasastra => {
				if link.contains("docs.google.com/document") {
					if total > 1 {
						format!("Google Doc {}", idx + 1)
					} else {
						"Google Doc".to_owned()
					}
				} else {
					first_capture(&RESOURCES_PATH, link)
						.map(|path| percent_decode(&path))
						.unwrap_or_else(|| basename(link))
				}
			}
			Self::DipalDcv => first_capture(&DCV_TRANSLATION_ID, link)
				.or_else(|| first_capture(&DCV_WORK_ID, link))
				.unwrap_or_else(|| basename(link)),
		}
	}
}

pub fn link_label(collection: &str, link: &str, idx: usize, total: usize) -> String {
	Collection::from_name(collection).link_label(link, idx, total)
}

/// Last `/`- or `=`-separated segment with its extension stripped.
pub fn basename(url: &str) -> String {
	let segment = url.rsplit(['/', '=']).next().unwrap_or(url);
	LAST_SEGMENT_EXT.replace(segment, "").into_owned()
}

fn first_capture(re: &Regex, link: &str) -> Option<String> {
	re.captures(link)
		.and_then(|caps| caps.get(1))
		.map(|m| m.as_str().to_owned())
}

fn percent_decode(raw: &str) -> String {
	urlencoding::decode(raw)
		.unwrap_or(Cow::Borrowed(raw))
		.into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basename_strips_path_query_and_extension() {
		assert_eq!(basename("https://gretil.sub.uni-goettingen.de/gretil/1_sanskr/sa_kAvyAdarza.htm"), "sa_kAvyAdarza");
		assert_eq!(basename("https://example.org/view?file=notes.v2.txt"), "notes.v2");
		assert_eq!(basename("no-separators"), "no-separators");
		assert_eq!(basename(""), "");
	}

	#[test]
	fn dcs_prefers_text_id() {
		assert_eq!(
			link_label("DCS", "http://www.sanskrit-linguistics.org/dcs/index.php?contents=texte&IDTextDisplay=165", 0, 1),
			"165"
		);
		assert_eq!(link_label("DCS", "https://github.com/OliverHellwig/sanskrit/tree/master/dcs/data/conllu/files/Rāmāyaṇa", 0, 1), "Rāmāyaṇa");
		assert_eq!(link_label("DCS", "https://example.org/extracted/Kāvyādarśa.txt", 0, 1), "Kāvyādarśa");
	}

	#[test]
	fn vatayana_decodes_abbreviation() {
		assert_eq!(
			link_label("Vātāyana and Pramāṇa NLP", "https://vatayana.info/?text_abbrv=HB%E1%B9%AC&page=2", 0, 1),
			"HBṬ"
		);
		assert_eq!(link_label("Vātāyana and Pramāṇa NLP", "https://vatayana.info/texts/NBh.html", 0, 1), "NBh");
	}

	#[test]
	fn muktabodha_uses_catalog_number() {
		assert_eq!(
			link_label("Muktabodha KSTS", "https://muktabodha.org/digital_library/book_view.htm?miri_catalog_number=M00349&x=1", 0, 1),
			"M00349"
		);
	}

	#[test]
	fn uta_numbers_google_docs_only_when_several() {
		let doc = "https://docs.google.com/document/d/abc/edit";
		assert_eq!(link_label("UTA Dharmaśāstra", doc, 0, 1), "Google Doc");
		assert_eq!(link_label("UTA Dharmaśāstra", doc, 1, 3), "Google Doc 2");
		assert_eq!(
			link_label("UTA Dharmaśāstra", "https://sites.utexas.edu/dharmasastra/resources/manu%e1%b9%a3m%e1%b9%9bti/", 0, 1),
			"manuṣmṛti"
		);
	}

	#[test]
	fn dcv_prefers_translation_then_work_id() {
		let collection = "DiPAL DCV";
		assert_eq!(link_label(collection, "https://dipal.org/dcv/?wor_id=6&tra_id=77", 0, 1), "77");
		assert_eq!(link_label(collection, "https://dipal.org/dcv/?wor_id=6", 0, 1), "6");
	}

	#[test]
	fn unknown_collection_falls_back_to_basename() {
		assert_eq!(Collection::from_name("Somewhere New"), Collection::Other);
		assert_eq!(link_label("Somewhere New", "https://x.org/a/b/Title.xml", 0, 1), "Title");
	}
}
