//! Reads live trees back into [`VNode`]s.
//!
//! The result describes what is actually there, which makes it useful for adopting existing content
//! as the previous tree, or for comparing a rendering against the [`VNode`] it was rendered from.
//! Event listeners, properties and styles set through the renderer aren't visible this way.

use crate::{
	platform::Inspect,
	vnode::{h, text, Children, Data, VNode},
};
use tracing::{trace_span, warn};

/// Loads `node` and its descendants.
///
/// Returns [`None`] for nodes that are neither elements nor text, with a warning.
pub fn load_node<P: Inspect>(platform: &P, node: &P::Node) -> Option<VNode> {
	if let Some(tag) = platform.tag_name(node) {
		let span = trace_span!("Loading element", tag = tag.as_str());
		let _enter = span.enter();

		let data = load_attributes(platform, node);
		let children = load_child_nodes(platform, node);
		Some(h(tag, data, children))
	} else if let Some(data) = platform.text_data(node) {
		Some(text(data))
	} else {
		warn!("Unrecognised child node: {:?}", node);
		None
	}
}

/// Loads `node`'s child nodes as normalized [`Children`].
///
/// Empty text nodes are skipped, so an element that only contains a placeholder loads as childless.
pub fn load_child_nodes<P: Inspect>(platform: &P, node: &P::Node) -> Children {
	platform
		.child_nodes(node)
		.iter()
		.filter(|child| platform.text_data(child).map_or(true, |data| !data.is_empty()))
		.filter_map(|child| load_node(platform, child))
		.collect::<Vec<_>>()
		.into()
}

/// `class` is loaded into [`Data::class`], everything else into [`Data::attrs`].
pub fn load_attributes<P: Inspect>(platform: &P, element: &P::Node) -> Option<Data> {
	let attributes = platform.attributes(element);
	if attributes.is_empty() {
		return None;
	}

	Some(attributes.into_iter().fold(Data::new(), |data, (name, value)| {
		if name == "class" {
			data.class(value)
		} else {
			data.attr(name, value)
		}
	}))
}
