//! The seam between the renderer and whatever actually holds the live tree.
//!
//! The renderer never touches a live node except through [`Platform`].

use crate::vnode::{Handler, Value};
use core::fmt::Debug;

/// Primitive live-tree operations.
///
/// Implementations report their own failures (through [`tracing`]) instead of returning them,
/// since the renderer can't do anything more useful about a failed DOM call than to carry on.
pub trait Platform {
	/// A handle to a live node. Clones must refer to the same node, and equality must be identity.
	type Node: Clone + PartialEq + Debug + 'static;

	fn create_element(&mut self, tag: &str, is_svg: bool) -> Self::Node;
	fn create_text_node(&mut self, text: &str) -> Self::Node;

	fn append_child(&mut self, container: &Self::Node, node: &Self::Node);
	/// Inserts (or moves) `node` before `reference`, or appends it if `reference` is [`None`].
	fn insert_before(&mut self, container: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>);
	fn remove_child(&mut self, container: &Self::Node, node: &Self::Node);

	fn set_text(&mut self, node: &Self::Node, text: &str);
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
	fn query(&self, selector: &str) -> Option<Self::Node>;

	fn set_class(&mut self, element: &Self::Node, class: &str);
	fn set_style(&mut self, element: &Self::Node, name: &str, value: &str);
	fn remove_style(&mut self, element: &Self::Node, name: &str);
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str);
	fn remove_attribute(&mut self, element: &Self::Node, name: &str);
	fn set_property(&mut self, element: &Self::Node, name: &str, value: &Value);
	fn remove_property(&mut self, element: &Self::Node, name: &str);
	fn add_event_listener(&mut self, element: &Self::Node, event: &str, handler: &Handler);
	fn remove_event_listener(&mut self, element: &Self::Node, event: &str, handler: &Handler);

	/// Called once at the end of each [`Renderer::render`](`crate::Renderer::render`) call.
	fn finish_render(&mut self) {}
}

/// Read access to a live tree, used by [`load`](`crate::load`).
pub trait Inspect: Platform {
	fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;
	/// [`None`] for text nodes.
	fn tag_name(&self, node: &Self::Node) -> Option<String>;
	/// [`None`] for elements.
	fn text_data(&self, node: &Self::Node) -> Option<String>;
	/// Attributes including `class`, in a stable order.
	fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;
}
