//! An off-screen live tree.
//!
//! [`MemoryDom`] implements [`Platform`] on an arena of nodes and counts the structural operations
//! performed on it, which makes it suitable for headless rendering and for asserting how much work a patch did.

use crate::{
	platform::{Inspect, Platform},
	vnode::{Handler, Value},
};
use core::fmt::Write as _;
use hashbrown::HashMap;
use tracing::{error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The event type [`MemoryDom::dispatch`] passes to [`Handler`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEvent {
	pub name: String,
	pub target: NodeId,
}

#[derive(Debug, Default)]
pub struct ElementData {
	pub tag: String,
	pub svg: bool,
	pub class: String,
	pub style: HashMap<String, String>,
	pub attributes: HashMap<String, String>,
	pub properties: HashMap<String, Value>,
	pub listeners: HashMap<String, Vec<Handler>>,
}

#[derive(Debug)]
pub enum Content {
	Element(ElementData),
	Text(String),
}

#[derive(Debug)]
struct MemoryNode {
	content: Content,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Operation counts since creation or the last [`MemoryDom::reset_stats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
	pub elements_created: usize,
	pub texts_created: usize,
	/// Detached nodes inserted.
	pub insertions: usize,
	/// Attached nodes inserted (again).
	pub moves: usize,
	pub removals: usize,
	pub text_updates: usize,
}

/// An arena-backed live tree.
///
/// Nodes are never freed: a removed node keeps its [`NodeId`] and content for the lifetime of the `MemoryDom`,
/// so ids held across patches stay valid for inspection. Memory use grows with the total number of nodes ever created.
#[derive(Debug, Default)]
pub struct MemoryDom {
	nodes: Vec<MemoryNode>,
	roots: Vec<NodeId>,
	stats: Stats,
}
impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached element that [`Platform::query`] searches, without counting it in [`Stats`].
	pub fn create_root(&mut self, tag: &str) -> NodeId {
		let root = self.push(Content::Element(ElementData {
			tag: tag.to_string(),
			..ElementData::default()
		}));
		self.roots.push(root);
		root
	}

	#[must_use]
	pub fn stats(&self) -> Stats {
		self.stats
	}

	pub fn reset_stats(&mut self) {
		self.stats = Stats::default()
	}

	#[must_use]
	pub fn content(&self, node: NodeId) -> &Content {
		&self.nodes[node.0].content
	}

	#[must_use]
	pub fn element(&self, node: NodeId) -> Option<&ElementData> {
		match &self.nodes[node.0].content {
			Content::Element(element) => Some(element),
			Content::Text(_) => None,
		}
	}

	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match &self.nodes[node.0].content {
			Content::Text(text) => Some(text),
			Content::Element(_) => None,
		}
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		self.element(node).map(|element| element.tag.as_str())
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.element(node).and_then(|element| element.attributes.get(name)).map(String::as_str)
	}

	#[must_use]
	pub fn property(&self, node: NodeId, name: &str) -> Option<&Value> {
		self.element(node).and_then(|element| element.properties.get(name))
	}

	#[must_use]
	pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
		self.element(node).and_then(|element| element.style.get(name)).map(String::as_str)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		&self.nodes[node.0].children
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes[node.0].parent
	}

	/// Concatenated text of all descendant text nodes.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let mut text = String::new();
		self.collect_text(node, &mut text);
		text
	}

	fn collect_text(&self, node: NodeId, text: &mut String) {
		match &self.nodes[node.0].content {
			Content::Text(data) => text.push_str(data),
			Content::Element(_) => {
				for &child in &self.nodes[node.0].children {
					self.collect_text(child, text)
				}
			}
		}
	}

	/// Serializes `node` as HTML-ish markup, with attributes sorted and empty text nodes omitted.
	#[must_use]
	pub fn to_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		match &self.nodes[node.0].content {
			Content::Text(text) => html.push_str(text),
			Content::Element(element) => {
				let _ = write!(html, "<{}", element.tag);
				let mut attributes = self.attributes(&node);
				attributes.sort();
				for (name, value) in attributes {
					let _ = write!(html, " {}=\"{}\"", name, value);
				}
				html.push('>');
				for &child in &self.nodes[node.0].children {
					self.write_html(child, html)
				}
				let _ = write!(html, "</{}>", element.tag);
			}
		}
	}

	/// Calls `node`'s listeners for `event` with a [`MemoryEvent`].
	pub fn dispatch(&self, node: NodeId, event: &str) {
		let handlers = self
			.element(node)
			.and_then(|element| element.listeners.get(event))
			.cloned()
			.unwrap_or_default();
		let event = MemoryEvent {
			name: event.to_string(),
			target: node,
		};
		for handler in handlers {
			handler.call(&event)
		}
	}

	fn push(&mut self, content: Content) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(MemoryNode {
			content,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
		match &mut self.nodes[node.0].content {
			Content::Element(element) => Some(element),
			Content::Text(_) => {
				error!("Expected element but found text node {:?}.", node);
				None
			}
		}
	}

	fn detach(&mut self, node: NodeId) -> bool {
		match self.nodes[node.0].parent.take() {
			Some(parent) => {
				self.nodes[parent.0].children.retain(|&child| child != node);
				true
			}
			None => false,
		}
	}

	fn matches(&self, node: NodeId, selector: &str) -> bool {
		let element = match self.element(node) {
			Some(element) => element,
			None => return false,
		};
		if let Some(id) = selector.strip_prefix('#') {
			element.attributes.get("id").map_or(false, |value| value == id)
		} else if let Some(class) = selector.strip_prefix('.') {
			element.class.split_whitespace().any(|c| c == class)
		} else {
			element.tag.eq_ignore_ascii_case(selector)
		}
	}

	fn find(&self, node: NodeId, selector: &str) -> Option<NodeId> {
		if self.matches(node, selector) {
			return Some(node);
		}
		self.nodes[node.0].children.iter().find_map(|&child| self.find(child, selector))
	}
}

impl Platform for MemoryDom {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str, is_svg: bool) -> NodeId {
		self.stats.elements_created += 1;
		self.push(Content::Element(ElementData {
			tag: tag.to_string(),
			svg: is_svg,
			..ElementData::default()
		}))
	}

	fn create_text_node(&mut self, text: &str) -> NodeId {
		self.stats.texts_created += 1;
		self.push(Content::Text(text.to_string()))
	}

	fn append_child(&mut self, container: &NodeId, node: &NodeId) {
		self.insert_before(container, node, None)
	}

	fn insert_before(&mut self, container: &NodeId, node: &NodeId, reference: Option<&NodeId>) {
		let (container, node) = (*container, *node);
		if self.element(container).is_none() {
			return error!("Can't insert into text node {:?}.", container);
		}
		if reference == Some(&node) {
			return trace!("Node {:?} inserted before itself.", node);
		}

		if self.detach(node) {
			self.stats.moves += 1
		} else {
			self.stats.insertions += 1
		}

		let children = &mut self.nodes[container.0].children;
		let index = match reference {
			None => children.len(),
			Some(reference) => match children.iter().position(|child| child == reference) {
				Some(index) => index,
				None => {
					error!("Reference node {:?} is not a child of {:?}. Appending.", reference, container);
					children.len()
				}
			},
		};
		children.insert(index, node);
		self.nodes[node.0].parent = Some(container);
	}

	fn remove_child(&mut self, container: &NodeId, node: &NodeId) {
		if self.nodes[node.0].parent != Some(*container) {
			return error!("Node {:?} to remove is not a child of {:?}.", node, container);
		}
		self.detach(*node);
		self.stats.removals += 1;
	}

	fn set_text(&mut self, node: &NodeId, text: &str) {
		match &mut self.nodes[node.0].content {
			Content::Text(data) => {
				*data = text.to_string();
				self.stats.text_updates += 1;
			}
			Content::Element(_) => error!("Can't set text of element {:?}.", node),
		}
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let parent = self.nodes[node.0].parent?;
		let siblings = &self.nodes[parent.0].children;
		let index = siblings.iter().position(|sibling| sibling == node)?;
		siblings.get(index + 1).copied()
	}

	fn query(&self, selector: &str) -> Option<NodeId> {
		self.roots.iter().find_map(|&root| self.find(root, selector))
	}

	fn set_class(&mut self, element: &NodeId, class: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.class = class.to_string()
		}
	}

	fn set_style(&mut self, element: &NodeId, name: &str, value: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.style.insert(name.to_string(), value.to_string());
		}
	}

	fn remove_style(&mut self, element: &NodeId, name: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.style.remove(name);
		}
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.attributes.insert(name.to_string(), value.to_string());
		}
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.attributes.remove(name);
		}
	}

	fn set_property(&mut self, element: &NodeId, name: &str, value: &Value) {
		if let Some(element) = self.element_mut(*element) {
			element.properties.insert(name.to_string(), value.clone());
		}
	}

	fn remove_property(&mut self, element: &NodeId, name: &str) {
		if let Some(element) = self.element_mut(*element) {
			element.properties.remove(name);
		}
	}

	fn add_event_listener(&mut self, element: &NodeId, event: &str, handler: &Handler) {
		if let Some(element) = self.element_mut(*element) {
			let listeners = element.listeners.entry(event.to_string()).or_insert_with(Vec::new);
			// Like the DOM, ignore a listener that is already registered.
			if !listeners.iter().any(|listener| listener.ptr_eq(handler)) {
				listeners.push(handler.clone())
			}
		}
	}

	fn remove_event_listener(&mut self, element: &NodeId, event: &str, handler: &Handler) {
		if let Some(element) = self.element_mut(*element) {
			if let Some(listeners) = element.listeners.get_mut(event) {
				listeners.retain(|listener| !listener.ptr_eq(handler));
				if listeners.is_empty() {
					element.listeners.remove(event);
				}
			}
		}
	}
}

impl Inspect for MemoryDom {
	fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
		self.nodes[node.0].children.clone()
	}

	fn tag_name(&self, node: &NodeId) -> Option<String> {
		self.tag(*node).map(str::to_string)
	}

	fn text_data(&self, node: &NodeId) -> Option<String> {
		self.text(*node).map(str::to_string)
	}

	fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
		let element = match self.element(*node) {
			Some(element) => element,
			None => return Vec::new(),
		};
		let mut attributes: Vec<_> = element.attributes.iter().map(|(name, value)| (name.clone(), value.clone())).collect();
		if !element.class.is_empty() {
			attributes.push(("class".to_string(), element.class.clone()));
		}
		attributes.sort();
		attributes
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_before_itself_is_not_a_move() {
		let mut dom = MemoryDom::new();
		let root = dom.create_root("main");
		let (a, b) = (dom.create_text_node("a"), dom.create_text_node("b"));
		dom.append_child(&root, &a);
		dom.append_child(&root, &b);
		dom.reset_stats();

		dom.insert_before(&root, &a, Some(&a));
		assert_eq!(dom.children(root), [a, b]);
		assert_eq!(dom.stats(), Stats::default());

		dom.insert_before(&root, &b, Some(&a));
		assert_eq!(dom.children(root), [b, a]);
		assert_eq!(dom.stats().moves, 1);
	}

	#[test]
	fn removed_nodes_stay_inspectable() {
		let mut dom = MemoryDom::new();
		let root = dom.create_root("main");
		let text = dom.create_text_node("gone");
		dom.append_child(&root, &text);
		dom.remove_child(&root, &text);

		assert!(dom.children(root).is_empty());
		assert_eq!(dom.parent(text), None);
		assert_eq!(dom.text(text), Some("gone"));
		assert_ne!(dom.create_text_node("new"), text);
	}
}
