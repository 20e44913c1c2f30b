//! The browser DOM as [`Platform`], through [`web_sys`].
//!
//! DOM call failures are logged as errors and otherwise ignored, so that one bad attribute name
//! doesn't abort the remaining patch.

use crate::{
	listener_cache::{BindingError, ListenerCache},
	platform::{Inspect, Platform},
	vnode::{Handler, Value},
};
use js_sys::Reflect;
use tracing::error;
use wasm_bindgen::{throw_str, JsCast, JsValue, UnwrapThrowExt};
use web_sys::{CharacterData, CssStyleDeclaration, Document, Element, HtmlElement, Node, SvgElement};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Renders into the DOM of one [`Document`].
///
/// # Event Listeners
///
/// Each distinct [`Handler`] is wrapped into one JavaScript function, which is shared by all elements it is bound to.
/// These functions are reference-counted and freed at the end of each [`Renderer::render`](`crate::Renderer::render`) call
/// once no element uses them anymore.
///
/// Dropping the [`WebPlatform`] while listeners are still attached makes them throw when invoked.
#[derive(Debug)]
pub struct WebPlatform {
	document: Document,
	listeners: ListenerCache,
}
impl WebPlatform {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			listeners: ListenerCache::default(),
		}
	}

	/// Uses the current window's document.
	///
	/// # Panics
	///
	/// (Throws) if there is no window or no document.
	#[must_use]
	pub fn for_window() -> Self {
		Self::new(
			web_sys::window()
				.expect_throw("keyed-vdom: No window found.")
				.document()
				.expect_throw("keyed-vdom: No document found."),
		)
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// How many distinct [`Handler`]s currently have a JavaScript function.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	fn element<'a>(node: &'a Node, operation: &str) -> Option<&'a Element> {
		let element = node.dyn_ref::<Element>();
		if element.is_none() {
			error!("Expected element to {} but found {:?}.", operation, node);
		}
		element
	}

	fn style(node: &Node) -> Option<CssStyleDeclaration> {
		if let Some(html_element) = node.dyn_ref::<HtmlElement>() {
			Some(html_element.style())
		} else if let Some(svg_element) = node.dyn_ref::<SvgElement>() {
			Some(svg_element.style())
		} else {
			error!("Expected styled element but found {:?}.", node);
			None
		}
	}
}

fn to_js(value: &Value) -> JsValue {
	match value {
		Value::Null => JsValue::NULL,
		Value::Bool(value) => JsValue::from_bool(*value),
		Value::Number(value) => JsValue::from_f64(*value),
		Value::String(value) => JsValue::from_str(value),
	}
}

impl Platform for WebPlatform {
	type Node = Node;

	fn create_element(&mut self, tag: &str, is_svg: bool) -> Node {
		let element = if is_svg {
			self.document.create_element_ns(Some(SVG_NAMESPACE), tag)
		} else {
			self.document.create_element(tag)
		};
		element.expect_throw("keyed-vdom: Failed to create element.").into()
	}

	fn create_text_node(&mut self, text: &str) -> Node {
		self.document.create_text_node(text).into()
	}

	fn append_child(&mut self, container: &Node, node: &Node) {
		if let Err(error) = container.append_child(node) {
			error!("Failed to append node: {:?}", error)
		}
	}

	fn insert_before(&mut self, container: &Node, node: &Node, reference: Option<&Node>) {
		if let Err(error) = container.insert_before(node, reference) {
			error!("Failed to insert node: {:?}", error)
		}
	}

	fn remove_child(&mut self, container: &Node, node: &Node) {
		if let Err(error) = container.remove_child(node) {
			error!("Failed to remove the node: {:?}", error)
		}
	}

	fn set_text(&mut self, node: &Node, text: &str) {
		match node.dyn_ref::<CharacterData>() {
			Some(character_data) => character_data.set_data(text),
			None => error!("Expected to update text but found {:?}.", node),
		}
	}

	fn next_sibling(&self, node: &Node) -> Option<Node> {
		node.next_sibling()
	}

	fn query(&self, selector: &str) -> Option<Node> {
		match self.document.query_selector(selector) {
			Ok(element) => element.map(Into::into),
			Err(error) => {
				error!("Invalid selector {:?}: {:?}", selector, error);
				None
			}
		}
	}

	fn set_class(&mut self, element: &Node, class: &str) {
		if let Some(element) = Self::element(element, "set class") {
			// `className` isn't a string on SVG elements, so go through the attribute.
			let result = if class.is_empty() {
				element.remove_attribute("class")
			} else {
				element.set_attribute("class", class)
			};
			if let Err(error) = result {
				error!("Failed to set class: {:?}", error)
			}
		}
	}

	fn set_style(&mut self, element: &Node, name: &str, value: &str) {
		if let Some(style) = Self::style(element) {
			if let Err(error) = style.set_property(name, value) {
				error!("Failed to set style {:?}: {:?}", name, error)
			}
		}
	}

	fn remove_style(&mut self, element: &Node, name: &str) {
		if let Some(style) = Self::style(element) {
			if let Err(error) = style.remove_property(name) {
				error!("Failed to remove style {:?}: {:?}", name, error)
			}
		}
	}

	fn set_attribute(&mut self, element: &Node, name: &str, value: &str) {
		if let Some(element) = Self::element(element, "set attribute") {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Failed to set attribute {:?}: {:?}", name, error)
			}
		}
	}

	fn remove_attribute(&mut self, element: &Node, name: &str) {
		if let Some(element) = Self::element(element, "remove attribute") {
			if let Err(error) = element.remove_attribute(name) {
				error!("Failed to remove attribute {:?}: {:?}", name, error)
			}
		}
	}

	fn set_property(&mut self, element: &Node, name: &str, value: &Value) {
		if let Err(error) = Reflect::set(element, &JsValue::from_str(name), &to_js(value)) {
			error!("Failed to set property {:?}: {:?}", name, error)
		}
	}

	fn remove_property(&mut self, element: &Node, name: &str) {
		// Deleting a DOM property usually only removes a shadowing own property, so reset it instead.
		if let Err(error) = Reflect::set(element, &JsValue::from_str(name), &JsValue::NULL) {
			error!("Failed to reset property {:?}: {:?}", name, error)
		}
	}

	fn add_event_listener(&mut self, element: &Node, event: &str, handler: &Handler) {
		let listener = match self.listeners.bind(handler) {
			Ok(listener) => listener,
			Err(BindingError::Saturated) => throw_str("Too many (more than 65k) active bindings of the same `Handler`"),
			Err(BindingError::NotBound) => throw_str("Binding can't fail to find its `Handler`."),
		};
		if let Err(error) = element.add_event_listener_with_callback(event, listener) {
			error!("Failed to add {:?} event listener: {:?}", event, error)
		}
	}

	fn remove_event_listener(&mut self, element: &Node, event: &str, handler: &Handler) {
		match self.listeners.unbind(handler) {
			Ok(listener) => {
				if let Err(error) = element.remove_event_listener_with_callback(event, listener) {
					error!("Failed to remove {:?} event listener: {:?}", event, error)
				}
			}
			Err(BindingError::NotBound) => error!("Tried to remove {:?} event listener that isn't bound.", event),
			Err(BindingError::Saturated) => throw_str("Unbinding can't saturate."),
		}
	}

	fn finish_render(&mut self) {
		self.listeners.free_unused();
	}
}

impl Inspect for WebPlatform {
	fn child_nodes(&self, node: &Node) -> Vec<Node> {
		let child_nodes = node.child_nodes();
		(0..child_nodes.length()).filter_map(|i| child_nodes.item(i)).collect()
	}

	fn tag_name(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>().map(|element| {
			if element.namespace_uri().as_deref() == Some(SVG_NAMESPACE) {
				element.tag_name()
			} else {
				element.tag_name().to_ascii_lowercase()
			}
		})
	}

	fn text_data(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<web_sys::Text>().map(|text| text.data())
	}

	fn attributes(&self, node: &Node) -> Vec<(String, String)> {
		let attributes = match node.dyn_ref::<Element>() {
			Some(element) => element.attributes(),
			None => return Vec::new(),
		};
		let mut attributes: Vec<_> = (0..attributes.length())
			.filter_map(|i| attributes.item(i))
			.map(|attribute| (attribute.local_name(), attribute.value()))
			.collect();
		attributes.sort();
		attributes
	}
}
