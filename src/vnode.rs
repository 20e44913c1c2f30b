//! The virtual node model and its factory, [`h`].
//!
//! [`VNode`]s are plain descriptions. They never hold on to live nodes themselves;
//! those are tracked in the [`Mounted`](`crate::mounted::Mounted`) side-table the renderer returns.

use crate::component::{FunctionalDef, Props, StatefulDef};
use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
	slice,
};
use hashbrown::HashMap;
use std::{borrow::Cow, rc::Rc};

/// The element name that is created in the SVG namespace.
pub const SVG: &str = "svg";

/// Tag of a [`VNode`] that mounts its children without a wrapper node.
pub const FRAGMENT: Tag = Tag::Fragment;

/// Tag of a [`VNode`] that mounts its children into its [`Target`] instead of its container.
pub const PORTAL: Tag = Tag::Portal;

/// Mutually exclusive classification of a [`VNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	HtmlElement,
	SvgElement,
	StatefulComponent,
	FunctionalComponent,
	Portal,
	Fragment,
	Text,
}
impl Kind {
	#[must_use]
	pub fn is_element(self) -> bool {
		matches!(self, Kind::HtmlElement | Kind::SvgElement)
	}

	#[must_use]
	pub fn is_component(self) -> bool {
		matches!(self, Kind::StatefulComponent | Kind::FunctionalComponent)
	}
}

/// Cardinality of a [`VNode`]'s children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
	None,
	Single,
	Multiple,
}

#[derive(Clone)]
pub enum Tag {
	Element(Cow<'static, str>),
	Stateful(StatefulDef),
	Functional(FunctionalDef),
	Portal,
	Fragment,
	Text,
}
impl Tag {
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			Tag::Element(name) if name == SVG => Kind::SvgElement,
			Tag::Element(_) => Kind::HtmlElement,
			Tag::Stateful(_) => Kind::StatefulComponent,
			Tag::Functional(_) => Kind::FunctionalComponent,
			Tag::Portal => Kind::Portal,
			Tag::Fragment => Kind::Fragment,
			Tag::Text => Kind::Text,
		}
	}

	#[must_use]
	pub fn element_name(&self) -> Option<&str> {
		match self {
			Tag::Element(name) => Some(&**name),
			_ => None,
		}
	}
}
/// Components compare by definition identity, elements by name.
impl PartialEq for Tag {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Tag::Element(a), Tag::Element(b)) => a == b,
			(Tag::Stateful(a), Tag::Stateful(b)) => a == b,
			(Tag::Functional(a), Tag::Functional(b)) => a == b,
			(Tag::Portal, Tag::Portal) | (Tag::Fragment, Tag::Fragment) | (Tag::Text, Tag::Text) => true,
			_ => false,
		}
	}
}
impl Debug for Tag {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Tag::Element(name) => write!(f, "<{}>", name),
			Tag::Stateful(def) => write!(f, "{:?}", def),
			Tag::Functional(def) => write!(f, "{:?}", def),
			Tag::Portal => f.write_str("PORTAL"),
			Tag::Fragment => f.write_str("FRAGMENT"),
			Tag::Text => f.write_str("TEXT"),
		}
	}
}
impl From<&'static str> for Tag {
	fn from(name: &'static str) -> Self {
		Tag::Element(Cow::Borrowed(name))
	}
}
impl From<String> for Tag {
	fn from(name: String) -> Self {
		Tag::Element(Cow::Owned(name))
	}
}
impl From<StatefulDef> for Tag {
	fn from(def: StatefulDef) -> Self {
		Tag::Stateful(def)
	}
}
impl From<FunctionalDef> for Tag {
	fn from(def: FunctionalDef) -> Self {
		Tag::Functional(def)
	}
}

/// Stable identity of a [`VNode`] among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Int(i64),
	Str(Cow<'static, str>),
}
impl From<i32> for Key {
	fn from(key: i32) -> Self {
		Key::Int(key.into())
	}
}
impl From<i64> for Key {
	fn from(key: i64) -> Self {
		Key::Int(key)
	}
}
impl From<u32> for Key {
	fn from(key: u32) -> Self {
		Key::Int(key.into())
	}
}
impl From<usize> for Key {
	#[allow(clippy::cast_possible_wrap)]
	fn from(key: usize) -> Self {
		Key::Int(key as i64)
	}
}
impl From<&'static str> for Key {
	fn from(key: &'static str) -> Self {
		Key::Str(Cow::Borrowed(key))
	}
}
impl From<String> for Key {
	fn from(key: String) -> Self {
		Key::Str(Cow::Owned(key))
	}
}

/// A DOM property or component prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Number(f64),
	String(Cow<'static, str>),
}
impl Value {
	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match *self {
			Value::Bool(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_f64(&self) -> Option<f64> {
		match *self {
			Value::Number(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(value) => Some(&**value),
			_ => None,
		}
	}
}
impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}
impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Number(value)
	}
}
impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Number(value.into())
	}
}
impl From<&'static str> for Value {
	fn from(value: &'static str) -> Self {
		Value::String(Cow::Borrowed(value))
	}
}
impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(Cow::Owned(value))
	}
}

/// An event listener.
///
/// Handlers compare by reference: Two clones of one [`Handler`] are equal, two separately created ones never are.
/// The event is passed as [`Any`], and its concrete type depends on the [`Platform`](`crate::platform::Platform`).
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&dyn Any)>);
impl Handler {
	pub fn new(handler: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}

	pub(crate) fn addr(&self) -> *const () {
		Rc::as_ptr(&self.0).cast::<()>()
	}
}
impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}
impl Eq for Handler {}
impl Hash for Handler {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state)
	}
}
impl Debug for Handler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Handler({:p})", self.addr())
	}
}

/// Where a portal mounts its children.
#[derive(Clone)]
pub enum Target {
	/// Resolved through [`Platform::query`](`crate::platform::Platform::query`).
	Selector(Cow<'static, str>),
	/// A live node of the platform in use.
	Node(Rc<dyn Any>),
}
impl Target {
	pub fn node<N: 'static>(node: N) -> Self {
		Target::Node(Rc::new(node))
	}
}
impl Debug for Target {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Target::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
			Target::Node(node) => write!(f, "Node({:p})", Rc::as_ptr(node).cast::<()>()),
		}
	}
}
impl From<&'static str> for Target {
	fn from(selector: &'static str) -> Self {
		Target::Selector(Cow::Borrowed(selector))
	}
}
impl From<String> for Target {
	fn from(selector: String) -> Self {
		Target::Selector(Cow::Owned(selector))
	}
}

/// The data payload of a [`VNode`].
///
/// `key` and `target` are lifted onto the [`VNode`] by [`h`].
/// Entries in `other` aren't understood by the renderer and are reported and ignored.
#[derive(Debug, Clone, Default)]
pub struct Data {
	pub key: Option<Key>,
	pub class: Option<String>,
	pub style: Option<HashMap<String, String>>,
	pub attrs: Option<HashMap<String, String>>,
	pub props: Option<Props>,
	pub events: Option<HashMap<String, Handler>>,
	pub target: Option<Target>,
	pub other: HashMap<String, Value>,
}
impl Data {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	#[must_use]
	pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.style.get_or_insert_with(HashMap::new).insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.get_or_insert_with(HashMap::new).insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.props.get_or_insert_with(HashMap::new).insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
		self.events.get_or_insert_with(HashMap::new).insert(event.into(), handler);
		self
	}

	#[must_use]
	pub fn target(mut self, target: impl Into<Target>) -> Self {
		self.target = Some(target.into());
		self
	}

	#[must_use]
	pub fn other(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.other.insert(name.into(), value.into());
		self
	}
}

/// Normalized children of a [`VNode`].
///
/// Build these through the [`From`] implementations, which apply the factory's normalization rules.
/// `Multiple` always holds at least two nodes when created that way.
#[derive(Debug, Clone)]
pub enum Children {
	None,
	Single(Box<VNode>),
	Multiple(Vec<VNode>),
	/// The literal content of a [`Kind::Text`] node.
	Text(Cow<'static, str>),
}
impl Children {
	#[must_use]
	pub fn arity(&self) -> Arity {
		match self {
			Children::None => Arity::None,
			Children::Single(_) | Children::Text(_) => Arity::Single,
			Children::Multiple(_) => Arity::Multiple,
		}
	}

	/// Child [`VNode`]s in order. Empty for text content.
	#[must_use]
	pub fn nodes(&self) -> &[VNode] {
		match self {
			Children::None | Children::Text(_) => &[],
			Children::Single(node) => slice::from_ref(&**node),
			Children::Multiple(nodes) => nodes.as_slice(),
		}
	}

	fn from_nodes(mut nodes: Vec<VNode>) -> Self {
		match nodes.len() {
			0 => Children::None,
			1 => nodes.pop().map_or(Children::None, |node| Children::Single(Box::new(node))),
			_ => Children::Multiple(nodes),
		}
	}

	/// Concatenated text of direct text children, for [`Tag::Text`] construction.
	fn into_text(self) -> Cow<'static, str> {
		match self {
			Children::None => Cow::Borrowed(""),
			Children::Text(text) => text,
			Children::Single(node) => node.into_text(),
			Children::Multiple(nodes) => Cow::Owned(nodes.into_iter().map(VNode::into_text).collect::<String>()),
		}
	}
}
impl From<()> for Children {
	fn from((): ()) -> Self {
		Children::None
	}
}
impl From<VNode> for Children {
	fn from(node: VNode) -> Self {
		Children::Single(Box::new(node))
	}
}
impl From<&'static str> for Children {
	fn from(text: &'static str) -> Self {
		if text.is_empty() {
			Children::None
		} else {
			Children::Single(Box::new(VNode::from(text)))
		}
	}
}
impl From<String> for Children {
	fn from(text: String) -> Self {
		if text.is_empty() {
			Children::None
		} else {
			Children::Single(Box::new(VNode::from(text)))
		}
	}
}
impl<T: Into<VNode>> From<Vec<T>> for Children {
	fn from(nodes: Vec<T>) -> Self {
		Children::from_nodes(nodes.into_iter().map(Into::into).collect())
	}
}
impl<T: Into<VNode>, const N: usize> From<[T; N]> for Children {
	fn from(nodes: [T; N]) -> Self {
		Children::from_nodes(IntoIterator::into_iter(nodes).map(Into::into).collect())
	}
}
impl<T: Into<Children>> From<Option<T>> for Children {
	fn from(children: Option<T>) -> Self {
		children.map_or(Children::None, Into::into)
	}
}

/// A virtual node.
///
/// Create these with [`h`] or [`text`].
#[derive(Debug, Clone)]
pub struct VNode {
	kind: Kind,
	tag: Tag,
	data: Option<Data>,
	key: Option<Key>,
	children: Children,
	target: Option<Target>,
}
impl VNode {
	#[must_use]
	pub fn kind(&self) -> Kind {
		self.kind
	}

	#[must_use]
	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	#[must_use]
	pub fn data(&self) -> Option<&Data> {
		self.data.as_ref()
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	#[must_use]
	pub fn children(&self) -> &Children {
		&self.children
	}

	#[must_use]
	pub fn arity(&self) -> Arity {
		self.children.arity()
	}

	#[must_use]
	pub fn target(&self) -> Option<&Target> {
		self.target.as_ref()
	}

	/// The literal content if this is a text node.
	#[must_use]
	pub fn text(&self) -> Option<&str> {
		match &self.children {
			Children::Text(text) => Some(&**text),
			_ => None,
		}
	}

	/// Component props taken from `data.props`.
	#[must_use]
	pub fn props(&self) -> Props {
		self.data.as_ref().and_then(|data| data.props.clone()).unwrap_or_default()
	}

	/// Replaces the key, for nodes built without [`Data`].
	#[must_use]
	pub fn with_key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	fn into_text(self) -> Cow<'static, str> {
		match self.children {
			Children::Text(text) => text,
			_ => Cow::Borrowed(""),
		}
	}
}
impl From<&'static str> for VNode {
	fn from(content: &'static str) -> Self {
		text(content)
	}
}
impl From<String> for VNode {
	fn from(content: String) -> Self {
		text(content)
	}
}
impl From<i32> for VNode {
	fn from(content: i32) -> Self {
		text(content.to_string())
	}
}
impl From<f64> for VNode {
	fn from(content: f64) -> Self {
		text(content.to_string())
	}
}

/// Creates a [`VNode`], classifying it by `tag` and normalizing its `children`.
///
/// For [`Tag::Text`], the children's text is concatenated into the node's literal content.
pub fn h(tag: impl Into<Tag>, data: impl Into<Option<Data>>, children: impl Into<Children>) -> VNode {
	let tag = tag.into();
	let data = data.into();
	let kind = tag.kind();
	let key = data.as_ref().and_then(|data| data.key.clone());
	let target = match kind {
		Kind::Portal => data.as_ref().and_then(|data| data.target.clone()),
		_ => None,
	};
	let children = match kind {
		Kind::Text => Children::Text(children.into().into_text()),
		_ => children.into(),
	};
	VNode {
		kind,
		tag,
		data,
		key,
		children,
		target,
	}
}

/// Creates a [`Kind::Text`] [`VNode`].
pub fn text(content: impl Into<Cow<'static, str>>) -> VNode {
	VNode {
		kind: Kind::Text,
		tag: Tag::Text,
		data: None,
		key: None,
		children: Children::Text(content.into()),
		target: None,
	}
}

/// Creates a [`Kind::Portal`] [`VNode`] that mounts `children` into `target`.
pub fn portal(target: impl Into<Target>, children: impl Into<Children>) -> VNode {
	h(PORTAL, Data::new().target(target), children)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classification() {
		assert_eq!(h("div", None, ()).kind(), Kind::HtmlElement);
		assert_eq!(h(SVG, None, ()).kind(), Kind::SvgElement);
		assert_eq!(h(FRAGMENT, None, ()).kind(), Kind::Fragment);
		assert_eq!(portal("#modal", ()).kind(), Kind::Portal);
		assert_eq!(text("x").kind(), Kind::Text);
		assert!(Kind::SvgElement.is_element());
		assert!(!Kind::Portal.is_component());
	}

	#[test]
	fn children_normalization() {
		assert_eq!(h("div", None, ()).arity(), Arity::None);
		assert_eq!(h("div", None, "").arity(), Arity::None);
		assert_eq!(h("div", None, Vec::<VNode>::new()).arity(), Arity::None);
		assert_eq!(h("div", None, [h("p", None, ())]).arity(), Arity::Single);
		assert_eq!(h("div", None, "hello").arity(), Arity::Single);
		assert_eq!(h("div", None, vec!["a", "b"]).arity(), Arity::Multiple);

		let wrapped = h("div", None, "hello");
		assert_eq!(wrapped.children().nodes()[0].text(), Some("hello"));
		assert_eq!(wrapped.children().nodes()[0].kind(), Kind::Text);
	}

	#[test]
	fn key_and_target_are_lifted() {
		let li = h("li", Data::new().key(1), ());
		assert_eq!(li.key(), Some(&Key::Int(1)));

		let portal = portal("#modal", ());
		assert!(matches!(portal.target(), Some(Target::Selector(selector)) if selector == "#modal"));
	}

	#[test]
	fn text_tag_flattens_children() {
		let node = h(Tag::Text, None, vec!["ab", "cd"]);
		assert_eq!(node.text(), Some("abcd"));
	}

	#[test]
	fn handlers_hash_by_identity() {
		let (a, b) = (Handler::new(|_| ()), Handler::new(|_| ()));
		let mut set = hashbrown::HashSet::new();
		assert!(set.insert(a.clone()));
		assert!(set.insert(b));
		assert!(!set.insert(a));
		assert_eq!(set.len(), 2);
	}
}
