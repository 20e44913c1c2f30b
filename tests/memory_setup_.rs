#![allow(dead_code)]

use keyed_vdom::{
	h,
	memory::{MemoryDom, NodeId},
	Data, Renderer, VNode,
};
use tracing::Level;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(Level::TRACE).try_init();
}

/// A renderer over a fresh [`MemoryDom`] and a `<main>` root to render into.
pub fn setup() -> (Renderer<MemoryDom>, NodeId) {
	init_tracing();
	let mut dom = MemoryDom::new();
	let root = dom.create_root("main");
	(Renderer::new(dom), root)
}

/// `<ul>` with one keyed `<li>` per key, each containing the key as text.
pub fn keyed_list(keys: &[i64]) -> VNode {
	h("ul", None, keys.iter().map(|&key| h("li", Data::new().key(key), key.to_string())).collect::<Vec<_>>())
}

/// The first child of `root`.
pub fn first_child(renderer: &Renderer<MemoryDom>, root: NodeId) -> NodeId {
	renderer.platform().children(root)[0]
}

/// `(key, node)` for each `<li>` in `ul`, in live order.
pub fn list_items(renderer: &Renderer<MemoryDom>, ul: NodeId) -> Vec<(i64, NodeId)> {
	let dom = renderer.platform();
	dom.children(ul)
		.iter()
		.filter(|&&child| dom.tag(child) == Some("li"))
		.map(|&li| (dom.text_content(li).parse().expect("numeric list item"), li))
		.collect()
}

pub fn list_keys(renderer: &Renderer<MemoryDom>, ul: NodeId) -> Vec<i64> {
	list_items(renderer, ul).into_iter().map(|(key, _)| key).collect()
}
