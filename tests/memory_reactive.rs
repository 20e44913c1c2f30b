use keyed_vdom::{
	h,
	memory::{MemoryDom, NodeId},
	observer::{Context, Reactive, Subscriber},
	Data, Renderer,
};
use std::{cell::RefCell, rc::Rc};

mod memory_setup_;
use memory_setup_::{first_child, list_keys, setup};

/// Re-renders its container whenever state it read changes.
struct View {
	renderer: RefCell<Renderer<MemoryDom>>,
	container: NodeId,
	title: Rc<Reactive<String>>,
	items: Rc<Reactive<Vec<i64>>>,
}
impl View {
	fn render(&self, cx: &Context) {
		let title = self.title.get(cx);
		let items = self.items.get(cx);
		let vnode = h(
			"section",
			None,
			vec![
				h("h1", None, title),
				h("ul", None, items.iter().map(|&item| h("li", Data::new().key(item), item.to_string())).collect::<Vec<_>>()),
			],
		);
		self.renderer.borrow_mut().render(Some(vnode), &self.container).unwrap();
	}
}
impl Subscriber for View {
	fn update(&self, cx: &Context) {
		self.render(cx)
	}
}

#[test]
fn state_changes_rerender() {
	let (renderer, root) = setup();
	let cx = Context::new();
	let view = Rc::new(View {
		renderer: RefCell::new(renderer),
		container: root,
		title: Rc::new(Reactive::new("Todo".to_string())),
		items: Rc::new(Reactive::new(vec![1, 2, 3])),
	});
	cx.evaluate(view.clone(), |cx| view.render(cx));

	let (section, title_text) = {
		let renderer = view.renderer.borrow();
		let section = first_child(&renderer, root);
		let h1 = renderer.platform().children(section)[0];
		(section, renderer.platform().children(h1)[0])
	};

	view.title.set(&cx, "Done".to_string());
	view.items.set(&cx, vec![3, 1]);
	view.items.set(&cx, vec![3, 1]);

	let renderer = view.renderer.borrow();
	let dom = renderer.platform();
	assert_eq!(first_child(&renderer, root), section);
	assert_eq!(dom.text(title_text), Some("Done"));
	let ul = dom.children(section)[1];
	assert_eq!(list_keys(&renderer, ul), [3, 1]);
	assert_eq!(dom.stats().text_updates, 1);
}
