#![cfg(all(target_arch = "wasm32", feature = "web"))]

use keyed_vdom::{h, web::WebPlatform, Data, Handler, Renderer, SVG};
use std::{cell::Cell, rc::Rc, sync::Once};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

static TRACING: Once = Once::new();

fn setup() -> (Renderer<WebPlatform>, Element) {
	TRACING.call_once(tracing_wasm::set_as_global_default);
	let platform = WebPlatform::for_window();
	let container = platform.document().create_element("div").unwrap();
	platform.document().body().unwrap().append_child(&container).unwrap();
	(Renderer::new(platform), container)
}

fn list(keys: &[i64]) -> keyed_vdom::VNode {
	h("ul", None, keys.iter().map(|&key| h("li", Data::new().key(key), key.to_string())).collect::<Vec<_>>())
}

#[wasm_bindgen_test]
fn mount_and_patch() {
	let (mut renderer, container) = setup();
	let node: Node = container.clone().into();

	renderer.render(Some(list(&[1, 2, 3, 4])), &node).unwrap();
	assert_eq!(container.inner_html(), "<ul><li>1</li><li>2</li><li>3</li><li>4</li></ul>");
	let first = container.first_element_child().unwrap().first_element_child().unwrap();

	renderer.render(Some(list(&[2, 3, 1, 5, 6, 7])), &node).unwrap();
	assert_eq!(
		container.inner_html(),
		"<ul><li>2</li><li>3</li><li>1</li><li>5</li><li>6</li><li>7</li></ul>"
	);
	let ul = container.first_element_child().unwrap();
	assert_eq!(ul.children().item(2), Some(first));

	renderer.render(None, &node).unwrap();
	assert_eq!(container.inner_html(), "");
}

#[wasm_bindgen_test]
fn attributes_and_svg() {
	let (mut renderer, container) = setup();
	let node: Node = container.clone().into();

	renderer
		.render(Some(h("p", Data::new().class("a").attr("title", "t"), h(SVG, None, ()))), &node)
		.unwrap();
	let svg = container.query_selector("svg").unwrap().unwrap();
	assert_eq!(svg.namespace_uri().as_deref(), Some("http://www.w3.org/2000/svg"));

	renderer.render(Some(h("p", Data::new().style("color", "red"), ())), &node).unwrap();
	let p = container.first_element_child().unwrap();
	assert_eq!(p.get_attribute("class"), None);
	assert_eq!(p.get_attribute("title"), None);
	assert_eq!(p.dyn_into::<HtmlElement>().unwrap().style().get_property_value("color").unwrap(), "red");
}

#[wasm_bindgen_test]
fn events() {
	let (mut renderer, container) = setup();
	let node: Node = container.clone().into();
	let clicks = Rc::new(Cell::new(0));
	let handler = Handler::new({
		let clicks = clicks.clone();
		move |event| {
			assert!(event.is::<web_sys::Event>());
			clicks.set(clicks.get() + 1)
		}
	});

	let buttons = |count: usize| h("div", None, (0..count).map(|_| h("button", Data::new().on("click", handler.clone()), ())).collect::<Vec<_>>());
	renderer.render(Some(buttons(2)), &node).unwrap();
	assert_eq!(renderer.platform().listener_count(), 1);
	let button = || container.query_selector("button").unwrap().unwrap().dyn_into::<HtmlElement>().unwrap();
	button().click();
	assert_eq!(clicks.get(), 1);

	// The shared listener must stay alive while one button still uses it.
	renderer.render(Some(buttons(1)), &node).unwrap();
	assert_eq!(renderer.platform().listener_count(), 1);
	button().click();
	assert_eq!(clicks.get(), 2);

	renderer.render(Some(h("div", None, h("button", None, ()))), &node).unwrap();
	assert_eq!(renderer.platform().listener_count(), 0);
	button().click();
	assert_eq!(clicks.get(), 2);
}
