use keyed_vdom::{h, memory::Stats, text, Data};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

mod memory_setup_;
use memory_setup_::{first_child, keyed_list, list_items, list_keys, setup};

/// Renders `from`, then `to`, and returns the stats of the second render together with
/// whether every key present in both lists kept its live node.
fn reconcile(from: &[i64], to: &[i64]) -> (Vec<i64>, Stats, bool) {
	let (mut renderer, root) = setup();
	renderer.render(Some(keyed_list(from)), &root).unwrap();
	let ul = first_child(&renderer, root);
	let before: HashMap<_, _> = list_items(&renderer, ul).into_iter().collect();

	renderer.platform_mut().reset_stats();
	renderer.render(Some(keyed_list(to)), &root).unwrap();

	let after = list_items(&renderer, ul);
	let reused = after.iter().all(|(key, node)| before.get(key).map_or(true, |before| before == node));
	let dom = renderer.platform();
	// No leftover placeholder next to items.
	assert_eq!(dom.children(ul).len(), to.len().max(1));
	(after.into_iter().map(|(key, _)| key).collect(), dom.stats(), reused)
}

#[test]
fn mixed_reorder_insert_remove() {
	let (order, stats, reused) = reconcile(&[1, 2, 3, 4], &[2, 3, 1, 5, 6, 7]);
	assert_eq!(order, [2, 3, 1, 5, 6, 7]);
	assert!(reused);
	assert_eq!(stats.elements_created, 3);
	assert_eq!(stats.removals, 1);
}

#[test]
fn prepend_moves_nothing() {
	let (order, stats, reused) = reconcile(&[1, 2, 3], &[0, 1, 2, 3]);
	assert_eq!(order, [0, 1, 2, 3]);
	assert!(reused);
	assert_eq!(stats.elements_created, 1);
	assert_eq!(stats.moves, 0);
	assert_eq!(stats.removals, 0);
}

#[test]
fn append_moves_nothing() {
	let (order, stats, reused) = reconcile(&[1, 2, 3], &[1, 2, 3, 4]);
	assert_eq!(order, [1, 2, 3, 4]);
	assert!(reused);
	assert_eq!(stats.elements_created, 1);
	assert_eq!(stats.moves, 0);
}

#[test]
fn insert_in_the_middle_moves_nothing() {
	let (order, stats, _) = reconcile(&[1, 2, 4, 5], &[1, 2, 3, 4, 5]);
	assert_eq!(order, [1, 2, 3, 4, 5]);
	assert_eq!(stats.elements_created, 1);
	assert_eq!(stats.moves, 0);
}

#[test]
fn reversal_only_moves() {
	let (order, stats, reused) = reconcile(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1]);
	assert_eq!(order, [5, 4, 3, 2, 1]);
	assert!(reused);
	assert!(stats.moves <= 5, "{:?}", stats);
	assert_eq!(stats.elements_created, 0);
	assert_eq!(stats.texts_created, 0);
	assert_eq!(stats.removals, 0);
}

#[test]
fn swap_ends() {
	let (order, stats, reused) = reconcile(&[1, 2, 3, 4], &[4, 2, 3, 1]);
	assert_eq!(order, [4, 2, 3, 1]);
	assert!(reused);
	assert!(stats.moves <= 2, "{:?}", stats);
}

#[test]
fn remove_from_the_middle() {
	let (order, stats, reused) = reconcile(&[1, 2, 3], &[1, 3]);
	assert_eq!(order, [1, 3]);
	assert!(reused);
	assert_eq!(stats.removals, 1);
	// End-to-start takes precedence over end-to-end, so `3` is moved once.
	assert_eq!(stats.moves, 1);
	assert_eq!(stats.elements_created, 0);
}

#[test]
fn replace_all() {
	let (order, stats, _) = reconcile(&[1, 2], &[3, 4, 5]);
	assert_eq!(order, [3, 4, 5]);
	assert_eq!(stats.elements_created, 3);
	assert_eq!(stats.removals, 2);
}

#[test]
fn to_and_from_empty() {
	let (order, stats, _) = reconcile(&[], &[1, 2]);
	assert_eq!(order, [1, 2]);
	assert_eq!(stats.removals, 1); // placeholder

	let (order, stats, _) = reconcile(&[1, 2], &[]);
	assert!(order.is_empty());
	assert_eq!(stats.removals, 2);
}

#[test]
fn unkeyed_children_patch_positionally() {
	let (mut renderer, root) = setup();
	renderer.render(Some(h("ul", None, vec![h("li", None, "a"), h("li", None, "b")])), &root).unwrap();
	let ul = first_child(&renderer, root);
	let before = renderer.platform().children(ul).to_vec();

	renderer.platform_mut().reset_stats();
	renderer
		.render(Some(h("ul", None, vec![h("li", None, "b"), h("li", None, "a"), h("li", None, "c")])), &root)
		.unwrap();

	let dom = renderer.platform();
	assert_eq!(&dom.children(ul)[..2], before.as_slice());
	assert_eq!(dom.text_content(ul), "bac");
	assert_eq!(dom.stats().moves, 0);
	assert_eq!(dom.stats().text_updates, 2);
	assert_eq!(dom.stats().elements_created, 1);
}

#[test]
fn keyed_node_changing_type_is_replaced_in_place() {
	let (mut renderer, root) = setup();
	let item = |key: i64, tag: &'static str| h(tag, Data::new().key(key), key.to_string());
	renderer.render(Some(h("ul", None, vec![item(1, "li"), item(2, "li"), item(3, "li")])), &root).unwrap();
	renderer.render(Some(h("ul", None, vec![item(3, "li"), item(2, "p"), item(1, "li")])), &root).unwrap();

	let ul = first_child(&renderer, root);
	let dom = renderer.platform();
	assert_eq!(dom.to_html(ul), "<ul><li>3</li><p>2</p><li>1</li></ul>");
}

#[test]
fn mixed_keyed_and_text_children() {
	let (mut renderer, root) = setup();
	let row = |keys: &[i64]| {
		let mut children = vec![text("[")];
		children.extend(keys.iter().map(|&key| h("b", Data::new().key(key), key.to_string())));
		children.push(text("]"));
		h("div", None, children)
	};
	renderer.render(Some(row(&[1, 2, 3])), &root).unwrap();
	renderer.render(Some(row(&[3, 1])), &root).unwrap();
	assert_eq!(renderer.platform().text_content(root), "[31]");
	renderer.render(Some(row(&[2, 3, 1, 4])), &root).unwrap();
	assert_eq!(renderer.platform().text_content(root), "[2314]");
}

#[test]
fn repeated_patches_converge() {
	let (mut renderer, root) = setup();
	let steps: &[&[i64]] = &[&[1, 2, 3], &[3, 1, 2], &[2], &[], &[5, 2, 9, 1], &[1, 9, 2, 5], &[1, 2, 3]];
	for &keys in steps {
		renderer.render(Some(keyed_list(keys)), &root).unwrap();
		let ul = first_child(&renderer, root);
		assert_eq!(list_keys(&renderer, ul), keys);
	}
}

fn unique(keys: Vec<i64>) -> Vec<i64> {
	let mut seen = HashSet::new();
	keys.into_iter().filter(|key| seen.insert(*key)).collect()
}

proptest! {
	#[test]
	fn any_permutation_is_reached(permutation in Just((0..10).collect::<Vec<i64>>()).prop_shuffle()) {
		let original: Vec<i64> = (0..10).collect();
		let (order, stats, reused) = reconcile(&original, &permutation);
		prop_assert_eq!(order, permutation);
		prop_assert!(reused);
		prop_assert_eq!(stats.elements_created, 0);
		prop_assert_eq!(stats.removals, 0);
		prop_assert!(stats.moves <= original.len(), "{:?}", stats);
	}

	#[test]
	fn any_edit_is_reached(
		from in prop::collection::vec(0..24_i64, 0..16).prop_map(unique),
		to in prop::collection::vec(0..24_i64, 0..16).prop_map(unique),
	) {
		let (order, stats, reused) = reconcile(&from, &to);
		prop_assert_eq!(&order, &to);
		prop_assert!(reused);

		let kept = to.iter().filter(|key| from.contains(key)).count();
		prop_assert_eq!(stats.elements_created, to.len() - kept);
	}

	#[test]
	fn duplicate_keys_still_reach_the_order(
		from in prop::collection::vec(0..4_i64, 0..10),
		to in prop::collection::vec(0..4_i64, 0..10),
	) {
		let (mut renderer, root) = setup();
		renderer.render(Some(keyed_list(&from)), &root).unwrap();
		renderer.render(Some(keyed_list(&to)), &root).unwrap();

		let ul = first_child(&renderer, root);
		prop_assert_eq!(list_keys(&renderer, ul), to.clone());
		prop_assert_eq!(renderer.platform().children(ul).len(), to.len().max(1));
	}
}
