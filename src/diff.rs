//! Double-ended keyed reconciliation of child lists.
//!
//! The walk keeps one window over the old children and one over the new children and shrinks them from both ends.
//! Prepends, appends and reversals resolve without any interior lookups;
//! only nodes that moved into the middle of the list fall back to a linear scan of the old window.
//!
//! Nodes without key compare equal to each other, so unkeyed lists are patched positionally.
//! Duplicate keys among siblings are not supported: The result will be in the right order,
//! but which old node is reused for which new one is unspecified.

use crate::{mounted::Mounted, platform::Platform, renderer::Renderer, vnode::VNode, Error};
use core::iter;
use hashbrown::HashSet;
use tracing::{trace, trace_span, warn};

impl<P: Platform> Renderer<P> {
	/// Reconciles the child list `prev` (mounted as `mounted`) with `next` in `container`.
	///
	/// Returns the new child records in `next`'s order.
	/// `anchor` is the live node directly after the list, if the list doesn't end its container.
	#[allow(clippy::too_many_lines)]
	pub(crate) fn diff_children(
		&mut self,
		next: &[VNode],
		prev: &[VNode],
		mounted: Vec<Mounted<P::Node>>,
		container: &P::Node,
		anchor: Option<&P::Node>,
		depth: usize,
	) -> Result<Vec<Mounted<P::Node>>, Error> {
		debug_assert_eq!(prev.len(), mounted.len());
		if cfg!(debug_assertions) && next.iter().filter_map(VNode::key).collect::<HashSet<_>>().len() != next.iter().filter(|vnode| vnode.key().is_some()).count() {
			warn!("Duplicate sibling keys. Node reuse among them is unspecified.");
		}

		// `None` in `old` marks a consumed old child, in `new` a new child that hasn't been placed yet.
		let mut old: Vec<Option<Mounted<P::Node>>> = mounted.into_iter().map(Some).collect();
		let mut new: Vec<Option<Mounted<P::Node>>> = iter::repeat_with(|| None).take(next.len()).collect();

		// Half-open windows.
		let (mut old_start, mut old_end) = (0, prev.len());
		let (mut new_start, mut new_end) = (0, next.len());

		while old_start < old_end && new_start < new_end {
			if old[old_start].is_none() {
				old_start += 1;
				continue;
			}
			if old[old_end - 1].is_none() {
				old_end -= 1;
				continue;
			}

			let (old_first, old_last) = (&prev[old_start], &prev[old_end - 1]);
			let (new_first, new_last) = (&next[new_start], &next[new_end - 1]);

			if old_first.key() == new_first.key() {
				let span = trace_span!("Same start", key = ?new_first.key());
				let _enter = span.enter();

				if let Some(mounted) = old[old_start].take() {
					new[new_start] = Some(self.patch_at(new_first, old_first, mounted, container, depth)?);
				}
				old_start += 1;
				new_start += 1;
			} else if old_first.key() == new_last.key() {
				let span = trace_span!("Old start to new end", key = ?new_last.key());
				let _enter = span.enter();

				if let Some(mounted) = old[old_start].take() {
					let patched = self.patch_at(new_last, old_first, mounted, container, depth)?;
					// A lone remaining old node already sits right before the placed tail.
					if old_start + 1 < old_end {
						let reference = self.reference_after(&old, old_end - 1, &new, new_end, anchor);
						self.move_before(&patched, container, reference.as_ref());
					}
					new[new_end - 1] = Some(patched);
				}
				old_start += 1;
				new_end -= 1;
			} else if old_last.key() == new_first.key() {
				let span = trace_span!("Old end to new start", key = ?new_first.key());
				let _enter = span.enter();

				if let Some(mounted) = old[old_end - 1].take() {
					let patched = self.patch_at(new_first, old_last, mounted, container, depth)?;
					let reference = self.reference_before(&old, old_start, old_end - 1, &new, new_end, anchor);
					self.move_before(&patched, container, reference.as_ref());
					new[new_start] = Some(patched);
				}
				old_end -= 1;
				new_start += 1;
			} else if old_last.key() == new_last.key() {
				let span = trace_span!("Same end", key = ?new_last.key());
				let _enter = span.enter();

				if let Some(mounted) = old[old_end - 1].take() {
					new[new_end - 1] = Some(self.patch_at(new_last, old_last, mounted, container, depth)?);
				}
				old_end -= 1;
				new_end -= 1;
			} else {
				let span = trace_span!("Scanning", key = ?new_first.key());
				let _enter = span.enter();

				let found = (old_start..old_end)
					.find(|&i| old[i].is_some() && prev[i].key() == new_first.key())
					.and_then(|i| old[i].take().map(|mounted| (i, mounted)));
				let reference = self.reference_before(&old, old_start, old_end, &new, new_end, anchor);
				let placed = match found {
					Some((i, mounted)) => {
						trace!("Found at {}. Moving.", i);
						let patched = self.patch_at(new_first, &prev[i], mounted, container, depth)?;
						self.move_before(&patched, container, reference.as_ref());
						patched
					}
					None => {
						trace!("Not found. Mounting.");
						self.mount_at(new_first, container, reference.as_ref(), depth)?
					}
				};
				new[new_start] = Some(placed);
				new_start += 1;
			}
		}

		if old_start >= old_end {
			let span = trace_span!("Mounting remainder", count = new_end.saturating_sub(new_start));
			let _enter = span.enter();

			let reference = first_node_in(&new[new_end..]).or_else(|| anchor.cloned());
			for i in new_start..new_end {
				new[i] = Some(self.mount_at(&next[i], container, reference.as_ref(), depth)?);
			}
		} else {
			let span = trace_span!("Removing remainder", count = old_end - old_start);
			let _enter = span.enter();

			for i in old_start..old_end {
				if let Some(mounted) = old[i].take() {
					self.unmount_at(&prev[i], mounted, container, true)
				}
			}
		}

		debug_assert!(old.iter().all(Option::is_none));
		debug_assert!(new.iter().all(Option::is_some));
		Ok(new.into_iter().flatten().collect())
	}

	/// The live node right after `old[index]`.
	fn reference_after(&self, old: &[Option<Mounted<P::Node>>], index: usize, new: &[Option<Mounted<P::Node>>], new_end: usize, anchor: Option<&P::Node>) -> Option<P::Node> {
		match old[index].as_ref().and_then(Mounted::last_node) {
			Some(last) => self.platform.next_sibling(last),
			None => first_node_in(&new[new_end..]).or_else(|| anchor.cloned()),
		}
	}

	/// The first live node of the unconsumed `old[from..to]`, or what follows the old window.
	///
	/// The old window's remaining nodes keep their relative order,
	/// and the new children placed at the tail (from `new_end`) follow it directly.
	fn reference_before(&self, old: &[Option<Mounted<P::Node>>], from: usize, to: usize, new: &[Option<Mounted<P::Node>>], new_end: usize, anchor: Option<&P::Node>) -> Option<P::Node> {
		old[from..to]
			.iter()
			.flatten()
			.find_map(Mounted::first_node)
			.cloned()
			.or_else(|| first_node_in(&new[new_end..]))
			.or_else(|| anchor.cloned())
	}
}

fn first_node_in<N: Clone>(placed: &[Option<Mounted<N>>]) -> Option<N> {
	placed.iter().flatten().find_map(Mounted::first_node).cloned()
}
