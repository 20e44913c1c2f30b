//! Differential updates of mounted trees.

use crate::{
	data,
	mounted::{Mounted, MountedChildren},
	platform::Platform,
	renderer::Renderer,
	vnode::{Arity, Children, Kind, Tag, VNode},
	Error,
};
use tracing::{error, trace, trace_span};

impl<P: Platform> Renderer<P> {
	#[allow(clippy::too_many_lines)]
	pub(crate) fn patch_at(&mut self, next: &VNode, prev: &VNode, mounted: Mounted<P::Node>, container: &P::Node, depth: usize) -> Result<Mounted<P::Node>, Error> {
		self.check_depth(depth)?;

		if next.kind() != prev.kind() {
			let span = trace_span!("Replacing on kind mismatch", prev = ?prev.kind(), next = ?next.kind());
			let _enter = span.enter();
			return self.replace(next, prev, mounted, container, depth);
		}

		match (next.kind(), mounted) {
			(Kind::HtmlElement | Kind::SvgElement, mounted) if next.tag() != prev.tag() => {
				let span = trace_span!("Replacing element", prev = ?prev.tag(), next = ?next.tag());
				let _enter = span.enter();
				self.replace(next, prev, mounted, container, depth)
			}
			(Kind::HtmlElement | Kind::SvgElement, Mounted::Element { node, children }) => {
				let span = trace_span!("Patching element", tag = ?next.tag());
				let _enter = span.enter();

				data::patch(&mut self.platform, &node, prev.data(), next.data());
				let children = self.patch_children(next.children(), prev.children(), children, &node, None, depth + 1)?;
				Ok(Mounted::Element { node, children })
			}

			(Kind::StatefulComponent, mounted) if next.tag() != prev.tag() => {
				let span = trace_span!("Replacing stateful component", prev = ?prev.tag(), next = ?next.tag());
				let _enter = span.enter();
				self.replace(next, prev, mounted, container, depth)
			}
			(Kind::StatefulComponent, Mounted::Stateful(mut instance)) => {
				let span = trace_span!("Patching stateful component", tag = ?next.tag());
				let _enter = span.enter();

				instance.props = next.props();
				instance.update_self(self, container, None, depth + 1)?;
				Ok(Mounted::Stateful(instance))
			}

			(Kind::FunctionalComponent, Mounted::Functional(mut handle)) => {
				let def = match next.tag() {
					Tag::Functional(def) => def,
					tag => {
						error!("Functional component with tag {:?}. Replacing.", tag);
						return self.replace(next, prev, Mounted::Functional(handle), container, depth);
					}
				};
				let span = trace_span!("Patching functional component", name = def.name());
				let _enter = span.enter();

				handle.update(self, def, &next.props(), container, None, depth + 1)?;
				Ok(Mounted::Functional(handle))
			}

			(Kind::Portal, Mounted::Portal { marker, target: prev_target, children }) => {
				let span = trace_span!("Patching portal", prev = ?prev.target(), next = ?next.target());
				let _enter = span.enter();

				let next_target = self.resolve_target(next.target())?;
				if next_target == prev_target {
					// Other content may follow in a shared target.
					let anchor = children.last_node().and_then(|last| self.platform.next_sibling(last));
					let children = self.patch_children(next.children(), prev.children(), children, &prev_target, anchor.as_ref(), depth + 1)?;
					Ok(Mounted::Portal { marker, target: prev_target, children })
				} else {
					trace!("Portal target changed. Moving by remounting.");
					self.unmount_children(prev.children(), children, &prev_target, true);
					let children = self.mount_children(next.children(), &next_target, None, depth + 1)?;
					Ok(Mounted::Portal { marker, target: next_target, children })
				}
			}

			(Kind::Fragment, Mounted::Fragment { children }) => {
				let span = trace_span!("Patching fragment", prev = ?prev.arity(), next = ?next.arity());
				let _enter = span.enter();

				let anchor = children.last_node().and_then(|last| self.platform.next_sibling(last));
				let children = self.patch_children(next.children(), prev.children(), children, container, anchor.as_ref(), depth + 1)?;
				Ok(Mounted::Fragment { children })
			}

			(Kind::Text, Mounted::Text { node }) => {
				let (prev_text, next_text) = (prev.text().unwrap_or_default(), next.text().unwrap_or_default());
				let span = if cfg!(feature = "dangerous-logging") {
					trace_span!("Patching text", prev_text, next_text)
				} else {
					trace_span!("Patching text")
				};
				let _enter = span.enter();

				if prev_text != next_text {
					self.platform.set_text(&node, next_text)
				}
				Ok(Mounted::Text { node })
			}

			(kind, mounted) => {
				error!("Mounted record doesn't match the previous {:?} vnode. Replacing.", kind);
				self.replace(next, prev, mounted, container, depth)
			}
		}
	}

	/// Removes `prev`'s live subtree and mounts `next` where it was.
	fn replace(&mut self, next: &VNode, prev: &VNode, mounted: Mounted<P::Node>, container: &P::Node, depth: usize) -> Result<Mounted<P::Node>, Error> {
		let reference = mounted.last_node().and_then(|last| self.platform.next_sibling(last));
		self.unmount_at(prev, mounted, container, true);
		self.mount_at(next, container, reference.as_ref(), depth)
	}

	/// Reconciles `prev` with `next` in `container`.
	///
	/// `anchor` is the live node following these children in `container`, if it isn't their parent's end.
	pub(crate) fn patch_children(
		&mut self,
		next: &Children,
		prev: &Children,
		mounted: MountedChildren<P::Node>,
		container: &P::Node,
		anchor: Option<&P::Node>,
		depth: usize,
	) -> Result<MountedChildren<P::Node>, Error> {
		match (next.arity(), prev.arity(), mounted) {
			(Arity::None, Arity::None, placeholder @ MountedChildren::Placeholder(_)) => Ok(placeholder),

			(Arity::None, _, mounted) => {
				let span = trace_span!("Removing all children", count = prev.nodes().len());
				let _enter = span.enter();

				let reference = match mounted.last_node() {
					Some(last) => self.platform.next_sibling(last),
					None => anchor.cloned(),
				};
				self.unmount_children(prev, mounted, container, true);
				Ok(MountedChildren::Placeholder(self.mount_placeholder(container, reference.as_ref())))
			}

			(_, Arity::None, MountedChildren::Placeholder(placeholder)) => {
				let span = trace_span!("Mounting all children", count = next.nodes().len());
				let _enter = span.enter();

				let mounted = self.mount_children(next, container, Some(&placeholder), depth)?;
				self.platform.remove_child(container, &placeholder);
				Ok(mounted)
			}

			(Arity::Single, Arity::Single, MountedChildren::Nodes(mut nodes)) if nodes.len() == 1 => {
				if let (Some(next), Some(prev), Some(mounted)) = (next.nodes().first(), prev.nodes().first(), nodes.pop()) {
					nodes.push(self.patch_at(next, prev, mounted, container, depth)?);
				}
				Ok(MountedChildren::Nodes(nodes))
			}

			(_, _, MountedChildren::Nodes(nodes)) if nodes.len() == prev.nodes().len() => {
				let span = trace_span!("Diffing child list", prev = prev.nodes().len(), next = next.nodes().len());
				let _enter = span.enter();
				self.diff_children(next.nodes(), prev.nodes(), nodes, container, anchor, depth).map(MountedChildren::Nodes)
			}

			(_, _, mounted) => {
				error!("Mounted children don't match the previous vnode's. Recreating them.");
				let reference = match mounted.last_node() {
					Some(last) => self.platform.next_sibling(last),
					None => anchor.cloned(),
				};
				self.unmount_children(prev, mounted, container, true);
				self.mount_children(next, container, reference.as_ref(), depth)
			}
		}
	}

	/// Removes `mounted`'s live nodes.
	///
	/// Without `attached`, the subtree is already detached with an ancestor,
	/// and only listeners and portal contents are cleaned up.
	pub(crate) fn unmount_at(&mut self, vnode: &VNode, mounted: Mounted<P::Node>, container: &P::Node, attached: bool) {
		match mounted {
			Mounted::Element { node, children } => {
				let span = trace_span!("Removing element", tag = ?vnode.tag(), attached);
				let _enter = span.enter();

				if attached {
					self.platform.remove_child(container, &node);
				}
				data::release(&mut self.platform, &node, vnode.data());
				self.unmount_children(vnode.children(), children, &node, false);
			}
			Mounted::Text { node } => {
				if attached {
					trace!("Removing text.");
					self.platform.remove_child(container, &node);
				}
			}
			Mounted::Fragment { children } => self.unmount_children(vnode.children(), children, container, attached),
			Mounted::Portal { marker, target, children } => {
				let span = trace_span!("Removing portal", target = ?vnode.target(), attached);
				let _enter = span.enter();

				if attached {
					self.platform.remove_child(container, &marker);
				}
				self.unmount_children(vnode.children(), children, &target, true)
			}
			Mounted::Stateful(instance) => {
				if let Some((rendered, mounted)) = instance.rendered {
					self.unmount_at(&rendered, mounted, container, attached)
				}
			}
			Mounted::Functional(handle) => {
				if let Some((rendered, mounted)) = handle.rendered {
					self.unmount_at(&rendered, mounted, container, attached)
				}
			}
		}
	}

	pub(crate) fn unmount_children(&mut self, children: &Children, mounted: MountedChildren<P::Node>, container: &P::Node, attached: bool) {
		match mounted {
			MountedChildren::Placeholder(placeholder) => {
				if attached {
					self.platform.remove_child(container, &placeholder)
				}
			}
			MountedChildren::Nodes(nodes) => {
				debug_assert_eq!(children.nodes().len(), nodes.len());
				for (vnode, mounted) in children.nodes().iter().zip(nodes) {
					self.unmount_at(vnode, mounted, container, attached)
				}
			}
		}
	}
}
