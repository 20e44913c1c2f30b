//! First-time projection of [`VNode`] trees.

use crate::{
	component::{FunctionalHandle, Instance},
	data,
	mounted::{Mounted, MountedChildren},
	platform::Platform,
	renderer::Renderer,
	vnode::{Arity, Children, Kind, Tag, Target, VNode},
	Error,
};
use tracing::{error, trace, trace_span};

impl<P: Platform> Renderer<P> {
	pub(crate) fn mount_at(&mut self, vnode: &VNode, container: &P::Node, reference: Option<&P::Node>, depth: usize) -> Result<Mounted<P::Node>, Error> {
		self.check_depth(depth)?;

		match (vnode.kind(), vnode.tag()) {
			(Kind::HtmlElement | Kind::SvgElement, Tag::Element(name)) => {
				let span = trace_span!("Mounting element", tag = &**name);
				let _enter = span.enter();

				let node = self.platform.create_element(name, vnode.kind() == Kind::SvgElement);
				data::patch(&mut self.platform, &node, None, vnode.data());
				let children = self.mount_children(vnode.children(), &node, None, depth + 1)?;
				self.place(container, &node, reference);
				Ok(Mounted::Element { node, children })
			}

			(Kind::StatefulComponent, Tag::Stateful(def)) => {
				let span = trace_span!("Mounting stateful component", name = def.name());
				let _enter = span.enter();

				let mut instance = Box::new(Instance::new(def.construct(), vnode.props()));
				instance.update_self(self, container, reference, depth + 1)?;
				Ok(Mounted::Stateful(instance))
			}

			(Kind::FunctionalComponent, Tag::Functional(def)) => {
				let span = trace_span!("Mounting functional component", name = def.name());
				let _enter = span.enter();

				let mut handle = Box::new(FunctionalHandle::new());
				handle.update(self, def, &vnode.props(), container, reference, depth + 1)?;
				Ok(Mounted::Functional(handle))
			}

			(Kind::Portal, _) => {
				let span = trace_span!("Mounting portal", target = ?vnode.target());
				let _enter = span.enter();

				let target = self.resolve_target(vnode.target())?;
				let children = self.mount_children(vnode.children(), &target, None, depth + 1)?;
				let marker = self.mount_placeholder(container, reference);
				Ok(Mounted::Portal { marker, target, children })
			}

			(Kind::Fragment, _) => {
				let span = trace_span!("Mounting fragment", arity = ?vnode.arity());
				let _enter = span.enter();

				let children = self.mount_children(vnode.children(), container, reference, depth + 1)?;
				Ok(Mounted::Fragment { children })
			}

			(Kind::Text, _) => {
				let text = vnode.text().unwrap_or_default();
				let span = if cfg!(feature = "dangerous-logging") {
					trace_span!("Mounting text", text)
				} else {
					trace_span!("Mounting text", len = text.len())
				};
				let _enter = span.enter();

				let node = self.platform.create_text_node(text);
				self.place(container, &node, reference);
				Ok(Mounted::Text { node })
			}

			(kind, tag) => {
				// `h` can't produce this, so it's a hand-assembled `VNode` gone wrong.
				error!("Kind {:?} doesn't match tag {:?}. Mounting a placeholder.", kind, tag);
				let node = self.platform.create_text_node("");
				self.place(container, &node, reference);
				Ok(Mounted::Text { node })
			}
		}
	}

	/// Mounts `children` into `container` before `reference`, or a placeholder if there are none.
	pub(crate) fn mount_children(&mut self, children: &Children, container: &P::Node, reference: Option<&P::Node>, depth: usize) -> Result<MountedChildren<P::Node>, Error> {
		if children.arity() == Arity::None {
			trace!("Mounting placeholder.");
			return Ok(MountedChildren::Placeholder(self.mount_placeholder(container, reference)));
		}

		children
			.nodes()
			.iter()
			.map(|child| self.mount_at(child, container, reference, depth))
			.collect::<Result<Vec<_>, _>>()
			.map(MountedChildren::Nodes)
	}

	pub(crate) fn mount_placeholder(&mut self, container: &P::Node, reference: Option<&P::Node>) -> P::Node {
		let placeholder = self.platform.create_text_node("");
		self.place(container, &placeholder, reference);
		placeholder
	}

	pub(crate) fn resolve_target(&self, target: Option<&Target>) -> Result<P::Node, Error> {
		match target {
			Some(Target::Selector(selector)) => self.platform.query(selector).ok_or_else(|| {
				error!("Portal target {:?} not found.", selector);
				Error::PortalTargetNotFound { selector: selector.to_string() }
			}),
			Some(Target::Node(node)) => node.downcast_ref::<P::Node>().cloned().ok_or_else(|| {
				error!("Portal target node is not a `{}`.", core::any::type_name::<P::Node>());
				Error::PortalTargetType
			}),
			None => Err(Error::MissingPortalTarget),
		}
	}
}
