//! Stateful and functional components.
//!
//! Callers tag each definition explicitly as [`StatefulDef`] or [`FunctionalDef`];
//! the renderer never guesses from a value's shape.

use crate::{mounted::Mounted, platform::Platform, renderer::Renderer, vnode::Value, Error, VNode};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace_span;

/// Props passed to components, taken from `data.props` of the component's [`VNode`].
pub type Props = HashMap<String, Value>;

/// A stateful component instance.
///
/// One instance is constructed on first mount and kept for as long as the same [`StatefulDef`]
/// is rendered at the same position.
pub trait Component {
	fn render(&mut self, props: &Props) -> VNode;
}

/// Definition of a stateful component. Compares by identity.
#[derive(Clone)]
pub struct StatefulDef {
	name: &'static str,
	construct: Rc<dyn Fn() -> Box<dyn Component>>,
}
impl StatefulDef {
	pub fn new<C: 'static + Component>(name: &'static str, construct: impl 'static + Fn() -> C) -> Self {
		Self {
			name,
			construct: Rc::new(move || Box::new(construct()) as Box<dyn Component>),
		}
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub(crate) fn construct(&self) -> Box<dyn Component> {
		(self.construct)()
	}
}
impl PartialEq for StatefulDef {
	fn eq(&self, other: &Self) -> bool {
		Rc::as_ptr(&self.construct).cast::<()>() == Rc::as_ptr(&other.construct).cast::<()>()
	}
}
impl Debug for StatefulDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "StatefulDef({})", self.name)
	}
}

/// Definition of a functional component: a render function of its props. Compares by identity.
#[derive(Clone)]
pub struct FunctionalDef {
	name: &'static str,
	render: Rc<dyn Fn(&Props) -> VNode>,
}
impl FunctionalDef {
	pub fn new(name: &'static str, render: impl 'static + Fn(&Props) -> VNode) -> Self {
		Self { name, render: Rc::new(render) }
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub(crate) fn render(&self, props: &Props) -> VNode {
		(self.render)(props)
	}
}
impl PartialEq for FunctionalDef {
	fn eq(&self, other: &Self) -> bool {
		Rc::as_ptr(&self.render).cast::<()>() == Rc::as_ptr(&other.render).cast::<()>()
	}
}
impl Debug for FunctionalDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "FunctionalDef({})", self.name)
	}
}

/// A mounted stateful component: the instance, its current props and its last rendering.
pub struct Instance<N> {
	pub(crate) component: Box<dyn Component>,
	pub(crate) props: Props,
	pub(crate) rendered: Option<(VNode, Mounted<N>)>,
}
impl<N: Clone> Instance<N> {
	pub(crate) fn new(component: Box<dyn Component>, props: Props) -> Self {
		Self { component, props, rendered: None }
	}

	#[must_use]
	pub fn props(&self) -> &Props {
		&self.props
	}

	/// The [`VNode`] this instance rendered last.
	#[must_use]
	pub fn rendered(&self) -> Option<&VNode> {
		self.rendered.as_ref().map(|(vnode, _)| vnode)
	}

	/// Renders with the current props and patches the previous rendering,
	/// or mounts before `reference` if there is none yet.
	pub(crate) fn update_self<P: Platform<Node = N>>(&mut self, renderer: &mut Renderer<P>, container: &N, reference: Option<&N>, depth: usize) -> Result<(), Error> {
		let span = trace_span!("Updating stateful component");
		let _enter = span.enter();

		let next = self.component.render(&self.props);
		let mounted = match self.rendered.take() {
			Some((prev, mounted)) => renderer.patch_at(&next, &prev, mounted, container, depth)?,
			None => renderer.mount_at(&next, container, reference, depth)?,
		};
		self.rendered = Some((next, mounted));
		Ok(())
	}
}

/// Update handle of a mounted functional component.
pub struct FunctionalHandle<N> {
	pub(crate) rendered: Option<(VNode, Mounted<N>)>,
}
impl<N: Clone> FunctionalHandle<N> {
	pub(crate) fn new() -> Self {
		Self { rendered: None }
	}

	#[must_use]
	pub fn rendered(&self) -> Option<&VNode> {
		self.rendered.as_ref().map(|(vnode, _)| vnode)
	}

	/// Re-invokes `def` with `props` and patches the previous output against the new one.
	pub(crate) fn update<P: Platform<Node = N>>(
		&mut self,
		renderer: &mut Renderer<P>,
		def: &FunctionalDef,
		props: &Props,
		container: &N,
		reference: Option<&N>,
		depth: usize,
	) -> Result<(), Error> {
		let span = trace_span!("Updating functional component", name = def.name());
		let _enter = span.enter();

		let next = def.render(props);
		let mounted = match self.rendered.take() {
			Some((prev, mounted)) => renderer.patch_at(&next, &prev, mounted, container, depth)?,
			None => renderer.mount_at(&next, container, reference, depth)?,
		};
		self.rendered = Some((next, mounted));
		Ok(())
	}
}
