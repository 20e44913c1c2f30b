//! The side-table that ties [`VNode`](`crate::VNode`)s to live nodes.
//!
//! A [`Mounted`] tree mirrors the [`VNode`](`crate::VNode`) tree it was produced from, position by position.
//! Patching consumes the previous record and returns the next one, which is how live nodes and component
//! instances are handed over from one rendering to the next.

use crate::component::{FunctionalHandle, Instance};

pub enum Mounted<N> {
	Element { node: N, children: MountedChildren<N> },
	Text { node: N },
	/// Fragments own no live node of their own.
	Fragment { children: MountedChildren<N> },
	/// `children` live in `target`. `marker` is an empty text node that holds the portal's place in its container.
	Portal { marker: N, target: N, children: MountedChildren<N> },
	Stateful(Box<Instance<N>>),
	Functional(Box<FunctionalHandle<N>>),
}

pub enum MountedChildren<N> {
	/// The empty text node standing in for [`Arity::None`](`crate::Arity::None`).
	Placeholder(N),
	Nodes(Vec<Mounted<N>>),
}

impl<N: Clone> Mounted<N> {
	/// The single live node produced for an element or text node, forwarded through components.
	#[must_use]
	pub fn live_node(&self) -> Option<&N> {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node } => Some(node),
			Mounted::Fragment { .. } | Mounted::Portal { .. } => None,
			Mounted::Stateful(instance) => instance.rendered.as_ref().and_then(|(_, mounted)| mounted.live_node()),
			Mounted::Functional(handle) => handle.rendered.as_ref().and_then(|(_, mounted)| mounted.live_node()),
		}
	}

	/// The first live node this record placed into its container.
	#[must_use]
	pub fn first_node(&self) -> Option<&N> {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node } | Mounted::Portal { marker: node, .. } => Some(node),
			Mounted::Fragment { children } => children.first_node(),
			Mounted::Stateful(instance) => instance.rendered.as_ref().and_then(|(_, mounted)| mounted.first_node()),
			Mounted::Functional(handle) => handle.rendered.as_ref().and_then(|(_, mounted)| mounted.first_node()),
		}
	}

	/// The last live node this record placed into its container.
	#[must_use]
	pub fn last_node(&self) -> Option<&N> {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node } | Mounted::Portal { marker: node, .. } => Some(node),
			Mounted::Fragment { children } => children.last_node(),
			Mounted::Stateful(instance) => instance.rendered.as_ref().and_then(|(_, mounted)| mounted.last_node()),
			Mounted::Functional(handle) => handle.rendered.as_ref().and_then(|(_, mounted)| mounted.last_node()),
		}
	}

	/// Appends this record's live nodes in its container to `nodes`, in order.
	pub fn collect_nodes(&self, nodes: &mut Vec<N>) {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node } | Mounted::Portal { marker: node, .. } => nodes.push(node.clone()),
			Mounted::Fragment { children } => children.collect_nodes(nodes),
			Mounted::Stateful(instance) => {
				if let Some((_, mounted)) = &instance.rendered {
					mounted.collect_nodes(nodes)
				}
			}
			Mounted::Functional(handle) => {
				if let Some((_, mounted)) = &handle.rendered {
					mounted.collect_nodes(nodes)
				}
			}
		}
	}

	/// The component instance, if this is a stateful component.
	#[must_use]
	pub fn instance(&self) -> Option<&Instance<N>> {
		match self {
			Mounted::Stateful(instance) => Some(&**instance),
			_ => None,
		}
	}

	#[must_use]
	pub fn children(&self) -> Option<&MountedChildren<N>> {
		match self {
			Mounted::Element { children, .. } | Mounted::Fragment { children } | Mounted::Portal { children, .. } => Some(children),
			Mounted::Text { .. } | Mounted::Stateful(_) | Mounted::Functional(_) => None,
		}
	}
}

impl<N: Clone> MountedChildren<N> {
	#[must_use]
	pub fn first_node(&self) -> Option<&N> {
		match self {
			MountedChildren::Placeholder(node) => Some(node),
			MountedChildren::Nodes(nodes) => nodes.iter().find_map(Mounted::first_node),
		}
	}

	#[must_use]
	pub fn last_node(&self) -> Option<&N> {
		match self {
			MountedChildren::Placeholder(node) => Some(node),
			MountedChildren::Nodes(nodes) => nodes.iter().rev().find_map(Mounted::last_node),
		}
	}

	pub fn collect_nodes(&self, nodes: &mut Vec<N>) {
		match self {
			MountedChildren::Placeholder(node) => nodes.push(node.clone()),
			MountedChildren::Nodes(mounted) => {
				for mounted in mounted {
					mounted.collect_nodes(nodes)
				}
			}
		}
	}

	/// Child records in order. Empty for a placeholder.
	#[must_use]
	pub fn records(&self) -> &[Mounted<N>] {
		match self {
			MountedChildren::Placeholder(_) => &[],
			MountedChildren::Nodes(nodes) => nodes.as_slice(),
		}
	}
}
