use crate::{mounted::Mounted, platform::Platform, vnode::VNode};
use core::fmt::{self, Display, Formatter};
use tracing::{error, instrument, trace};

/// Fatal render failures. Everything else is logged and worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A portal's selector matched nothing.
	PortalTargetNotFound { selector: String },
	/// A portal's [`Target::Node`](`crate::Target::Node`) isn't a node of the platform in use.
	PortalTargetType,
	/// A portal was constructed without a target.
	MissingPortalTarget,
	/// The tree (including component renderings) is nested deeper than [`Options::depth_limit`].
	DepthLimitReached { limit: usize },
}
impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Error::PortalTargetNotFound { selector } => write!(f, "Portal target {:?} not found", selector),
			Error::PortalTargetType => f.write_str("Portal target node has the wrong type for this platform"),
			Error::MissingPortalTarget => f.write_str("Portal has no target"),
			Error::DepthLimitReached { limit } => write!(f, "Depth limit ({}) reached", limit),
		}
	}
}
impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
	/// Maximum nesting of [`VNode`]s, counting each component rendering as one level.
	pub depth_limit: usize,
}
impl Default for Options {
	fn default() -> Self {
		Self { depth_limit: 512 }
	}
}

struct Root<N> {
	container: N,
	vnode: VNode,
	mounted: Mounted<N>,
}

/// Renders [`VNode`] trees into containers of one [`Platform`].
///
/// # Correct Use
///
/// Each container must only be rendered into through [`Renderer::render`] once it has been,
/// since the renderer remembers the last tree per container and patches against it.
/// The lower-level [`Renderer::mount`]/[`Renderer::patch`]/[`Renderer::unmount`] leave that bookkeeping to the caller.
pub struct Renderer<P: Platform> {
	pub(crate) platform: P,
	options: Options,
	roots: Vec<Root<P::Node>>,
}
impl<P: Platform> Renderer<P> {
	#[must_use]
	pub fn new(platform: P) -> Self {
		Self::with_options(platform, Options::default())
	}

	#[must_use]
	pub fn with_options(platform: P, options: Options) -> Self {
		Self {
			platform,
			options,
			roots: Vec::new(),
		}
	}

	pub fn platform(&self) -> &P {
		&self.platform
	}

	pub fn platform_mut(&mut self) -> &mut P {
		&mut self.platform
	}

	#[must_use]
	pub fn into_platform(self) -> P {
		self.platform
	}

	#[must_use]
	pub fn options(&self) -> Options {
		self.options
	}

	/// Renders `vnode` into `container`.
	///
	/// Mounts if `container` has no tree from an earlier call yet, patches if it has one,
	/// and tears the tree down if `vnode` is [`None`].
	///
	/// # Errors
	///
	/// Iff mounting or patching fails. The container's tree is forgotten in that case,
	/// so the caller should clear the container before rendering into it again.
	#[instrument(skip_all)]
	pub fn render(&mut self, vnode: Option<VNode>, container: &P::Node) -> Result<(), Error> {
		let index = self.roots.iter().position(|root| &root.container == container);
		let result = match (vnode, index) {
			(Some(vnode), None) => {
				trace!("Mounting new root.");
				self.mount(&vnode, container, None).map(|mounted| {
					self.roots.push(Root {
						container: container.clone(),
						vnode,
						mounted,
					})
				})
			}
			(Some(vnode), Some(index)) => {
				trace!("Patching existing root.");
				let Root {
					container: root_container,
					vnode: prev,
					mounted,
				} = self.roots.swap_remove(index);
				self.patch(&vnode, &prev, mounted, container).map(|mounted| {
					self.roots.push(Root {
						container: root_container,
						vnode,
						mounted,
					})
				})
			}
			(None, Some(index)) => {
				trace!("Tearing down root.");
				let root = self.roots.swap_remove(index);
				self.unmount(&root.vnode, root.mounted, container);
				Ok(())
			}
			(None, None) => Ok(()),
		};
		self.platform.finish_render();
		result
	}

	/// Mounts `vnode` into `container`, before `reference` or at the end.
	///
	/// # Errors
	///
	/// Iff a portal target can't be resolved or the depth limit is reached.
	/// Nodes mounted before the failure stay in place.
	#[instrument(skip_all)]
	pub fn mount(&mut self, vnode: &VNode, container: &P::Node, reference: Option<&P::Node>) -> Result<Mounted<P::Node>, Error> {
		self.mount_at(vnode, container, reference, 0)
	}

	/// Patches the live tree described by `prev` and `mounted` to match `next`.
	///
	/// # Errors
	///
	/// Iff a portal target can't be resolved or the depth limit is reached.
	#[instrument(skip_all)]
	pub fn patch(&mut self, next: &VNode, prev: &VNode, mounted: Mounted<P::Node>, container: &P::Node) -> Result<Mounted<P::Node>, Error> {
		self.patch_at(next, prev, mounted, container, 0)
	}

	/// Removes the live tree described by `vnode` and `mounted` from `container`.
	#[instrument(skip_all)]
	pub fn unmount(&mut self, vnode: &VNode, mounted: Mounted<P::Node>, container: &P::Node) {
		self.unmount_at(vnode, mounted, container, true)
	}

	pub(crate) fn check_depth(&self, depth: usize) -> Result<(), Error> {
		if depth > self.options.depth_limit {
			error!("Depth limit reached");
			Err(Error::DepthLimitReached { limit: self.options.depth_limit })
		} else {
			Ok(())
		}
	}

	/// Inserts `node` before `reference`, or appends it.
	pub(crate) fn place(&mut self, container: &P::Node, node: &P::Node, reference: Option<&P::Node>) {
		match reference {
			Some(_) => self.platform.insert_before(container, node, reference),
			None => self.platform.append_child(container, node),
		}
	}

	/// Moves all of `mounted`'s live nodes in `container` before `reference`, in order.
	pub(crate) fn move_before(&mut self, mounted: &Mounted<P::Node>, container: &P::Node, reference: Option<&P::Node>) {
		let mut nodes = Vec::new();
		mounted.collect_nodes(&mut nodes);
		for node in &nodes {
			self.platform.insert_before(container, node, reference);
		}
	}
}
