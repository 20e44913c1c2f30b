//! JavaScript functions shared between all elements a [`Handler`] is bound to.

use crate::vnode::Handler;
use hashbrown::HashMap;
use js_sys::Function;
use tracing::{info, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};
use wasm_bindgen::{closure::Closure, JsCast};

struct Listener {
	bindings: u16,
	closure: Closure<dyn Fn(web_sys::Event)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingError {
	/// More than [`u16::MAX`] simultaneous bindings of one [`Handler`].
	Saturated,
	NotBound,
}

/// One [`Closure`] per distinct [`Handler`], counted by element binding.
///
/// A closure whose count drops to zero stays cached until [`free_unused`](`ListenerCache::free_unused`),
/// so a handler that moves between elements during one render keeps its function.
#[derive(Default)]
pub(crate) struct ListenerCache {
	listeners: HashMap<Handler, Listener>,
}
impl ListenerCache {
	/// Counts one more binding of `handler` and returns its function.
	pub fn bind(&mut self, handler: &Handler) -> Result<&Function, BindingError> {
		let listener = self.listeners.entry(handler.clone()).or_insert_with(|| {
			let handler = handler.clone();
			Listener {
				bindings: 0,
				closure: Closure::wrap(Box::new(move |event: web_sys::Event| handler.call(&event)) as Box<dyn Fn(web_sys::Event)>),
			}
		});
		listener.bindings = listener.bindings.checked_add(1).ok_or(BindingError::Saturated)?;
		Ok(listener.closure.as_ref().unchecked_ref())
	}

	/// Counts one binding of `handler` less and returns its function, which stays valid until the next [`free_unused`](`ListenerCache::free_unused`).
	pub fn unbind(&mut self, handler: &Handler) -> Result<&Function, BindingError> {
		let listener = self.listeners.get_mut(handler).ok_or(BindingError::NotBound)?;
		listener.bindings = listener.bindings.checked_sub(1).ok_or(BindingError::NotBound)?;
		Ok(listener.closure.as_ref().unchecked_ref())
	}

	/// Drops the closures of all handlers that aren't bound anymore.
	pub fn free_unused(&mut self) -> usize {
		let before = self.listeners.len();
		self.listeners.retain(|_, listener| listener.bindings > 0);
		let freed = before - self.listeners.len();

		trace!("Freed {} event listener(s).", freed);
		info!("Event listener count/cached capacity: {}/{}", self.listeners.len(), self.listeners.capacity());
		if STATIC_MAX_LEVEL >= Level::WARN && self.listeners.capacity() >= 1000 {
			warn!("The event listener cache is large ({}).", self.listeners.capacity())
		}
		freed
	}

	pub fn len(&self) -> usize {
		self.listeners.len()
	}
}
impl core::fmt::Debug for ListenerCache {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_map()
			.entries(self.listeners.iter().map(|(handler, listener)| (handler, listener.bindings)))
			.finish()
	}
}
