//! Applies [`Data`] payloads onto live elements.

use crate::{platform::Platform, vnode::Data};
use hashbrown::HashMap;
use tracing::{trace, trace_span, warn};

/// Keys of `prev` that `next` doesn't have.
fn stale<'a, V, W>(prev: Option<&'a HashMap<String, V>>, next: Option<&HashMap<String, W>>) -> Vec<&'a str> {
	prev.into_iter()
		.flat_map(HashMap::keys)
		.filter(|key| !next.map_or(false, |next| next.contains_key(*key)))
		.map(String::as_str)
		.collect()
}

/// Brings `element`'s class, style, attributes, properties and event listeners from `prev` to `next`.
///
/// Pass `prev: None` for the initial application.
/// Removals are applied before (re)application; everything present in `next` is set again,
/// except an unchanged class and listeners whose [`Handler`](`crate::Handler`) is the same reference.
pub(crate) fn patch<P: Platform>(platform: &mut P, element: &P::Node, prev: Option<&Data>, next: Option<&Data>) {
	let span = trace_span!("Patching vnode data", initial = prev.is_none());
	let _enter = span.enter();

	let empty = Data::default();
	let prev = prev.unwrap_or(&empty);
	let next = next.unwrap_or(&empty);

	if prev.class != next.class {
		trace!("Replacing class.");
		platform.set_class(element, next.class.as_deref().unwrap_or(""));
	}

	for name in stale(prev.style.as_ref(), next.style.as_ref()) {
		platform.remove_style(element, name)
	}
	for (name, value) in next.style.iter().flatten() {
		platform.set_style(element, name, value)
	}

	for name in stale(prev.attrs.as_ref(), next.attrs.as_ref()) {
		platform.remove_attribute(element, name)
	}
	for (name, value) in next.attrs.iter().flatten() {
		platform.set_attribute(element, name, value)
	}

	for name in stale(prev.props.as_ref(), next.props.as_ref()) {
		platform.remove_property(element, name)
	}
	for (name, value) in next.props.iter().flatten() {
		platform.set_property(element, name, value)
	}

	let prev_events = prev.events.as_ref();
	for (event, handler) in prev_events.into_iter().flatten() {
		if !next.events.as_ref().map_or(false, |next| next.contains_key(event)) {
			platform.remove_event_listener(element, event, handler)
		}
	}
	for (event, handler) in next.events.iter().flatten() {
		match prev_events.and_then(|prev| prev.get(event)) {
			Some(prev) if prev.ptr_eq(handler) => (),
			Some(prev) => {
				trace!(event = event.as_str(), "Replacing event listener.");
				platform.remove_event_listener(element, event, prev);
				platform.add_event_listener(element, event, handler);
			}
			None => platform.add_event_listener(element, event, handler),
		}
	}

	for key in next.other.keys() {
		warn!("Ignoring unrecognized vnode data key {:?}.", key)
	}
}

/// Detaches all event listeners in `data` from `element`, which is being removed.
pub(crate) fn release<P: Platform>(platform: &mut P, element: &P::Node, data: Option<&Data>) {
	if let Some(events) = data.and_then(|data| data.events.as_ref()) {
		let span = trace_span!("Releasing event listeners", count = events.len());
		let _enter = span.enter();
		for (event, handler) in events {
			platform.remove_event_listener(element, event, handler)
		}
	}
}
