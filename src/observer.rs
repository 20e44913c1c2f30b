//! Minimal dependency tracking, for deciding when to render again.
//!
//! A [`Dep`] remembers which [`Subscriber`]s read it while they were being evaluated
//! and calls [`Subscriber::update`] on each of them when it changes.
//! The subscriber currently being evaluated is tracked by an explicit [`Context`],
//! so independent evaluations (for example of separate renderers) can't observe each other.
//!
//! ```
//! use keyed_vdom::observer::{Context, Reactive, Watcher};
//! use std::{cell::Cell, rc::Rc};
//!
//! let cx = Context::new();
//! let count = Rc::new(Reactive::new(1));
//! let seen = Rc::new(Cell::new(0));
//!
//! let _watcher = Watcher::new(
//! 	&cx,
//! 	{
//! 		let count = Rc::clone(&count);
//! 		move |cx| count.get(cx) * 2
//! 	},
//! 	{
//! 		let seen = Rc::clone(&seen);
//! 		move |next: &i32, _prev: &i32| seen.set(*next)
//! 	},
//! );
//!
//! count.set(&cx, 21);
//! assert_eq!(seen.get(), 42);
//! ```

use core::{
	cell::{Ref, RefCell},
	fmt::{self, Debug, Formatter},
};
use std::rc::{Rc, Weak};
use tracing::{trace, trace_span};

pub trait Subscriber {
	/// Called by [`Dep::notify`] for each dependent subscriber.
	fn update(&self, cx: &Context);
}

/// Evaluation context: the stack of subscribers currently being evaluated.
#[derive(Default)]
pub struct Context {
	stack: RefCell<Vec<Rc<dyn Subscriber>>>,
}
impl Context {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs `f` with `subscriber` as the [`current`](`Context::current`) one.
	///
	/// Evaluations nest: The previous subscriber is current again once `f` returns.
	pub fn evaluate<R>(&self, subscriber: Rc<dyn Subscriber>, f: impl FnOnce(&Self) -> R) -> R {
		self.stack.borrow_mut().push(subscriber);
		let result = f(self);
		self.stack.borrow_mut().pop();
		result
	}

	#[must_use]
	pub fn current(&self) -> Option<Rc<dyn Subscriber>> {
		self.stack.borrow().last().cloned()
	}
}
impl Debug for Context {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context").field("depth", &self.stack.borrow().len()).finish()
	}
}

/// A dependency that [`Subscriber`]s can register with.
///
/// Subscribers are held weakly and dropped from the list once they are gone.
#[derive(Default)]
pub struct Dep {
	subscribers: RefCell<Vec<Weak<dyn Subscriber>>>,
}
impl Dep {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `cx`'s current subscriber, if there is one and it isn't registered already.
	pub fn depend(&self, cx: &Context) {
		if let Some(current) = cx.current() {
			let mut subscribers = self.subscribers.borrow_mut();
			let current = Rc::downgrade(&current);
			if !subscribers.iter().any(|subscriber| subscriber.ptr_eq(&current)) {
				trace!("Registering subscriber.");
				subscribers.push(current)
			}
		}
	}

	/// Calls [`Subscriber::update`] on each live subscriber, in registration order.
	///
	/// Subscribers may [`depend`](`Dep::depend`) on this [`Dep`] again while updating.
	pub fn notify(&self, cx: &Context) {
		let subscribers: Vec<_> = {
			let mut subscribers = self.subscribers.borrow_mut();
			subscribers.retain(|subscriber| subscriber.strong_count() > 0);
			subscribers.iter().filter_map(Weak::upgrade).collect()
		};

		let span = trace_span!("Notifying subscribers", count = subscribers.len());
		let _enter = span.enter();
		for subscriber in subscribers {
			subscriber.update(cx)
		}
	}

	#[must_use]
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.borrow().iter().filter(|subscriber| subscriber.strong_count() > 0).count()
	}
}
impl Debug for Dep {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dep").field("subscribers", &self.subscriber_count()).finish()
	}
}

/// A value cell that notifies its readers when it is set to a different value.
#[derive(Debug, Default)]
pub struct Reactive<T> {
	value: RefCell<T>,
	dep: Dep,
}
impl<T> Reactive<T> {
	pub fn new(value: T) -> Self {
		Self {
			value: RefCell::new(value),
			dep: Dep::new(),
		}
	}

	/// Reads the value, registering `cx`'s current subscriber as dependent.
	pub fn get(&self, cx: &Context) -> T
	where
		T: Clone,
	{
		self.dep.depend(cx);
		self.value.borrow().clone()
	}

	/// Reads the value without registering a dependency.
	pub fn peek(&self) -> Ref<'_, T> {
		self.value.borrow()
	}

	/// Stores `value` and notifies dependents, unless it equals the current value.
	pub fn set(&self, cx: &Context, value: T)
	where
		T: PartialEq,
	{
		if *self.value.borrow() == value {
			return;
		}
		*self.value.borrow_mut() = value;
		self.dep.notify(cx)
	}
}

/// Re-evaluates a getter whenever one of its dependencies changes
/// and calls back with the new and previous results.
pub struct Watcher<T> {
	getter: Box<dyn Fn(&Context) -> T>,
	callback: Box<dyn Fn(&T, &T)>,
	value: RefCell<Option<T>>,
}
impl<T: 'static> Watcher<T> {
	/// Creates the watcher and evaluates `getter` once to collect its dependencies.
	///
	/// Dependencies only hold the watcher weakly, so it stops updating once the returned [`Rc`] is dropped.
	pub fn new(cx: &Context, getter: impl 'static + Fn(&Context) -> T, callback: impl 'static + Fn(&T, &T)) -> Rc<Self> {
		let watcher = Rc::new(Self {
			getter: Box::new(getter),
			callback: Box::new(callback),
			value: RefCell::new(None),
		});
		let value = cx.evaluate(Rc::clone(&watcher) as Rc<dyn Subscriber>, |cx| (watcher.getter)(cx));
		*watcher.value.borrow_mut() = Some(value);
		watcher
	}

	/// The result of the latest evaluation.
	pub fn value(&self) -> Ref<'_, Option<T>> {
		self.value.borrow()
	}
}
impl<T: 'static> Subscriber for Watcher<T> {
	fn update(&self, cx: &Context) {
		let next = (self.getter)(cx);
		if let Some(prev) = &*self.value.borrow() {
			(self.callback)(&next, prev)
		}
		*self.value.borrow_mut() = Some(next);
	}
}
impl<T: Debug> Debug for Watcher<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Watcher").field("value", &self.value).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;

	struct Counter(Cell<usize>);
	impl Subscriber for Counter {
		fn update(&self, _: &Context) {
			self.0.set(self.0.get() + 1)
		}
	}

	#[test]
	fn depend_outside_evaluation_is_ignored() {
		let cx = Context::new();
		let dep = Dep::new();
		dep.depend(&cx);
		assert_eq!(dep.subscriber_count(), 0);
	}

	#[test]
	fn subscribers_register_once() {
		let cx = Context::new();
		let dep = Dep::new();
		let counter = Rc::new(Counter(Cell::new(0)));

		cx.evaluate(counter.clone(), |cx| {
			dep.depend(cx);
			dep.depend(cx);
		});
		assert_eq!(dep.subscriber_count(), 1);

		dep.notify(&cx);
		assert_eq!(counter.0.get(), 1);
	}

	#[test]
	fn nested_evaluation_restores_outer_subscriber() {
		let cx = Context::new();
		let (outer_dep, inner_dep) = (Dep::new(), Dep::new());
		let outer = Rc::new(Counter(Cell::new(0)));
		let inner = Rc::new(Counter(Cell::new(0)));

		cx.evaluate(outer.clone(), |cx| {
			cx.evaluate(inner.clone(), |cx| inner_dep.depend(cx));
			outer_dep.depend(cx);
		});
		assert!(cx.current().is_none());

		outer_dep.notify(&cx);
		assert_eq!((outer.0.get(), inner.0.get()), (1, 0));
		inner_dep.notify(&cx);
		assert_eq!((outer.0.get(), inner.0.get()), (1, 1));
	}

	#[test]
	fn dropped_subscribers_are_pruned() {
		let cx = Context::new();
		let dep = Dep::new();
		let counter = Rc::new(Counter(Cell::new(0)));
		cx.evaluate(counter.clone(), |cx| dep.depend(cx));

		drop(counter);
		dep.notify(&cx);
		assert_eq!(dep.subscriber_count(), 0);
	}

	#[test]
	fn reactive_skips_equal_values() {
		let cx = Context::new();
		let cell = Rc::new(Reactive::new("a"));
		let calls = Rc::new(Cell::new(0));

		let _watcher = Watcher::new(
			&cx,
			{
				let cell = cell.clone();
				move |cx| cell.get(cx)
			},
			{
				let calls = calls.clone();
				move |_: &&str, _: &&str| calls.set(calls.get() + 1)
			},
		);

		cell.set(&cx, "a");
		assert_eq!(calls.get(), 0);
		cell.set(&cx, "b");
		assert_eq!(calls.get(), 1);
		assert_eq!(*cell.peek(), "b");
	}

	#[test]
	fn watcher_reports_new_and_previous_value() {
		let cx = Context::new();
		let cell = Rc::new(Reactive::new(1));
		let log = Rc::new(RefCell::new(Vec::new()));

		let watcher = Watcher::new(
			&cx,
			{
				let cell = cell.clone();
				move |cx| cell.get(cx) + 100
			},
			{
				let log = log.clone();
				move |next: &i32, prev: &i32| log.borrow_mut().push((*next, *prev))
			},
		);
		assert_eq!(*watcher.value(), Some(101));

		cell.set(&cx, 2);
		cell.set(&cx, 3);
		assert_eq!(*log.borrow(), vec![(102, 101), (103, 102)]);

		drop(watcher);
		cell.set(&cx, 4);
		assert_eq!(log.borrow().len(), 2);
	}
}
