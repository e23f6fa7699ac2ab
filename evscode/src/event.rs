//! Events that extension components can fire and subscribe to.

use std::sync::Mutex;

type Listener<T> = Box<dyn Fn(&T)+Send+Sync>;

/// Multicast event, delivering every fired value to all listeners in subscription order.
pub struct EventEmitter<T> {
	listeners: Mutex<Vec<Listener<T>>>,
}

impl<T> EventEmitter<T> {
	/// Create an event without listeners.
	pub fn new() -> EventEmitter<T> {
		EventEmitter { listeners: Mutex::new(Vec::new()) }
	}

	/// Register a listener, called synchronously from [`EventEmitter::fire`].
	/// Listeners must not subscribe to or fire the same event.
	pub fn subscribe(&self, listener: impl Fn(&T)+Send+Sync+'static) {
		match self.listeners.lock() {
			Ok(mut listeners) => listeners.push(Box::new(listener)),
			Err(_) => log::error!("event listener list poisoned, subscription dropped"),
		}
	}

	/// Notify all listeners.
	pub fn fire(&self, value: T) {
		match self.listeners.lock() {
			Ok(listeners) => {
				for listener in listeners.iter() {
					listener(&value);
				}
			},
			Err(_) => log::error!("event listener list poisoned, event dropped"),
		}
	}
}

impl<T> Default for EventEmitter<T> {
	fn default() -> Self {
		EventEmitter::new()
	}
}

#[test]
fn test_fire_reaches_all_listeners() {
	use std::sync::{
		atomic::{AtomicUsize, Ordering}, Arc
	};
	let event = EventEmitter::<usize>::new();
	let total = Arc::new(AtomicUsize::new(0));
	for _ in 0..3 {
		let total = total.clone();
		event.subscribe(move |x| {
			total.fetch_add(*x, Ordering::SeqCst);
		});
	}
	event.fire(2);
	event.fire(5);
	assert_eq!(total.load(Ordering::SeqCst), 21);
}
