//! Persistent state
//!
//! Create a const state object and query it using [`State::get`] and [`State::set`] methods.
//! ```
//! # use evscode::State;
//! const ACTIVE_PROFILE: State<String> = State::new("sio2.apiData");
//! ```

use crate::{memento::Memento, E, R};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Object used to store storage entry metadata information.
pub struct State<T> {
	key: &'static str,
	_phantom: PhantomData<fn() -> T>,
}

impl<T: Serialize+DeserializeOwned> State<T> {
	/// Create a new storage entry with a given identifier.
	/// Multiple storage objects with the same key will refer to the same entry.
	pub const fn new(key: &'static str) -> State<T> {
		State { key, _phantom: PhantomData }
	}

	/// Identifier of the entry.
	pub fn key(&self) -> &'static str {
		self.key
	}

	/// Query the stored value, if it was ever saved.
	pub fn get(&self, memento: &dyn Memento) -> R<Option<T>> {
		match memento.get(self.key)? {
			Some(raw) => match serde_json::from_value(raw) {
				Ok(value) => Ok(Some(value)),
				Err(e) => Err(E::from_std(e).context(format!("stored value of {} has unexpected type", self.key))),
			},
			None => Ok(None),
		}
	}

	/// Set the storage entry to a given value.
	pub fn set(&self, memento: &dyn Memento, value: &T) -> R<()> {
		memento.update(self.key, Some(serde_json::to_value(value)?))
	}

	/// Remove the storage entry.
	pub fn clear(&self, memento: &dyn Memento) -> R<()> {
		memento.update(self.key, None)
	}
}

#[test]
fn test_state_round_trip() {
	const COUNTER: State<Vec<i64>> = State::new("counter");
	let memento = crate::MemoryMemento::new();
	assert_eq!(COUNTER.get(&memento).unwrap(), None);
	COUNTER.set(&memento, &vec![1, 2]).unwrap();
	assert_eq!(COUNTER.get(&memento).unwrap(), Some(vec![1, 2]));
	COUNTER.clear(&memento).unwrap();
	assert_eq!(COUNTER.get(&memento).unwrap(), None);
}

#[test]
fn test_state_type_mismatch() {
	const NAME: State<String> = State::new("name");
	let memento = crate::MemoryMemento::new();
	memento.update("name", Some(serde_json::json!([1]))).unwrap();
	assert!(NAME.get(&memento).is_err());
}
