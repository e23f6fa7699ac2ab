//! Named API endpoints with their tokens, and the one currently used for all requests.

use evscode::{
	quick_pick::{Item, Pick}, EventEmitter, Host, InputBox, Memento, Message, QuickPick, State, E, R
};
use futures::lock::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SAVED: State<Vec<Profile>> = State::new("sio2.apiSavedUrls");
const ACTIVE: State<Profile> = State::new("sio2.apiData");

const BUTTON_EDIT: usize = 0;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	pub name: String,
	#[serde(rename = "url")]
	pub base_url: String,
	/// Empty if the user has not provided it yet.
	pub token: String,
}

impl Profile {
	pub fn new(name: &str, base_url: &str, token: &str) -> Profile {
		Profile { name: name.to_owned(), base_url: base_url.to_owned(), token: token.to_owned() }
	}
}

fn builtin() -> Vec<Profile> {
	vec![Profile::new("mimuw", "https://sio2.mimuw.edu.pl", ""), Profile::new("szkopul", "https://szkopul.edu.pl", "")]
}

pub fn no_profile_selected() -> E {
	E::error("No API selected").workflow_error()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Choice {
	Profile(usize),
	Add,
}

/// Saved profiles and the active one.
///
/// Every operation holds the lock from the first read until the change is persisted and announced, so concurrent commands never observe
/// the list and the active profile disagreeing.
pub struct Profiles {
	memento: Arc<dyn Memento>,
	data_changed: Arc<EventEmitter<()>>,
	active: Mutex<Option<Profile>>,
}

impl Profiles {
	pub fn new(memento: Arc<dyn Memento>, data_changed: Arc<EventEmitter<()>>) -> Profiles {
		let active = ACTIVE.get(&*memento).unwrap_or_else(|e| {
			log::warn!("ignoring the stored active profile, {}", e.human());
			None
		});
		Profiles { memento, data_changed, active: Mutex::new(active) }
	}

	pub async fn list(&self) -> R<Vec<Profile>> {
		let _active = self.active.lock().await;
		self.load()
	}

	pub async fn add(&self, profile: Profile) -> R<()> {
		let _active = self.active.lock().await;
		self.add_locked(profile)
	}

	pub async fn edit(&self, index: usize, name: Option<String>, base_url: Option<String>, token: Option<String>) -> R<()> {
		let mut active = self.active.lock().await;
		self.edit_locked(&mut active, index, name, base_url, token)
	}

	pub async fn delete(&self, index: usize) -> R<()> {
		let mut active = self.active.lock().await;
		self.delete_locked(&mut active, index)
	}

	pub async fn select(&self, host: &dyn Host, index: usize) -> R<Profile> {
		let mut active = self.active.lock().await;
		self.select_locked(host, &mut active, index).await
	}

	pub async fn reset(&self) -> R<()> {
		let mut active = self.active.lock().await;
		self.commit(&mut active, Some(None), || SAVED.clear(&*self.memento))?;
		log::info!("saved profiles reset");
		Ok(())
	}

	/// The profile to send requests with, asking the user to pick one if none is active.
	pub async fn active(&self, host: &dyn Host) -> R<Profile> {
		let mut active = self.active.lock().await;
		match &*active {
			Some(profile) => Ok(profile.clone()),
			None => self.pick_locked(host, &mut active).await,
		}
	}

	pub async fn pick(&self, host: &dyn Host) -> R<Profile> {
		let mut active = self.active.lock().await;
		self.pick_locked(host, &mut active).await
	}

	async fn pick_locked(&self, host: &dyn Host, active: &mut Option<Profile>) -> R<Profile> {
		loop {
			let list = self.load()?;
			let mut picker = QuickPick::new().title("Select which SIO2 API URL you want to use").ignore_focus_out().match_on_detail().items(
				list.iter().enumerate().map(|(i, profile)| {
					Item::new(Choice::Profile(i), profile.name.clone())
						.detail(profile.base_url.clone())
						.button("notebook-edit", "Edit")
						.button("notebook-delete-cell", "Delete")
				}),
			);
			if !list.is_empty() {
				picker = picker.separator();
			}
			let pick = picker.item(Item::new(Choice::Add, "Add new URL to the list").always_show()).show(host).await;
			match pick {
				None => return Err(no_profile_selected()),
				Some(Pick::Accept(Choice::Profile(i))) => return self.select_locked(host, active, i).await,
				Some(Pick::Accept(Choice::Add)) => {
					if let Some(profile) = ask_new(host).await {
						self.add_locked(profile)?;
						return self.select_locked(host, active, 0).await;
					}
				},
				Some(Pick::Button(Choice::Profile(i), BUTTON_EDIT)) => {
					let (name, base_url, token) = ask_edit(host, &list[i]).await;
					self.edit_locked(active, i, name, base_url, token)?;
				},
				Some(Pick::Button(Choice::Profile(i), _)) => self.delete_locked(active, i)?,
				Some(Pick::Button(Choice::Add, _)) => (),
			}
		}
	}

	fn add_locked(&self, profile: Profile) -> R<()> {
		let mut list = self.load()?;
		log::info!("adding profile {:?} at {}", profile.name, profile.base_url);
		list.insert(0, profile);
		SAVED.set(&*self.memento, &list)
	}

	fn edit_locked(&self, active: &mut Option<Profile>, index: usize, name: Option<String>, base_url: Option<String>, token: Option<String>) -> R<()> {
		let mut list = self.load()?;
		let entry = list.get_mut(index).ok_or_else(|| out_of_range(index))?;
		let old = entry.clone();
		if let Some(name) = name {
			entry.name = name;
		}
		if let Some(base_url) = base_url {
			entry.base_url = base_url;
		}
		if let Some(token) = token {
			entry.token = token;
		}
		let new = entry.clone();
		let was_active = active.as_ref() == Some(&old);
		self.commit(active, was_active.then(|| Some(new.clone())), || SAVED.set(&*self.memento, &list))?;
		if was_active {
			log::info!("active profile edited, now {:?} at {}", new.name, new.base_url);
		}
		Ok(())
	}

	fn delete_locked(&self, active: &mut Option<Profile>, index: usize) -> R<()> {
		let mut list = self.load()?;
		if index >= list.len() {
			return Err(out_of_range(index));
		}
		let removed = list.remove(index);
		let was_active = active.as_ref() == Some(&removed);
		self.commit(active, was_active.then_some(None), || SAVED.set(&*self.memento, &list))?;
		if was_active {
			log::info!("active profile {:?} deleted", removed.name);
		}
		Ok(())
	}

	async fn select_locked(&self, host: &dyn Host, active: &mut Option<Profile>, index: usize) -> R<Profile> {
		let mut list = self.load()?;
		let entry = list.get_mut(index).ok_or_else(|| out_of_range(index))?;
		let asked = entry.token.is_empty();
		if asked {
			let token = InputBox::new().title("Enter your API token").password().ignore_focus_out().show(host).await;
			entry.token = token.filter(|token| !token.is_empty()).ok_or_else(E::cancel)?;
		}
		let profile = list[index].clone();
		self.commit(active, Some(Some(profile.clone())), || if asked { SAVED.set(&*self.memento, &list) } else { Ok(()) })?;
		log::info!("selected profile {:?} at {}", profile.name, profile.base_url);
		Ok(profile)
	}

	/// Persist a change to the list together with the new active profile, if `next` is given.
	/// Either both writes succeed and the change is announced, or neither stored value nor `active` changes.
	fn commit(&self, active: &mut Option<Profile>, next: Option<Option<Profile>>, write_list: impl FnOnce() -> R<()>) -> R<()> {
		if let Some(next) = &next {
			store_active(&*self.memento, next.as_ref())?;
		}
		if let Err(e) = write_list() {
			if next.is_some() {
				if let Err(rollback) = store_active(&*self.memento, active.as_ref()) {
					log::error!("failed to restore the stored active profile, {}", rollback.human());
				}
			}
			return Err(e);
		}
		if let Some(next) = next {
			*active = next;
			self.data_changed.fire(());
		}
		Ok(())
	}

	fn load(&self) -> R<Vec<Profile>> {
		let stored = SAVED.get(&*self.memento).unwrap_or_else(|e| {
			log::warn!("ignoring the stored profile list, {}", e.human());
			None
		});
		match stored {
			Some(list) => Ok(list),
			None => {
				let list = builtin();
				SAVED.set(&*self.memento, &list)?;
				Ok(list)
			},
		}
	}
}

fn store_active(memento: &dyn Memento, profile: Option<&Profile>) -> R<()> {
	match profile {
		Some(profile) => ACTIVE.set(memento, profile),
		None => ACTIVE.clear(memento),
	}
}

fn out_of_range(index: usize) -> E {
	E::error(format!("there is no saved profile number {}", index))
}

async fn ask_new(host: &dyn Host) -> Option<Profile> {
	let name = require(host, InputBox::new().title("Name your API URL").ignore_focus_out().show(host).await, "Name").await?;
	let base_url =
		require(host, InputBox::new().title("Enter a valid API URL").value("https://").cursor_at_end().ignore_focus_out().show(host).await, "URL")
			.await?;
	let token = require(host, InputBox::new().title("Enter your API token").password().ignore_focus_out().show(host).await, "Token").await?;
	Some(Profile { name, base_url, token })
}

async fn require(host: &dyn Host, value: Option<String>, what: &str) -> Option<String> {
	match value.filter(|value| !value.is_empty()) {
		Some(value) => Some(value),
		None => {
			Message::new::<()>(&format!("{} is required", what)).error().show(host).await;
			None
		},
	}
}

async fn ask_edit(host: &dyn Host, profile: &Profile) -> (Option<String>, Option<String>, Option<String>) {
	let name = InputBox::new().title("Name your API URL").value(&profile.name).select_all().ignore_focus_out().show(host).await;
	let base_url = InputBox::new().title("Enter a valid API URL").value(&profile.base_url).select_all().ignore_focus_out().show(host).await;
	let token = InputBox::new().title("Enter your API token").value(&profile.token).select_all().password().ignore_focus_out().show(host).await;
	(name, base_url, token)
}
