//! Selecting one of the given options.

use crate::host::{Host, ItemButton, QuickPickItem, QuickPickItemKind, QuickPickOptions, QuickPickResponse};

/// Builder object for an item that can be selected.
#[must_use]
pub struct Item<T> {
	always_show: bool,
	buttons: Vec<ItemButton>,
	description: Option<String>,
	detail: Option<String>,
	label: String,
	id: T,
}
impl<T> Item<T> {
	/// Create a new item with the given ID and label.
	pub fn new(id: T, label: impl Into<String>) -> Item<T> {
		Item { always_show: false, buttons: Vec::new(), description: None, detail: None, label: label.into(), id }
	}

	/// Set to show item regardless of whether what user typed matches the item.
	pub fn always_show(mut self) -> Self {
		self.always_show = true;
		self
	}

	/// Set description, displayed in lighter font beside the label.
	pub fn description(mut self, x: impl Into<String>) -> Self {
		self.description = Some(x.into());
		self
	}

	/// Set detail, displayed in smaller and lighter font below the label.
	pub fn detail(mut self, x: impl Into<String>) -> Self {
		self.detail = Some(x.into());
		self
	}

	/// Add a button with the given theme icon. Buttons are numbered in the order they were added, starting from 0.
	pub fn button(mut self, icon: impl Into<String>, tooltip: impl Into<String>) -> Self {
		self.buttons.push(ItemButton { icon: icon.into(), tooltip: Some(tooltip.into()) });
		self
	}
}

/// What the user picked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Pick<T> {
	/// The item with this ID was accepted.
	Accept(T),
	/// The button with the given number was clicked on the item with this ID.
	Button(T, usize),
}

enum Entry<T> {
	Item(Item<T>),
	Separator(Option<String>),
}

/// Builder for configuring quick picks. Use [`QuickPick::new`] to create.
#[must_use]
pub struct Builder<T> {
	title: Option<String>,
	ignore_focus_out: bool,
	match_on_description: bool,
	match_on_detail: bool,
	placeholder: Option<String>,
	entries: Vec<Entry<T>>,
}
impl<T> Builder<T> {
	/// Set a title displayed above the list.
	pub fn title(mut self, x: impl Into<String>) -> Self {
		self.title = Some(x.into());
		self
	}

	/// Do not make the quick pick disappear when user breaks focus.
	pub fn ignore_focus_out(mut self) -> Self {
		self.ignore_focus_out = true;
		self
	}

	/// When user types a filter, match it against the description as well as the label.
	pub fn match_on_description(mut self) -> Self {
		self.match_on_description = true;
		self
	}

	/// When user types a filter, match it against the detail as well as the label.
	pub fn match_on_detail(mut self) -> Self {
		self.match_on_detail = true;
		self
	}

	/// Set a placeholder.
	pub fn placeholder(mut self, x: impl Into<String>) -> Self {
		self.placeholder = Some(x.into());
		self
	}

	/// Add an item to the selection.
	pub fn item(mut self, item: Item<T>) -> Self {
		self.entries.push(Entry::Item(item));
		self
	}

	/// Add items to the selection.
	pub fn items(mut self, items: impl IntoIterator<Item=Item<T>>) -> Self {
		self.entries.extend(items.into_iter().map(Entry::Item));
		self
	}

	/// Add a separator line below the items added so far.
	pub fn separator(mut self) -> Self {
		self.entries.push(Entry::Separator(None));
		self
	}

	/// Display the quick pick and wait for the user.
	/// Returns [`None`] if the quick pick was dismissed.
	pub async fn show(self, host: &dyn Host) -> Option<Pick<T>> {
		let mut ids = Vec::new();
		let mut items = Vec::new();
		for entry in self.entries {
			match entry {
				Entry::Item(item) => {
					items.push(QuickPickItem {
						label: item.label,
						description: item.description,
						detail: item.detail,
						kind: QuickPickItemKind::Default,
						buttons: item.buttons,
						always_show: item.always_show,
					});
					ids.push(Some(item.id));
				},
				Entry::Separator(label) => {
					items.push(QuickPickItem {
						label: label.unwrap_or_default(),
						description: None,
						detail: None,
						kind: QuickPickItemKind::Separator,
						buttons: Vec::new(),
						always_show: false,
					});
					ids.push(None);
				},
			}
		}
		let options = QuickPickOptions {
			title: self.title,
			place_holder: self.placeholder,
			ignore_focus_out: self.ignore_focus_out,
			match_on_description: self.match_on_description,
			match_on_detail: self.match_on_detail,
			items,
		};
		let (index, button) = match host.quick_pick(options).await? {
			QuickPickResponse::Accept { index } => (index, None),
			QuickPickResponse::Button { index, button } => (index, Some(button)),
		};
		let id = match ids.into_iter().nth(index).flatten() {
			Some(id) => id,
			None => {
				log::warn!("quick pick returned index {} which is not a selectable item", index);
				return None;
			},
		};
		Some(match button {
			None => Pick::Accept(id),
			Some(button) => Pick::Button(id, button),
		})
	}
}

/// Quick pick provided by the editor.
///
/// See [module documentation](index.html) for details.
pub struct QuickPick {
	_a: (),
}

impl QuickPick {
	/// Create a new builder to configure the quick pick.
	#[allow(clippy::new_ret_no_self)]
	pub fn new<T>() -> Builder<T> {
		Builder { title: None, ignore_focus_out: false, match_on_description: false, match_on_detail: false, placeholder: None, entries: Vec::new() }
	}
}

#[cfg(test)]
struct Answering {
	response: QuickPickResponse,
	shown: std::sync::Mutex<Vec<QuickPickOptions>>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl Host for Answering {
	async fn input_box(&self, _: crate::host::InputBoxOptions) -> Option<String> {
		None
	}

	async fn quick_pick(&self, options: QuickPickOptions) -> Option<QuickPickResponse> {
		self.shown.lock().unwrap().push(options);
		Some(self.response)
	}

	async fn message(&self, _: crate::host::MessageOptions) -> Option<usize> {
		None
	}

	async fn show_text_document(&self, _: &str, _: bool) -> crate::R<()> {
		Ok(())
	}

	async fn show_document_panel(&self, _: crate::host::DocumentPanel) -> crate::R<()> {
		Ok(())
	}

	async fn active_document(&self) -> Option<crate::host::TextDocument> {
		None
	}
}

#[cfg(test)]
fn pick_with(response: QuickPickResponse) -> (Option<Pick<&'static str>>, Vec<QuickPickOptions>) {
	let host = Answering { response, shown: std::sync::Mutex::new(Vec::new()) };
	let picked = futures::executor::block_on(
		QuickPick::new()
			.title("Select which SIO2 API URL you want to use")
			.item(Item::new("mimuw", "mimuw").button("notebook-edit", "Edit").button("notebook-delete-cell", "Delete"))
			.separator()
			.item(Item::new("add", "Add new URL to the list"))
			.show(&host),
	);
	(picked, host.shown.into_inner().unwrap())
}

#[test]
fn test_pick_maps_indices() {
	let (picked, shown) = pick_with(QuickPickResponse::Accept { index: 2 });
	assert_eq!(picked, Some(Pick::Accept("add")));
	assert_eq!(shown[0].items.len(), 3);
	assert_eq!(shown[0].items[1].kind, QuickPickItemKind::Separator);
	assert_eq!(shown[0].items[0].buttons[1].icon, "notebook-delete-cell");
	let (picked, _) = pick_with(QuickPickResponse::Button { index: 0, button: 1 });
	assert_eq!(picked, Some(Pick::Button("mimuw", 1)));
}

#[test]
fn test_pick_separator_is_not_selectable() {
	let (picked, _) = pick_with(QuickPickResponse::Accept { index: 1 });
	assert_eq!(picked, None);
	let (picked, _) = pick_with(QuickPickResponse::Accept { index: 7 });
	assert_eq!(picked, None);
}
