//! Information messages with optional actions.
//!
//! The messages will ignore the newlines inside the string and display all text on one line, unless they are modal.

use crate::host::{Host, MessageItem, MessageKind, MessageOptions};

/// Action button that will appear on a message.
pub struct Action<T> {
	/// Identifier that will be returned if the action in selected.
	pub id: T,
	/// Title of the button.
	pub title: String,
	/// Whether the action will be selected as default if the message is closed.
	/// There can be only one item with this equal to `true`.
	/// This option only works for modal messages and is otherwise ignored.
	pub is_close_affordance: bool,
}

/// Builder for configuring messages. Use [`Message::new`] to create.
#[must_use]
pub struct Builder<'a, T> {
	message: &'a str,
	kind: MessageKind,
	modal: bool,
	items: Vec<Action<T>>,
}
impl<'a, T> Builder<'a, T> {
	/// Use a red error icon
	pub fn error(mut self) -> Self {
		self.kind = MessageKind::Error;
		self
	}

	/// Make message modal.
	/// Instead of displaying the message in the bottom right corner, the editor will display it as a popup and block the rest of the
	/// editor until user responds. Probably only use this for messages which require urgent user interaction.
	pub fn modal(mut self) -> Self {
		self.modal = true;
		self
	}

	/// Add an action button to the message.
	/// See [`Action`] for the meaning of the arguments.
	pub fn item(mut self, id: T, title: impl Into<String>, is_close_affordance: bool) -> Self {
		self.items.push(Action { id, title: title.into(), is_close_affordance });
		self
	}

	/// Display the message and wait until it is closed.
	/// Returns the id of the selected action, if any.
	pub async fn show(self, host: &dyn Host) -> Option<T> {
		let options = MessageOptions {
			message: self.message.to_owned(),
			kind: self.kind,
			modal: self.modal,
			items: self.items.iter().map(|item| MessageItem { title: item.title.clone(), is_close_affordance: item.is_close_affordance }).collect(),
		};
		let index = host.message(options).await?;
		self.items.into_iter().nth(index).map(|item| item.id)
	}
}

/// Info message provided by the editor.
///
/// See [module documentation](index.html) for details.
pub struct Message {
	_a: (),
}

impl Message {
	/// Create a new builder to configure the message.
	#[allow(clippy::new_ret_no_self)]
	pub fn new<T>(message: &str) -> Builder<'_, T> {
		Builder { message, kind: MessageKind::Info, modal: false, items: Vec::new() }
	}
}
