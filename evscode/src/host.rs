//! Interface of the editor that hosts the extension.
//!
//! Extensions never talk to the editor directly. Instead, the frontend which embeds the extension implements [`Host`], and the builders
//! in [`crate::stdlib`] translate their configuration into the plain option structs defined here. All option structs serialize to the
//! camelCase shape expected by the VS Code API, so a frontend can forward them as-is.

use crate::R;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Icon and severity of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
	/// Blue information icon.
	Info,
	/// Red error icon.
	Error,
}

/// Button displayed on a message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
	/// Title of the button.
	pub title: String,
	/// Whether the action will be selected as default if a modal message is closed.
	pub is_close_affordance: bool,
}

/// Message displayed in the corner of the editor, or as a popup if modal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOptions {
	/// Text of the message.
	pub message: String,
	/// Icon and severity.
	pub kind: MessageKind,
	/// Whether the message blocks the editor until the user responds.
	pub modal: bool,
	/// Buttons, in display order.
	pub items: Vec<MessageItem>,
}

/// Input box displayed at the top of the editor.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBoxOptions {
	/// Title displayed above the input.
	pub title: Option<String>,
	/// Text that tells the user what to do.
	pub prompt: Option<String>,
	/// Text displayed with low opacity if the input is empty.
	pub place_holder: Option<String>,
	/// Whether the typed characters should be masked.
	pub password: bool,
	/// Whether the input box stays open when it loses focus.
	pub ignore_focus_out: bool,
	/// Initial value.
	pub value: Option<String>,
	/// Closed-open range of the initial value that is selected.
	pub value_selection: Option<(usize, usize)>,
}

/// Whether a quick pick entry is a selectable item or a visual separator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickPickItemKind {
	/// Selectable item.
	Default,
	/// Horizontal line, optionally with a label.
	Separator,
}

/// Button displayed on the right side of a quick pick item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemButton {
	/// Name of the theme icon, e.g. `notebook-edit`.
	pub icon: String,
	/// Text displayed when hovering over the button.
	pub tooltip: Option<String>,
}

/// Entry of a quick pick.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPickItem {
	/// Main text of the entry.
	pub label: String,
	/// Text displayed in lighter font beside the label.
	pub description: Option<String>,
	/// Text displayed in smaller font below the label.
	pub detail: Option<String>,
	/// Whether this is a selectable item or a separator.
	pub kind: QuickPickItemKind,
	/// Buttons displayed on the item.
	pub buttons: Vec<ItemButton>,
	/// Whether the item is shown regardless of the filter typed by the user.
	pub always_show: bool,
}

/// List of items the user can select one from.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPickOptions {
	/// Title displayed above the list.
	pub title: Option<String>,
	/// Text displayed in the filter input if it is empty.
	pub place_holder: Option<String>,
	/// Whether the quick pick stays open when it loses focus.
	pub ignore_focus_out: bool,
	/// Whether the filter also matches item descriptions.
	pub match_on_description: bool,
	/// Whether the filter also matches item details.
	pub match_on_detail: bool,
	/// Entries, in display order.
	pub items: Vec<QuickPickItem>,
}

/// What the user did with a quick pick. Indices refer to [`QuickPickOptions::items`], separators included.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuickPickResponse {
	/// The item was accepted.
	Accept {
		/// Index of the item.
		index: usize,
	},
	/// A button on the item was clicked.
	Button {
		/// Index of the item.
		index: usize,
		/// Index of the button within the item.
		button: usize,
	},
}

/// Text document open in the editor.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocument {
	/// Full path of the document.
	pub file_name: String,
	/// Contents of the document, including unsaved changes.
	pub text: String,
}

/// Transient panel that renders a binary document, like a PDF, using an external renderer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPanel {
	/// Identifier of the panel type.
	pub view_type: String,
	/// Title of the panel tab.
	pub title: String,
	/// Base64-encoded contents of the document.
	pub data: String,
	/// Location of the renderer's worker script.
	pub worker_uri: String,
}

/// Editor hosting the extension.
///
/// Methods returning [`Option`] return [`None`] if the user dismissed the UI element.
#[async_trait]
pub trait Host: Send+Sync {
	/// Show an input box and wait for the user to accept or dismiss it.
	async fn input_box(&self, options: InputBoxOptions) -> Option<String>;
	/// Show a quick pick and wait for the user to accept an item, click an item button, or dismiss it.
	async fn quick_pick(&self, options: QuickPickOptions) -> Option<QuickPickResponse>;
	/// Show a message and wait for the user to click one of its buttons, returning its index.
	async fn message(&self, options: MessageOptions) -> Option<usize>;
	/// Open a read-only text document identified by a virtual URI. The host asks the extension for its contents.
	async fn show_text_document(&self, uri: &str, preview: bool) -> R<()>;
	/// Open a panel rendering a binary document.
	async fn show_document_panel(&self, panel: DocumentPanel) -> R<()>;
	/// Query the document in the currently active text editor, if any.
	async fn active_document(&self) -> Option<TextDocument>;
}
