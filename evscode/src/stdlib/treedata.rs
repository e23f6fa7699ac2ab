//! Items displayed in tree views.

use serde::Serialize;

/// Whether a tree item can be expanded, and whether it is expanded initially.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsibleState {
	/// The item has no children.
	None,
	/// The item has children and is displayed collapsed.
	Collapsed,
	/// The item has children and is displayed expanded.
	Expanded,
}

/// Presentation of a single tree view node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
	/// Main text of the item.
	pub label: String,
	/// Text displayed in lighter font beside the label.
	pub description: Option<String>,
	/// Whether the item can be expanded.
	pub collapsible_state: CollapsibleState,
	/// Value used by the editor to decide which context menu commands apply to the item.
	pub context_value: Option<String>,
	/// Path of the icon displayed before the label.
	pub icon_path: Option<String>,
	/// URI passed to file decoration providers.
	pub resource_uri: Option<String>,
	/// Theme colour id of the label decoration.
	pub color: Option<String>,
}

impl TreeItem {
	/// Create a tree item with the given label and no other attributes.
	pub fn new(label: impl Into<String>, collapsible_state: CollapsibleState) -> TreeItem {
		TreeItem {
			label: label.into(),
			description: None,
			collapsible_state,
			context_value: None,
			icon_path: None,
			resource_uri: None,
			color: None,
		}
	}

	/// Set the context value.
	pub fn context_value(mut self, x: impl Into<String>) -> Self {
		self.context_value = Some(x.into());
		self
	}

	/// Set the description.
	pub fn description(mut self, x: impl Into<String>) -> Self {
		self.description = Some(x.into());
		self
	}

	/// Set the icon path.
	pub fn icon_path(mut self, x: impl Into<String>) -> Self {
		self.icon_path = Some(x.into());
		self
	}

	/// Set the resource URI.
	pub fn resource_uri(mut self, x: impl Into<String>) -> Self {
		self.resource_uri = Some(x.into());
		self
	}

	/// Set the decoration colour, or none.
	pub fn color(mut self, x: Option<&str>) -> Self {
		self.color = x.map(String::from);
		self
	}
}
