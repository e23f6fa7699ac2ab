//! Input boxes displayed at the top of the editor.

use crate::host::{Host, InputBoxOptions};

/// Builder for configurating input boxes. Use [`InputBox::new`] to create.
#[must_use]
pub struct Builder {
	options: InputBoxOptions,
}
impl Builder {
	/// Do not make the input box disappear when user breaks focus.
	pub fn ignore_focus_out(mut self) -> Self {
		self.options.ignore_focus_out = true;
		self
	}

	/// Replace displayed characters with password placeholder characters.
	/// Consider also using [`Builder::ignore_focus_out`] because users might need to pull a password from their password manager.
	pub fn password(mut self) -> Self {
		self.options.password = true;
		self
	}

	/// Set a placeholder value that will be displayed with low opacity if the input box is empty.
	pub fn placeholder(mut self, x: impl AsRef<str>) -> Self {
		self.options.place_holder = Some(x.as_ref().to_owned());
		self
	}

	/// Set a prompt text that tells the user what to do.
	/// The editor will append a text that says to press Enter to continue or Escape to cancel.
	pub fn prompt(mut self, x: impl AsRef<str>) -> Self {
		self.options.prompt = Some(x.as_ref().to_owned());
		self
	}

	/// Set a title displayed above the input.
	pub fn title(mut self, x: impl AsRef<str>) -> Self {
		self.options.title = Some(x.as_ref().to_owned());
		self
	}

	/// Set default value in the input box.
	pub fn value(mut self, x: impl AsRef<str>) -> Self {
		self.options.value = Some(x.as_ref().to_owned());
		self
	}

	/// Set which part of the default value will be selected by default.
	/// The indices are 0-based and closed-open(e.g. `.value("Hello, world!").value_selection(2, 6)` will select `llo,`).
	pub fn value_selection(mut self, l: usize, r: usize) -> Self {
		self.options.value_selection = Some((l, r));
		self
	}

	/// Select the whole default value, so that typing replaces it.
	pub fn select_all(self) -> Self {
		let len = self.options.value.as_ref().map_or(0, |value| value.chars().count());
		self.value_selection(0, len)
	}

	/// Place the cursor after the default value without selecting anything.
	pub fn cursor_at_end(self) -> Self {
		let len = self.options.value.as_ref().map_or(0, |value| value.chars().count());
		self.value_selection(len, len)
	}

	/// Display the input box and wait for the user.
	/// Returns [`None`] if the input box was dismissed.
	pub async fn show(self, host: &dyn Host) -> Option<String> {
		host.input_box(self.options).await
	}
}

/// Input box provided by the editor.
///
/// See [module documentation](index.html) for details.
pub struct InputBox {
	_a: (),
}

impl InputBox {
	/// Create a new builder to configure the input box.
	#[allow(clippy::new_ret_no_self)]
	pub fn new() -> Builder {
		Builder { options: InputBoxOptions::default() }
	}
}

#[test]
fn test_value_selection() {
	let options = InputBox::new().value("https://").cursor_at_end().options;
	assert_eq!(options.value_selection, Some((8, 8)));
	let options = InputBox::new().value("szkopuł").select_all().options;
	assert_eq!(options.value_selection, Some((0, 7)));
}
