use evscode::{InputBox, Message, E, R};
use std::{ffi::OsStr, path::Path};

/// Fill in the values missing from the command context by asking the user, one input box per value.
/// Aborts with a cancellation if any of them ends up empty.
pub async fn get_variables<const N: usize>(host: &dyn evscode::Host, variables: [(Option<String>, &str); N]) -> R<[String; N]> {
	let mut values: [String; N] = std::array::from_fn(|_| String::new());
	for (value, (known, prompt)) in values.iter_mut().zip(variables) {
		*value = match known {
			Some(known) => known,
			None => InputBox::new().title(prompt).ignore_focus_out().show(host).await.unwrap_or_default(),
		};
	}
	if values.iter().any(String::is_empty) {
		if N > 1 {
			Message::new::<()>("You must provide all variables").error().show(host).await;
		}
		return Err(E::cancel());
	}
	Ok(values)
}

/// Final component of a path, using the separators of the current platform.
pub fn file_name(path: &str) -> &str {
	Path::new(path).file_name().and_then(OsStr::to_str).unwrap_or(path)
}

#[test]
fn test_file_name() {
	assert_eq!(file_name("/home/kasia/oi/kon.cpp"), "kon.cpp");
	assert_eq!(file_name("kon.cpp"), "kon.cpp");
}

#[cfg(unix)]
#[test]
fn test_file_name_keeps_backslash() {
	assert_eq!(file_name("/home/kasia/a\\b.cpp"), "a\\b.cpp");
}

#[cfg(windows)]
#[test]
fn test_file_name_windows() {
	assert_eq!(file_name("C:\\Users\\kasia\\kon.cpp"), "kon.cpp");
}

#[test]
fn test_get_variables_prompts_only_missing() {
	let host = crate::testing::ScriptedHost::new(vec![crate::testing::Reply::Input(Some("12"))]);
	let values = futures::executor::block_on(get_variables(&host, [(Some("oi31-1".to_owned()), "Provide contest id"), (None, "Provide submit id")]));
	assert_eq!(values.unwrap(), ["oi31-1".to_owned(), "12".to_owned()]);
	assert_eq!(host.input_titles(), ["Provide submit id"]);
}

#[test]
fn test_get_variables_missing() {
	let host = crate::testing::ScriptedHost::new(vec![crate::testing::Reply::Input(None), crate::testing::Reply::Input(Some("kon"))]);
	let err = futures::executor::block_on(get_variables(&host, [(None, "Provide contest id"), (None, "Provide problem id")])).unwrap_err();
	assert!(err.is_cancel());
	assert_eq!(host.messages(), ["You must provide all variables"]);
}

#[test]
fn test_get_variables_single_missing_is_silent() {
	let host = crate::testing::ScriptedHost::new(vec![crate::testing::Reply::Input(Some(""))]);
	let err = futures::executor::block_on(get_variables(&host, [(None, "Provide filename")])).unwrap_err();
	assert!(err.is_cancel());
	assert!(host.messages().is_empty());
}
