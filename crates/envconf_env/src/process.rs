//! Binding into the process environment.

use std::ffi::{OsStr, OsString};

use crate::bind::{validate_name, validate_value, Bind, BindError, BindOutcome};

/// The current process's environment, via `std::env`.
///
/// The process environment is global state: two `ProcessEnv` values see the
/// same bindings, and changes are visible to child processes spawned later.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Bind for ProcessEnv {
    fn bind(
        &mut self,
        name: &str,
        value: &[u8],
        overwrite: bool,
    ) -> Result<BindOutcome, BindError> {
        validate_name(name)?;
        validate_value(name, value)?;

        let existed = std::env::var_os(name).is_some();
        if existed && !overwrite {
            return Ok(BindOutcome::Kept);
        }
        std::env::set_var(name, os_value(name, value)?);
        Ok(if existed {
            BindOutcome::Replaced
        } else {
            BindOutcome::Inserted
        })
    }

    fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<_> = std::env::vars_os()
            .map(|(name, value)| (name.to_string_lossy().into_owned(), os_bytes(&value)))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(unix)]
fn os_value(_name: &str, value: &[u8]) -> Result<OsString, BindError> {
    use std::os::unix::ffi::OsStringExt;
    Ok(OsString::from_vec(value.to_vec()))
}

#[cfg(not(unix))]
fn os_value(name: &str, value: &[u8]) -> Result<OsString, BindError> {
    std::str::from_utf8(value)
        .map(OsString::from)
        .map_err(|_| BindError::NonUtf8Value {
            name: name.to_owned(),
        })
}

#[cfg(unix)]
fn os_bytes(value: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    value.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn os_bytes(value: &OsStr) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}
