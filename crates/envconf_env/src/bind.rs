//! The binding seam between parsed pairs and an environment store.

/// What a successful [`Bind::bind`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindOutcome {
    /// The name was unbound and now holds the value.
    Inserted,
    /// The name was bound and its value was overwritten.
    Replaced,
    /// The name was bound and `overwrite` was off, so nothing changed.
    Kept,
}

impl BindOutcome {
    /// Returns `true` if the store now holds the new value.
    pub fn is_applied(self) -> bool {
        !matches!(self, Self::Kept)
    }
}

/// A store refused a binding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("invalid variable name `{name}`")]
    InvalidName { name: String },
    #[error("value of `{name}` contains a NUL byte")]
    NulInValue { name: String },
    #[error("value of `{name}` is not valid UTF-8")]
    NonUtf8Value { name: String },
}

/// An environment-style key/value store.
pub trait Bind {
    /// Bind `name` to `value`.
    ///
    /// When `name` is already bound and `overwrite` is `false`, the existing
    /// value stays and [`BindOutcome::Kept`] is returned.
    fn bind(
        &mut self,
        name: &str,
        value: &[u8],
        overwrite: bool,
    ) -> Result<BindOutcome, BindError>;

    /// Every binding in the store, sorted by name.
    fn entries(&self) -> Vec<(String, Vec<u8>)>;
}

impl<B: Bind + ?Sized> Bind for &mut B {
    fn bind(
        &mut self,
        name: &str,
        value: &[u8],
        overwrite: bool,
    ) -> Result<BindOutcome, BindError> {
        (**self).bind(name, value, overwrite)
    }

    fn entries(&self) -> Vec<(String, Vec<u8>)> {
        (**self).entries()
    }
}

/// Check a name against what environment stores accept.
///
/// Names must be non-empty and contain neither `=` nor NUL. The tokenizer's
/// grammar is stricter; this is the floor every store enforces.
pub fn validate_name(name: &str) -> Result<(), BindError> {
    if name.is_empty() || name.bytes().any(|b| b == b'=' || b == 0) {
        return Err(BindError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Reject values the store cannot represent.
pub(crate) fn validate_value(name: &str, value: &[u8]) -> Result<(), BindError> {
    if value.contains(&0) {
        return Err(BindError::NulInValue {
            name: name.to_owned(),
        });
    }
    Ok(())
}
