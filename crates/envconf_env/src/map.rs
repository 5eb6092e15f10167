//! In-memory binding store.

use rustc_hash::FxHashMap;

use crate::bind::{validate_name, validate_value, Bind, BindError, BindOutcome};

/// A private environment backed by a hash map.
///
/// Applies the same validation as [`ProcessEnv`](crate::ProcessEnv), so a
/// pass that succeeds here would succeed against the process environment
/// (apart from platform encoding limits).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: FxHashMap<String, Vec<u8>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a binding directly, bypassing the overwrite policy.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.vars.get(name).map(Vec::as_slice)
    }

    /// The value of `name` as UTF-8, if bound and valid.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Bind for MapEnv {
    fn bind(
        &mut self,
        name: &str,
        value: &[u8],
        overwrite: bool,
    ) -> Result<BindOutcome, BindError> {
        validate_name(name)?;
        validate_value(name, value)?;

        match self.vars.get_mut(name) {
            Some(_) if !overwrite => Ok(BindOutcome::Kept),
            Some(slot) => {
                value.clone_into(slot);
                Ok(BindOutcome::Replaced)
            }
            None => {
                self.vars.insert(name.to_owned(), value.to_vec());
                Ok(BindOutcome::Inserted)
            }
        }
    }

    fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<_> = self
            .vars
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        entries.sort();
        entries
    }
}
