//! The two name sets the schema enumerates.

use std::borrow::Cow;
use std::collections::BTreeSet;
use taskschema_domain::constants::{DEFAULT_TASK_TYPES, PROBLEM_MATCHER_SIGIL};

/// Current task type and problem matcher names, each sorted and free of duplicates.
///
/// Task types always include [`DEFAULT_TASK_TYPES`]; problem matcher names always
/// carry the leading sigil exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSets {
    task_types: Vec<String>,
    problem_matchers: Vec<String>,
}

impl Default for NameSets {
    fn default() -> Self {
        Self { task_types: with_defaults(std::iter::empty::<&str>()), problem_matchers: Vec::new() }
    }
}

impl NameSets {
    #[must_use]
    pub fn task_types(&self) -> &[String] {
        &self.task_types
    }

    #[must_use]
    pub fn problem_matchers(&self) -> &[String] {
        &self.problem_matchers
    }

    /// Replaces the task type set with `names` plus the defaults.
    ///
    /// Empty names are dropped since an empty `type` never selects a task backend.
    /// Returns `true` if the set changed.
    pub fn replace_task_types<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next = with_defaults(names.into_iter());
        replace_if_changed(&mut self.task_types, next)
    }

    /// Replaces the problem matcher set, normalizing every name to carry the sigil.
    ///
    /// Empty names are dropped rather than normalized to a bare `$`, which no
    /// registry entry could be referenced by. Returns `true` if the set changed.
    pub fn replace_problem_matchers<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next: BTreeSet<String> = names
            .into_iter()
            .filter(|name| !name.as_ref().is_empty())
            .map(|name| normalize_matcher_name(name.as_ref()).into_owned())
            .collect();
        replace_if_changed(&mut self.problem_matchers, next.into_iter().collect())
    }
}

/// Prefixes a problem matcher name with the sigil unless it already has one.
///
/// ```rust
/// use taskschema_core::normalize_matcher_name;
///
/// assert_eq!(normalize_matcher_name("tsc"), "$tsc");
/// assert_eq!(normalize_matcher_name("$tsc"), "$tsc");
/// ```
#[must_use]
pub fn normalize_matcher_name(name: &str) -> Cow<'_, str> {
    if name.starts_with(PROBLEM_MATCHER_SIGIL) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{PROBLEM_MATCHER_SIGIL}{name}"))
    }
}

fn with_defaults<S: AsRef<str>>(names: impl Iterator<Item = S>) -> Vec<String> {
    let set: BTreeSet<String> = DEFAULT_TASK_TYPES
        .iter()
        .map(|name| (*name).to_owned())
        .chain(names.filter(|name| !name.as_ref().is_empty()).map(|name| name.as_ref().to_owned()))
        .collect();
    set.into_iter().collect()
}

fn replace_if_changed(slot: &mut Vec<String>, next: Vec<String>) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}
