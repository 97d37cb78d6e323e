use indexmap::IndexMap;
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FastHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Field name → ordered validation messages. A key is present only while the
/// field has at least one message.
pub type ErrorMap = IndexMap<SmolStr, Vec<String>>;

// ─── IntoErrors ─────────────────────────────────────────────────────────────

/// Anything that can stand in for a field's error list.
///
/// A single message becomes a one-element list.
pub trait IntoErrors {
    fn into_errors(self) -> Vec<String>;
}

impl IntoErrors for &str {
    fn into_errors(self) -> Vec<String> {
        vec![self.to_owned()]
    }
}

impl IntoErrors for String {
    fn into_errors(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoErrors for Vec<String> {
    fn into_errors(self) -> Vec<String> {
        self
    }
}

impl IntoErrors for Vec<&str> {
    fn into_errors(self) -> Vec<String> {
        self.into_iter().map(str::to_owned).collect()
    }
}

impl<const N: usize> IntoErrors for [&str; N] {
    fn into_errors(self) -> Vec<String> {
        self.into_iter().map(str::to_owned).collect()
    }
}

impl IntoErrors for &[String] {
    fn into_errors(self) -> Vec<String> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_message_becomes_list() {
        assert_eq!("required".into_errors(), vec!["required".to_string()]);
        assert_eq!(String::from("x").into_errors(), vec!["x".to_string()]);
    }

    #[test]
    fn test_lists_pass_through_in_order() {
        assert_eq!(
            ["a", "b"].into_errors(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(Vec::<String>::new().into_errors().is_empty());
    }
}
