//! Built-in service catalogs embedded in the binary
//!
//! Lets users run `--catalog connect` instead of pointing at a YAML file.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in catalog YAML definitions
pub static BUILTIN_CATALOGS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert("connect", include_str!("../../catalogs/connect.yaml"));
        m.insert("amazon-connect", include_str!("../../catalogs/connect.yaml"));
        m
    });

/// Get a built-in catalog by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_CATALOGS.get(name.to_lowercase().as_str()).copied()
}

/// List built-in catalog names (sorted)
pub fn list_builtin() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_CATALOGS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_exist() {
        assert!(get_builtin("connect").is_some());
        assert!(get_builtin("Connect").is_some());
    }

    #[test]
    fn test_aliases_work() {
        assert_eq!(get_builtin("connect"), get_builtin("amazon-connect"));
    }

    #[test]
    fn test_unknown_catalog() {
        assert!(get_builtin("unknown").is_none());
    }

    #[test]
    fn test_list_builtin_sorted() {
        assert_eq!(list_builtin(), vec!["amazon-connect", "connect"]);
    }
}
