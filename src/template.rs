//! URI path templates
//!
//! Operation paths carry `{Name}` placeholders that are filled from URI-bound
//! parameters, e.g. `/users-summary/{InstanceId}`. A greedy placeholder
//! `{Name+}` keeps `/` separators in the substituted value.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {Name} or {Name+}
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(\+?)\}").expect("placeholder regex is valid")
});

/// Names of all placeholders in a path template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Check if a template has any placeholders
pub fn has_placeholders(template: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(template)
}

/// Substitute placeholders with percent-encoded values
pub fn render_path(template: &str, values: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 is the whole match");
        let name = &caps[1];
        let greedy = !caps[2].is_empty();

        let value = values
            .get(name)
            .ok_or_else(|| Error::invalid_parameter(name, "no value for URI placeholder"))?;
        if value.is_empty() {
            return Err(Error::invalid_parameter(
                name,
                "URI placeholder value cannot be empty",
            ));
        }

        result.push_str(&template[last..whole.start()]);
        if greedy {
            let encoded: Vec<String> = value
                .split('/')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect();
            result.push_str(&encoded.join("/"));
        } else {
            result.push_str(&urlencoding::encode(value));
        }
        last = whole.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("/users/{InstanceId}/{UserId}"),
            vec!["InstanceId", "UserId"]
        );
        assert_eq!(placeholders("/objects/{Key+}"), vec!["Key"]);
        assert!(placeholders("/instance").is_empty());
        assert!(!has_placeholders("/instance"));
        assert!(has_placeholders("/queues-summary/{InstanceId}"));
    }

    #[test]
    fn test_render_path() {
        let path = render_path(
            "/users/{InstanceId}/{UserId}",
            &values(&[("InstanceId", "inst-1"), ("UserId", "u-9")]),
        )
        .unwrap();
        assert_eq!(path, "/users/inst-1/u-9");
    }

    #[test]
    fn test_render_path_encodes_values() {
        let path = render_path("/users/{UserId}", &values(&[("UserId", "a b/c")])).unwrap();
        assert_eq!(path, "/users/a%20b%2Fc");
    }

    #[test]
    fn test_render_path_greedy_keeps_slashes() {
        let path = render_path("/objects/{Key+}", &values(&[("Key", "dir/a b.txt")])).unwrap();
        assert_eq!(path, "/objects/dir/a%20b.txt");
    }

    #[test]
    fn test_render_path_missing_value() {
        let result = render_path("/users/{InstanceId}", &HashMap::new());
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_render_path_empty_value() {
        let result = render_path("/users/{InstanceId}", &values(&[("InstanceId", "")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_render_path_without_placeholders() {
        assert_eq!(render_path("/instance", &HashMap::new()).unwrap(), "/instance");
    }
}
