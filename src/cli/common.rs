//! Helpers shared across CLI commands

use std::collections::BTreeMap;

use crate::error::{ImsError, Result};

/// Build a parameter map from repeated `name=value` arguments.
///
/// The value may itself contain `=`; only the first one splits. A duplicated
/// name silently keeps the last value - deliberate, matching how repeated
/// request parameters have always behaved here.
pub fn parse_key_value_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ImsError::Config(format!(
                "Invalid parameter '{}': expected name=value",
                pair
            ))
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_simple_pairs() {
        let map = parse_key_value_pairs(&strings(&["a=1", "b=2"])).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let map = parse_key_value_pairs(&strings(&["key=1", "key=2"])).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["key"], "2");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let map = parse_key_value_pairs(&strings(&["redirect_uri=https://a.com?x=1"])).unwrap();
        assert_eq!(map["redirect_uri"], "https://a.com?x=1");
    }

    #[test]
    fn test_empty_value_is_kept() {
        let map = parse_key_value_pairs(&strings(&["flag="])).unwrap();
        assert_eq!(map["flag"], "");
    }

    #[test]
    fn test_missing_equals_errors() {
        let result = parse_key_value_pairs(&strings(&["novalue"]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("name=value"));
    }

    #[test]
    fn test_empty_input() {
        let map = parse_key_value_pairs(&[]).unwrap();
        assert!(map.is_empty());
    }
}
