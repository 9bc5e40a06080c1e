//! Utility functions and types.

use std::fmt::Debug;

use serde::Deserialize;
use serde::Deserializer;

/// Redacts a secret for logging.
///
/// - Values shorter than 12 characters are entirely redacted.
/// - Longer values keep the first and last three characters so tokens can
///   still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

/// Render values in the bracket-quoted list notation used by list-valued
/// query parameters such as `sku_seller_list`.
///
/// ```
/// use lazop_core::utils::format_list;
///
/// assert_eq!(format_list(&["a", "b"]), r#"["a","b"]"#);
/// ```
pub fn format_list<S: AsRef<str>>(values: &[S]) -> String {
    let mut s = String::with_capacity(2 + values.iter().map(|v| v.as_ref().len() + 3).sum::<usize>());

    s.push('[');
    for (idx, v) in values.iter().enumerate() {
        if idx != 0 {
            s.push(',');
        }
        s.push('"');
        s.push_str(v.as_ref());
        s.push('"');
    }
    s.push(']');

    s
}

/// Deserialize `null` as `T::default()`.
///
/// The platform sends `null` for empty lists, use this with
/// `#[serde(deserialize_with = "null_as_default")]`.
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", "EMPTY"; "empty")]
    #[test_case("faketoken", "***"; "short")]
    #[test_case("50001500f08BWVnreeai1ffde6e2Tekwfrxk6eFpBqrzHKdtH1izvoEZQDQrd", "500***Qrd"; "access token")]
    #[test_case("testsecretnotarealsecret", "tes***ret"; "secret")]
    fn test_redact(input: &str, expected: &str) {
        assert_eq!(format!("{:?}", Redact::from(input)), expected);
    }

    #[derive(serde::Deserialize)]
    struct Items {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
    }

    #[test_case(r#"{"items":null}"#, &[]; "null")]
    #[test_case(r#"{}"#, &[]; "missing")]
    #[test_case(r#"{"items":["a"]}"#, &["a"]; "present")]
    fn test_null_as_default(input: &str, expected: &[&str]) {
        let items: Items = serde_json::from_str(input).expect("must decode");
        assert_eq!(items.items, expected);
    }

    #[test_case(&[], "[]"; "empty")]
    #[test_case(&["test"], r#"["test"]"#; "single")]
    #[test_case(&["16016131915889", "16016131915890"], r#"["16016131915889","16016131915890"]"#; "multiple")]
    fn test_format_list(input: &[&str], expected: &str) {
        assert_eq!(format_list(input), expected);
    }
}
