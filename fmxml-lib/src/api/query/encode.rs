//! Query string encoding.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use super::directive::Directive;
use crate::error::CommandError;

/// Characters left unescaped.
///
/// Beyond the unreserved set, these carry meaning in the server's find syntax
/// (`*` wildcards, `...` ranges, `::` related fields, `(n)` repetitions) and
/// field names may contain spaces.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'*')
    .remove(b'!')
    .remove(b'(')
    .remove(b')')
    .remove(b':')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b' ');

/// Percent-encodes a directive name or argument.
pub fn escape(s: &str) -> String {
    utf8_percent_encode(s, QUERY_SAFE).to_string()
}

/// Encodes directives into a query string.
///
/// Directives with arguments become `name=argument` joined by `&` in input
/// order. The single verb is appended last, unencoded.
///
/// # Errors
///
/// Returns [`CommandError::InvalidCommandSequence`] unless exactly one
/// directive has no argument.
///
/// # Example
///
/// ```
/// use fmxml_lib::api::query::{encode, Directive};
///
/// let query = encode(&[
///     Directive::new("-db", "employees"),
///     Directive::new("-lay", "departments"),
///     Directive::verb("-findall"),
/// ]).unwrap();
/// assert_eq!(query, "-db=employees&-lay=departments&-findall");
/// ```
pub fn encode(directives: &[Directive]) -> Result<String, CommandError> {
    let verbs: Vec<&Directive> = directives.iter().filter(|d| d.is_verb()).collect();
    let [verb] = verbs.as_slice() else {
        return Err(CommandError::InvalidCommandSequence {
            verbs: verbs.iter().map(|d| d.name().to_string()).collect(),
        });
    };

    let mut parts: Vec<String> = directives
        .iter()
        .filter_map(|d| {
            d.argument()
                .map(|arg| format!("{}={}", escape(d.name()), escape(&arg.to_string())))
        })
        .collect();
    parts.push(verb.name().to_string());

    Ok(parts.join("&"))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_verb_only() {
        assert_eq!(encode(&[Directive::verb("-dbnames")]).unwrap(), "-dbnames");
    }

    #[test]
    fn test_verb_moves_last() {
        let query = encode(&[
            Directive::verb("-findall"),
            Directive::new("-db", "employees"),
            Directive::new("-lay", "departments"),
        ])
        .unwrap();
        assert_eq!(query, "-db=employees&-lay=departments&-findall");
    }

    #[test]
    fn test_no_verb() {
        let err = encode(&[Directive::new("-db", "employees")]).unwrap_err();
        assert_eq!(err, CommandError::InvalidCommandSequence { verbs: vec![] });
        assert!(encode(&[]).is_err());
    }

    #[test]
    fn test_two_verbs() {
        let err = encode(&[Directive::verb("-find"), Directive::verb("-findall")]).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidCommandSequence {
                verbs: vec!["-find".to_string(), "-findall".to_string()]
            }
        );
    }

    #[test]
    fn test_safe_characters_untouched() {
        assert_eq!(escape("New York 24/7"), "New York 24/7");
        assert_eq!(escape("Dependents::Names(2).13"), "Dependents::Names(2).13");
        assert_eq!(escape("915...925"), "915...925");
        assert_eq!(escape("*!;,"), "*!;,");
    }

    #[test]
    fn test_reserved_characters_escaped() {
        assert_eq!(escape("Smith|Chatterjee|Su"), "Smith%7CChatterjee%7CSu");
        assert_eq!(escape("a&b=c"), "a%26b%3Dc");
        assert_eq!(escape("1+1?"), "1%2B1%3F");
        assert_eq!(escape("fiancée"), "fianc%C3%A9e");
    }

    #[test]
    fn test_numeric_arguments() {
        let query = encode(&[
            Directive::new("-skip", 10i64),
            Directive::new("Price", Decimal::new(12_050, 2)),
            Directive::new("Big", 12_345_678_901i64),
            Directive::verb("-find"),
        ])
        .unwrap();
        assert_eq!(query, "-skip=10&Price=120.50&Big=12345678901&-find");
    }
}
