//! Natural ("human") ordering of file names.
//!
//! Names are split into alternating literal and digit runs. Digit runs compare by integer
//! value, literal runs by code point, so `multi9.tif` sorts before `multi10.tif`.

use std::cmp::Ordering;
use std::ffi::OsString;

use crate::error::IngestError;

use super::Result;

/// A maximal substring that is either all ASCII digits or contains none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Literal(&'a str),
    Numeric { digits: &'a str },
}

impl<'a> Run<'a> {
    /// The original text of the run.
    pub fn text(&self) -> &'a str {
        match *self {
            Run::Literal(text) => text,
            Run::Numeric { digits } => digits,
        }
    }

    /// Integer value of a digit run, if it fits in a `u128`.
    pub fn value(&self) -> Option<u128> {
        match *self {
            Run::Literal(_) => None,
            Run::Numeric { digits } => digits.parse().ok(),
        }
    }
}

impl Ord for Run<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Run::Numeric { digits: a }, Run::Numeric { digits: b }) => {
                cmp_digits(a, b).then_with(|| a.cmp(b))
            }
            (Run::Literal(a), Run::Literal(b)) => a.cmp(b),
            (Run::Numeric { .. }, Run::Literal(_)) => Ordering::Less,
            (Run::Literal(_), Run::Numeric { .. }) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Run<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two digit strings by numeric value without parsing, so runs of any length work.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Decomposed run sequence used as the basis for natural ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey<'a>(Vec<Run<'a>>);

impl<'a> SortKey<'a> {
    pub fn new(input: &'a str) -> Self {
        Self(tokenize(input))
    }

    pub fn runs(&self) -> &[Run<'a>] {
        &self.0
    }

    /// Reassemble the original string from the runs.
    pub fn to_original(&self) -> String {
        self.0.iter().map(Run::text).collect()
    }
}

/// Split `input` into literal and digit runs. The empty string yields no runs.
pub fn tokenize(input: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        let numeric = bytes[start].is_ascii_digit();
        let end = bytes[start..]
            .iter()
            .position(|byte| byte.is_ascii_digit() != numeric)
            .map_or(bytes.len(), |offset| start + offset);

        // ASCII digits never sit inside a multi-byte sequence, so `end` is a char boundary.
        let text = &input[start..end];
        runs.push(if numeric { Run::Numeric { digits: text } } else { Run::Literal(text) });
        start = end;
    }

    runs
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_runs = tokenize(a);
    let b_runs = tokenize(b);

    for (a_run, b_run) in a_runs.iter().zip(b_runs.iter()) {
        match a_run.cmp(b_run) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    a_runs.len().cmp(&b_runs.len())
}

/// Stable in-place natural sort.
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

/// Return `items` in natural order, preserving the input order of equal elements.
pub fn sorted_naturally<S: AsRef<str>>(mut items: Vec<S>) -> Vec<S> {
    natural_sort(&mut items);
    items
}

/// Naturally sort raw OS names, rejecting names that are not valid UTF-8.
pub fn sort_os_names<I>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    let names = names
        .into_iter()
        .map(|name| {
            name.into_string().map_err(|raw| IngestError::InvalidInput {
                message: format!("file name {raw:?} is not valid UTF-8"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(sorted_naturally(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_alternating_runs() {
        let runs = tokenize("test_001_dapi");
        assert_eq!(
            runs,
            vec![
                Run::Literal("test_"),
                Run::Numeric { digits: "001" },
                Run::Literal("_dapi"),
            ]
        );
        assert_eq!(runs[1].value(), Some(1));
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn tokenize_is_lossless_with_unicode() {
        for input in ["Zelle_12µm_3.tif", "٣frame7", "42", "no digits here", "a1b22c333"] {
            assert_eq!(SortKey::new(input).to_original(), input);
        }
    }

    #[test]
    fn compares_digit_runs_numerically() {
        assert_eq!(natural_cmp("multi9.tif", "multi10.tif"), Ordering::Less);
        assert_eq!(natural_cmp("9", "10"), Ordering::Less);
        assert_eq!(natural_cmp("test_001_dapi", "test_2_dapi"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn leading_zeros_fall_back_to_text() {
        assert_eq!(natural_cmp("007", "7"), Ordering::Less);
        assert_eq!(natural_cmp("frame7", "frame007"), Ordering::Greater);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(natural_cmp("img", "img1"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
        assert_eq!(natural_cmp("", ""), Ordering::Equal);
    }

    #[test]
    fn digit_run_precedes_literal_run() {
        assert_eq!(natural_cmp("1a", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("x_5", "x_a"), Ordering::Less);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let big = "9".repeat(60);
        let bigger = format!("1{}", "0".repeat(60));
        assert_eq!(natural_cmp(&big, &bigger), Ordering::Less);
        assert_eq!(Run::Numeric { digits: &bigger }.value(), None);
    }

    #[test]
    fn sort_key_order_matches_natural_cmp() {
        let pairs = [("a2", "a10"), ("b", "a9"), ("x01y", "x1y")];
        for (a, b) in pairs {
            assert_eq!(SortKey::new(a).cmp(&SortKey::new(b)), natural_cmp(a, b));
        }
    }

    #[test]
    fn sorts_case_sensitively() {
        let sorted = sorted_naturally(vec!["b1", "B1", "a1"]);
        assert_eq!(sorted, vec!["B1", "a1", "b1"]);
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_utf8_os_names() {
        use std::os::unix::ffi::OsStringExt;

        let names = vec![OsString::from("ok1"), OsString::from_vec(vec![0x66, 0xff, 0x31])];
        let err = sort_os_names(names).unwrap_err();
        assert!(matches!(err, IngestError::InvalidInput { .. }));
    }

    #[test]
    fn sorts_os_names() {
        let names = vec![OsString::from("f10"), OsString::from("f2")];
        assert_eq!(sort_os_names(names).unwrap(), vec!["f2", "f10"]);
    }
}
