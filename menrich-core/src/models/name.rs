//! Helpers for the compact multi-value `name` field.
//!
//! Gene association rewrites a region's name into a colon-separated list of
//! tokens (`GENE_distance:OTHER_distance`), or the bare sentinel `.` when the
//! list is empty.

/// Sentinel name meaning "nothing here".
pub const NO_NAME: &str = ".";

/// Separator between tokens of a multi-value name.
pub const TOKEN_SEPARATOR: char = ':';

///
/// Iterate the tokens of a multi-value name. The sentinel and the empty string
/// yield no tokens.
///
pub fn split_tokens(name: &str) -> impl Iterator<Item = &str> {
    let name = if name == NO_NAME { "" } else { name };
    name.split(TOKEN_SEPARATOR).filter(|t| !t.is_empty())
}

///
/// Join tokens into a multi-value name, falling back to the sentinel when
/// there are none.
///
pub fn join_tokens<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for token in tokens {
        if !joined.is_empty() {
            joined.push(TOKEN_SEPARATOR);
        }
        joined.push_str(token.as_ref());
    }
    if joined.is_empty() {
        NO_NAME.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(".", vec![])]
    #[case("", vec![])]
    #[case("A_10", vec!["A_10"])]
    #[case("A_10:.B_-5", vec!["A_10", ".B_-5"])]
    fn test_split_tokens(#[case] name: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_tokens(name).collect::<Vec<_>>(), expected);
    }

    #[rstest]
    fn test_join_tokens() {
        assert_eq!(join_tokens(["A_1", "B_2"]), "A_1:B_2");
        assert_eq!(join_tokens(Vec::<String>::new()), ".");
    }
}
