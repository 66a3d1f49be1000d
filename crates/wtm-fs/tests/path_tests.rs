use proptest::prelude::*;
use rstest::rstest;
use wtm_fs::{NormalizedPath, is_plain_segment};

#[rstest]
#[case("payments-api-wr-feature", true)]
#[case("repo", true)]
#[case("", false)]
#[case(".", false)]
#[case("..", false)]
#[case("a/b", false)]
#[case("a\\b", false)]
fn test_is_plain_segment(#[case] name: &str, #[case] expected: bool) {
    assert_eq!(is_plain_segment(name), expected);
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("/home/dev/.config/wtm/config.toml");
    assert_eq!(path.file_name(), Some("config.toml"));
    assert_eq!(path.extension(), Some("toml"));

    let hidden = NormalizedPath::new("/home/dev/.git");
    assert_eq!(hidden.extension(), None);
}

#[test]
fn test_backslashes_normalized() {
    let path = NormalizedPath::new("C:\\code\\repo");
    assert_eq!(path.as_str(), "C:/code/repo");
}

proptest! {
    #[test]
    fn test_normalized_has_no_backslash_or_trailing_slash(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        if as_str != "/" {
            prop_assert!(!as_str.ends_with('/'));
        }
    }

    #[test]
    fn test_join_plain_segment_ends_with_segment(base in "[a-z/]{0,12}", seg in "[a-z0-9-]{1,12}") {
        let joined = NormalizedPath::new(&base).join(&seg);
        prop_assert_eq!(joined.file_name(), Some(seg.as_str()));
    }
}
