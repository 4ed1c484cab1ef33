//! Property tests for the render pipeline.

use proptest::prelude::*;
use weft::render_str;

// Text free of `@`, `{` and `}` contains no marker of any role, so the
// pipeline must reproduce it byte for byte. Quotes and backslashes are
// included on purpose: they exercise the literal escaping path.
const LINE: &str = r"[a-zA-Z0-9 \t.,;:=!?'\\<>&()\[\]/+*%-]{0,60}";

proptest! {
    #[test]
    fn renders_marker_free_line_unchanged(line in LINE) {
        let out = render_str(&line, ()).expect("marker-free text renders");
        prop_assert_eq!(out, line);
    }

    #[test]
    fn renders_marker_free_document_unchanged(
        lines in proptest::collection::vec(LINE, 0..8),
    ) {
        let mut doc = lines.join("\n");
        doc.push('\n');
        let out = render_str(&doc, ()).expect("marker-free text renders");
        prop_assert_eq!(out, doc);
    }

    #[test]
    fn rendering_is_deterministic(line in LINE) {
        let first = render_str(&line, ()).expect("renders");
        let second = render_str(&line, ()).expect("renders");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn escaped_substitution_never_emits_markup(text in "[a-zA-Z0-9<>&\"' ]{0,40}") {
        let out = render_str("{{: data :}}", text).expect("renders");
        prop_assert!(!out.contains('<'), "raw `<` in {out:?}");
        prop_assert!(!out.contains('>'), "raw `>` in {out:?}");
        prop_assert!(!out.contains('"'), "raw `\"` in {out:?}");
    }
}
