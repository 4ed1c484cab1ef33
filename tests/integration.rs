//! Integration tests for the full pipeline
//! (scan → synthesize → compile → render).

use pretty_assertions::assert_eq;
use serde_json::json;
use weft::{render_str, render_str_with, Error, Options, TagOverrides, Template, Value};

/// Render with default options, panicking on failure.
fn render_ok(template: &str, data: impl Into<Value>) -> String {
    render_str(template, data).expect("template should render")
}

// =========================================================================
// Identity
// =========================================================================

mod identity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tagless_template_is_unchanged() {
        assert_eq!(render_ok("foo\nbar\nbaz", ()), "foo\nbar\nbaz");
    }

    #[test]
    fn test_trailing_newline_preserved() {
        assert_eq!(render_ok("one\ntwo\n", ()), "one\ntwo\n");
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(render_ok("a\n\n\nb\n", ()), "a\n\n\nb\n");
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(render_ok("", ()), "");
    }

    #[test]
    fn test_crlf_line_endings_preserved() {
        assert_eq!(render_ok("a\r\nb\r\n", ()), "a\r\nb\r\n");
    }

    #[test]
    fn test_indentation_preserved() {
        assert_eq!(render_ok("  two spaces\n\tand a tab\n", ()), "  two spaces\n\tand a tab\n");
    }
}

// =========================================================================
// Substitution
// =========================================================================

mod substitution {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escaped_substitution() {
        let out = render_ok("Hello, {{: data :}}", "> World");
        assert_eq!(out, "Hello, &gt; World");
    }

    #[test]
    fn test_raw_substitution() {
        let out = render_ok("Hello, {{= data =}}", "> World");
        assert_eq!(out, "Hello, > World");
    }

    #[test]
    fn test_field_access() {
        let out = render_ok(
            "<h1>Hello {{: data.name :}}</h1>",
            Value::from(json!({"name": "World"})),
        );
        assert_eq!(out, "<h1>Hello World</h1>");
    }

    #[test]
    fn test_index_access_with_string_key() {
        let out = render_ok(
            "<h1>Hello {{: data['name'] :}}</h1>",
            Value::from(json!({"name": "World"})),
        );
        assert_eq!(out, "<h1>Hello World</h1>");
    }

    #[test]
    fn test_two_substitutions_on_one_line() {
        let out = render_ok(
            "{{: data.a :}} & {{= data.b =}}",
            Value::from(json!({"a": "<x>", "b": "<y>"})),
        );
        assert_eq!(out, "&lt;x&gt; & <y>");
    }

    #[test]
    fn test_integer_data_context() {
        assert_eq!(render_ok("{{= data * 2 =}}", 21i64), "42");
    }
}

// =========================================================================
// Quote safety
// =========================================================================

mod quote_safety {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_triple_quotes_outside_tags() {
        assert_eq!(render_ok("a ''' b\n", ()), "a ''' b\n");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(render_ok(r"it's a \' backslash", ()), r"it's a \' backslash");
    }

    #[test]
    fn test_triple_quotes_inside_expression() {
        // A differently-quoted literal inside the embedded expression.
        let out = render_ok(r#"x{{= "'''" =}}y"#, ());
        assert_eq!(out, "x'''y");
    }

    #[test]
    fn test_single_quoted_literal_inside_expression() {
        assert_eq!(render_ok("{{= 'abc' =}}", ()), "abc");
    }
}

// =========================================================================
// Nesting validation
// =========================================================================

mod nesting {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unmatched_open_is_unbalanced() {
        let err = render_str("@= if true\n@{\nbody\n", ()).unwrap_err();
        assert!(matches!(err, Error::UnbalancedBlock { .. }), "{err}");
    }

    #[test]
    fn test_close_without_open_is_unbalanced() {
        let err = render_str("@}\n", ()).unwrap_err();
        assert!(matches!(err, Error::UnbalancedBlock { .. }), "{err}");
    }

    #[test]
    fn test_block_line_with_trailing_text_is_malformed() {
        let err = render_str("@= if true\n@{ extra\nbody\n@}\n", ()).unwrap_err();
        assert!(
            matches!(err, Error::MalformedBlockLine { line: 2, .. }),
            "{err}"
        );
    }

    #[test]
    fn test_block_line_comment_is_allowed() {
        let out = render_ok("@= if true\n@{ # then\nyes\n@}\n", ());
        assert_eq!(out, "yes\n");
    }
}

// =========================================================================
// Tag mismatch
// =========================================================================

mod tag_mismatch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_open_with_escaped_close() {
        let err = render_str("{{= data :}}", ()).unwrap_err();
        assert!(matches!(err, Error::TagMismatch { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_escaped_open_with_raw_close() {
        let err = render_str("{{: data =}}", ()).unwrap_err();
        assert!(matches!(err, Error::TagMismatch { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_unterminated_open_tag() {
        let err = render_str("Hello {{: data", ()).unwrap_err();
        assert!(
            matches!(err, Error::UnterminatedTag { line: 1, ref open } if open == "{{:"),
            "{err}"
        );
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = render_str("fine\nalso fine\n{{= broken :}}\n", ()).unwrap_err();
        assert!(matches!(err, Error::TagMismatch { line: 3, .. }), "{err}");
    }
}

// =========================================================================
// Control flow
// =========================================================================

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loop_renders_each_iteration_in_order() {
        let template = "@= for n in range(1, 4)\n@{\n{{: n :}}\n@}\n";
        assert_eq!(render_ok(template, ()), "1\n2\n3\n");
    }

    #[test]
    fn test_loop_over_user_list() {
        let template = "<ul>\n\
                        @= for user in data.users\n\
                        @{\n\
                        <li>{{: user.name :}} / {{= user.name =}}</li>\n\
                        @}\n\
                        </ul>\n";
        let data = Value::from(json!({
            "users": [{"name": "king"}, {"name": "<b>kong</b>"}],
        }));
        assert_eq!(
            render_ok(template, data),
            "<ul>\n\
             <li>king / king</li>\n\
             <li>&lt;b&gt;kong&lt;/b&gt; / <b>kong</b></li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_fizzbuzz_chain() {
        let template = "\
@= for n in range(1, data + 1)
@{
@= if n % 3 == 0 && n % 5 == 0
@{
{{: n :}} FizzBuzz
@}
@= elif n % 3 == 0
@{
{{: n :}} Fizz
@}
@= elif n % 5 == 0
@{
{{: n :}} Buzz
@}
@= else
@{
{{: n :}}
@}
@}
";
        let out = render_ok(template, 15i64);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "1");
        assert_eq!(lines[2], "3 Fizz");
        assert_eq!(lines[4], "5 Buzz");
        assert_eq!(lines[14], "15 FizzBuzz");
    }

    #[test]
    fn test_conditional_skips_block() {
        let template = "@= if data\n@{\nshown\n@}\nalways\n";
        assert_eq!(render_ok(template, true), "shown\nalways\n");
        assert_eq!(render_ok(template, false), "always\n");
    }

    #[test]
    fn test_statement_line_binds_variable() {
        let template = "@= greeting = 'hi ' + data\n{{: greeting :}}\n";
        assert_eq!(render_ok(template, "there"), "hi there\n");
    }
}

// =========================================================================
// Idempotence and reuse
// =========================================================================

mod reuse {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_twice_is_identical() {
        let template =
            Template::compile("@= for n in range(0, 3)\n@{\n{{= n =}},\n@}\n", &Options::default())
                .unwrap();
        let first = template.render(&Value::Null).unwrap();
        let second = template.render(&Value::Null).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "0,\n1,\n2,\n");
    }

    #[test]
    fn test_same_template_different_data() {
        let template = Template::compile("hi {{: data :}}\n", &Options::default()).unwrap();
        assert_eq!(template.render(&Value::str("a")).unwrap(), "hi a\n");
        assert_eq!(template.render(&Value::str("b")).unwrap(), "hi b\n");
    }
}

// =========================================================================
// Configuration
// =========================================================================

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_custom_tag_markers() {
        let options = Options {
            tags: TagOverrides {
                statement: Some("#!".to_string()),
                raw_open: Some("[[".to_string()),
                raw_close: Some("]]".to_string()),
                ..TagOverrides::default()
            },
            ..Options::default()
        };
        let out = render_str_with("#! x = 2\n[[ x * 3 ]]\n", (), &options).unwrap();
        assert_eq!(out, "6\n");
        // The default raw markers are plain text under these overrides.
        let out = render_str_with("a {{also plain}} b\n", (), &options).unwrap();
        assert_eq!(out, "a {{also plain}} b\n");
    }

    #[test]
    fn test_custom_variable_name() {
        let options = Options {
            variable: "ctx".to_string(),
            ..Options::default()
        };
        let out = render_str_with("{{: ctx.k :}}", Value::from(json!({"k": "v"})), &options)
            .unwrap();
        assert_eq!(out, "v");
    }
}

// =========================================================================
// Errors
// =========================================================================

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_literal_control_character() {
        let err = render_str("ding \u{7}\n", ()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidLiteral { line: 1, ch: '\u{7}' }),
            "{err}"
        );
    }

    #[test]
    fn test_runtime_error_surfaces_as_script_error() {
        let err = render_str("{{= data.missing =}}", Value::from(json!({}))).unwrap_err();
        assert!(matches!(err, Error::Script(_)), "{err}");
    }

    #[test]
    fn test_undefined_variable_in_expression() {
        let err = render_str("{{= nope =}}", ()).unwrap_err();
        assert!(matches!(err, Error::Script(_)), "{err}");
    }

    #[test]
    fn test_bad_statement_syntax_is_compilation_error() {
        let err = render_str("@= for without in\n", ()).unwrap_err();
        assert!(matches!(err, Error::Compilation(_)), "{err}");
    }
}

// =========================================================================
// Files and binding
// =========================================================================

mod files {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_render_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<title>{{{{: data.title :}}}}</title>\n").unwrap();
        let out = weft::render_path(file.path(), Value::from(json!({"title": "Home"}))).unwrap();
        assert_eq!(out, "<title>Home</title>\n");
    }

    #[test]
    fn test_render_path_missing_file_is_io_error() {
        let err = weft::render_path("no/such/template.weft", ()).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err}");
    }

    #[test]
    fn test_bind_matches_render_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hi {{{{: data :}}}}\n").unwrap();
        let path = file.path().to_path_buf();

        let view = weft::bind(path.clone(), Options::default(), || Value::str("you"));
        let direct = weft::render_path(&path, Value::str("you")).unwrap();
        assert_eq!(view().unwrap(), direct);
        assert_eq!(direct, "hi you\n");
    }
}
