/*!
Result rendering, chosen by sniffing the first byte of the raw result:
  (empty)   -> nothing
  `"`       -> the decoded string, unquoted
  `{` / `[` -> re-indented JSON, two-space indent; tokens (numbers in
               particular) are copied byte for byte
  otherwise -> raw bytes verbatim (numbers, booleans, null)

The returned text includes the trailing newline; callers print it as-is.
*/

use serde::de::IgnoredAny;

use crate::error::CtlError;

const INDENT: &str = "  ";

pub fn render(raw: &str) -> Result<String, CtlError> {
    let Some(first) = raw.as_bytes().first() else {
        return Ok(String::new());
    };

    let mut out = match first {
        b'"' => serde_json::from_str::<String>(raw).map_err(CtlError::Render)?,
        b'{' | b'[' => {
            serde_json::from_str::<IgnoredAny>(raw).map_err(CtlError::Render)?;
            indent(raw)
        }
        _ => raw.to_string(),
    };
    out.push('\n');
    Ok(out)
}

/// Re-indent a validated JSON document without touching its tokens.
/// Empty containers stay on one line.
fn indent(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = raw.chars().peekable();

    let newline = |out: &mut String, depth: usize| {
        out.push('\n');
        for _ in 0..depth {
            out.push_str(INDENT);
        }
    };

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.next_if(|c| c.is_ascii_whitespace()).is_some() {}
                if let Some(&close) = chars.peek()
                    && (close == '}' || close == ']')
                {
                    out.push(close);
                    chars.next();
                } else {
                    depth += 1;
                    newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            c if c.is_ascii_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_is_printed_bare() {
        assert_eq!(render(r#""abc""#).unwrap(), "abc\n");
        assert_eq!(render(r#""line\nbreak""#).unwrap(), "line\nbreak\n");
    }

    #[test]
    fn object_is_indented() {
        assert_eq!(render(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn nested_keeps_key_order() {
        let raw = r#"{"zeta":[1,{"b":true,"a":null}],"alpha":"x"}"#;
        let expected = r#"{
  "zeta": [
    1,
    {
      "b": true,
      "a": null
    }
  ],
  "alpha": "x"
}
"#;
        assert_eq!(render(raw).unwrap(), expected);
    }

    #[test]
    fn nested_numbers_keep_server_text() {
        let raw = r#"{"amount":1.50000000,"difficulty":1E21,"big":123456789012345678901234567890,"fee":-0.0001e-2}"#;
        let expected = r#"{
  "amount": 1.50000000,
  "difficulty": 1E21,
  "big": 123456789012345678901234567890,
  "fee": -0.0001e-2
}
"#;
        assert_eq!(render(raw).unwrap(), expected);
    }

    #[test]
    fn strings_and_empty_containers_survive_reindent() {
        let raw = r#"[ {}, [ ], "a, b: {c}", "q\"[x]", {"k" : [1 ,2]} ]"#;
        let expected = r#"[
  {},
  [],
  "a, b: {c}",
  "q\"[x]",
  {
    "k": [
      1,
      2
    ]
  }
]
"#;
        assert_eq!(render(raw).unwrap(), expected);
    }

    #[test]
    fn scalars_are_verbatim() {
        assert_eq!(render("42").unwrap(), "42\n");
        assert_eq!(render("1.50000000").unwrap(), "1.50000000\n");
        assert_eq!(render("true").unwrap(), "true\n");
        assert_eq!(render("null").unwrap(), "null\n");
    }

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(render("").unwrap(), "");
    }

    #[test]
    fn malformed_is_render_failure() {
        assert!(matches!(render(r#""unterminated"#), Err(CtlError::Render(_))));
        assert!(matches!(render("{"), Err(CtlError::Render(_))));
        assert!(matches!(render("[1,]"), Err(CtlError::Render(_))));
    }
}
