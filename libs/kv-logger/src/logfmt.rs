use super::*;
use std::{fmt::Write, panic::Location};

#[inline]
fn is_reserved(c: char) -> bool {
    c <= ' ' || c == '=' || c == '"' || c == char::REPLACEMENT_CHARACTER
}

/// Appends one logfmt line for `fields` to `buf`, newline included.
///
/// On error `buf` may hold a partial line; callers encode into a scratch
/// buffer and discard it.
pub fn encode(fields: &[KeyValue], location: &Location<'_>, buf: &mut String) -> LogResult<()> {
    for (i, kv) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        write_pair(kv, location, buf)?;
    }
    buf.push('\n');
    Ok(())
}

pub fn write_pair(kv: &KeyValue, location: &Location<'_>, buf: &mut String) -> LogResult<()> {
    write_key(&kv.key, buf)?;
    buf.push('=');
    write_value(&kv.value, location, buf);
    Ok(())
}

pub fn encode_to_string(fields: &[KeyValue], location: &Location<'_>) -> LogResult<String> {
    let mut buf = String::with_capacity(fields.len() * 16);
    encode(fields, location, &mut buf)?;
    Ok(buf)
}

fn write_key(key: &str, buf: &mut String) -> LogResult<()> {
    let start = buf.len();
    buf.extend(key.chars().filter(|c| !is_reserved(*c)));
    if buf.len() == start {
        return Err(LogError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

fn write_value(value: &Value, location: &Location<'_>, buf: &mut String) {
    match value {
        Value::Str(s) if s == "null" => buf.push_str("\"null\""),
        Value::Str(s) => write_text(s, buf),
        Value::Valuer(valuer) => write_text(&valuer.resolve(location), buf),
        other => write_text(&other.text(location), buf),
    }
}

fn write_text(text: &str, buf: &mut String) {
    if text.contains(is_reserved) {
        write_quoted(text, buf);
    } else {
        buf.push_str(text);
    }
}

fn write_quoted(text: &str, buf: &mut String) {
    buf.push('"');
    for c in text.chars() {
        match c {
            '\\' => buf.push_str("\\\\"),
            '"' => buf.push_str("\\\""),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            char::REPLACEMENT_CHARACTER => buf.push_str("\\ufffd"),
            c if c < ' ' => {
                // writing to a String cannot fail
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fields: &[KeyValue]) -> String {
        encode_to_string(fields, Location::caller()).unwrap()
    }

    #[test]
    fn test_encode_plain() {
        assert_eq!(
            render(&[
                KeyValue::new("level", Level::Debug),
                KeyValue::new("msg", "hello")
            ]),
            "level=debug msg=hello\n"
        );
        assert_eq!(render(&[]), "\n");
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(
            render(&[
                KeyValue::new("ok", true),
                KeyValue::new("n", -3),
                KeyValue::new("u", 42u64),
                KeyValue::new("f", 1.5),
                KeyValue::new("none", Value::Null),
                KeyValue::new("gone", Value::Missing),
            ]),
            "ok=true n=-3 u=42 f=1.5 none=null gone=(MISSING)\n"
        );
    }

    #[test]
    fn test_encode_quoting() {
        assert_eq!(render(&[KeyValue::new("msg", "hello world")]), "msg=\"hello world\"\n");
        assert_eq!(render(&[KeyValue::new("eq", "a=b")]), "eq=\"a=b\"\n");
        assert_eq!(
            render(&[KeyValue::new("q", "say \"hi\"\n")]),
            "q=\"say \\\"hi\\\"\\n\"\n"
        );
        assert_eq!(render(&[KeyValue::new("ctl", "a\u{1}b")]), "ctl=\"a\\u0001b\"\n");
        assert_eq!(
            render(&[KeyValue::new("s", "a\rb\tc")]),
            "s=\"a\\rb\\tc\"\n"
        );
        assert_eq!(render(&[KeyValue::new("s", "\u{fffd}")]), "s=\"\\ufffd\"\n");
        assert_eq!(render(&[KeyValue::new("path", "C:\\tmp")]), "path=C:\\tmp\n");
        assert_eq!(render(&[KeyValue::new("s", "null")]), "s=\"null\"\n");
        assert_eq!(render(&[KeyValue::new("empty", "")]), "empty=\n");
    }

    #[test]
    fn test_encode_keys() {
        assert_eq!(render(&[KeyValue::new("a key", 1)]), "akey=1\n");
        assert_eq!(render(&[KeyValue::new("k=\"v\"", 1)]), "kv=1\n");
        assert_eq!(render(&[KeyValue::new("a\u{fffd}b", 1)]), "ab=1\n");

        let result = encode_to_string(&[KeyValue::new(" = ", 1)], Location::caller());
        assert!(matches!(result, Err(LogError::InvalidKey(key)) if key == " = "));
    }

    #[test]
    fn test_encode_valuer() {
        let location = Location::caller();
        let line = encode_to_string(&[KeyValue::new("caller", Valuer::Caller)], location).unwrap();
        assert_eq!(line, format!("caller=logfmt.rs:{}\n", location.line()));
    }
}
