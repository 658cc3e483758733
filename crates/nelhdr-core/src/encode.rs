//! JSON encoding that matches the bytes deployed NEL header producers emit.
//!
//! serde_json's compact output differs from Go's `encoding/json` in two places
//! that reach the wire:
//! - floats: whole numbers print without `.0`; exponent form is used only
//!   below `1e-6` or from `1e21` up, with an explicit `+` on positive exponents
//! - strings: `&`, `<`, `>`, U+2028 and U+2029 are written as `\uXXXX` escapes
//!
//! Everything else (control-character escapes, key order, compact layout) is
//! already identical.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Compact formatter with Go-compatible floats and HTML-safe strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoJsonFormatter;

impl Formatter for GoJsonFormatter {
    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_f64(value).as_bytes())
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let esc = match ch {
                '&' => "\\u0026",
                '<' => "\\u003c",
                '>' => "\\u003e",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(esc.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Shortest round-trip text for a finite `f64`, in Go's `encoding/json` layout.
pub fn format_f64(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && (abs < 1e-6 || abs >= 1e21) {
        // `{:e}` already drops leading exponent zeros ("1e-7"); only the sign differs.
        let s = format!("{value:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    format!("{value}")
}

/// Serialize `value` with [`GoJsonFormatter`].
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, GoJsonFormatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}
