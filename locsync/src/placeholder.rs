//! Format-specifier conversion from Apple-style templates to Android.
//!
//! Apple `.strings` values use printf-style specifiers plus the
//! object-reference specifier `%@`. Android resources use the same letters
//! but require `%s` for strings and 1-based positional indices (`%1$s`)
//! whenever a template has more than one substitution point.

/// Specifier letters recognized by the scanner. `@` is the Apple
/// object-reference specifier and converts to `s`.
const SPECIFIER_KINDS: &str = "@dDiuUfFeEgGsScCxXoO";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    start: usize,
    end: usize,
    precision: Option<String>,
    kind: char,
}

/// Extracts non-positional specifier tokens in occurrence order.
///
/// Skips escaped percent (`%%`) and specifiers that already carry a
/// positional index (`%1$d`); those are left untouched by conversion.
fn scan(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut i = 0;
    let mut out = Vec::new();

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        // Escaped percent
        if i + 1 < bytes.len() && bytes[i + 1] == b'%' {
            i += 2;
            continue;
        }

        let mut j = i + 1;

        // Already-positional specifier: digits followed by '$'. Consume it
        // whole so its specifier letter is not collected.
        let start_digits = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > start_digits && j < bytes.len() && bytes[j] == b'$' {
            j += 1;
            if j < bytes.len() && bytes[j] == b'.' {
                j += 1;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
            }
            if j < bytes.len() && SPECIFIER_KINDS.contains(bytes[j] as char) {
                j += 1;
            }
            i = j;
            continue;
        }
        j = i + 1;

        // Optional precision: '.' followed by digits
        let mut precision = None;
        if j < bytes.len() && bytes[j] == b'.' {
            let precision_start = j;
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j == precision_start + 1 {
                // A lone '.' is not a precision component
                i += 1;
                continue;
            }
            precision = Some(input[precision_start..j].to_string());
        }

        if j < bytes.len() && SPECIFIER_KINDS.contains(bytes[j] as char) {
            out.push(Token {
                start: i,
                end: j + 1,
                precision,
                kind: bytes[j] as char,
            });
            i = j + 1;
        } else {
            i += 1;
        }
    }

    out
}

fn android_kind(kind: char) -> char {
    if kind == '@' { 's' } else { kind }
}

/// Converts the format specifiers of one template to Android syntax.
///
/// `%@` becomes `%s`; every other specifier keeps its letter. With a
/// single specifier only the letter changes; with two or more, each one is
/// rewritten with a 1-based positional index in order of appearance,
/// preserving any precision component.
pub fn convert_placeholders(input: &str) -> String {
    let tokens = scan(input);
    if tokens.is_empty() {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len() + tokens.len() * 2);
    let mut cursor = 0;
    let positional = tokens.len() > 1;

    for (index, token) in tokens.iter().enumerate() {
        out.push_str(&input[cursor..token.start]);
        out.push('%');
        if positional {
            out.push_str(&(index + 1).to_string());
            out.push('$');
        }
        if let Some(precision) = &token.precision {
            out.push_str(precision);
        }
        out.push(android_kind(token.kind));
        cursor = token.end;
    }
    out.push_str(&input[cursor..]);

    out
}
