/// Turn a display name into a valid C identifier: spaces become underscores,
/// everything else non-alphanumeric is dropped, a leading digit gets a `_`
/// prefix.
pub(crate) fn sanitize_identifier(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut last_was_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !last_was_space && !sanitized.is_empty() {
                sanitized.push('_');
            }
            last_was_space = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            sanitized.push(c);
            last_was_space = false;
        } else {
            last_was_space = false;
        }
    }
    if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

pub(crate) fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lenient numeric parsing for generated-code arguments: handles decimal,
/// `0x` hex and surrounding whitespace. Anything unparseable is 0, matching
/// the permissive stance of the rest of the parser.
pub(crate) fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    let (neg, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t),
    };
    let value = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0) as f64
    } else {
        t.parse::<f64>().unwrap_or(0.0)
    };
    if neg { -value } else { value }
}

pub(crate) fn indent_lines(s: &str, indent: &str) -> String {
    s.lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
