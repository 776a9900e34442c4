// Content lines
//------------------------------------------------------------------------------

const CRLF: &str = "\r\n";
const MAX_LINE_OCTETS: usize = 75;

/// Escapes a TEXT value for iCalendar and vCard content lines.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Quotes a parameter value when it holds characters that would end the parameter.
pub fn param_value(s: &str) -> String {
    let clean = s.replace('"', "'");
    if clean.contains([':', ';', ',']) {
        format!("\"{clean}\"")
    } else {
        clean
    }
}

/// Splits a content line into chunks of at most 75 octets, continuation chunks starting
/// with a single space. Multi-byte characters are never split.
pub fn fold(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str(CRLF);
            out.push(' ');
            used = 1;
        }
        out.push(c);
        used += c.len_utf8();
    }
    out
}

/// Accumulates folded content lines terminated by CRLF.
#[derive(Debug, Default)]
pub struct ContentLines {
    buf: String,
}

impl ContentLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name:value` with `value` written as is.
    pub fn raw(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push_str(&fold(&format!("{name}:{value}")));
        self.buf.push_str(CRLF);
        self
    }

    /// Appends `name:value` with `value` escaped as TEXT.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.raw(name, &escape_text(value))
    }

    /// Like [`Self::text`] but skips empty values.
    pub fn text_opt(&mut self, name: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            return self;
        }
        self.text(name, value)
    }

    /// Appends a structured value whose components are escaped and joined by `;`.
    pub fn components(&mut self, name: &str, parts: &[&str]) -> &mut Self {
        let value = parts.iter().map(|p| escape_text(p)).collect::<Vec<_>>().join(";");
        self.raw(name, &value)
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}
