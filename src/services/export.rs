/// Renders rows as RFC 4180 CSV with CRLF line endings.
pub fn to_csv<R, F>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut out = String::new();
    push_record(&mut out, headers.iter());

    for row in rows {
        push_record(&mut out, row.iter());
    }

    out
}

fn push_record<I, F>(out: &mut String, fields: I)
where
    I: Iterator<Item = F>,
    F: AsRef<str>,
{
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field.as_ref());
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// `Content-Disposition` value for a downloadable file.
pub fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}
