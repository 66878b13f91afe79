//! Curl command rendering.
//!
//! Renders a [`RequestDescriptor`] as a copyable shell command. Binary
//! parts cannot point at a real file from the descriptor alone, so they use
//! a placeholder path unless the caller supplies one.

use jimeng_domain::{PartValue, RequestBody, RequestDescriptor};

/// Path used for file parts when no override is given.
pub const DEFAULT_FILE_PLACEHOLDER: &str = "/path/to/your/file";

const SEPARATOR: &str = " \\\n  ";

/// Renders the curl command for a request.
///
/// `file_path` replaces the placeholder for every file part; a leading `@`
/// in it is not doubled. Rendering never fails: content that cannot be put
/// on a shell line is sent as `<omitted>` and explained by comment lines
/// after the last flag, so the command itself stays one continued line.
#[must_use]
pub fn render_curl(request: &RequestDescriptor, file_path: Option<&str>) -> String {
    let mut parts = vec![format!(
        "curl -X {} \"{}\"",
        request.method.as_str(),
        escape_double(&request.url)
    )];
    let mut notes = Vec::new();

    for header in &request.headers {
        if header.is_multipart_content_type() {
            continue;
        }
        parts.push(format!(
            "-H \"{}: {}\"",
            escape_double(&header.name),
            escape_double(&header.value)
        ));
    }

    match &request.body {
        RequestBody::None => {}
        RequestBody::Json(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => parts.push(format!("-d '{}'", escape_single(&json))),
            Err(_) => notes.push("# body: JSON content omitted".to_string()),
        },
        RequestBody::Multipart { parts: form } => {
            let path = file_reference(file_path);
            for part in form {
                match &part.value {
                    PartValue::Text(value) if is_shell_safe(value) => parts.push(format!(
                        "-F \"{}={}\"",
                        escape_double(&part.name),
                        escape_double(value)
                    )),
                    PartValue::Text(_) => {
                        parts.push(format!("-F \"{}=<omitted>\"", escape_double(&part.name)));
                        notes.push(format!("# {}: binary content omitted", part.name));
                    }
                    PartValue::File(_) => parts.push(format!(
                        "-F \"{}=@{}\"",
                        escape_double(&part.name),
                        escape_double(path)
                    )),
                }
            }
        }
    }

    let mut command = parts.join(SEPARATOR);
    for note in notes {
        command.push('\n');
        command.push_str(&note);
    }
    command
}

fn file_reference(file_path: Option<&str>) -> &str {
    file_path
        .map(str::trim)
        .map(|p| p.strip_prefix('@').unwrap_or(p))
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_FILE_PLACEHOLDER)
}

fn is_shell_safe(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c.is_control() && c != '\t' && c != '\n')
}

fn escape_single(value: &str) -> String {
    value.replace('\'', "'\\''")
}

fn escape_double(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jimeng_domain::{FileAttachment, HttpMethod, Part};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn multipart(parts: Vec<Part>) -> RequestDescriptor {
        RequestDescriptor::new(
            HttpMethod::Post,
            "http://localhost:5100/v1/images/compositions?model=jimeng-4.0",
        )
        .with_bearer_token("tok")
        .with_body(RequestBody::Multipart { parts })
    }

    fn file_part() -> Part {
        Part::file("images", FileAttachment::new("ref.png", vec![1, 2, 3]))
    }

    #[test]
    fn renders_json_request() {
        let request =
            RequestDescriptor::new(HttpMethod::Post, "http://localhost:5100/v1/images/generations")
                .with_bearer_token("tok")
                .with_body(RequestBody::Json(json!({ "prompt": "hi" })));

        let curl = render_curl(&request, None);
        assert_eq!(
            curl,
            "curl -X POST \"http://localhost:5100/v1/images/generations\" \\\n  \
             -H \"Authorization: Bearer tok\" \\\n  \
             -H \"Content-Type: application/json\" \\\n  \
             -d '{\n  \"prompt\": \"hi\"\n}'"
        );
        assert!(curl.contains("-d '{"));
        assert!(!curl.contains(DEFAULT_FILE_PLACEHOLDER));
    }

    #[test]
    fn single_quotes_in_json_are_escaped() {
        let request = RequestDescriptor::new(HttpMethod::Post, "http://h/v1")
            .with_body(RequestBody::Json(json!({ "prompt": "it's" })));
        assert!(render_curl(&request, None).contains("it'\\''s"));
    }

    #[test]
    fn file_parts_use_placeholder() {
        let request = multipart(vec![Part::text("prompt", "cat"), file_part()]);
        let curl = render_curl(&request, None);

        assert!(curl.contains("-F \"prompt=cat\""));
        assert!(curl.contains("-F \"images=@/path/to/your/file\""));
        assert!(!curl.contains("Content-Type"));
    }

    #[test]
    fn override_path_is_not_double_prefixed() {
        let request = multipart(vec![file_part()]);
        assert!(render_curl(&request, Some("@/tmp/a.png")).contains("-F \"images=@/tmp/a.png\""));
        assert!(render_curl(&request, Some("/tmp/b.png")).contains("-F \"images=@/tmp/b.png\""));
        assert!(render_curl(&request, Some("  ")).contains("@/path/to/your/file"));
    }

    #[test]
    fn multipart_content_type_header_is_skipped() {
        let request = multipart(vec![file_part()])
            .with_header("Content-Type", "multipart/form-data; boundary=x");
        assert!(!render_curl(&request, None).contains("multipart/form-data"));
    }

    #[test]
    fn parts_keep_their_order() {
        let request = multipart(vec![
            Part::text("model", "jimeng-4.0"),
            file_part(),
            Part::text("images", "https://a/2.png"),
        ]);
        let curl = render_curl(&request, None);
        let model = curl.find("model=").unwrap();
        let file = curl.find("images=@").unwrap();
        let url = curl.find("images=https").unwrap();
        assert!(model < file && file < url);
    }

    #[test]
    fn unrepresentable_text_is_omitted_with_trailing_comment() {
        let request = multipart(vec![Part::text("prompt", "bell\u{7}")]);
        let curl = render_curl(&request, None);
        assert!(curl.contains("-F \"prompt=<omitted>\""));
        assert!(curl.ends_with("\n# prompt: binary content omitted"));
        assert!(!curl.contains('\u{7}'));
    }

    #[test]
    fn omitted_text_keeps_later_flags_in_the_command() {
        let request = multipart(vec![Part::text("prompt", "bell\u{7}"), file_part()]);
        let curl = render_curl(&request, None);
        let lines: Vec<&str> = curl.lines().collect();

        assert_eq!(
            lines,
            vec![
                "curl -X POST \"http://localhost:5100/v1/images/compositions?model=jimeng-4.0\" \\",
                "  -H \"Authorization: Bearer tok\" \\",
                "  -F \"prompt=<omitted>\" \\",
                "  -F \"images=@/path/to/your/file\"",
                "# prompt: binary content omitted",
            ]
        );
        let comment = lines.iter().position(|l| l.starts_with('#')).unwrap();
        assert!(lines[..comment - 1].iter().all(|l| l.ends_with(" \\")));
        assert!(!lines[comment - 1].ends_with('\\'));
    }

    #[test]
    fn double_quoted_values_are_escaped() {
        let request = multipart(vec![Part::text("prompt", "say \"$HOME\"")]);
        assert!(render_curl(&request, None).contains(r#"-F "prompt=say \"\$HOME\"""#));
    }

    #[test]
    fn get_without_body() {
        let request = RequestDescriptor::new(HttpMethod::Get, "http://h/v1/models");
        assert_eq!(render_curl(&request, None), "curl -X GET \"http://h/v1/models\"");
    }
}
