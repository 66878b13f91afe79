//! Transport-agnostic request descriptor.
//!
//! A [`RequestDescriptor`] is built once from form values and then handed
//! both to the curl renderer and to the HTTP transport, so the previewed
//! command and the transmitted request cannot drift apart.

use std::fmt;

use serde_json::Value;

use super::HttpMethod;

/// Content type advertised for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single request header, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if this is a `Content-Type` header announcing a multipart body.
    #[must_use]
    pub fn is_multipart_content_type(&self) -> bool {
        self.name.eq_ignore_ascii_case("content-type") && self.value.contains("multipart/form-data")
    }
}

/// Binary file attached to a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the content, if known.
    pub content_type: Option<String>,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    /// Creates an attachment from in-memory bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Value of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    /// Plain text value.
    Text(String),
    /// Binary file attachment.
    File(FileAttachment),
}

/// One named field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Field name. Repeatable fields appear as several parts with the same name.
    pub name: String,
    /// Field value.
    pub value: PartValue,
}

impl Part {
    /// Creates a text part.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    /// Creates a binary file part.
    #[must_use]
    pub fn file(name: impl Into<String>, attachment: FileAttachment) -> Self {
        Self {
            name: name.into(),
            value: PartValue::File(attachment),
        }
    }

    /// Returns true if this part carries a binary attachment.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.value, PartValue::File(_))
    }
}

/// Request body, decided once by the builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// JSON document.
    Json(Value),
    /// Ordered multipart form.
    Multipart {
        /// Parts in the order they were appended.
        parts: Vec<Part>,
    },
}

impl RequestBody {
    /// Returns the content type the body requires, if it must be set explicitly.
    ///
    /// Multipart bodies return `None`: the transport adds the type together
    /// with its generated boundary.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
            Self::None | Self::Multipart { .. } => None,
        }
    }

    /// Returns true if this is a multipart form.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }

    /// Returns true if any part is a binary attachment.
    #[must_use]
    pub fn has_file(&self) -> bool {
        match self {
            Self::Multipart { parts } => parts.iter().any(Part::is_file),
            Self::None | Self::Json(_) => false,
        }
    }

    /// Returns the multipart parts, or an empty slice for other bodies.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        match self {
            Self::Multipart { parts } => parts,
            Self::None | Self::Json(_) => &[],
        }
    }
}

/// Fully resolved HTTP request, independent of any transport library.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Fully qualified URL including query string.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Vec<Header>,
    /// Request body.
    pub body: RequestBody,
}

impl RequestDescriptor {
    /// Creates a descriptor without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Appends an `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Sets the body, adding its content type header when one is required.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        if let Some(content_type) = body.content_type() {
            if self.header("content-type").is_none() {
                self.headers.push(Header::new("Content-Type", content_type));
            }
        }
        self.body = body;
        self
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json_body_adds_content_type_after_auth() {
        let descriptor = RequestDescriptor::new(HttpMethod::Post, "http://localhost/v1")
            .with_bearer_token("abc")
            .with_body(RequestBody::Json(json!({"prompt": "hi"})));

        let names: Vec<_> = descriptor.headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Authorization", "Content-Type"]);
        assert_eq!(descriptor.header("authorization"), Some("Bearer abc"));
        assert_eq!(descriptor.header("CONTENT-TYPE"), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn multipart_body_sets_no_content_type() {
        let parts = vec![
            Part::text("prompt", "hi"),
            Part::file("images", FileAttachment::new("a.png", vec![1, 2, 3])),
        ];
        let descriptor = RequestDescriptor::new(HttpMethod::Post, "http://localhost/v1")
            .with_bearer_token("abc")
            .with_body(RequestBody::Multipart { parts });

        assert_eq!(descriptor.header("content-type"), None);
        assert!(descriptor.body.is_multipart());
        assert!(descriptor.body.has_file());
        assert_eq!(descriptor.body.parts().len(), 2);
    }

    #[test]
    fn multipart_content_type_detection() {
        assert!(Header::new("content-type", "multipart/form-data; boundary=x").is_multipart_content_type());
        assert!(!Header::new("Content-Type", JSON_CONTENT_TYPE).is_multipart_content_type());
        assert!(!Header::new("Accept", "multipart/form-data").is_multipart_content_type());
    }

    #[test]
    fn attachment_debug_hides_bytes() {
        let attachment = FileAttachment::new("a.png", vec![0; 4096]).with_content_type("image/png");
        let debug = format!("{attachment:?}");
        assert!(debug.contains("len: 4096"));
        assert!(!debug.contains("[0, 0"));
    }
}
