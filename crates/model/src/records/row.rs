use std::fmt;

/// A single polled row: the monotonically assigned primary key and the
/// opaque payload that gets streamed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u64,
    pub content: String,
}

impl Row {
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Row {
            id,
            content: content.into(),
        }
    }

    /// Builds a row from raw column bytes. A NULL payload becomes an empty
    /// string and invalid UTF-8 is replaced rather than rejected.
    pub fn from_raw(id: u64, content: Option<Vec<u8>>) -> Self {
        let content = match content {
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            },
            None => String::new(),
        };

        Row { id, content }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({} bytes)", self.id, self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_null_content() {
        let row = Row::from_raw(7, None);
        assert_eq!(row, Row::new(7, ""));
    }

    #[test]
    fn test_from_raw_invalid_utf8() {
        let row = Row::from_raw(1, Some(vec![b'o', b'k', 0xff]));
        assert_eq!(row.id, 1);
        assert_eq!(row.content, "ok\u{fffd}");
    }

    #[test]
    fn test_from_raw_json_payload() {
        let payload = br#"{"text":"https://example.com"}"#.to_vec();
        let row = Row::from_raw(42, Some(payload));
        assert_eq!(row.content, r#"{"text":"https://example.com"}"#);
    }
}
