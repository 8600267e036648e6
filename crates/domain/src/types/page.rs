//! Response pages returned by Degreed collection endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Record;
use crate::errors::{DegreedError, Result};

/// One collection response: `{data: [...], links: {self, next?}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Pagination links of a [`Page`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Page {
    /// Continuation URL, if the server supplied a non-empty one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref().map(str::trim).filter(|next| !next.is_empty())
    }
}

/// Parsed body of a resource GET.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// A JSON document was returned.
    Json(Value),
    /// No usable body: the resource has nothing for this request.
    Unavailable,
}

impl ResponseBody {
    /// Classify raw response text.
    ///
    /// Empty text, JSON `null`, `{}` and `[]` all mean "resource
    /// unavailable". Anything else must be valid JSON.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::Unavailable);
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| DegreedError::Decode(format!("response is not valid JSON: {e}")))?;

        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        let empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };

        if empty {
            Self::Unavailable
        } else {
            Self::Json(value)
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Interpret the body as a [`Page`]; `None` when unavailable.
    pub fn into_page(self) -> Result<Option<Page>> {
        match self {
            Self::Unavailable => Ok(None),
            Self::Json(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| DegreedError::Decode(format!("response is not a page: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_bodies_are_unavailable() {
        for text in ["", "   ", "null", "{}", "[]"] {
            assert!(ResponseBody::from_text(text).unwrap().is_unavailable(), "{text:?}");
        }
    }

    #[test]
    fn page_with_zero_records_is_not_unavailable() {
        let body = ResponseBody::from_text(r#"{"data": [], "links": {}}"#).unwrap();
        let page = body.into_page().unwrap().expect("page present");
        assert!(page.data.is_empty());
        assert_eq!(page.next_link(), None);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = ResponseBody::from_text("<html>").unwrap_err();
        assert!(matches!(err, DegreedError::Decode(_)));
    }

    #[test]
    fn reads_next_link() {
        let body = ResponseBody::from_value(json!({
            "data": [{"id": 1}],
            "links": {"self": "https://api/p1", "next": "https://api/p2"}
        }));
        let page = body.into_page().unwrap().unwrap();
        assert_eq!(page.next_link(), Some("https://api/p2"));
        assert_eq!(page.links.self_link.as_deref(), Some("https://api/p1"));
    }

    #[test]
    fn blank_or_null_next_link_ends_pagination() {
        let page: Page =
            serde_json::from_value(json!({"data": [], "links": {"next": ""}})).unwrap();
        assert_eq!(page.next_link(), None);
        let page: Page =
            serde_json::from_value(json!({"data": [], "links": {"next": null}})).unwrap();
        assert_eq!(page.next_link(), None);
    }

    #[test]
    fn non_page_json_is_decode_error() {
        let body = ResponseBody::from_value(json!({"data": "oops"}));
        assert!(matches!(body.into_page(), Err(DegreedError::Decode(_))));
    }
}
