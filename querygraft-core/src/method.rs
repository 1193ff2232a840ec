use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods recognized as terminal members of a client tree.
///
/// `Get` and `Head` leaves feed the query side of the cache layer;
/// `Post`, `Put`, `Patch` and `Delete` leaves feed the mutation side.
/// `Options` belongs to neither group: its leaves stay callable but
/// receive no cache helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Every method recognized as a leaf name.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
    ];

    /// Parse a tree member name into a method. Names are matched
    /// lowercase, exactly as they appear in the client tree.
    pub fn from_name(name: &str) -> Option<Method> {
        match name {
            "get" => Some(Method::Get),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            "patch" => Some(Method::Patch),
            "delete" => Some(Method::Delete),
            "head" => Some(Method::Head),
            "options" => Some(Method::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }

    /// Read methods produce query descriptors.
    pub fn is_read(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }

    /// Write methods produce mutation descriptors.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Patch | Method::Delete
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
