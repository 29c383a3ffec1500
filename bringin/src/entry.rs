//! Entry-mode detection from the page URL.
//!
//! A QR code printed at a cafe links to `/qr/<storeId>`, or to any page
//! with a `store_id` or `qr_id` query parameter. Either selects QR entry;
//! everything else is a normal visit.

use crate::types::StoreId;
use serde::{Deserialize, Serialize};

/// How the client was opened
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMode {
    /// Regular launch: login, then home
    #[default]
    Normal,
    /// Launched from a cafe's QR code
    Qr {
        /// Store encoded in the code
        store_id: StoreId,
    },
}

impl EntryMode {
    /// Store id for QR entries
    #[must_use]
    pub const fn store_id(&self) -> Option<&StoreId> {
        match self {
            Self::Normal => None,
            Self::Qr { store_id } => Some(store_id),
        }
    }

    /// Whether this is a QR entry
    #[must_use]
    pub const fn is_qr(&self) -> bool {
        matches!(self, Self::Qr { .. })
    }
}

/// Detect the entry mode from a URL or a path-and-query string.
///
/// Precedence: `/qr/<id>` path, then `store_id`, then `qr_id`. Empty values
/// count as absent. Query values are form-decoded (`+` is a space, then
/// percent-escapes); the path segment is taken verbatim.
#[must_use]
pub fn detect(url: &str) -> EntryMode {
    let (path, query) = split_url(url);

    let store = qr_path_segment(path)
        .map(str::to_string)
        .or_else(|| query_param(query, "store_id"))
        .or_else(|| query_param(query, "qr_id"));

    match store {
        Some(id) => {
            tracing::debug!(store = %id, "QR entry detected");
            EntryMode::Qr {
                store_id: StoreId::from(id),
            }
        },
        None => EntryMode::Normal,
    }
}

/// Split into `(path, query)`, dropping scheme, authority and fragment
fn split_url(url: &str) -> (&str, &str) {
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    let url = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest.find('/').map_or("", |slash| &rest[slash..]));
    url.split_once('?').unwrap_or((url, ""))
}

fn qr_path_segment(path: &str) -> Option<&str> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    match (segments.next(), segments.next()) {
        (Some("qr"), Some(id)) => Some(id),
        _ => None,
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| form_decode(key) == name)
        .map(|(_, value)| form_decode(value))
        .filter(|value| !value.is_empty())
}

/// `application/x-www-form-urlencoded` value decoding; bad UTF-8 is replaced
fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr(id: &str) -> EntryMode {
        EntryMode::Qr {
            store_id: StoreId::from(id),
        }
    }

    #[test]
    fn qr_path() {
        assert_eq!(detect("/qr/store-7"), qr("store-7"));
        assert_eq!(detect("https://bringin.app/qr/abc?x=1"), qr("abc"));
        assert_eq!(detect("/qr/abc/"), qr("abc"));
    }

    #[test]
    fn query_parameters() {
        assert_eq!(detect("/?store_id=12"), qr("12"));
        assert_eq!(detect("https://bringin.app/home?qr_id=99#top"), qr("99"));
        assert_eq!(detect("/?qr_id=2&store_id=1"), qr("1"));
    }

    #[test]
    fn path_wins_over_query() {
        assert_eq!(detect("/qr/path-id?store_id=query-id"), qr("path-id"));
    }

    #[test]
    fn normal_entries() {
        assert_eq!(detect("/"), EntryMode::Normal);
        assert_eq!(detect("https://bringin.app"), EntryMode::Normal);
        assert_eq!(detect("/qr"), EntryMode::Normal);
        assert_eq!(detect("/qr/"), EntryMode::Normal);
        assert_eq!(detect("/?store_id="), EntryMode::Normal);
        assert_eq!(detect("/?store_id"), EntryMode::Normal);
        assert_eq!(detect("/menu?qr=1"), EntryMode::Normal);
    }

    #[test]
    fn empty_store_id_falls_through_to_qr_id() {
        assert_eq!(detect("/?store_id=&qr_id=5"), qr("5"));
    }

    #[test]
    fn query_values_are_form_decoded() {
        assert_eq!(detect("/?store_id=a%20b"), qr("a b"));
        assert_eq!(detect("/?store_id=a+b"), qr("a b"));
        assert_eq!(detect("/?qr_id=%EB%B8%8C%EB%9D%BC%EC%9A%B4"), qr("브라운"));
        assert_eq!(detect("/?store_id=1%2B2"), qr("1+2"));
        assert_eq!(detect("/?store%5Fid=7"), qr("7"));
    }

    #[test]
    fn path_segment_is_verbatim() {
        assert_eq!(detect("/qr/a%20b"), qr("a%20b"));
    }

    #[test]
    fn accessors() {
        assert!(qr("1").is_qr());
        assert_eq!(qr("1").store_id(), Some(&StoreId::from("1")));
        assert_eq!(EntryMode::Normal.store_id(), None);
    }
}
