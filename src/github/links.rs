//! Link-relation pagination metadata.
//!
//! GitHub paginates collections with an RFC 5988 `Link` header such as
//! `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`.
//! [`PageLinks`] keeps the relations the scan navigates by; unknown relations
//! and unparsable targets are ignored.

use http::HeaderMap;
use http::header::LINK;
use url::Url;

use super::error::ScanError;

/// Pagination relations extracted from a response's `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    next: Option<Url>,
    last: Option<Url>,
    prev: Option<Url>,
    first: Option<Url>,
}

impl PageLinks {
    /// Reads the `Link` header of a response.
    ///
    /// Responses without the header (non-paginated collections) yield empty
    /// links.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Parses a raw `Link` header value.
    ///
    /// # Example
    ///
    /// ```
    /// use stargazer::github::PageLinks;
    ///
    /// let links = PageLinks::parse(
    ///     "<https://api.github.com/x?page=2>; rel=\"next\", <https://api.github.com/x?page=4>; rel=\"last\"",
    /// );
    /// assert_eq!(links.next().map(|url| url.as_str()), Some("https://api.github.com/x?page=2"));
    /// assert!(links.prev().is_none());
    /// ```
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();

        for entry in split_entries(header) {
            let Some((target, params)) = entry
                .trim()
                .strip_prefix('<')
                .and_then(|rest| rest.split_once('>'))
            else {
                continue;
            };
            let Ok(url) = Url::parse(target.trim()) else {
                continue;
            };

            for relation in relations(params) {
                links.assign(relation, url.clone());
            }
        }

        links
    }

    fn assign(&mut self, relation: &str, url: Url) {
        let slot = match relation {
            "next" => &mut self.next,
            "last" => &mut self.last,
            "prev" => &mut self.prev,
            "first" => &mut self.first,
            _ => return,
        };
        slot.get_or_insert(url);
    }

    /// The following page, absent on the final page.
    #[must_use]
    pub const fn next(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// The final page, absent when the collection fits on one page or the
    /// current page is the final one.
    #[must_use]
    pub const fn last(&self) -> Option<&Url> {
        self.last.as_ref()
    }

    /// The preceding page.
    #[must_use]
    pub const fn prev(&self) -> Option<&Url> {
        self.prev.as_ref()
    }

    /// The first page.
    #[must_use]
    pub const fn first(&self) -> Option<&Url> {
        self.first.as_ref()
    }

    /// Returns true when no relation was present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.next.is_none() && self.last.is_none() && self.prev.is_none() && self.first.is_none()
    }
}

/// Extracts the `page=` query parameter of a pagination link.
///
/// # Errors
///
/// Returns [`ScanError::PaginationParse`] when the parameter is missing or not
/// a positive integer.
pub fn page_number(url: &Url) -> Result<u32, ScanError> {
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ScanError::PaginationParse {
            message: format!("no page parameter in {url}"),
        })?;

    match raw.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(ScanError::PaginationParse {
            message: format!("page parameter `{raw}` in {url} is not a positive integer"),
        }),
    }
}

/// Splits a header on the commas that separate entries, keeping commas that
/// appear inside a target URL.
fn split_entries(header: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for piece in header.split(',') {
        match entries.last_mut() {
            Some(current) if !piece.trim_start().starts_with('<') => {
                current.push(',');
                current.push_str(piece);
            }
            _ => entries.push(piece.to_owned()),
        }
    }
    entries
}

/// Yields the relation names of an entry's parameters; `rel` may hold a
/// space-separated list.
fn relations(params: &str) -> impl Iterator<Item = &str> {
    params
        .split(';')
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .flat_map(str::split_whitespace)
}
