//! `FilterState` ⇄ URL query string
//!
//! The query string is shareable and bookmarkable, so keys and value formats
//! must stay stable. Decoding is total: anything it cannot understand is
//! replaced by the facet default and reported as an [`IgnoredParam`].

use crate::search::filters::{Boundary, FilterState, ListFacet};
use crate::ErrorKind;
use url::form_urlencoded;

pub const QUERY_KEY: &str = "q";
pub const NATIVE_LANGUAGE_NAME_KEY: &str = "native_language_name";
pub const COMBINE_CONTRIBUTORS_KEY: &str = "combine_contributors";
pub const COMBINE_CONTRIBUTORS_VALUE: &str = "AND";
pub const BOUNDARY_KEY: &str = "boundary";
pub const PAGE_SIZE_KEY: &str = "pageSize";

/// A query parameter that `decode` dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredParam {
    pub key: String,
    pub value: String,
    pub reason: &'static str,
}

impl IgnoredParam {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::DecodeIgnored
    }
}

/// Result of a decode, with everything that had to be defaulted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeReport {
    pub filter: FilterState,
    pub ignored: Vec<IgnoredParam>,
}

pub struct FilterCodec;

impl FilterCodec {
    /// Encodes a filter as a query string without a leading `?`.
    /// The empty filter encodes to the empty string.
    pub fn encode(filter: &FilterState) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        Self::append_facets(&mut serializer, filter);
        serializer.finish()
    }

    /// Query parameters for the search API: the URL facets plus the page size
    pub fn encode_api_params(filter: &FilterState, page_size: usize) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        Self::append_facets(&mut serializer, filter);
        serializer.append_pair(PAGE_SIZE_KEY, &page_size.to_string());
        serializer.finish()
    }

    fn append_facets(serializer: &mut form_urlencoded::Serializer<'_, String>, filter: &FilterState) {
        if !filter.query.is_empty() {
            serializer.append_pair(QUERY_KEY, &filter.query);
        }

        for facet in ListFacet::ALL {
            for value in filter.list(facet).iter().filter(|v| !v.is_empty()) {
                serializer.append_pair(facet.key(), value);
            }
            if facet == ListFacet::Contributors
                && filter.combine_contributors
                && filter.contributors.len() > 1
            {
                serializer.append_pair(COMBINE_CONTRIBUTORS_KEY, COMBINE_CONTRIBUTORS_VALUE);
            }
        }

        if !filter.native_language_name.is_empty() {
            serializer.append_pair(NATIVE_LANGUAGE_NAME_KEY, &filter.native_language_name);
        }

        if let Some(boundary) = &filter.boundary {
            serializer.append_pair(BOUNDARY_KEY, &Self::encode_boundary(boundary));
        }
    }

    /// Flattened `lng,lat,lng,lat,...` list of the open ring
    pub fn encode_boundary(boundary: &Boundary) -> String {
        boundary
            .vertices()
            .iter()
            .flat_map(|[lng, lat]| [lng.to_string(), lat.to_string()])
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn decode_boundary(value: &str) -> Option<Boundary> {
        let numbers = value
            .split(',')
            .map(|part| part.trim().parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()?;
        if numbers.len() % 2 != 0 {
            return None;
        }
        let vertices = numbers.chunks(2).map(|pair| [pair[0], pair[1]]).collect();
        Boundary::new(vertices)
    }

    /// Decodes a query string (with or without a leading `?`). Never fails.
    pub fn decode(query: &str) -> FilterState {
        let report = Self::decode_with_report(query);
        for ignored in &report.ignored {
            log::debug!(
                "ignoring query parameter {}={:?}: {}",
                ignored.key,
                ignored.value,
                ignored.reason
            );
        }
        report.filter
    }

    pub fn decode_with_report(query: &str) -> DecodeReport {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filter = FilterState::default();
        let mut ignored = Vec::new();
        let mut combine_requested = false;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let reason = match key.as_ref() {
                "" => None,
                QUERY_KEY => {
                    filter.query = value.to_string();
                    None
                }
                NATIVE_LANGUAGE_NAME_KEY => {
                    filter.native_language_name = value.to_string();
                    None
                }
                COMBINE_CONTRIBUTORS_KEY => {
                    if value.eq_ignore_ascii_case(COMBINE_CONTRIBUTORS_VALUE)
                        || value.eq_ignore_ascii_case("true")
                    {
                        combine_requested = true;
                        None
                    } else {
                        Some("unrecognized combine value")
                    }
                }
                BOUNDARY_KEY => match Self::decode_boundary(&value) {
                    Some(boundary) => {
                        filter.boundary = Some(boundary);
                        None
                    }
                    None => Some("malformed boundary"),
                },
                other => match ListFacet::from_key(other) {
                    Some(_) if value.is_empty() => Some("empty value"),
                    Some(facet) => {
                        filter.list_mut(facet).push(value.to_string());
                        None
                    }
                    None => Some("unknown parameter"),
                },
            };

            if let Some(reason) = reason {
                ignored.push(IgnoredParam {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason,
                });
            }
        }

        if combine_requested {
            if filter.contributors.len() > 1 {
                filter.combine_contributors = true;
            } else {
                ignored.push(IgnoredParam {
                    key: COMBINE_CONTRIBUTORS_KEY.to_string(),
                    value: COMBINE_CONTRIBUTORS_VALUE.to_string(),
                    reason: "fewer than two contributors",
                });
            }
        }

        filter.normalize();
        DecodeReport { filter, ignored }
    }
}
