//! Conversion between HTTP headers and call metadata.

use axum::http::HeaderMap;
use tonic::metadata::MetadataMap;

/// Headers that only describe the hop they travel on. HTTP/2 rejects the
/// connection-specific ones outright; the rest are recomputed per hop.
const HOP_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Every header, every value, as outgoing call metadata.
pub fn from_headers(headers: &HeaderMap) -> MetadataMap {
    MetadataMap::from_headers(headers.clone())
}

/// Append every metadata entry to `headers`, keeping existing values.
pub fn append_to_headers(metadata: MetadataMap, headers: &mut HeaderMap) {
    let mut current = None;
    for (name, value) in metadata.into_headers() {
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = &current {
            headers.append(name.clone(), value);
        }
    }
}

/// Drop hop-by-hop entries before metadata crosses the transport.
pub fn strip_hop_headers(metadata: MetadataMap) -> MetadataMap {
    let mut headers = metadata.into_headers();
    for name in HOP_HEADERS {
        headers.remove(name);
    }
    MetadataMap::from_headers(headers)
}
