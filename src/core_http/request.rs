use percent_encoding::percent_decode_str;
use url::Url;

/// A request target split into decoded path segments and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

/// Splits a request target into its decoded path segments and query.
///
/// Both origin-form (`/a?b=c`) and absolute-form (`http://h/a`) targets are
/// accepted. Dot segments are collapsed before decoding, so a decoded segment
/// may still contain `/`; callers must reject those.
pub fn parse_target(target: &str) -> Option<Target> {
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(target).ok()?;

    let segments = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
        })
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Some(Target { segments, query })
}

pub fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "dtd" => "application/xml-dtd",
        Some(ext) if ext == "xml" => "application/xml",
        Some(ext) if ext == "html" || ext == "htm" => "text/html",
        _ => "text/plain",
    }
}
