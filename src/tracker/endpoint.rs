use url::Url;

/// `scheme://host[:port]` of a tracker url, the key its statistics are kept under.
/// Default ports are left out. Unparsable urls are their own authority.
pub fn authority(tracker_url: &str) -> String {
    let Ok(url) = Url::parse(tracker_url) else {
        return tracker_url.to_string();
    };

    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}://{host}:{port}", url.scheme()),
        (Some(host), None) => format!("{}://{host}", url.scheme()),
        (None, _) => tracker_url.to_string(),
    }
}

const ANNOUNCE: &str = "announce";
const SCRAPE: &str = "scrape";

/// Scrape convention: the last path segment's leading `announce` becomes
/// `scrape`. Urls that don't follow it are used as they are.
pub fn scrape_url(announce_url: &str) -> String {
    let (path, query) = match announce_url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (announce_url, None),
    };

    let segment_start = path.rfind('/').map_or(0, |idx| idx + 1);
    let Some(rest) = path[segment_start..].strip_prefix(ANNOUNCE) else {
        return announce_url.to_string();
    };

    let mut s = String::with_capacity(announce_url.len());
    s.push_str(&path[..segment_start]);
    s.push_str(SCRAPE);
    s.push_str(rest);
    if let Some(query) = query {
        s.push('?');
        s.push_str(query);
    }

    s
}
