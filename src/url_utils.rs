use url::{ParseError, Url};

use crate::constants::BOOTSTRAP_PATH;

/// `http://{host}:{port}{path}`, bracketing bare IPv6 literals.
pub fn server_url(host: &str, port: u16, path: &str) -> Result<Url, ParseError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ParseError::EmptyHost);
    }

    let authority = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };

    let mut url = Url::parse(&format!("http://{}", authority))?;

    // Anything that leaks out of the authority ("a/b", "a?b", "user@a") would silently
    // point us at a different server or path.
    let clean = url.username().is_empty()
        && url.password().is_none()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
        && url.port_or_known_default() == Some(port);
    if !clean {
        return Err(ParseError::InvalidDomainCharacter);
    }

    url.set_path(path);
    Ok(url)
}

pub fn bootstrap_url(host: &str, port: u16) -> Result<Url, ParseError> {
    server_url(host, port, BOOTSTRAP_PATH)
}

/// Resolve the `uri` advertised for a pool. Server-relative uris (leading `/`) keep the
/// scheme, host and port of the bootstrap url; anything else must be absolute.
pub fn resolve_pool_url(bootstrap: &Url, uri: &str) -> Result<Url, ParseError> {
    if !uri.starts_with('/') {
        return Url::parse(uri);
    }

    let (rest, fragment) = match uri.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (uri, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut url = bootstrap.clone();
    url.set_path(path);
    url.set_query(query);
    url.set_fragment(fragment);
    Ok(url)
}
