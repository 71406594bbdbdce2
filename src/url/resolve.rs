use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Resolves the `Location` header of a redirect response into the next URL
///
/// Absolute locations are used as they are. Any other location, including a
/// scheme-relative `//host/path`, is resolved against the host (and port) of
/// the request that produced the redirect, always with the `https` scheme,
/// regardless of the scheme of that request.
///
/// # Arguments
///
/// * `requested` - The URL of the request that returned the redirect
/// * `location` - The raw `Location` header value
///
/// # Returns
///
/// * `Ok(Url)` - The URL to request next
/// * `Err(UrlError)` - The location cannot be parsed or the request had no host
///
/// # Examples
///
/// ```
/// use site_url_checker::url::resolve_redirect;
/// use url::Url;
///
/// let requested = Url::parse("https://example.com/old").unwrap();
/// let next = resolve_redirect(&requested, "/new-path").unwrap();
/// assert_eq!(next.as_str(), "https://example.com/new-path");
/// ```
pub fn resolve_redirect(requested: &Url, location: &str) -> UrlResult<Url> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = https_origin(requested)?;
            let mut next = base.join(location)?;
            // A scheme-relative location may name its own authority; the request's wins
            next.set_host(base.host_str())?;
            next.set_port(base.port())
                .map_err(|()| UrlError::MissingHost(requested.to_string()))?;
            Ok(next)
        }
        Err(e) => Err(e.into()),
    }
}

/// Builds `https://host[:port]/` from the host of the given URL
fn https_origin(url: &Url) -> UrlResult<Url> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let origin = match url.port() {
        Some(port) => format!("https://{}:{}/", host, port),
        None => format!("https://{}/", host),
    };

    Ok(Url::parse(&origin)?)
}
