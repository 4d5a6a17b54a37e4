//! Redirect retargeting.

use axum::http::StatusCode;
use url::Url;

use crate::config::Endpoints;

/// Redirect statuses whose `Location` is retargeted.
const REDIRECT_STATUSES: [StatusCode; 5] = [
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
];

pub fn is_redirect(status: StatusCode) -> bool {
    REDIRECT_STATUSES.contains(&status)
}

/// Resolve `location` against the origin base and move it onto the public host.
///
/// Path, query and fragment are kept. Locations with a non-web scheme
/// (`mailto:`, app deep links) come back resolved but otherwise unchanged.
/// Returns `None` if the location cannot be parsed.
pub fn retarget_location(location: &str, endpoints: &Endpoints) -> Option<Url> {
    let public = endpoints.public_host();
    let mut url = endpoints.origin_base().join(location).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return Some(url);
    }

    url.set_scheme(public.scheme()).ok()?;
    url.set_host(public.host_str()).ok()?;
    url.set_port(public.port()).ok()?;

    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(public: &str) -> Endpoints {
        Endpoints::parse("http://internal.example:3000/productions", public).unwrap()
    }

    #[test]
    fn redirect_statuses() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect(StatusCode::from_u16(code).unwrap()));
        }
        assert!(!is_redirect(StatusCode::NOT_MODIFIED));
        assert!(!is_redirect(StatusCode::OK));
    }

    #[test]
    fn absolute_location_moves_to_public_host() {
        let url = retarget_location("http://internal.example/next", &endpoints("https://public.example"));
        assert_eq!(url.unwrap().as_str(), "https://public.example/next");
    }

    #[test]
    fn origin_port_is_replaced() {
        let url = retarget_location(
            "http://internal.example:3000/login?next=%2Fsongs#top",
            &endpoints("http://localhost:3001"),
        );
        assert_eq!(url.unwrap().as_str(), "http://localhost:3001/login?next=%2Fsongs#top");
    }

    #[test]
    fn relative_location_resolves_against_origin_base() {
        let e = endpoints("https://public.example");
        assert_eq!(
            retarget_location("/dashboard", &e).unwrap().as_str(),
            "https://public.example/dashboard"
        );
        assert_eq!(
            retarget_location("checkout", &e).unwrap().as_str(),
            "https://public.example/checkout"
        );
    }

    #[test]
    fn non_web_locations_pass_through() {
        let e = endpoints("https://public.example");
        assert_eq!(
            retarget_location("mailto:someone@example.com", &e).unwrap().as_str(),
            "mailto:someone@example.com"
        );
        assert_eq!(
            retarget_location("myapp://callback?code=42", &e).unwrap().as_str(),
            "myapp://callback?code=42"
        );
    }
}
