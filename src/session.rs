//! HTTP session construction.
//!
//! One reqwest [`Client`] is built per run and carries everything the
//! pagination loop needs: the engine's default headers, the required cookies
//! in a cookie jar, a user agent drawn from a fixed pool of common browser
//! strings, an optional proxy, and a request timeout.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use reqwest::{Client, Proxy};
use url::Url;

/// Generic (and most common) user agents from different browsers
/// (Chrome, Mozilla, Mac, Edge, Safari).
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/113.06",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36 Edg/113.0.1774.42",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pick a user agent at random from the pool.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}

/// Build the HTTP client for one run.
///
/// # Arguments
///
/// * `headers` - Default headers applied to every request
/// * `cookies` - `(cookie string, origin)` pairs to seed the cookie jar with
/// * `user_agent` - User agent string for every request
/// * `proxy` - Proxy URL applied to all schemes, if proxying is enabled
///
/// # Errors
///
/// Fails if the proxy URL is invalid or the client cannot be constructed.
pub fn build_client(
    headers: HeaderMap,
    cookies: &[(String, Url)],
    user_agent: &str,
    proxy: Option<&str>,
) -> reqwest::Result<Client> {
    let jar = Arc::new(Jar::default());
    for (cookie, origin) in cookies {
        jar.add_cookie_str(cookie, origin);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .user_agent(user_agent)
        .cookie_provider(jar)
        .timeout(REQUEST_TIMEOUT);

    if let Some(proxy_url) = proxy {
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_comes_from_pool() {
        for _ in 0..20 {
            let ua = random_user_agent();
            assert!(USER_AGENTS.contains(&ua));
        }
    }

    #[test]
    fn test_build_client_without_proxy() {
        let origin = Url::parse("https://www.example.com").unwrap();
        let cookies = vec![("SESSION=abc; Domain=.example.com".to_string(), origin)];
        let client = build_client(HeaderMap::new(), &cookies, USER_AGENTS[0], None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_rejects_invalid_proxy() {
        let client = build_client(HeaderMap::new(), &[], USER_AGENTS[0], Some("not a url"));
        assert!(client.is_err());
    }
}
