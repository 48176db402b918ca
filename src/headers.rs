use http_client::Request;

/// Desktop Chrome user agent sent with every chart page request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Accept header for regular HTML page loads
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Add the browser headers every chart site expects
pub fn add_browser_headers(request: &mut Request) {
    let _ = request.insert_header("User-Agent", USER_AGENT);
    let _ = request.insert_header("Accept", ACCEPT_HTML);
    let _ = request.insert_header("Accept-Language", ACCEPT_LANGUAGE);
}

/// Add per-request overrides on top of the browser defaults
pub fn add_extra_headers(request: &mut Request, headers: &[(String, String)]) {
    for (name, value) in headers {
        let _ = request.insert_header(name.as_str(), value.as_str());
    }
}

/// Add headers for authenticated JSON API calls
pub fn add_api_headers(request: &mut Request, access_token: &str) {
    let _ = request.insert_header("Authorization", format!("Bearer {access_token}"));
    let _ = request.insert_header("Accept", "application/json");
}
