const CSRF_COOKIE: &str = "csrftoken";

/// Value of the cookie `name` in a `Cookie` header (`a=1; b=2`).
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
}

pub fn csrf_token_from_cookie_header(header: &str) -> Option<String> {
    cookie_value(header, CSRF_COOKIE)
}
