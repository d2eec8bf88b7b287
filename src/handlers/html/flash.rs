//! One-time success notifications carried between a redirect and the next
//! rendered page.

use axum::http::{HeaderMap, header};

pub const COOKIE_NAME: &str = "flash";
pub const CLEAR_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Created,
    Updated,
    Deleted,
}

impl Flash {
    const fn code(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Created => "Note created successfully!",
            Self::Updated => "Note updated successfully!",
            Self::Deleted => "Note deleted successfully!",
        }
    }

    /// `Set-Cookie` value that stores this notification.
    pub fn cookie(self) -> String {
        format!(
            "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
            self.code()
        )
    }

    /// Reads a pending notification from the request's `Cookie` headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, code)| Self::from_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn cookie_round_trips_through_request_headers() {
        let set = Flash::Updated.cookie();
        let pair = set.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

        assert_eq!(Flash::from_headers(&headers), Some(Flash::Updated));
    }

    #[test]
    fn finds_flash_among_other_cookies() {
        assert_eq!(
            Flash::from_headers(&headers("theme=dark; flash=deleted; lang=en")),
            Some(Flash::Deleted)
        );
    }

    #[test]
    fn ignores_missing_and_unknown_values() {
        assert_eq!(Flash::from_headers(&HeaderMap::new()), None);
        assert_eq!(Flash::from_headers(&headers("flash=")), None);
        assert_eq!(Flash::from_headers(&headers("flash=<script>")), None);
    }
}
