//! Log-out handler that invalidates the auth cookie.

use axum::http::StatusCode;
use axum_extra::extract::PrivateCookieJar;

use crate::auth::invalidate_auth_cookie;

/// Invalidate the auth cookie.
///
/// Succeeds even if the client is not logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> (StatusCode, PrivateCookieJar) {
    (StatusCode::NO_CONTENT, invalidate_auth_cookie(jar))
}

#[cfg(test)]
mod log_out_tests {
    use axum::{
        http::{StatusCode, header::SET_COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::auth::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, UserID, post_log_out, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie() {
        let jar = set_auth_cookie(get_jar(), UserID::new(123), DEFAULT_COOKIE_DURATION).unwrap();

        let response = post_log_out(jar).await.into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie_header = response
            .headers()
            .get(SET_COOKIE)
            .expect("response should set the auth cookie")
            .to_str()
            .unwrap();
        let cookie = Cookie::parse(cookie_header).unwrap();
        assert_eq!(cookie.name(), COOKIE_TOKEN);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}
