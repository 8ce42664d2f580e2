use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, middleware::Next, response::Response};

use warden_auth::TokenService;

use crate::app::errors;
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
}

/// Authentication gate: runs in front of every protected route.
///
/// A well-formed `Authorization: Bearer <token>` header that verifies yields
/// an `IdentityContext` in request extensions; any deviation is a 401. Only
/// request-scoped state is touched, so the check is idempotent.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())?;

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "token verification failed");
            return Err(errors::unauthorized());
        }
    };

    req.extensions_mut()
        .insert(IdentityContext::new(claims.identity()));

    Ok(next.run(req).await)
}

/// Pull the bearer token out of the headers.
///
/// The header must appear exactly once (a repeated header is rejected, not
/// first-match resolved) and must read `Bearer <token>` with a non-empty
/// token.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let mut values = headers.get_all(axum::http::header::AUTHORIZATION).iter();
    let header = match (values.next(), values.next()) {
        (Some(single), None) => single,
        _ => return Err(errors::unauthorized()),
    };

    let header = header.to_str().map_err(|_| errors::unauthorized())?;

    let (scheme, token) = header.split_once(' ').ok_or_else(errors::unauthorized)?;
    if scheme != "Bearer" || token.is_empty() {
        return Err(errors::unauthorized());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(AUTHORIZATION, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn accepts_a_single_well_formed_header() {
        let headers = headers_with(&["Bearer abc.def.ghi"]);
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_a_missing_header() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }

    #[test]
    fn rejects_a_repeated_header_even_when_values_agree() {
        let headers = headers_with(&["Bearer abc", "Bearer abc"]);
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn rejects_wrong_scheme_and_casing() {
        for value in ["bearer abc", "BEARER abc", "Token abc", "Basic abc"] {
            let headers = headers_with(&[value]);
            assert!(extract_bearer(&headers).is_err(), "accepted {value:?}");
        }
    }

    #[test]
    fn rejects_scheme_without_a_token() {
        for value in ["Bearer", "Bearer "] {
            let headers = headers_with(&[value]);
            assert!(extract_bearer(&headers).is_err(), "accepted {value:?}");
        }
    }
}
