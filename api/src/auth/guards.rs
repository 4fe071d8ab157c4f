use crate::auth::claims::AuthUser;
use crate::response::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Fixed body returned when a token's role is not allowed to see the dashboard.
pub const DASHBOARD_ACCESS_DENIED: &str = "Unauthorized. Admin or Manager role required.";

/// Helper to extract, validate user from request headers and insert the claims
/// back into the request extensions.
async fn extract_and_insert_authuser(
    mut req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ErrorResponse>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::error("Authentication required")),
            )
        })?;

    req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Guard for the dashboard endpoints: admin or manager role only.
///
/// Runs before any handler, so a rejected request never touches the database.
/// Unknown or missing roles are denied (fail-safe).
pub async fn allow_dashboard_viewer(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !user.0.can_view_dashboard() {
        tracing::info!(
            user = user.0.sub,
            role = user.0.role.as_deref().unwrap_or("<none>"),
            "dashboard access denied"
        );
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::error(DASHBOARD_ACCESS_DENIED)),
        ));
    }

    Ok(next.run(req).await)
}
