//! Contexto de sesión por request
//!
//! La identidad llega en `Authorization: Bearer <token>`, emitido por
//! `POST /api/auth/login`. Usuario, rol y organización salen de los claims
//! verificados. Un token ausente o inválido significa "sin sesión", no es un
//! error: sólo las operaciones que lo necesitan llaman a `require_user` o
//! `require_organisation`. Un admin puede elegir la organización con
//! `X-Organisation-Id`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::models::user::UserRole;
use crate::services::jwt_service::{JwtService, SessionClaims};
use crate::utils::errors::{AppError, AppResult};

pub const ORGANISATION_ID_HEADER: &str = "x-organisation-id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionContext {
    pub user: Option<SessionUser>,
    pub organisation_id: Option<i32>,
}

impl SessionContext {
    pub fn from_claims(claims: &SessionClaims) -> AppResult<Self> {
        Ok(Self {
            user: Some(SessionUser {
                id: claims.sub,
                role: claims.role()?,
            }),
            organisation_id: claims.organisation_id,
        })
    }

    pub fn from_bearer(headers: &HeaderMap, jwt: &JwtService) -> Self {
        let Some(token) = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
        else {
            return Self::default();
        };

        let mut context = match jwt.validate_token(token).and_then(|c| Self::from_claims(&c)) {
            Ok(context) => context,
            Err(e) => {
                debug!("🔒 Token descartado: {}", e);
                return Self::default();
            }
        };

        if context.is_admin() {
            if let Some(organisation_id) = headers
                .get(ORGANISATION_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
            {
                context.organisation_id = Some(organisation_id);
            }
        }
        context
    }

    fn is_admin(&self) -> bool {
        matches!(self.user, Some(SessionUser { role: UserRole::Admin, .. }))
    }

    pub fn require_user(&self) -> Result<SessionUser, AppError> {
        self.user
            .ok_or_else(|| AppError::Unauthorized("No user in session".to_string()))
    }

    pub fn require_organisation(&self) -> Result<i32, AppError> {
        self.organisation_id
            .ok_or_else(|| AppError::Unauthorized("No organisation selected".to_string()))
    }

    pub fn require_admin(&self) -> Result<SessionUser, AppError> {
        let user = self.require_user()?;
        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        Ok(user)
    }

    /// Admins y personal de la organización (no clientes ni conductores)
    pub fn require_staff(&self) -> Result<SessionUser, AppError> {
        let user = self.require_user()?;
        match user.role {
            UserRole::Admin | UserRole::OrganisationManager => Ok(user),
            role => Err(AppError::Forbidden(format!("Role {} cannot perform this operation", role))),
        }
    }

    /// Admins en cualquier organización; managers sólo en la suya
    pub fn require_organisation_access(&self, organisation_id: i32) -> Result<(), AppError> {
        let user = self.require_user()?;
        match user.role {
            UserRole::Admin => Ok(()),
            UserRole::OrganisationManager if self.organisation_id == Some(organisation_id) => Ok(()),
            _ => Err(AppError::Forbidden(format!(
                "No access to organisation {}",
                organisation_id
            ))),
        }
    }

    /// Organización de la sesión, sólo para quien gestiona su flota
    pub fn require_managed_organisation(&self) -> Result<i32, AppError> {
        self.require_staff()?;
        let organisation_id = self.require_organisation()?;
        self.require_organisation_access(organisation_id)?;
        Ok(organisation_id)
    }
}

/// Middleware que construye el `SessionContext` y lo inyecta en la request
pub async fn session_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = SessionContext::from_bearer(request.headers(), &jwt);
    request.extensions_mut().insert(context);
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Sin middleware no hay sesión
        Ok(parts
            .extensions
            .get::<SessionContext>()
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use std::time::Duration;

    fn jwt() -> JwtService {
        JwtService::new("session-test-secret", Duration::from_secs(3600))
    }

    fn token_for(role: UserRole, organisation_id: Option<i32>) -> String {
        let user = User {
            id: 7,
            first_name: "Sami".to_string(),
            last_name: "Ben Ali".to_string(),
            email: "sami@example.tn".to_string(),
            phone: None,
            password_hash: String::new(),
            role,
            organisation_id,
            profile_image: None,
            created_at: Utc::now(),
        };
        jwt().generate_token(&user).unwrap()
    }

    fn headers(pairs: &[(&'static str, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("authorization", format!("Bearer {}", token))
    }

    fn session(user: Option<(i32, UserRole)>, organisation_id: Option<i32>) -> SessionContext {
        SessionContext {
            user: user.map(|(id, role)| SessionUser { id, role }),
            organisation_id,
        }
    }

    #[test]
    fn test_absent_token_means_no_session() {
        let context = SessionContext::from_bearer(&HeaderMap::new(), &jwt());
        assert_eq!(context, SessionContext::default());
        assert!(matches!(context.require_user(), Err(AppError::Unauthorized(_))));
        assert!(matches!(context.require_organisation(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_token_builds_context() {
        let token = token_for(UserRole::OrganisationManager, Some(3));
        let context = SessionContext::from_bearer(&headers(&[bearer(&token)]), &jwt());

        let user = context.require_user().unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, UserRole::OrganisationManager);
        assert_eq!(context.require_organisation().unwrap(), 3);
        assert!(context.require_organisation_access(3).is_ok());
        assert!(context.require_organisation_access(4).is_err());
        assert_eq!(context.require_managed_organisation().unwrap(), 3);
    }

    #[test]
    fn test_invalid_token_means_no_session() {
        let forged = JwtService::new("other", Duration::from_secs(3600))
            .generate_token(&User {
                id: 1,
                first_name: "X".to_string(),
                last_name: "Y".to_string(),
                email: "x@y.tn".to_string(),
                phone: None,
                password_hash: String::new(),
                role: UserRole::Admin,
                organisation_id: None,
                profile_image: None,
                created_at: Utc::now(),
            })
            .unwrap();

        let context = SessionContext::from_bearer(&headers(&[bearer(&forged)]), &jwt());
        assert_eq!(context, SessionContext::default());

        let garbage = SessionContext::from_bearer(&headers(&[bearer("abc.def.ghi")]), &jwt());
        assert_eq!(garbage, SessionContext::default());
    }

    #[test]
    fn test_organisation_header_is_ignored_for_non_admins() {
        let token = token_for(UserRole::Client, None);
        let context = SessionContext::from_bearer(
            &headers(&[bearer(&token), (ORGANISATION_ID_HEADER, "5".to_string())]),
            &jwt(),
        );
        assert_eq!(context.organisation_id, None);

        let admin = token_for(UserRole::Admin, None);
        let context = SessionContext::from_bearer(
            &headers(&[bearer(&admin), (ORGANISATION_ID_HEADER, "5".to_string())]),
            &jwt(),
        );
        assert_eq!(context.organisation_id, Some(5));
    }

    #[test]
    fn test_anonymous_caller_has_no_organisation_access() {
        let context = session(None, Some(5));
        assert!(matches!(
            context.require_organisation_access(5),
            Err(AppError::Unauthorized(_))
        ));
        assert!(context.require_managed_organisation().is_err());
    }

    #[test]
    fn test_client_has_no_organisation_access() {
        let context = session(Some((9, UserRole::Client)), Some(5));
        assert!(matches!(
            context.require_organisation_access(5),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            context.require_managed_organisation(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(context.require_staff(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_admin_reaches_any_organisation() {
        let context = session(Some((1, UserRole::Admin)), Some(8));
        assert!(context.require_organisation_access(5).is_ok());
        assert_eq!(context.require_managed_organisation().unwrap(), 8);
        assert!(context.require_admin().is_ok());
    }

    #[test]
    fn test_manager_is_staff_but_not_admin() {
        let context = session(Some((2, UserRole::OrganisationManager)), Some(5));
        assert!(context.require_staff().is_ok());
        assert!(matches!(context.require_admin(), Err(AppError::Forbidden(_))));
        assert!(matches!(
            session(Some((3, UserRole::Conducteur)), Some(5)).require_managed_organisation(),
            Err(AppError::Forbidden(_))
        ));
    }
}
