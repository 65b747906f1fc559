use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::{SessionManager, SESSION_COOKIE};
use crate::error::AppError;

/// Rejects requests without a valid session cookie before they reach a handler.
///
/// On success the user id is stored in request extensions for
/// [`AuthenticatedUser`]. The [`SessionManager`] is taken from app data.
pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardService { service }))
    }
}

pub struct SessionGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(sessions) = req.app_data::<web::Data<SessionManager>>().cloned() else {
            let err = AppError::Internal("SessionManager is not registered as app data".into());
            let res = req.error_response(err).map_into_right_body();
            return Box::pin(ready(Ok(res)));
        };

        let cookie = req.cookie(SESSION_COOKIE);
        match sessions.validate(cookie.as_ref().map(|c| c.value())) {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUser(user_id));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(auth_err) => {
                log::warn!("Rejected {} {}: {}", req.method(), req.path(), auth_err);
                let res = req
                    .error_response(AppError::from(auth_err))
                    .map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}
