use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse};
use log::{error, info};
use serde::Serialize;
use std::future::{ready, Future, Ready};
use std::pin::Pin;

use super::guard::{check_access, Access, AuthError};
use super::session::Session;
use super::token::{Role, TokenKeys};

// All denials are silent: same body shape, client navigates to the login
// view. `x-session-clear` is set when the store was wiped so the client
// drops its persisted token and role too.
#[derive(Serialize)]
struct DenyBody {
    success: bool,
    message: String,
    redirect: &'static str,
}

/// Route guard middleware. Wrap a scope or resource with the set of roles
/// allowed through; admitted requests carry the verified `Claims` in their
/// extensions, readable in handlers via `web::ReqData<Claims>`.
pub struct RoleGuard {
    allowed: &'static [Role],
}

impl RoleGuard {
    pub fn allow(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RoleGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGuardMiddleware {
            service,
            allowed: self.allowed,
        }))
    }
}

pub struct RoleGuardMiddleware<S> {
    service: S,
    allowed: &'static [Role],
}

impl<S, B> Service<ServiceRequest> for RoleGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let keys = match req.app_data::<web::Data<TokenKeys>>() {
            Some(keys) => keys.get_ref().clone(),
            None => {
                error!("RoleGuard applied without TokenKeys in app data");
                let response = HttpResponse::InternalServerError().finish();
                let res = req.into_response(response).map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
        };

        let mut session = Session::from_bearer(bearer_token(&req));

        match check_access(&mut session, self.allowed, &keys) {
            Access::Granted(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Access::Denied(reason) => {
                info!("Denied {} {}: {}", req.method(), req.path(), reason);
                let mut builder = HttpResponse::build(reason.status());
                if session.was_cleared() {
                    builder.insert_header(("x-session-clear", "1"));
                }
                let response = builder.json(DenyBody {
                    success: false,
                    message: reason.to_string(),
                    redirect: "/",
                });
                let res = req.into_response(response).map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}
