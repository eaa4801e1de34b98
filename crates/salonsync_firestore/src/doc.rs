#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::user_auth::{AuthSession, Credentials};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::sign_in_handler,
        crate::handlers::sign_up_handler
    ),
    components(
        schemas(Credentials, AuthSession)
    ),
    tags(
        (name = "Auth", description = "Operator email/password accounts")
    ),
    servers(
        (url = "/api", description = "SalonSync API server")
    )
)]
pub struct AuthApiDoc;
