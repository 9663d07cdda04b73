use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::post,
};
use gatehouse_adapters::http::routes::{
    confirm_phone_code, link_provider, login, request_phone_code, signup, verify_token,
};
use gatehouse_application::PhoneVerificationPolicy;
use gatehouse_core::{
    LineTypeLookup, PasswordHasher, SessionIssuer, SmsClient, UserStore, VerificationCodeStore,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// CORS origins the service will answer.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn new(origins: Vec<HeaderValue>) -> Self {
        Self(origins)
    }

    fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

/// The authentication service: every route from signup to phone
/// verification assembled into one router.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Wire the port implementations into the route table.
    ///
    /// Each route receives exactly the state it needs; implementations are
    /// expected to be cheaply cloneable (an inner `Arc`, a pool handle).
    pub fn new<U, H, V, M, L, S>(
        user_store: U,
        password_hasher: H,
        code_store: V,
        sms_client: M,
        line_type_lookup: L,
        session_issuer: S,
        policy: PhoneVerificationPolicy,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
        V: VerificationCodeStore + Clone + 'static,
        M: SmsClient + Clone + 'static,
        L: LineTypeLookup + Clone + 'static,
        S: SessionIssuer + Clone + 'static,
    {
        let router = Router::new()
            .merge(
                Router::new()
                    .route("/signup", post(signup::<U, H>))
                    .with_state((user_store.clone(), password_hasher.clone())),
            )
            .merge(
                Router::new()
                    .route("/login", post(login::<U, H, S>))
                    .with_state((
                        user_store.clone(),
                        password_hasher,
                        session_issuer.clone(),
                    )),
            )
            .merge(
                Router::new()
                    .route("/oauth/link", post(link_provider::<U, S>))
                    .with_state((user_store.clone(), session_issuer.clone())),
            )
            .merge(
                Router::new()
                    .route(
                        "/phone/request-code",
                        post(request_phone_code::<V, M, L, S>),
                    )
                    .with_state((
                        code_store.clone(),
                        sms_client,
                        line_type_lookup,
                        session_issuer.clone(),
                        policy,
                    )),
            )
            .merge(
                Router::new()
                    .route("/phone/confirm-code", post(confirm_phone_code::<V, U>))
                    .with_state((code_store, user_store, policy)),
            )
            .merge(
                Router::new()
                    .route("/verify-token", post(verify_token::<S>))
                    .with_state(session_issuer),
            );

        Self { router }
    }

    /// Restrict cross-origin access to the given origins.
    pub fn with_allowed_origins(mut self, allowed_origins: AllowedOrigins) -> Self {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_credentials(true)
            .allow_origin(AllowOrigin::predicate(move |origin, _request_parts| {
                allowed_origins.contains(origin)
            }));
        self.router = self.router.layer(cors);
        self
    }

    /// Convert into a router that can be nested under another application.
    pub fn into_router(self) -> Router {
        self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        )
    }

    /// Serve on the given listener until shutdown.
    pub async fn run(self, listener: TcpListener) -> std::io::Result<()> {
        let router = self.into_router();
        tracing::info!("listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await
    }
}
