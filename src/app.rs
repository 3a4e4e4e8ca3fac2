use std::net::SocketAddr;

use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::graphql::{build_schema, AppSchema, AuthHeader};
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let schema = build_schema(state);
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(schema)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Single GraphQL endpoint. The `Authorization` header is captured here and
/// handed to the resolvers through the request data; the gate itself runs in
/// resolver code so unauthenticated operations stay reachable.
async fn graphql_handler(
    State(schema): State<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    schema
        .execute(req.into_inner().data(AuthHeader(authorization)))
        .await
        .into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
