//! OpenAPI document generation with a Scalar UI.
//!
//! The document is assembled by [`aide`] from the documented routes of an
//! [`ApiRouter`] and served as JSON next to the Scalar API reference.
//!
//! [`aide`]: https://docs.rs/aide
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, OpenApi, SecurityScheme};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Name of the bearer security scheme referenced by protected operations.
pub(crate) const BEARER_SCHEME: &str = "BearerAuth";

/// OpenAPI configuration for aide integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path which exposes the OpenAPI JSON specification.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to add OpenAPI documentation with Scalar UI.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    /// Finishes the router, serving the OpenAPI document and Scalar UI at the
    /// configured paths.
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;

    /// Finishes the router without exposing documentation routes.
    fn without_open_api(self) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info: api_info(),
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        let router = router.finish_api_with(&mut api, |api| {
            api.security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http {
                    scheme: "bearer".to_owned(),
                    bearer_format: Some("JWT".to_owned()),
                    description: Some("Bearer credential of the caller".to_owned()),
                    extensions: Default::default(),
                },
            )
        });

        router.layer(Extension(api))
    }

    fn without_open_api(self) -> Router<S> {
        self.into()
    }
}

fn api_info() -> Info {
    Info {
        title: "Threadline API".to_owned(),
        summary: Some("Threaded comments for posts".to_owned()),
        description: Some(
            "Create, list, edit, delete and like nested comments attached to posts \
             owned by an external post service."
                .to_owned(),
        ),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        ..Info::default()
    }
}
