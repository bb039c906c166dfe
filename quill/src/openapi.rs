//! OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Obtain a token from `POST /token`, then send it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::issue_token,
        api::handlers::authors::list_authors,
        api::handlers::authors::create_author,
        api::handlers::authors::get_author,
        api::handlers::authors::delete_author,
        api::handlers::posts::list_posts,
        api::handlers::posts::get_post,
        api::handlers::posts::create_post_for_author,
        api::handlers::posts::delete_post,
        api::handlers::articles::get_article,
    ),
    components(schemas(
        api::models::auth::LoginForm,
        api::models::auth::TokenResponse,
        api::models::authors::AuthorCreate,
        api::models::authors::AuthorResponse,
        api::models::posts::PostCreate,
        api::models::posts::PostResponse,
    )),
    tags(
        (name = "authentication", description = "Bearer token issuance"),
        (name = "authors", description = "Author registration and profiles"),
        (name = "posts", description = "Blog posts"),
        (name = "articles", description = "HTML views of posts"),
    ),
    info(
        title = "quill",
        description = "A small blogging API with bearer-token authentication",
    )
)]
pub struct ApiDoc;
