use super::handlers::{
    auth::{login, register, session},
    health,
};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI document.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` document.
/// Routes added outside (like `/` or `OPTIONS /health`) are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(register::register))
        .routes(routes!(login::login))
        .routes(routes!(session::me))
        .routes(routes!(session::logout));

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Liveness and credential store connectivity".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Registration, login and cookie sessions".to_string());

    router.get_openapi_mut().tags = Some(vec![health_tag, auth_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let primary = env!("CARGO_PKG_AUTHORS").split(';').next().map(str::trim)?;
    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match author.split_once('<') {
        Some((name, email)) => (
            optional_str(name),
            optional_str(email.trim_end_matches('>')),
        ),
        None => (optional_str(author), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));

        let contact = doc.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Userregis"));
            assert_eq!(contact.email.as_deref(), Some("team@userregis.dev"));
        }

        let license = doc.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_tags_and_paths() {
        let doc = openapi();
        let tags = doc.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "health"));
        for path in [
            "/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/auth/logout",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn parse_author_handles_name_and_email() {
        assert_eq!(
            parse_author("Team Userregis <team@userregis.dev>"),
            (Some("Team Userregis"), Some("team@userregis.dev"))
        );
        assert_eq!(parse_author("Solo"), (Some("Solo"), None));
        assert_eq!(parse_author(""), (None, None));
    }
}
