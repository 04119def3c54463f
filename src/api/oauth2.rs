use super::resources::{Endpoint, Resource, Verb};

static AUTH: Resource = Resource::root("auth");
static OAUTH2: Resource = Resource::nested(&AUTH, "oauth2");
static TOKEN: Resource = Resource::nested(&OAUTH2, "token");
static USER_INFO: Resource = Resource::nested(&OAUTH2, "userinfo");

/// Form-encoded grant exchange; never carries a bearer token.
pub static TOKEN_GRANT: Endpoint = Endpoint::new(Verb::Post, &TOKEN).public();
pub static FETCH_USER_INFO: Endpoint = Endpoint::new(Verb::Get, &USER_INFO);
