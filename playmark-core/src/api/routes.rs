macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

pub const ROOT: &str = "/api";

pub mod contents {
    pub const STREAM: &str = api_path!("/contents/{id}/stream");
    pub const PLAYBACK: &str = api_path!("/contents/{id}/playback");
    pub const FINAL_POSITION: &str = api_path!("/contents/{id}/final-position");
    pub const HISTORY: &str = api_path!("/contents/{id}/history");
}

pub mod users {
    pub const CONTINUE_WATCHING: &str = api_path!("/users/continue-watching");
    pub const VIEWING_HISTORY: &str = api_path!("/users/viewing-history");
}

pub mod health {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}

pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Fill the `{id}` segment of a content route.
    pub fn content_path(route: &str, content_id: impl std::fmt::Display) -> String {
        replace_param(route, "{id}", content_id.to_string())
    }

    /// Append query parameters to the provided route.
    pub fn with_query(route: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return route.to_string();
        }

        let mut path =
            String::with_capacity(route.len() + 1 + params.len() * 8);
        path.push_str(route);
        path.push('?');

        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                path.push('&');
            }
            path.push_str(key);
            path.push('=');
            path.push_str(value);
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_routes_fill_id() {
        assert_eq!(
            utils::content_path(contents::STREAM, 12),
            "/api/contents/12/stream"
        );
        assert_eq!(
            utils::content_path(contents::FINAL_POSITION, 3),
            "/api/contents/3/final-position"
        );
    }

    #[test]
    fn query_is_appended() {
        assert_eq!(
            utils::with_query(users::CONTINUE_WATCHING, &[("limit", "5")]),
            "/api/users/continue-watching?limit=5"
        );
        assert_eq!(utils::with_query(ROOT, &[]), "/api");
    }
}
