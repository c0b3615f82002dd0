//! Client-side routes.

use url::{form_urlencoded, Url};

/// Query carried by the detail route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailQuery {
    pub id: Option<String>,
    /// Resume a previously watched episode on open.
    pub resume: bool,
    pub episode_id: Option<String>,
}

impl DetailQuery {
    pub fn film(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Home,
    Login,
    Register,
    Profile,
    Detail(DetailQuery),
    /// Anything else; rendered by the catch-all page.
    NotFound(String),
}

impl Route {
    /// Parse an app-relative path such as `/detail?id=42&resume=true`.
    pub fn parse(path: &str) -> Route {
        let Ok(url) = Url::parse("app://local/").and_then(|base| base.join(path.trim())) else {
            return Route::NotFound(path.to_string());
        };
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Route::Root,
            ["home"] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["profile"] | ["home", "profile"] => Route::Profile,
            ["detail"] => Route::Detail(detail_query(&url, None)),
            ["detail", id] => Route::Detail(detail_query(&url, Some(id))),
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Render back to an app-relative path.
    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".into(),
            Route::Home => "/home".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Profile => "/profile".into(),
            Route::Detail(q) => {
                let mut pairs = form_urlencoded::Serializer::new(String::new());
                if let Some(id) = &q.id {
                    pairs.append_pair("id", id);
                }
                if q.resume {
                    pairs.append_pair("resume", "true");
                }
                if let Some(ep) = &q.episode_id {
                    pairs.append_pair("episodeId", ep);
                }
                let query = pairs.finish();
                if query.is_empty() {
                    "/detail".into()
                } else {
                    format!("/detail?{query}")
                }
            }
            Route::NotFound(path) => path.clone(),
        }
    }
}

fn detail_query(url: &Url, path_id: Option<&str>) -> DetailQuery {
    let mut query = DetailQuery {
        id: path_id.map(str::to_string),
        ..DetailQuery::default()
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "id" if query.id.is_none() && !value.is_empty() => query.id = Some(value.into_owned()),
            "resume" => query.resume = value == "true",
            "episodeId" if !value.is_empty() => query.episode_id = Some(value.into_owned()),
            _ => {}
        }
    }
    query
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
