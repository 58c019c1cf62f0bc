use tracing::info;
use url::Url;

/// Query parameter carrying the hold token in a booking link.
pub const TOKEN_PARAM: &str = "t";

/// The booking page's address bar and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    current: Url,
    navigated_to: Option<Url>,
}

impl Location {
    pub fn new(current: Url) -> Self {
        Self {
            current,
            navigated_to: None,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw).map(Self::new)
    }

    pub fn current(&self) -> &Url {
        &self.current
    }

    pub fn hold_token(&self) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(k, _)| k == TOKEN_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// History *replace*: the token disappears from the address bar and the
    /// back button cannot bring it back. Other parameters are kept.
    pub fn strip_hold_token(&mut self) {
        let kept: Vec<(String, String)> = self
            .current
            .query_pairs()
            .filter(|(k, _)| k != TOKEN_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            self.current.set_query(None);
        } else {
            self.current.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    pub fn navigate(&mut self, target: Url) {
        info!("Navigating to {}", target.path());
        self.navigated_to = Some(target);
    }

    pub fn navigated_to(&self) -> Option<&Url> {
        self.navigated_to.as_ref()
    }
}
