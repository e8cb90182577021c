//! Inbound path classification and short URL composition.
//!
//! Custom "subdomains" are not served through virtual hosts. A vanity link
//! `abc.s8l.xyz/x` is reached as the path `/abc.s8l.xyz/x` on the main host, so
//! the resolver has to tell custom-domain paths apart from plain short codes by
//! looking for the `.<service domain>` marker. All knowledge of that encoding
//! lives here so it can later be replaced with host-based dispatch.

/// Classification of an inbound redirect path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKey<'a> {
    /// A plain short code.
    ShortCode(&'a str),
    /// `<prefix>.<service domain>/<path>`.
    CustomPath { prefix: &'a str, path: &'a str },
    /// Contains the domain marker but does not split into a prefix and a path.
    Malformed,
}

/// Encodes and decodes short links for one service deployment.
#[derive(Debug, Clone)]
pub struct RouteCodec {
    base_url: String,
    marker: String,
}

impl RouteCodec {
    /// Creates a codec.
    ///
    /// # Arguments
    ///
    /// - `base_url` - public URL short links are composed against (e.g. `https://s8l.xyz`)
    /// - `service_domain` - the platform domain embedded in custom paths (e.g. `s8l.xyz`)
    pub fn new(base_url: &str, service_domain: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            marker: format!(".{}", service_domain.trim_matches('.').to_ascii_lowercase()),
        }
    }

    /// The substring identifying a custom-domain path, e.g. `.s8l.xyz`.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Classifies a redirect path (without its leading `/`).
    ///
    /// The custom-domain check runs first: a plain short code can never contain
    /// the marker because generated codes exclude it and the marker contains a dot.
    /// The domain segment matches case-insensitively, like a hostname; the
    /// returned slices keep the caller's casing.
    pub fn parse<'a>(&self, path: &'a str) -> RouteKey<'a> {
        // ASCII folding keeps byte offsets, so indices into `folded` are valid in `path`.
        let folded = path.to_ascii_lowercase();
        if !folded.contains(&self.marker) {
            return RouteKey::ShortCode(path);
        }

        let separator = format!("{}/", self.marker);
        let mut hits = folded.match_indices(separator.as_str()).map(|(at, _)| at);

        match (hits.next(), hits.next()) {
            (Some(at), None) => {
                let prefix = &path[..at];
                let rest = &path[at + separator.len()..];
                if prefix.is_empty() || rest.is_empty() {
                    RouteKey::Malformed
                } else {
                    RouteKey::CustomPath { prefix, path: rest }
                }
            }
            _ => RouteKey::Malformed,
        }
    }

    /// `{base}/{code}`
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// `{base}/{prefix}.{service domain}/{path}`
    pub fn custom_url(&self, prefix: &str, path: &str) -> String {
        format!("{}/{}{}/{}", self.base_url, prefix, self.marker, path)
    }
}
