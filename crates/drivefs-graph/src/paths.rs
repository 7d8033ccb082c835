//! Logical path to Graph drive URL resolution
//!
//! Every logical path is first joined with the optional base path and
//! trimmed of surrounding slashes, producing a [`RemotePath`]. The empty
//! remote path addresses the drive root; anything else is addressed with
//! the `root:/{path}` syntax. Segments are percent-encoded individually so
//! that names containing spaces, `#` or `?` survive the trip.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Drops empty segments, so `/a//b/` becomes `a/b`
pub fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// A path relative to the drive root, base path already applied
///
/// Never starts or ends with `/` and never contains `//`. The empty string
/// is the drive root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(path: &str) -> Self {
        Self(normalize(path))
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits into the parent path and the last segment
    ///
    /// The root splits into itself and an empty name.
    pub fn split(&self) -> (RemotePath, &str) {
        match self.0.rsplit_once('/') {
            Some((parent, name)) => (RemotePath(parent.to_string()), name),
            None => (RemotePath::root(), self.0.as_str()),
        }
    }

    fn encoded(&self) -> String {
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds Graph URLs for a single user's drive
#[derive(Debug, Clone)]
pub struct PathResolver {
    drive_url: String,
    prefix: String,
}

impl PathResolver {
    /// # Arguments
    /// * `api_base_url` - Graph base, e.g. `https://graph.microsoft.com/v1.0`
    /// * `user_id` - Drive owner (id or UPN)
    /// * `base_path` - Optional root all logical paths are placed under
    pub fn new(api_base_url: &str, user_id: &str, base_path: Option<&str>) -> Self {
        let drive_url = format!(
            "{}/users/{}/drive",
            api_base_url.trim_end_matches('/'),
            utf8_percent_encode(user_id, SEGMENT)
        );

        let prefix = match base_path.map(|p| p.trim_matches('/')) {
            Some(p) if !p.is_empty() => format!("{p}/"),
            _ => String::new(),
        };

        Self { drive_url, prefix }
    }

    /// `{api_base_url}/users/{user}/drive`
    pub fn drive_url(&self) -> &str {
        &self.drive_url
    }

    /// Applies the base path to a logical path
    pub fn remote_path(&self, path: &str) -> RemotePath {
        RemotePath::new(&format!("{}{}", self.prefix, path))
    }

    /// URL of the item at `path`
    pub fn item_url(&self, path: &str) -> String {
        self.url_for(&self.remote_path(path), None)
    }

    /// URL of an action (`content`, `children`, `copy`, ...) on the item at `path`
    pub fn action_url(&self, path: &str, action: &str) -> String {
        self.url_for(&self.remote_path(path), Some(action))
    }

    pub fn content_url(&self, path: &str) -> String {
        self.action_url(path, "content")
    }

    pub fn children_url(&self, path: &str) -> String {
        self.action_url(path, "children")
    }

    /// URL for an already resolved remote path
    pub fn url_for(&self, remote: &RemotePath, action: Option<&str>) -> String {
        match (remote.is_root(), action) {
            (true, None) => format!("{}/root", self.drive_url),
            (true, Some(action)) => format!("{}/root/{}", self.drive_url, action),
            (false, None) => format!("{}/root:/{}", self.drive_url, remote.encoded()),
            (false, Some(action)) => {
                format!("{}/root:/{}:/{}", self.drive_url, remote.encoded(), action)
            }
        }
    }

    /// URL of an item addressed by its remote id
    pub fn item_by_id_url(&self, id: &str) -> String {
        format!(
            "{}/items/{}",
            self.drive_url,
            utf8_percent_encode(id, SEGMENT)
        )
    }

    /// `parentReference.path` value for a destination folder
    pub fn parent_reference(&self, parent: &RemotePath) -> String {
        if parent.is_root() {
            "/drive/root".to_string()
        } else {
            format!("/drive/root:/{}", parent.as_str())
        }
    }
}
