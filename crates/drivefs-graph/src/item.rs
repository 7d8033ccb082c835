//! Graph `driveItem` payloads

use chrono::{DateTime, Utc};
use drivefs_core::domain::{DirectoryAttributes, FileAttributes, StorageAttributes};
use serde::Deserialize;

/// The subset of a Graph `driveItem` the adapter reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub size: Option<u64>,
    /// Kept as text; an unparseable timestamp yields no date rather than a failed item
    pub last_modified_date_time: Option<String>,
    pub file: Option<FileFacet>,
    /// Present (any object) for folders
    pub folder: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    pub mime_type: Option<String>,
}

/// One page of a `children` collection
#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenPage {
    #[serde(default)]
    pub value: Vec<RemoteItem>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl RemoteItem {
    pub fn is_directory(&self) -> bool {
        self.folder.is_some()
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified_date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.file.as_ref().and_then(|f| f.mime_type.as_deref())
    }

    /// Converts into canonical attributes stored under `path`
    pub fn into_attributes(self, path: String) -> StorageAttributes {
        let last_modified = self.last_modified();
        if self.is_directory() {
            StorageAttributes::Directory(DirectoryAttributes {
                path,
                name: self.name,
                last_modified,
            })
        } else {
            let mime_type = self.mime_type().map(str::to_string);
            StorageAttributes::File(FileAttributes {
                path,
                name: self.name,
                file_size: self.size,
                last_modified,
                mime_type,
            })
        }
    }
}
