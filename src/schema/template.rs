use log::debug;

pub const MAP_PARENT_TOKEN: &str = "{parent}";
pub const MAP_CHILD_TOKEN: &str = "{child}";
pub const DEFAULT_MAP_FIELD_NAME_FORMAT: &str = "{parent}_{child}";

/// Naming rule for fields synthesized from map entries. Resolved once per
/// parent field into a [MapEntryNamer], not re-parsed per row.
#[derive(Debug, Clone)]
pub struct MapNameTemplate(String);

impl MapNameTemplate {
    /// A format missing either token silently falls back to the default.
    pub fn new(format: Option<&str>) -> MapNameTemplate {
        match format {
            Some(f) if f.contains(MAP_PARENT_TOKEN) && f.contains(MAP_CHILD_TOKEN) => {
                MapNameTemplate(f.to_string())
            }
            Some(f) => {
                debug!(
                    "map field name format {:?} is missing a placeholder, using {:?}",
                    f, DEFAULT_MAP_FIELD_NAME_FORMAT
                );
                MapNameTemplate(DEFAULT_MAP_FIELD_NAME_FORMAT.to_string())
            }
            None => MapNameTemplate(DEFAULT_MAP_FIELD_NAME_FORMAT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn resolve(&self, parent: &str) -> MapEntryNamer {
        let with_parent = self.0.replace(MAP_PARENT_TOKEN, parent);
        // the child token is present by construction
        let (prefix, suffix) = with_parent
            .split_once(MAP_CHILD_TOKEN)
            .unwrap_or((with_parent.as_str(), ""));
        MapEntryNamer {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

/// Precompiled per-parent-field name formatter, one allocation per entry.
#[derive(Debug, Clone)]
pub struct MapEntryNamer {
    prefix: String,
    suffix: String,
}

impl MapEntryNamer {
    pub fn entry_name(&self, key: &str) -> String {
        format!("{}{}{}", self.prefix, key, self.suffix)
    }
}
