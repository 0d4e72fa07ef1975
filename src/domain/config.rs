use std::{fmt, path::Path, str::FromStr, sync::OnceLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::Depth;

fn machine_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-z0-9_]+$").expect("valid pattern"))
}

/// A validated machine name (`[a-z0-9_]+`).
///
/// Used for the reference field and entity type names supplied by the
/// configuration surface, which end up embedded in physical table and
/// column identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MachineName(NonEmptyString);

impl MachineName {
    /// Creates a machine name from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMachineNameError`] if the string is empty or
    /// contains characters outside `[a-z0-9_]`.
    pub fn new(s: String) -> Result<Self, InvalidMachineNameError> {
        if !machine_name_pattern().is_match(&s) {
            return Err(InvalidMachineNameError(s));
        }
        let non_empty = NonEmptyString::new(s.clone()).map_err(|_| InvalidMachineNameError(s))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for MachineName {
    type Error = InvalidMachineNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for MachineName {
    type Error = InvalidMachineNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for MachineName {
    type Err = InvalidMachineNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for MachineName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MachineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid machine name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid machine name '{0}': must be non-empty and contain only [a-z0-9_]")]
pub struct InvalidMachineNameError(String);

/// Validated handler configuration.
///
/// Carries the values the configuration surface supplies — the reference
/// field's machine name, the signed depth, and whether multiple request
/// values are accepted — and derives the physical reference table and
/// column names from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOptions", into = "RawOptions")]
pub struct HandlerOptions {
    /// Machine name of the field referencing the taxonomy,
    /// e.g. `field_media_category`.
    reference_field: MachineName,

    /// Machine name of the entity type owning the reference field.
    entity_type: MachineName,

    /// Signed traversal bound applied at evaluation time.
    depth: Depth,

    /// Whether the request may supply several `+`-delimited values.
    allow_multiple_values: bool,
}

impl HandlerOptions {
    /// Creates options for the given reference field with the default
    /// entity type (`media`), zero depth and single-value input.
    #[must_use]
    pub fn new(reference_field: MachineName) -> Self {
        Self {
            reference_field,
            entity_type: default_entity_type(),
            depth: Depth::ZERO,
            allow_multiple_values: false,
        }
    }

    /// Sets the entity type prefix used to derive the reference table name.
    #[must_use]
    pub fn with_entity_type(mut self, entity_type: MachineName) -> Self {
        self.entity_type = entity_type;
        self
    }

    /// Sets the traversal depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    /// Allows multiple `+`-delimited request values.
    #[must_use]
    pub const fn with_multiple_values(mut self, allow: bool) -> Self {
        self.allow_multiple_values = allow;
        self
    }

    /// Loads options from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is invalid,
    /// or any machine name fails validation. Misconfiguration is reported,
    /// never silently ignored.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(OptionsError::Read)?;
        toml::from_str(&content).map_err(|e| OptionsError::Parse(Box::new(e)))
    }

    /// The reference field's machine name.
    #[must_use]
    pub const fn reference_field(&self) -> &MachineName {
        &self.reference_field
    }

    /// The entity type prefix.
    #[must_use]
    pub const fn entity_type(&self) -> &MachineName {
        &self.entity_type
    }

    /// The configured traversal depth.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Whether multiple request values are accepted.
    #[must_use]
    pub const fn allow_multiple_values(&self) -> bool {
        self.allow_multiple_values
    }

    /// Physical name of the entity→term reference table,
    /// e.g. `media__field_media_category`.
    #[must_use]
    pub fn reference_table(&self) -> String {
        format!("{}__{}", self.entity_type, self.reference_field)
    }

    /// Physical name of the term column in the reference table,
    /// e.g. `field_media_category_target_id`.
    #[must_use]
    pub fn reference_column(&self) -> String {
        format!("{}_target_id", self.reference_field)
    }
}

fn default_entity_type() -> MachineName {
    MachineName::new("media".to_string()).expect("valid machine name")
}

/// Errors that can occur when loading handler options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The options file could not be read.
    #[error("failed to read options file: {0}")]
    Read(#[source] std::io::Error),
    /// The options file is not valid TOML or fails validation.
    #[error("failed to parse options file: {0}")]
    Parse(#[source] Box<toml::de::Error>),
}

/// The serialized form of [`HandlerOptions`].
///
/// Raw strings with defaults; validation happens in the `TryFrom`
/// conversion so a deserialized value is always well-formed.
#[derive(Debug, Serialize, Deserialize)]
struct RawOptions {
    reference_field: String,

    #[serde(default = "raw_default_entity_type")]
    entity_type: String,

    #[serde(default)]
    depth: i32,

    #[serde(default)]
    allow_multiple_values: bool,
}

fn raw_default_entity_type() -> String {
    "media".to_string()
}

impl TryFrom<RawOptions> for HandlerOptions {
    type Error = InvalidMachineNameError;

    fn try_from(raw: RawOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            reference_field: MachineName::new(raw.reference_field)?,
            entity_type: MachineName::new(raw.entity_type)?,
            depth: Depth::new(raw.depth),
            allow_multiple_values: raw.allow_multiple_values,
        })
    }
}

impl From<HandlerOptions> for RawOptions {
    fn from(options: HandlerOptions) -> Self {
        Self {
            reference_field: options.reference_field.as_str().to_string(),
            entity_type: options.entity_type.as_str().to_string(),
            depth: options.depth.get(),
            allow_multiple_values: options.allow_multiple_values,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test_case("field_media_category"; "typical field name")]
    #[test_case("a"; "single character")]
    #[test_case("field_1"; "digits allowed")]
    fn accepts_valid_machine_names(name: &str) {
        assert_eq!(MachineName::new(name.to_string()).unwrap().as_str(), name);
    }

    #[test_case(""; "empty")]
    #[test_case("Field"; "uppercase")]
    #[test_case("field name"; "whitespace")]
    #[test_case("field-name"; "hyphen")]
    #[test_case("field;drop"; "punctuation")]
    fn rejects_invalid_machine_names(name: &str) {
        assert!(MachineName::new(name.to_string()).is_err());
    }

    #[test]
    fn derives_reference_table_and_column() {
        let options =
            HandlerOptions::new(MachineName::new("field_media_category".to_string()).unwrap());

        assert_eq!(options.reference_table(), "media__field_media_category");
        assert_eq!(
            options.reference_column(),
            "field_media_category_target_id"
        );
    }

    #[test]
    fn entity_type_prefix_is_configurable() {
        let options = HandlerOptions::new(MachineName::new("field_tags".to_string()).unwrap())
            .with_entity_type(MachineName::new("node".to_string()).unwrap());

        assert_eq!(options.reference_table(), "node__field_tags");
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"reference_field = \"field_media_category\"\ndepth = -2\nallow_multiple_values = true\n",
        )
        .unwrap();

        let options = HandlerOptions::load(file.path()).unwrap();

        assert_eq!(options.reference_field().as_str(), "field_media_category");
        assert_eq!(options.entity_type().as_str(), "media");
        assert_eq!(options.depth(), Depth::new(-2));
        assert!(options.allow_multiple_values());
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert!(matches!(
            HandlerOptions::load(&missing),
            Err(OptionsError::Read(_))
        ));
    }

    #[test]
    fn load_rejects_invalid_field_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"reference_field = \"DROP TABLE\"\n").unwrap();

        assert!(matches!(
            HandlerOptions::load(file.path()),
            Err(OptionsError::Parse(_))
        ));
    }

    #[test]
    fn load_rejects_missing_field_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"depth = 1\n").unwrap();

        assert!(matches!(
            HandlerOptions::load(file.path()),
            Err(OptionsError::Parse(_))
        ));
    }

    #[test]
    fn options_round_trip_through_toml() {
        let options = HandlerOptions::new(MachineName::new("field_tags".to_string()).unwrap())
            .with_depth(Depth::new(3))
            .with_multiple_values(true);

        let serialized = toml::to_string(&options).unwrap();
        let restored: HandlerOptions = toml::from_str(&serialized).unwrap();

        assert_eq!(restored, options);
    }
}
