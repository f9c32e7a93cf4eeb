//! UDF descriptors and the name rules derived from them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::paths::COMPILER_DIR;

/// Source language of a user-defined function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionLanguage {
    Java,
    Scala,
    Python,
}

impl FunctionLanguage {
    /// File extension for source files in this language.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Scala => "scala",
            Self::Python => "py",
        }
    }

    /// Directory name used under the compiler working directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Scala => "scala",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for FunctionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for FunctionLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "scala" => Ok(Self::Scala),
            "python" | "py" => Ok(Self::Python),
            other => Err(Error::InvalidUdf(format!("unknown function language '{}'", other))),
        }
    }
}

/// Opaque key that namespaces package output per job submission.
///
/// The id becomes a single directory name under the udf directory, so it
/// is restricted to `[A-Za-z0-9._-]`, must not be `.` or `..`, and must not
/// name the compiler directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Create a job id.
    ///
    /// # Errors
    /// Returns [`Error::InvalidJobId`] if `id` is not a plain directory name.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_job_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_job_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        "job id must not be empty"
    } else if id == "." || id == ".." {
        "job id must not be a relative directory"
    } else if id.eq_ignore_ascii_case(COMPILER_DIR) {
        "job id is reserved for the compiler directory"
    } else if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        "job id may only contain letters, digits, '.', '_' and '-'"
    } else {
        return Ok(());
    };

    Err(Error::InvalidJobId(format!("'{}': {}", id, reason)))
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i32> for JobId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl FromStr for JobId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for JobId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

/// A user-submitted function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Udf {
    /// Dotted identifier, e.g. `pkg.module.ClassName`.
    pub qualified_name: String,

    /// Full source code of the function.
    pub source: String,

    /// Source language.
    pub language: FunctionLanguage,

    /// Archive produced by the last single-function packaging call.
    pub package_path: Option<PathBuf>,
}

impl Udf {
    /// Create a descriptor with no package path recorded.
    pub fn new(
        qualified_name: impl Into<String>,
        source: impl Into<String>,
        language: FunctionLanguage,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            source: source.into(),
            language,
            package_path: None,
        }
    }

    /// Shorthand for a Python descriptor.
    pub fn python(qualified_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(qualified_name, source, FunctionLanguage::Python)
    }

    /// Check the fields every pipeline stage relies on.
    ///
    /// # Errors
    /// Returns [`Error::InvalidUdf`] if the qualified name is empty or blank.
    pub fn validate(&self) -> Result<()> {
        if self.qualified_name.trim().is_empty() {
            return Err(Error::InvalidUdf(
                "qualified name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// File stem used when staging this function's source.
    pub fn staged_stem(&self) -> String {
        staged_stem(&self.qualified_name)
    }

    /// Name of this function's entry inside a package archive.
    pub fn archive_entry_name(&self) -> String {
        format!(
            "{}.{}",
            module_name(&self.qualified_name),
            self.language.extension()
        )
    }
}

/// Filesystem-safe stem for a qualified name.
///
/// ASCII letters and digits are kept and `.` becomes `-`. Every other byte,
/// `-` and `_` included, is written as `_` followed by two hex digits. No
/// separator or parent-directory segment survives, and distinct names never
/// share a stem.
pub fn staged_stem(qualified_name: &str) -> String {
    let mut stem = String::with_capacity(qualified_name.len());
    for byte in qualified_name.bytes() {
        match byte {
            b'.' => stem.push('-'),
            b if b.is_ascii_alphanumeric() => stem.push(char::from(b)),
            b => stem.push_str(&format!("_{:02x}", b)),
        }
    }
    stem
}

/// Importable module name: the part of a qualified name before the first dot.
pub fn module_name(qualified_name: &str) -> &str {
    qualified_name
        .split_once('.')
        .map_or(qualified_name, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_stem_replaces_dots() {
        assert_eq!(staged_stem("a.b.Foo"), "a-b-Foo");
        assert_eq!(staged_stem("plain"), "plain");
    }

    #[test]
    fn test_staged_stem_blocks_separators() {
        let stem = staged_stem("../../etc/passwd");
        assert!(!stem.contains('/'));
        assert!(!stem.contains('.'));
        assert_eq!(stem, "--_2f--_2fetc_2fpasswd");

        let stem = staged_stem("a\\b:c d");
        assert_eq!(stem, "a_5cb_3ac_20d");
    }

    #[test]
    fn test_staged_stem_is_one_to_one() {
        let names = [
            "a.b", "a_b", "a-b", "a.b.c", "a_b.c", "a._b", "a_.b", "a_2eb", "é", "_c3_a9",
        ];
        let stems: std::collections::HashSet<String> =
            names.iter().map(|name| staged_stem(name)).collect();
        assert_eq!(stems.len(), names.len());
    }

    #[test]
    fn test_staged_stem_is_deterministic() {
        assert_eq!(staged_stem("pkg.mod.Cls"), staged_stem("pkg.mod.Cls"));
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("a.b.Foo"), "a");
        assert_eq!(module_name("Foo"), "Foo");
        assert_eq!(module_name("x."), "x");
    }

    #[test]
    fn test_archive_entry_name() {
        assert_eq!(Udf::python("a.b.Foo", "").archive_entry_name(), "a.py");
        assert_eq!(Udf::python("NoDot", "").archive_entry_name(), "NoDot.py");
        assert_eq!(
            Udf::new("com.acme.Upper", "", FunctionLanguage::Java).archive_entry_name(),
            "com.java"
        );
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(Udf::python("", "def f(): pass").validate().is_err());
        assert!(Udf::python("   ", "def f(): pass").validate().is_err());
        assert!(Udf::python("a.f", "").validate().is_ok());
    }

    #[test]
    fn test_language_parse_and_display() {
        assert_eq!("Python".parse::<FunctionLanguage>().unwrap(), FunctionLanguage::Python);
        assert_eq!("py".parse::<FunctionLanguage>().unwrap(), FunctionLanguage::Python);
        assert!("cobol".parse::<FunctionLanguage>().is_err());
        assert_eq!(FunctionLanguage::Scala.to_string(), "scala");
    }

    #[test]
    fn test_job_id_from() {
        assert_eq!(JobId::from(42).as_str(), "42");
        assert_eq!(JobId::new("etl-7").unwrap().to_string(), "etl-7");
        assert_eq!("run_3.1".parse::<JobId>().unwrap().as_str(), "run_3.1");
    }

    #[test]
    fn test_job_id_rejects_non_directory_names() {
        for id in ["", ".", "..", "../..", "a/b", "a\\b", "/abs", "compiler", "Compiler", "a b"] {
            let err = JobId::new(id).unwrap_err();
            assert!(matches!(err, Error::InvalidJobId(_)), "accepted '{}'", id);
        }
    }
}
