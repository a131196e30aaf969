use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::path::Path;

/// Opening phrase of the copyright block written by the header tooling.
pub const DEFAULT_START_MARKER: &str = "// Crafted with";

/// Closing phrase of the copyright block. It is the last line of the
/// Apache 2.0 boilerplate that follows the Functional Source License notice.
pub const DEFAULT_END_MARKER: &str =
    "// specific language governing permissions and limitations under the License.";

/// File base names that are never touched unless the caller supplies its own list.
pub const DEFAULT_IGNORED: &[&str] = &[
    ".DS_Store",
    "README.md",
    "LICENSE",
    "CONTRIBUTING.md",
    "CHANGELOG.md",
    "CODE_OF_CONDUCT.md",
];

/// The two literal phrases that delimit a copyright block, as stored in the
/// configuration file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MarkerSettings {
    /// Phrase that opens the block. It must start a line.
    pub start: String,
    /// Phrase that closes the block. It must start a line as well.
    pub end: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// The result of running a [`BlockMatcher`] over some text.
///
/// `content` borrows the input when nothing was removed, so a no-op strip
/// never allocates.
#[derive(Debug)]
pub struct StripResult<'a> {
    pub content: Cow<'a, str>,
    /// Byte range of the input that was removed, if any.
    pub removed: Option<Range<usize>>,
}

impl StripResult<'_> {
    pub fn is_stripped(&self) -> bool {
        self.removed.is_some()
    }

    pub fn removed_bytes(&self) -> usize {
        self.removed.as_ref().map_or(0, |r| r.len())
    }
}

/// The `BlockMatcher` trait locates a delimited block inside file content.
///
/// The engine only depends on this trait, which keeps the traversal logic
/// independent of how the block is actually recognised.
pub trait BlockMatcher {
    /// Returns the byte range of the first block in `content`, or `None`
    /// when the content carries no block.
    fn find_block(&self, content: &str) -> Option<Range<usize>>;

    /// Removes the first block found by [`BlockMatcher::find_block`] and
    /// leaves every other byte untouched. A second copy of the block, if
    /// present, survives.
    fn strip_first<'a>(&self, content: &'a str) -> StripResult<'a> {
        match self.find_block(content) {
            Some(range) => {
                let mut stripped = String::with_capacity(content.len() - range.len());
                stripped.push_str(&content[..range.start]);
                stripped.push_str(&content[range.end..]);
                StripResult {
                    content: Cow::Owned(stripped),
                    removed: Some(range),
                }
            }
            None => StripResult {
                content: Cow::Borrowed(content),
                removed: None,
            },
        }
    }
}

/// A copyright block bounded by two literal phrases.
///
/// Both phrases are escaped before being compiled, so characters such as the
/// trailing `.` of the closing phrase only ever match themselves. The compiled
/// pattern is multi-line and dot-all:
///
/// * the opening phrase is anchored at the beginning of a line,
/// * the body is matched lazily so the *nearest* closing phrase wins,
/// * the closing phrase must itself begin a line,
/// * the line terminator after the closing phrase is consumed with the block.
#[derive(Debug, Clone)]
pub struct MarkerBlock {
    start: String,
    end: String,
    regex: Regex,
}

impl MarkerBlock {
    /// Compiles a marker block from its opening and closing phrases.
    ///
    /// # Errors
    /// Fails if either phrase is empty (after trimming) or spans more than one
    /// line. Such phrases would either match everywhere or never match at all.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let start = start.into();
        let end = end.into();

        for (label, phrase) in [("start", &start), ("end", &end)] {
            if phrase.trim().is_empty() {
                anyhow::bail!("The {label} marker cannot be empty");
            }
            if phrase.contains(['\n', '\r']) {
                anyhow::bail!("The {label} marker must fit on a single line");
            }
        }

        let pattern = format!(
            r"(?ms)^{}.*?\r?\n{}(?:\r?\n)?",
            regex::escape(&start),
            regex::escape(&end)
        );
        let regex = Regex::new(&pattern).context("Failed to compile marker pattern")?;

        Ok(Self { start, end, regex })
    }

    /// Builds the block described by a configuration entry.
    pub fn from_settings(settings: &MarkerSettings) -> Result<Self> {
        Self::new(settings.start.as_str(), settings.end.as_str())
    }

    /// The opening phrase, unescaped.
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

impl BlockMatcher for MarkerBlock {
    fn find_block(&self, content: &str) -> Option<Range<usize>> {
        self.regex.find(content).map(|m| m.range())
    }
}

impl fmt::Display for MarkerBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ... '{}'", self.start, self.end)
    }
}

/// The set of file base names excluded from processing.
///
/// An `IgnoreSet` is built fresh for each run and is never mutated afterwards.
/// Supplying no names at all selects [`DEFAULT_IGNORED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// Builds a set from caller-supplied base names.
    ///
    /// # Arguments
    /// * `names`: File base names such as `"README.md"`. Duplicates collapse.
    ///
    /// # Returns
    /// The given names, or [`DEFAULT_IGNORED`] when `names` is empty.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Self::defaults();
        }
        Self { names }
    }

    /// The built-in set, [`DEFAULT_IGNORED`].
    pub fn defaults() -> Self {
        Self {
            names: DEFAULT_IGNORED.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Checks an exact base name. Matching is case-sensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Checks the base name of `path` against the set. Paths without a
    /// UTF-8 base name cannot match a configured name and are never ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.contains(name))
    }

    /// The ignored names in sorted order, for display.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct names in the set.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "// Crafted with ❤ at Breu, Inc. <info@breu.io>, Copyright © 2024.\n\
//\n\
// Functional Source License, Version 1.1, Apache 2.0 Future License\n\
//\n\
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on\n\
// an \"AS IS\" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the\n\
// specific language governing permissions and limitations under the License.\n";

    fn block() -> MarkerBlock {
        MarkerBlock::from_settings(&MarkerSettings::default()).unwrap()
    }

    #[test]
    fn test_removes_leading_block() {
        let content = format!("{HEADER}package main\n");
        let result = block().strip_first(&content);
        assert!(result.is_stripped());
        assert_eq!(result.content, "package main\n");
        assert_eq!(result.removed_bytes(), HEADER.len());
    }

    #[test]
    fn test_targeted_removal_leaves_rest_exactly() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        let result = m.strip_first("BEGIN\nsome header text\n...\nEND\nREST");
        assert_eq!(result.content, "REST");
    }

    #[test]
    fn test_no_match_borrows_input() {
        let content = "package main\n\nfunc main() {}\n";
        let result = block().strip_first(content);
        assert!(!result.is_stripped());
        assert!(matches!(result.content, Cow::Borrowed(_)));
        assert_eq!(result.content, content);
    }

    #[test]
    fn test_only_first_block_is_removed() {
        let content = format!("{HEADER}a\n{HEADER}b\n");
        let result = block().strip_first(&content);
        assert_eq!(result.content, format!("a\n{HEADER}b\n"));
    }

    #[test]
    fn test_nearest_end_marker_wins() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        let result = m.strip_first("BEGIN\nx\nEND\nkeep\nEND\n");
        assert_eq!(result.content, "keep\nEND\n");
    }

    #[test]
    fn test_start_marker_must_begin_a_line() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        let content = "x = 1 // BEGIN\nEND\n";
        assert!(m.find_block(content).is_none());
    }

    #[test]
    fn test_block_after_other_lines_is_removed() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        let result = m.strip_first("#!/bin/sh\nBEGIN\nEND\necho hi\n");
        assert_eq!(result.content, "#!/bin/sh\necho hi\n");
    }

    #[test]
    fn test_crlf_content() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        let result = m.strip_first("BEGIN\r\nbody\r\nEND\r\nREST\r\n");
        assert_eq!(result.content, "REST\r\n");
    }

    #[test]
    fn test_end_marker_is_literal() {
        // The trailing '.' must not match an arbitrary character.
        let m = MarkerBlock::new("BEGIN", "the License.").unwrap();
        assert!(m.find_block("BEGIN\nthe Licenses\n").is_none());
        assert!(m.find_block("BEGIN\nthe License.\n").is_some());
    }

    #[test]
    fn test_unterminated_block_is_kept() {
        let m = MarkerBlock::new("BEGIN", "END").unwrap();
        assert!(m.find_block("BEGIN\nno closing line\n").is_none());
    }

    #[test]
    fn test_rejects_bad_markers() {
        assert!(MarkerBlock::new("", "END").is_err());
        assert!(MarkerBlock::new("BEGIN", "  ").is_err());
        assert!(MarkerBlock::new("BE\nGIN", "END").is_err());
    }

    #[test]
    fn test_ignore_set_defaults_when_empty() {
        let set = IgnoreSet::new(Vec::<String>::new());
        assert_eq!(set, IgnoreSet::defaults());
        assert!(set.contains("README.md"));
        assert!(set.is_ignored(Path::new("deep/dir/LICENSE")));
        assert!(!set.is_ignored(Path::new("deep/dir/main.go")));
    }

    #[test]
    fn test_ignore_set_override_replaces_defaults() {
        let set = IgnoreSet::new(["main.go"]);
        assert!(set.contains("main.go"));
        assert!(!set.contains("README.md"));
        assert_eq!(set.sorted_names(), vec!["main.go"]);
    }
}
