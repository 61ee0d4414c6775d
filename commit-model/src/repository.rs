//! Repository identity and type classification.

use serde::{Deserialize, Serialize};

/// Coarse classification of a repository's primary technology, used to
/// drive per-language complexity ceilings in the hotspot analyzer and to
/// populate `AuthorAggregate::languages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoType {
    Java,
    Python,
    WebFrontend,
    Mobile,
    Infra,
    Unknown,
}

impl RepoType {
    /// Maps a hosted-API `language` field (HostedApiA/GitHub-like) onto a
    /// `RepoType`. Unknown languages fall back to `Unknown`.
    pub fn from_language(language: &str) -> Self {
        match language.to_ascii_lowercase().as_str() {
            "java" | "kotlin" => RepoType::Java,
            "python" => RepoType::Python,
            "javascript" | "typescript" | "vue" | "html" | "css" => RepoType::WebFrontend,
            "swift" | "dart" | "objective-c" => RepoType::Mobile,
            "hcl" | "dockerfile" | "shell" => RepoType::Infra,
            _ => RepoType::Unknown,
        }
    }

    /// Infers a `RepoType` from a repository path/name when no language
    /// field is available (HostedApiB/GitLab-like, EnterpriseApi, LocalClone).
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let has_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has_any(&["infra", "terraform", "devops", "k8s", "ansible"]) {
            RepoType::Infra
        } else if has_any(&["android", "ios", "mobile", "flutter", "dart"]) {
            RepoType::Mobile
        } else if has_any(&["frontend", "web", "ui", "react", "vue", "angular"]) {
            RepoType::WebFrontend
        } else if has_any(&["java", "spring", "kotlin"]) {
            RepoType::Java
        } else if has_any(&["python", "py-", "-py"]) {
            RepoType::Python
        } else {
            RepoType::Unknown
        }
    }

    /// Infers a `RepoType` from a file extension, used by `LocalClone` when
    /// classifying from the working copy contents rather than the name.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "java" | "kt" => RepoType::Java,
            "py" => RepoType::Python,
            "js" | "ts" | "jsx" | "tsx" | "vue" | "html" | "css" => RepoType::WebFrontend,
            "swift" | "dart" | "m" => RepoType::Mobile,
            "tf" | "hcl" => RepoType::Infra,
            _ => RepoType::Unknown,
        }
    }
}

/// A repository enumerated by a provider. Static for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Opaque identifier, unique per provider (numeric id, "owner/repo", ...).
    pub id: String,
    pub display_name: String,
    pub clone_url: String,
    pub default_branch: String,
    pub repo_type: RepoType,
    pub archived: bool,
}

impl Repository {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        clone_url: impl Into<String>,
        default_branch: impl Into<String>,
        repo_type: RepoType,
        archived: bool,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            clone_url: clone_url.into(),
            default_branch: default_branch.into(),
            repo_type,
            archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_field_maps_known_languages() {
        assert_eq!(RepoType::from_language("Python"), RepoType::Python);
        assert_eq!(RepoType::from_language("TypeScript"), RepoType::WebFrontend);
        assert_eq!(RepoType::from_language("cobol"), RepoType::Unknown);
    }

    #[test]
    fn name_inference_checks_path_fragments() {
        assert_eq!(RepoType::from_name("payments-android-app"), RepoType::Mobile);
        assert_eq!(RepoType::from_name("terraform-infra-modules"), RepoType::Infra);
        assert_eq!(RepoType::from_name("widget-store"), RepoType::Unknown);
    }
}
