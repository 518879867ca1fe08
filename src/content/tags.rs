//! Tag registry and tag auto-detection

use indexmap::IndexSet;
use serde::Serialize;

/// A known tag with its description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagConfig {
    pub name: &'static str,
    pub description: &'static str,
}

const REGISTRY: &[TagConfig] = &[
    TagConfig { name: "Docker", description: "Containerization and Docker-related content" },
    TagConfig { name: "Kubernetes", description: "Container orchestration with Kubernetes" },
    TagConfig { name: "Git", description: "Version control with Git" },
    TagConfig { name: "GitHub", description: "GitHub platform and features" },
    TagConfig { name: "CI/CD", description: "Continuous Integration and Deployment" },
    TagConfig { name: "Cloud", description: "Cloud computing and services" },
    TagConfig { name: "DevOps", description: "Development and Operations practices" },
    TagConfig { name: "Networking", description: "Network infrastructure and protocols" },
    TagConfig { name: "Load Balancer", description: "Load balancing and traffic distribution" },
    TagConfig { name: "Security", description: "Security tools and practices" },
    TagConfig { name: "Monitoring", description: "Application and infrastructure monitoring" },
    TagConfig { name: "AWS", description: "Amazon Web Services" },
    TagConfig { name: "GCP", description: "Google Cloud Platform" },
];

/// Keyword -> tags it implies, on top of plain registry matches
const ALIASES: &[(&str, &[&str])] = &[
    ("k8s", &["Kubernetes"]),
    ("cicd", &["CI/CD"]),
    ("ci-cd", &["CI/CD"]),
    ("routing", &["Networking", "Load Balancer"]),
    ("load-balancer", &["Networking", "Load Balancer"]),
];

/// All registered tags in registry order
pub fn registry() -> &'static [TagConfig] {
    REGISTRY
}

/// Look up a registered tag by exact name
pub fn tag_config(name: &str) -> Option<&'static TagConfig> {
    REGISTRY.iter().find(|t| t.name == name)
}

/// Registry entry as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl TagInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug::slugify(name),
            description: tag_config(name).map(|t| t.description.to_string()),
        }
    }
}

/// Decide the tags of a post.
///
/// Front-matter tags win when present. Otherwise registry names and alias
/// keywords are matched case-insensitively against the filename and the full
/// original text. Falls back to `default_tag` when nothing matches.
pub fn detect_tags(
    frontmatter_tags: &[String],
    filename: &str,
    raw: &str,
    default_tag: &str,
) -> Vec<String> {
    let mut tags: IndexSet<String> = IndexSet::new();

    if !frontmatter_tags.is_empty() {
        tags.extend(frontmatter_tags.iter().cloned());
    } else {
        let filename = filename.to_lowercase();
        let raw = raw.to_lowercase();
        let mentions = |needle: &str| filename.contains(needle) || raw.contains(needle);

        for tag in REGISTRY {
            if mentions(&tag.name.to_lowercase()) {
                tags.insert(tag.name.to_string());
            }
        }

        for (keyword, implied) in ALIASES {
            if mentions(keyword) {
                tags.extend(implied.iter().map(|t| t.to_string()));
            }
        }
    }

    if tags.is_empty() {
        tags.insert(default_tag.to_string());
    }

    tags.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(filename: &str, raw: &str) -> Vec<String> {
        detect_tags(&[], filename, raw, "Blog")
    }

    #[test]
    fn test_frontmatter_tags_verbatim() {
        let given = vec!["Rust".to_string(), "Docker".to_string(), "Rust".to_string()];
        let tags = detect_tags(&given, "docker.md", "kubernetes everywhere", "Blog");
        assert_eq!(tags, vec!["Rust", "Docker"]);
    }

    #[test]
    fn test_filename_only_match() {
        let tags = detect("getting-started-with-docker.md", "Containers are neat.");
        assert!(tags.contains(&"Docker".to_string()));
    }

    #[test]
    fn test_content_match_is_case_insensitive() {
        let tags = detect("notes.md", "Deploying to aws with KUBERNETES");
        assert_eq!(tags, vec!["Kubernetes", "AWS"]);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(detect("k8s-basics.md", "pods"), vec!["Kubernetes"]);
        assert_eq!(detect("pipeline.md", "our cicd setup"), vec!["CI/CD"]);
        assert_eq!(
            detect("edge.md", "routing tables"),
            vec!["Networking", "Load Balancer"]
        );
    }

    #[test]
    fn test_alias_does_not_duplicate() {
        let tags = detect("k8s.md", "kubernetes and k8s");
        assert_eq!(tags, vec!["Kubernetes"]);
    }

    #[test]
    fn test_default_tag() {
        assert_eq!(detect("thoughts.md", "Nothing relevant here."), vec!["Blog"]);
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(registry().len(), 13);
        assert_eq!(tag_config("GCP").map(|t| t.description), Some("Google Cloud Platform"));
        assert!(tag_config("gcp").is_none());

        let info = TagInfo::new("Load Balancer");
        assert_eq!(info.slug, "load-balancer");
        assert!(info.description.is_some());
    }
}
