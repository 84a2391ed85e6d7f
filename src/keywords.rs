/// Tag vocabulary. Output order follows this list, not the text.
pub const TECH_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "node",
    "django",
    "flask",
    "spring",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "redis",
    "machine learning",
    "ml",
    "ai",
    "data science",
    "analytics",
    "frontend",
    "backend",
    "fullstack",
    "full-stack",
    "devops",
    "cloud",
    "microservices",
    "api",
    "rest",
    "graphql",
];

/// Tag a posting with every vocabulary term found as a substring of its
/// title or description.
pub fn extract_keywords(title: &str, description: &str) -> Vec<String> {
    let text = format!("{} {}", title, description).to_lowercase();

    TECH_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}
