use std::path::Path;

pub const KNOWLEDGE_BASE_FILE: &str = "knowledge_base.txt";
pub const EXAMPLES_FILE: &str = "examples.sql";

// Static prompt material, read once at startup and shared read-only
#[derive(Debug, Clone, Default)]
pub struct StaticResources {
    pub knowledge_base: String,
    pub examples: String,
}

impl StaticResources {
    pub fn load(dir: &Path) -> Self {
        Self {
            knowledge_base: read_or_empty(&dir.join(KNOWLEDGE_BASE_FILE), "knowledge base"),
            examples: read_or_empty(&dir.join(EXAMPLES_FILE), "examples"),
        }
    }
}

// A missing or unreadable file degrades to empty content
fn read_or_empty(path: &Path, label: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::info!(path = %path.display(), bytes = text.len(), "Loaded {}", label);
            text
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "{} file not found, using empty content", label);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plsql-testgen-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_both_files() {
        let dir = scratch_dir("both");
        std::fs::write(dir.join(KNOWLEDGE_BASE_FILE), "use utPLSQL annotations").unwrap();
        std::fs::write(dir.join(EXAMPLES_FILE), "-- %suite(demo)").unwrap();

        let res = StaticResources::load(&dir);
        assert_eq!(res.knowledge_base, "use utPLSQL annotations");
        assert_eq!(res.examples, "-- %suite(demo)");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_files_become_empty() {
        let dir = scratch_dir("missing");
        std::fs::write(dir.join(EXAMPLES_FILE), "-- only examples").unwrap();

        let res = StaticResources::load(&dir);
        assert_eq!(res.knowledge_base, "");
        assert_eq!(res.examples, "-- only examples");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_does_not_fail() {
        let res = StaticResources::load(Path::new("/definitely/not/here"));
        assert!(res.knowledge_base.is_empty());
        assert!(res.examples.is_empty());
    }
}
