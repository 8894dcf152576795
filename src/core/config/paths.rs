use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub log_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = discover_project_root();
        let log_dir = project_root.join("logs");
        let data_dir = discover_data_dir(&project_root);

        let _ = fs::create_dir_all(&log_dir);

        AppPaths {
            project_root,
            log_dir,
            data_dir,
        }
    }
}

fn discover_project_root() -> PathBuf {
    if let Ok(root) = env::var("FASHION_ASSISTANT_ROOT") {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.yml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}

/// Catalog documents live under `data/` next to the binary unless overridden.
fn discover_data_dir(project_root: &std::path::Path) -> PathBuf {
    if let Ok(dir) = env::var("FASHION_ASSISTANT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    project_root.join("data")
}
