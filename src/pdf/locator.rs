//! PDF Quote Saver - PDF file locator
//!
//! Walks the configured search directories looking for a file by name

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Finds PDF files by name below a fixed list of directories
#[derive(Debug, Clone)]
pub struct PdfLocator {
    search_dirs: Vec<PathBuf>,
    max_depth: usize,
}

impl PdfLocator {
    pub fn new(search_dirs: Vec<PathBuf>, max_depth: usize) -> Self {
        Self { search_dirs, max_depth }
    }

    /// Find the first file named `pdf_name` (case-insensitive)
    ///
    /// Directories are searched in order; missing directories and unreadable
    /// entries are skipped. Nothing is cached between calls.
    pub fn find(&self, pdf_name: &str) -> Option<PathBuf> {
        let wanted = pdf_name.to_lowercase();

        for search_dir in &self.search_dirs {
            log::info!(
                "[Locator] Searching for '{}' in {} and subdirectories...",
                pdf_name,
                search_dir.display()
            );
            if let Some(path) = self.find_in(search_dir, &wanted) {
                return Some(path);
            }
        }

        None
    }

    fn find_in(&self, root: &Path, wanted: &str) -> Option<PathBuf> {
        if !root.is_dir() {
            log::debug!("[Locator] Skipping missing directory: {}", root.display());
            return None;
        }

        WalkDir::new(root)
            .max_depth(self.max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("[Locator] Skipping unreadable entry: {}", e);
                    None
                }
            })
            // Symlinked files count; symlinked directories are not descended
            .filter(|entry| entry.path().is_file())
            .find(|entry| entry.file_name().to_string_lossy().to_lowercase() == wanted)
            .map(|entry| entry.into_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"%PDF-1.5").unwrap();
    }

    #[test]
    fn finds_nested_file_case_insensitively() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("papers").join("2024").join("Deep Learning.PDF");
        touch(&target);

        let locator = PdfLocator::new(vec![root.path().to_path_buf()], 32);
        assert_eq!(locator.find("deep learning.pdf"), Some(target));
    }

    #[test]
    fn earlier_directory_wins() {
        let documents = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        touch(&documents.path().join("spec.pdf"));
        touch(&downloads.path().join("spec.pdf"));

        let locator = PdfLocator::new(
            vec![documents.path().to_path_buf(), downloads.path().to_path_buf()],
            32,
        );
        assert_eq!(locator.find("spec.pdf"), Some(documents.path().join("spec.pdf")));
    }

    #[test]
    fn missing_directories_are_skipped() {
        let downloads = tempfile::tempdir().unwrap();
        touch(&downloads.path().join("spec.pdf"));

        let locator = PdfLocator::new(
            vec![
                downloads.path().join("does-not-exist"),
                downloads.path().to_path_buf(),
            ],
            32,
        );
        assert_eq!(locator.find("spec.pdf"), Some(downloads.path().join("spec.pdf")));
    }

    #[test]
    fn absent_when_nothing_matches() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("other.pdf"));
        fs::create_dir_all(root.path().join("spec.pdf")).unwrap();

        let locator = PdfLocator::new(
            vec![root.path().to_path_buf(), root.path().join("missing")],
            32,
        );
        assert_eq!(locator.find("spec.pdf"), None);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_files() {
        let store = tempfile::tempdir().unwrap();
        let documents = tempfile::tempdir().unwrap();
        let original = store.path().join("spec.pdf");
        touch(&original);
        let link = documents.path().join("spec.pdf");
        std::os::unix::fs::symlink(&original, &link).unwrap();

        let locator = PdfLocator::new(vec![documents.path().to_path_buf()], 32);
        assert_eq!(locator.find("SPEC.pdf"), Some(link));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_a_match() {
        let store = tempfile::tempdir().unwrap();
        let documents = tempfile::tempdir().unwrap();
        fs::create_dir_all(store.path().join("folder")).unwrap();
        std::os::unix::fs::symlink(store.path().join("folder"), documents.path().join("spec.pdf"))
            .unwrap();

        let locator = PdfLocator::new(vec![documents.path().to_path_buf()], 32);
        assert_eq!(locator.find("spec.pdf"), None);
    }

    #[test]
    fn depth_limit_is_respected() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a").join("b").join("c").join("spec.pdf");
        touch(&deep);

        assert_eq!(PdfLocator::new(vec![root.path().to_path_buf()], 3).find("spec.pdf"), None);
        assert_eq!(
            PdfLocator::new(vec![root.path().to_path_buf()], 4).find("spec.pdf"),
            Some(deep)
        );
    }
}
