use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file at {}", path.as_ref().display()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

        Ok(())
    }

    // @checks: Name starts with a dot
    pub fn is_hidden<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_name()
            .is_some_and(Self::is_hidden_name)
    }

    fn is_hidden_name(name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        name.starts_with('.') && name != "." && name != ".."
    }

    /// Whether the file name ends with one of `extensions` (case-insensitive).
    /// Extensions may be given with or without the leading dot.
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        let Some(name) = path.as_ref().file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();

        extensions.iter().any(|ext| {
            let ext = ext.to_lowercase();
            let ext = ext.trim_start_matches('.');
            !ext.is_empty() && name.len() > ext.len() && name.ends_with(&format!(".{}", ext))
        })
    }

    /// Expand files and directories into the list of subtitle files to process.
    ///
    /// Directories are walked recursively in file-name order. Hidden entries found
    /// while walking are skipped unless `include_hidden` is set; inputs named
    /// explicitly are always considered. A path listed twice is kept once.
    pub fn collect_subtitle_files<P: AsRef<Path>>(
        inputs: &[P],
        extensions: &[String],
        include_hidden: bool,
        follow_links: bool,
    ) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();

        for input in inputs {
            let input = input.as_ref();

            if Self::file_exists(input) {
                if Self::has_extension(input, extensions) && seen.insert(input.to_path_buf()) {
                    result.push(input.to_path_buf());
                }
                continue;
            }
            if !Self::dir_exists(input) {
                return Err(anyhow!("Input path does not exist: {}", input.display()));
            }

            let walker = WalkDir::new(input)
                .follow_links(follow_links)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0 || include_hidden || !Self::is_hidden(entry.path())
                });

            for entry in walker {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                if path.is_file()
                    && Self::has_extension(path, extensions)
                    && seen.insert(path.to_path_buf())
                {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }
}
