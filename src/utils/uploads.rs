use std::path::{Path, PathBuf};

use uuid::Uuid;

pub fn get_uploads_dir(configured: &str) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(configured))
}

/// Media kind derived from the file extension allow-list. `None` means the
/// file type is not accepted.
pub fn kind_for(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" => Some("image"),
        "mp4" | "webm" | "ogg" | "mov" => Some("video"),
        "pdf" | "doc" | "docx" | "ppt" | "pptx" | "xls" | "xlsx" | "txt" => Some("document"),
        _ => None,
    }
}

/// Disk name for an upload: uuid prefix plus the sanitized original name,
/// so collisions and path tricks are both impossible.
pub fn storage_filename(original: &str) -> String {
    let safe: String = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", Uuid::new_v4(), safe)
}

pub async fn store_file(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(filename), bytes).await?;
    Ok(())
}

pub async fn remove_file(dir: &Path, filename: &str) -> std::io::Result<()> {
    let path = dir.join(filename);
    if path.exists() {
        tokio::fs::remove_file(path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_for_known_extensions() {
        assert_eq!(kind_for("photo.JPG"), Some("image"));
        assert_eq!(kind_for("clip.webm"), Some("video"));
        assert_eq!(kind_for("notes.pdf"), Some("document"));
        assert_eq!(kind_for("malware.exe"), None);
        assert_eq!(kind_for("no_extension"), None);
    }

    #[test]
    fn storage_filename_strips_paths() {
        let name = storage_filename("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(name.ends_with("passwd"));
    }

    #[tokio::test]
    async fn store_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        store_file(dir.path(), "a.txt", b"hello").await.unwrap();
        assert!(dir.path().join("a.txt").exists());
        remove_file(dir.path(), "a.txt").await.unwrap();
        assert!(!dir.path().join("a.txt").exists());
    }
}
