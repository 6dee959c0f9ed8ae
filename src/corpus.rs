use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1256;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Encodings tried in order when reading a corpus or stopword file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1256,
    Latin1,
}

pub const ENCODING_CHAIN: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Windows1256,
    TextEncoding::Latin1,
];

impl TextEncoding {
    /// Strict decode; `None` if the bytes are not valid in this encoding.
    pub fn decode<'a>(self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            TextEncoding::Windows1256 => {
                WINDOWS_1256.decode_without_bom_handling_and_without_replacement(bytes)
            }
            // every byte is its own code point
            TextEncoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
        }
    }
}

/// Decodes `bytes` with the first encoding of [`ENCODING_CHAIN`] that accepts them.
pub fn decode_bytes(bytes: &[u8], path: &Path) -> Result<String> {
    for encoding in ENCODING_CHAIN {
        if let Some(text) = encoding.decode(bytes) {
            debug!("Decoded {} as {:?}", path.display(), encoding);
            return Ok(text.into_owned());
        }
    }
    Err(Error::Decode {
        path: path.to_path_buf(),
    })
}

/// Reads a whole text file through the encoding fallback chain.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes, path)
}

/// Lists the `.txt` files directly inside `folder` (no recursion), sorted by name.
///
/// Symlinks are listed unless they point at a directory. A dangling link is
/// still listed so that reading it fails and is reported.
pub fn collect_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("corpus folder not found: {}", folder.display()),
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let file_type = entry.file_type();
        if !(file_type.is_file() || file_type.is_symlink()) || entry.path().is_dir() {
            continue;
        }
        let is_txt = entry
            .file_name()
            .to_str()
            .map(|name| name.to_lowercase().ends_with(".txt"))
            .unwrap_or(false);
        if is_txt {
            files.push(entry.into_path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// File identifier used in the index and reports: the bare file name.
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn utf8_wins_when_valid() {
        let text = decode_bytes("السلام".as_bytes(), Path::new("a.txt")).unwrap();
        assert_eq!(text, "السلام");
    }

    #[test]
    fn falls_back_to_windows_1256() {
        // "سلام" in cp1256: س=0xD3 ل=0xE1 ا=0xC7 م=0xE3
        let bytes = [0xD3, 0xE1, 0xC7, 0xE3];
        let text = decode_bytes(&bytes, Path::new("legacy.txt")).unwrap();
        assert_eq!(text, "سلام");
    }

    #[test]
    fn latin1_accepts_any_bytes() {
        let bytes = [0x41, 0xFF, 0x00];
        let text = TextEncoding::Latin1.decode(&bytes).unwrap();
        assert_eq!(text, "A\u{FF}\u{0}");
    }

    #[test]
    fn collects_only_top_level_txt_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.TXT"), "x").unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("c.md"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.txt"), "x").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_id(p)).collect();
        assert_eq!(names, vec!["a.txt", "b.TXT"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_txt_files_are_listed() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(target.path().join("real.txt"), "x").unwrap();
        fs::create_dir(target.path().join("folder.txt")).unwrap();
        symlink(target.path().join("real.txt"), dir.path().join("linked.txt")).unwrap();
        symlink(target.path().join("folder.txt"), dir.path().join("dir.txt")).unwrap();
        symlink(target.path().join("gone.txt"), dir.path().join("dangling.txt")).unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_id(p)).collect();
        assert_eq!(names, vec!["a.txt", "dangling.txt", "linked.txt"]);
        assert!(read_text(&dir.path().join("linked.txt")).is_ok());
        assert!(read_text(&dir.path().join("dangling.txt")).is_err());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_files(&dir.path().join("nope")).is_err());
    }
}
