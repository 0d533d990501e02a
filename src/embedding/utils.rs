use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Resolves `tokenizer.json` from a model directory, a file inside it, or an explicit path.
pub fn resolve_tokenizer_path(path: &Path) -> io::Result<PathBuf> {
    if path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        Ok(path.to_path_buf())
    } else if path.is_dir() {
        Ok(path.join("tokenizer.json"))
    } else {
        Ok(path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json"))
    }
}

/// Loads a tokenizer and truncates every encoding to `max_len` tokens.
///
/// Padding is left off: texts are encoded one at a time, so the attention mask is all ones.
pub fn load_tokenizer(path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let tokenizer_path = resolve_tokenizer_path(path)?;
    let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_tokenizer_file() {
        let path = Path::new("/models/minilm/tokenizer.json");
        assert_eq!(resolve_tokenizer_path(path).unwrap(), path.to_path_buf());
    }

    #[test]
    fn test_resolve_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_tokenizer_path(dir.path()).unwrap(),
            dir.path().join("tokenizer.json")
        );
    }

    #[test]
    fn test_resolve_from_sibling_file() {
        let path = Path::new("/models/minilm/model.safetensors");
        assert_eq!(
            resolve_tokenizer_path(path).unwrap(),
            PathBuf::from("/models/minilm/tokenizer.json")
        );
    }

    #[test]
    fn test_load_missing_tokenizer_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tokenizer(dir.path(), 128).is_err());
    }
}
