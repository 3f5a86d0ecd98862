/// Split a comma-separated form field ("rust, photos,,travel") into trimmed,
/// non-empty entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Reduce an uploaded filename to characters safe for disk and URLs.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn file_extension(name: &str) -> Option<String> {
    let ext = name.rsplit_once('.')?.1;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" rust, photos,,travel ,"),
            vec!["rust", "photos", "travel"]
        );
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my-photo--1-.png");
        assert_eq!(sanitize_filename("safe-name_01.jpg"), "safe-name_01.jpg");
    }

    #[test]
    fn file_extension_lowercases() {
        assert_eq!(file_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension("trailingdot."), None);
    }
}
