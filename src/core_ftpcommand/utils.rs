use crate::constants::PERMISSIONS_PLACEHOLDER;
use crate::core_ftpcommand::error::FtpError;
use crate::core_shell::DirEntry;
use chrono::{DateTime, Datelike, Utc};

/// Normalizes `path` against the working directory `cwd`.
///
/// A leading `/` starts from the root, `.` and empty segments are dropped and
/// `..` pops one segment. Climbing above the root or a segment carrying a NUL
/// byte is an `InvalidPath`.
pub fn to_segments(cwd: &[String], path: &str) -> Result<Vec<String>, FtpError> {
    let mut segments = if path.starts_with('/') {
        Vec::new()
    } else {
        cwd.to_vec()
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    return Err(invalid_path(cwd, path));
                }
            }
            s if s.contains('\0') || s.contains('/') => {
                return Err(invalid_path(cwd, path));
            }
            s => segments.push(s.to_string()),
        }
    }
    Ok(segments)
}

fn invalid_path(cwd: &[String], path: &str) -> FtpError {
    FtpError::InvalidPath {
        cwd: cwd.to_vec(),
        path: path.to_string(),
    }
}

/// Absolute display form of a segment stack, as shown by PWD.
pub fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Renders one `ls -l` style line (without line terminator).
///
/// Permission bits are not decoded, every entry shows `rwxr-xr-x`.
pub fn format_list_line(entry: &DirEntry, current_year: i32) -> String {
    format!(
        "{}{}{:>4} {:<9} {:<9} {:>15} {:>12} {}",
        if entry.is_dir { 'd' } else { '-' },
        PERMISSIONS_PLACEHOLDER,
        entry.hardlinks,
        truncate(&entry.owner, 8),
        truncate(&entry.group, 8),
        entry.size,
        format_list_date(&entry.modified, current_year),
        entry.name
    )
}

fn format_list_date(mtime: &DateTime<Utc>, current_year: i32) -> String {
    if mtime.year() == current_year {
        mtime.format("%b %d %H:%M").to_string()
    } else {
        format!("{} {:02} {:>5}", mtime.format("%b"), mtime.day(), mtime.year())
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn entry(name: &str, is_dir: bool, mtime: DateTime<Utc>) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            size: 42,
            is_dir,
            permissions: 0o644,
            hardlinks: 1,
            modified: mtime,
            owner: "ftp".to_string(),
            group: "ftp".to_string(),
        }
    }

    #[test]
    fn test_parent_of_root_is_invalid() {
        assert!(matches!(
            to_segments(&[], "../x"),
            Err(FtpError::InvalidPath { .. })
        ));
        assert!(to_segments(&segs(&["a"]), "../..").is_err());
    }

    #[test]
    fn test_relative_parent() {
        assert_eq!(
            to_segments(&segs(&["a", "b"]), "../c").unwrap(),
            segs(&["a", "c"])
        );
    }

    #[test]
    fn test_absolute_resets_base() {
        assert_eq!(to_segments(&segs(&["a"]), "/x/y").unwrap(), segs(&["x", "y"]));
        assert_eq!(to_segments(&segs(&["a"]), "/").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_dot_and_empty_segments_are_skipped() {
        assert_eq!(
            to_segments(&segs(&["a"]), "./b//./c/").unwrap(),
            segs(&["a", "b", "c"])
        );
        assert_eq!(to_segments(&segs(&["a"]), "").unwrap(), segs(&["a"]));
    }

    #[test]
    fn test_nul_byte_is_invalid() {
        assert!(to_segments(&[], "a\0b").is_err());
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(&[]), "/");
        assert_eq!(display_path(&segs(&["a", "b"])), "/a/b");
    }

    #[test]
    fn test_file_line_this_year() {
        let mtime = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        let line = format_list_line(&entry("f.txt", false, mtime), 2026);
        assert_eq!(
            line,
            format!(
                "-rwxr-xr-x   1 ftp{}ftp{}42 Mar 05 14:30 f.txt",
                " ".repeat(7),
                " ".repeat(20)
            )
        );
    }

    #[test]
    fn test_directory_line_other_year() {
        let mtime = Utc.with_ymd_and_hms(2019, 11, 9, 8, 0, 0).unwrap();
        let line = format_list_line(&entry("sub", true, mtime), 2026);
        assert!(line.starts_with("drwxr-xr-x"));
        assert!(line.ends_with(" Nov 09  2019 sub"));
    }

    #[test]
    fn test_owner_and_group_are_truncated() {
        let mtime = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut e = entry("f", false, mtime);
        e.owner = "averylongowner".to_string();
        e.group = "averylonggroup".to_string();
        let line = format_list_line(&e, 2026);
        assert!(line.contains(" averylon  averylon "));
        assert!(!line.contains("averylong"));
    }
}
