use std::path::Path;

use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt, Lines},
};

/// Read a file from the given path into a list of strings
pub async fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let mut r = file_reader(path).await?;
    let mut lines = Vec::new();

    while let Some(line) = r.next_line().await? {
        lines.push(line);
    }

    Ok(lines)
}

/// Open a file for line-by-line reading
pub async fn file_reader<P: AsRef<Path>>(path: P) -> io::Result<Lines<io::BufReader<File>>> {
    let f = File::open(path).await?;

    Ok(io::BufReader::new(f).lines())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "first line\nsecond line\n").unwrap();

        let lines = read_file(&path).await.unwrap();

        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_file(dir.path().join("missing.txt")).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
