use crate::{core::Environment, error::EcsnvError};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Summary of a file-mode run.
#[derive(Debug, PartialEq)]
pub struct WrittenEnvs {
    pub count: usize,
    pub path: PathBuf,
}

impl Display for WrittenEnvs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} envs written to {}", self.count, self.path.display())
    }
}

/// One `KEY=VALUE` line per variable, in map iteration order.
pub fn print_envs<W: Write>(envs: &Environment, out: &mut W) -> std::io::Result<()> {
    for (key, value) in envs {
        writeln!(out, "{}={}", key, value)?;
    }
    out.flush()
}

/// Creates (or truncates) `file` and writes every variable to it. Relative
/// paths are reported against the current working directory.
pub fn write_envs(envs: &Environment, file: &Path) -> Result<WrittenEnvs, EcsnvError> {
    let mut writer = BufWriter::new(File::create(file)?);
    print_envs(envs, &mut writer)?;

    let path = std::env::current_dir()?.join(file);
    tracing::debug!(path = %path.display(), count = envs.len(), "Wrote envs");

    Ok(WrittenEnvs {
        count: envs.len(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envs() -> Environment {
        Environment::from([
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ])
    }

    #[test]
    fn print_should_emit_one_line_per_variable() {
        let mut out = Vec::new();

        print_envs(&sample_envs(), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let mut lines: Vec<&str> = printed.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["A=1", "B=2"]);
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn print_should_keep_equals_signs_in_values() {
        let envs = Environment::from([("QUERY".to_string(), "a=b&c=d".to_string())]);
        let mut out = Vec::new();

        print_envs(&envs, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "QUERY=a=b&c=d\n");
    }

    #[test]
    fn write_should_create_file_and_report_absolute_path() {
        figment::Jail::expect_with(|jail| {
            let written = write_envs(&sample_envs(), Path::new("out.env")).unwrap();

            assert_eq!(written.count, 2);
            assert!(written.path.is_absolute());
            assert_eq!(
                written.to_string(),
                format!(
                    "2 envs written to {}",
                    std::env::current_dir().unwrap().join("out.env").display()
                )
            );

            let contents = std::fs::read_to_string(jail.directory().join("out.env")).unwrap();
            let mut lines: Vec<&str> = contents.lines().collect();
            lines.sort();
            assert_eq!(lines, vec!["A=1", "B=2"]);

            Ok(())
        });
    }

    #[test]
    fn write_should_truncate_existing_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("out.env", "STALE=1\nOLDER=2\nOLDEST=3\n")?;

            let envs = Environment::from([("FRESH".to_string(), "yes".to_string())]);
            write_envs(&envs, Path::new("out.env")).unwrap();

            let contents = std::fs::read_to_string("out.env").unwrap();
            assert_eq!(contents, "FRESH=yes\n");

            Ok(())
        });
    }

    #[test]
    fn write_into_missing_directory_should_fail() {
        figment::Jail::expect_with(|_jail| {
            let result = write_envs(&sample_envs(), Path::new("missing/out.env"));

            assert!(matches!(result, Err(EcsnvError::Output(_))));

            Ok(())
        });
    }
}
