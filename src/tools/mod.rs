//! Invocation of the external tag writers and image converter.
//!
//! Arguments are handed to the child process as an argv vector, never through
//! a shell, so captions and names cannot inject shell syntax.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::config::{Dialect, ToolsConfig};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

/// A fully prepared external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    pub fn run(&self) -> Result<(), ToolError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }

    /// Shell-style rendering for logs and dry runs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Command that writes rendered tag arguments into `file`.
pub fn tag_writer(
    tools: &ToolsConfig,
    dialect: Dialect,
    tag_args: Vec<String>,
    file: &Path,
) -> ToolInvocation {
    let file = file.to_string_lossy().to_string();

    match dialect {
        Dialect::ExifTool => {
            let mut args = vec!["-P".to_string(), "-overwrite_original".to_string()];
            args.extend(tag_args);
            args.push(file);
            ToolInvocation {
                program: tools.exiftool.clone(),
                args,
            }
        }
        Dialect::Exiv2 => {
            let mut args = Vec::with_capacity(tag_args.len() * 2 + 2);
            for command in tag_args {
                args.push("-M".to_string());
                args.push(command);
            }
            args.push("modify".to_string());
            args.push(file);
            ToolInvocation {
                program: tools.exiv2.clone(),
                args,
            }
        }
    }
}

/// Command that converts `input` into `output`, the format following the
/// output extension.
pub fn converter(tools: &ToolsConfig, quality: &str, input: &Path, output: &Path) -> ToolInvocation {
    ToolInvocation {
        program: tools.convert.clone(),
        args: vec![
            "-quality".to_string(),
            quality.to_string(),
            input.to_string_lossy().to_string(),
            output.to_string_lossy().to_string(),
        ],
    }
}

/// Output path for a converted image: same stem, new extension.
pub fn converted_path(output: &Path, format: &str) -> PathBuf {
    output.with_extension(format)
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exiftool_invocation() {
        let invocation = tag_writer(
            &ToolsConfig::default(),
            Dialect::ExifTool,
            vec!["-XMP:Description=Trip".to_string()],
            Path::new("/out/a.png"),
        );

        assert_eq!(invocation.program, "exiftool");
        assert_eq!(
            invocation.args,
            vec!["-P", "-overwrite_original", "-XMP:Description=Trip", "/out/a.png"]
        );
    }

    #[test]
    fn test_exiv2_invocation() {
        let invocation = tag_writer(
            &ToolsConfig::default(),
            Dialect::Exiv2,
            vec![
                "set Xmp.dc.description LangAlt \"Trip\"".to_string(),
                "set Xmp.dc.subject \"Paris\"".to_string(),
            ],
            Path::new("/out/a.jpg"),
        );

        assert_eq!(invocation.program, "exiv2");
        assert_eq!(
            invocation.args,
            vec![
                "-M",
                "set Xmp.dc.description LangAlt \"Trip\"",
                "-M",
                "set Xmp.dc.subject \"Paris\"",
                "modify",
                "/out/a.jpg",
            ]
        );
    }

    #[test]
    fn test_converter() {
        let output = converted_path(Path::new("/out/scan.jpg"), "png");
        assert_eq!(output, PathBuf::from("/out/scan.png"));

        let invocation = converter(&ToolsConfig::default(), "9", Path::new("/in/scan.jpg"), &output);
        assert_eq!(invocation.display(), "convert -quality 9 /in/scan.jpg /out/scan.png");
    }

    #[test]
    fn test_display_quotes_user_content() {
        let invocation = ToolInvocation {
            program: "exiftool".to_string(),
            args: vec!["-XMP:Description=It's $HOME".to_string()],
        };
        assert_eq!(
            invocation.display(),
            "exiftool '-XMP:Description=It'\\''s $HOME'"
        );
    }

    #[test]
    fn test_run_missing_program() {
        let invocation = ToolInvocation {
            program: "/nonexistent/picasa-embed-tool".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(invocation.run(), Err(ToolError::Spawn { .. })));
    }
}
