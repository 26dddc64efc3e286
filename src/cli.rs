use crate::archive::{
    build_archive, extract_archive, BuildOptions, ExtractOptions, ExtractPolicy,
    DEFAULT_ARCHIVE_NAME, MAX_FILES,
};
use crate::error::{Result, SauError};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

const USAGE: &str = "tarsau -b [-o <output_file>] <file>...\n       tarsau -a <archive_file> <extract_dir>";

#[derive(Parser, Debug)]
#[command(name = "tarsau", version, about = "Pack files into a .sau archive or unpack one", long_about = None)]
#[command(override_usage = USAGE)]
#[command(group(ArgGroup::new("mode").required(true).args(["build", "extract"])))]
pub struct Args {
    /// Build an archive from the given files.
    #[arg(short = 'b')]
    pub build: bool,

    /// Extract an archive into a directory.
    #[arg(short = 'a')]
    pub extract: bool,

    /// Output archive path when building.
    #[arg(short = 'o', value_name = "OUTPUT_FILE", requires = "build")]
    pub output: Option<PathBuf>,

    /// Read each entry by its stored size instead of one line per entry.
    /// Keeps multi-line content intact and restores permission bits.
    #[arg(long, requires = "extract")]
    pub strict: bool,

    /// Log every entry as it is processed.
    #[arg(short, long)]
    pub verbose: bool,

    /// Input files (-b), or the archive and the target directory (-a).
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// A validated invocation
#[derive(Debug)]
pub enum Command {
    Build {
        output: PathBuf,
        inputs: Vec<PathBuf>,
        options: BuildOptions,
    },
    Extract {
        archive: PathBuf,
        dir: PathBuf,
        options: ExtractOptions,
    },
}

impl Args {
    /// Check argument counts for the selected mode
    pub fn into_command(self) -> Result<Command> {
        if self.build {
            if self.paths.is_empty() {
                return Err(SauError::Usage("no input files given".to_string()));
            }
            if self.paths.len() > MAX_FILES {
                return Err(SauError::TooManyFiles {
                    count: self.paths.len(),
                    max: MAX_FILES,
                });
            }
            return Ok(Command::Build {
                output: self
                    .output
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_NAME)),
                inputs: self.paths,
                options: BuildOptions::new(),
            });
        }

        let mut paths = self.paths.into_iter();
        match (paths.next(), paths.next(), paths.next()) {
            (Some(archive), Some(dir), None) => {
                let policy = if self.strict {
                    ExtractPolicy::Sized
                } else {
                    ExtractPolicy::LinePerEntry
                };
                Ok(Command::Extract {
                    archive,
                    dir,
                    options: ExtractOptions::new().with_policy(policy),
                })
            }
            _ => Err(SauError::Usage(
                "-a takes exactly an archive file and an extraction directory".to_string(),
            )),
        }
    }
}

/// Usage text shown alongside invocation errors
pub fn usage() -> &'static str {
    USAGE
}

/// Run a validated command, reporting success on stdout
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Build {
            output,
            inputs,
            options,
        } => {
            build_archive(&output, &inputs, options)?;
            println!("Archive created successfully: {}", output.display());
        }
        Command::Extract {
            archive,
            dir,
            options,
        } => {
            extract_archive(&archive, &dir, &options)?;
            println!("Files extracted to {}", dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("tarsau").chain(args.iter().copied()))
    }

    #[test]
    fn test_build_defaults_output() {
        let command = parse(&["-b", "texts/a.txt"]).unwrap().into_command().unwrap();
        match command {
            Command::Build { output, inputs, .. } => {
                assert_eq!(output, PathBuf::from("a.sau"));
                assert_eq!(inputs, vec![PathBuf::from("texts/a.txt")]);
            }
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_build_with_output() {
        let command = parse(&["-b", "-o", "out.sau", "texts/a.txt", "texts/b.txt"])
            .unwrap()
            .into_command()
            .unwrap();
        match command {
            Command::Build { output, inputs, .. } => {
                assert_eq!(output, PathBuf::from("out.sau"));
                assert_eq!(inputs.len(), 2);
            }
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_policy_flag() {
        let command = parse(&["-a", "a.sau", "out", "--strict"])
            .unwrap()
            .into_command()
            .unwrap();
        match command {
            Command::Extract { options, dir, .. } => {
                assert_eq!(options.policy, ExtractPolicy::Sized);
                assert_eq!(dir, PathBuf::from("out"));
            }
            other => panic!("expected extract, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_is_required() {
        assert!(parse(&["a.sau", "out"]).is_err());
        assert!(parse(&["-x", "a.sau"]).is_err());
        assert!(parse(&["-a", "-b", "f"]).is_err());
    }

    #[test]
    fn test_mode_specific_flags() {
        assert!(parse(&["-a", "-o", "x", "a.sau", "out"]).is_err());
        assert!(parse(&["-b", "--strict", "texts/a.txt"]).is_err());
    }

    #[test]
    fn test_missing_arguments() {
        let err = parse(&["-b"]).unwrap().into_command().unwrap_err();
        assert!(matches!(err, SauError::Usage(_)));

        let err = parse(&["-a", "a.sau"]).unwrap().into_command().unwrap_err();
        assert!(matches!(err, SauError::Usage(_)));

        let err = parse(&["-a", "a.sau", "out", "extra"])
            .unwrap()
            .into_command()
            .unwrap_err();
        assert!(matches!(err, SauError::Usage(_)));
    }

    #[test]
    fn test_file_limit() {
        let files: Vec<String> = (0..=MAX_FILES).map(|i| format!("texts/{}.txt", i)).collect();
        let mut args = vec!["-b"];
        args.extend(files.iter().map(String::as_str));

        let err = parse(&args).unwrap().into_command().unwrap_err();
        assert!(matches!(err, SauError::TooManyFiles { count: 33, max: 32 }));
    }
}
