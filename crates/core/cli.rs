/*!
Command-line argument parsing (OUT OF SCOPE for the core per §1, but
required to drive it). Parses into [`Args`], a thin, already-validated
shape that [`crate::build_request`] turns into a `SearchRequest`.
*/

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use lexopt::prelude::*;
use zenith_core::{AlgorithmMode, BinaryMode, MmapMode};

pub(crate) struct Args {
    pub(crate) pattern: Vec<u8>,
    pub(crate) paths: Vec<PathBuf>,
    pub(crate) extensions: HashSet<String>,
    pub(crate) hidden: bool,
    pub(crate) no_ignore: bool,
    pub(crate) follow: bool,
    pub(crate) max_bytes: Option<u64>,
    pub(crate) binary_mode: BinaryMode,
    pub(crate) mmap_mode: MmapMode,
    pub(crate) mmap_threshold_bytes: Option<u64>,
    pub(crate) chunk_size: Option<usize>,
    pub(crate) count: bool,
    pub(crate) files_with_matches: bool,
    pub(crate) json: bool,
    pub(crate) unstable: bool,
    pub(crate) algorithm_mode: AlgorithmMode,
    pub(crate) include_globs: Vec<String>,
    pub(crate) exclude_globs: Vec<String>,
    pub(crate) exclude_dirs: Vec<String>,
    pub(crate) max_matches_per_file: Option<usize>,
    pub(crate) max_snippet_bytes: Option<usize>,
    pub(crate) no_snippet: bool,
    pub(crate) threads: usize,
    pub(crate) verbose: u8,
}

/// Parses `argv` (without the program name) into [`Args`].
///
/// Returns a usage error (§7's `UsageError`) for unrecognized flags,
/// missing values, or an absent pattern.
pub(crate) fn parse(argv: impl IntoIterator<Item = std::ffi::OsString>) -> Result<Args> {
    let mut pattern: Option<Vec<u8>> = None;
    let mut paths = Vec::new();
    let mut extensions = HashSet::new();
    let mut hidden = false;
    let mut no_ignore = false;
    let mut follow = false;
    let mut max_bytes = None;
    let mut binary_mode = BinaryMode::Skip;
    let mut mmap_mode = MmapMode::Auto;
    let mut mmap_threshold_bytes = None;
    let mut chunk_size = None;
    let mut count = false;
    let mut files_with_matches = false;
    let mut json = false;
    let mut unstable = false;
    let mut algorithm_mode = AlgorithmMode::Auto;
    let mut include_globs = Vec::new();
    let mut exclude_globs = Vec::new();
    let mut exclude_dirs = Vec::new();
    let mut max_matches_per_file = None;
    let mut max_snippet_bytes = None;
    let mut no_snippet = false;
    let mut threads = 0;
    let mut verbose = 0u8;

    let mut p = lexopt::Parser::from_args(argv);
    while let Some(arg) = p.next().context("invalid CLI arguments")? {
        use lexopt::Arg::{Long, Short, Value};
        match arg {
            Value(value) => {
                if pattern.is_none() {
                    pattern = Some(value.into_string().map_err(|_| invalid("pattern"))?.into_bytes());
                } else {
                    paths.push(PathBuf::from(value));
                }
            }
            Short('g') | Long("glob") => {
                include_globs.push(p.value().context("--glob needs a value")?.string()?);
            }
            Long("exclude-glob") => {
                exclude_globs.push(p.value().context("--exclude-glob needs a value")?.string()?);
            }
            Long("exclude-dir") => {
                exclude_dirs.push(p.value().context("--exclude-dir needs a value")?.string()?);
            }
            Long("ext") => {
                let mut ext = p.value().context("--ext needs a value")?.string()?;
                if !ext.starts_with('.') {
                    ext.insert(0, '.');
                }
                extensions.insert(ext.to_ascii_lowercase());
            }
            Long("hidden") => hidden = true,
            Long("no-ignore") => no_ignore = true,
            Long("follow") => follow = true,
            Long("max-bytes") => {
                max_bytes = Some(p.value().context("--max-bytes needs a value")?.parse()?);
            }
            Long("binary") => binary_mode = BinaryMode::Scan,
            Long("mmap") => {
                mmap_mode = match p.value().context("--mmap needs a value")?.string()?.as_str() {
                    "auto" => MmapMode::Auto,
                    "on" => MmapMode::On,
                    "off" => MmapMode::Off,
                    other => bail!("unrecognized --mmap value: {other}"),
                };
            }
            Long("mmap-threshold") => {
                mmap_threshold_bytes = Some(p.value().context("--mmap-threshold needs a value")?.parse()?);
            }
            Long("chunk-size") => {
                chunk_size = Some(p.value().context("--chunk-size needs a value")?.parse()?);
            }
            Short('c') | Long("count") => count = true,
            Short('l') | Long("files-with-matches") => files_with_matches = true,
            Long("json") => json = true,
            Long("unstable") => unstable = true,
            Long("algorithm") => {
                algorithm_mode =
                    match p.value().context("--algorithm needs a value")?.string()?.as_str() {
                        "auto" => AlgorithmMode::Auto,
                        "naive" => AlgorithmMode::Naive,
                        "horspool" => AlgorithmMode::Horspool,
                        "boyer-moore" => AlgorithmMode::BoyerMoore,
                        other => bail!("unrecognized --algorithm value: {other}"),
                    };
            }
            Long("max-matches") => {
                max_matches_per_file = Some(p.value().context("--max-matches needs a value")?.parse()?);
            }
            Long("max-snippet-bytes") => {
                max_snippet_bytes = Some(p.value().context("--max-snippet-bytes needs a value")?.parse()?);
            }
            Long("no-snippet") => no_snippet = true,
            Short('j') | Long("threads") => {
                threads = p.value().context("--threads needs a value")?.parse()?;
            }
            Short('v') => verbose = verbose.saturating_add(1),
            _ => return Err(arg.unexpected().into()),
        }
    }

    let pattern = pattern.ok_or_else(|| anyhow::anyhow!("missing required PATTERN argument"))?;
    if pattern.is_empty() {
        bail!("PATTERN must not be empty");
    }
    if paths.is_empty() {
        paths.push(PathBuf::from("."));
    }
    if count && files_with_matches {
        bail!("--count and --files-with-matches are mutually exclusive");
    }

    Ok(Args {
        pattern,
        paths,
        extensions,
        hidden,
        no_ignore,
        follow,
        max_bytes,
        binary_mode,
        mmap_mode,
        mmap_threshold_bytes,
        chunk_size,
        count,
        files_with_matches,
        json,
        unstable,
        algorithm_mode,
        include_globs,
        exclude_globs,
        exclude_dirs,
        max_matches_per_file,
        max_snippet_bytes,
        no_snippet,
        threads,
        verbose,
    })
}

fn invalid(what: &str) -> anyhow::Error {
    anyhow::anyhow!("invalid {what}: not valid UTF-8 or OS string")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<Args> {
        parse(args.iter().map(std::ffi::OsString::from))
    }

    #[test]
    fn pattern_and_default_path() {
        let args = parse_args(&["pat"]).unwrap();
        assert_eq!(args.pattern, b"pat");
        assert_eq!(args.paths, vec![PathBuf::from(".")]);
    }

    #[test]
    fn explicit_paths_and_flags() {
        let args = parse_args(&["pat", "src", "--count", "--json", "-j", "4"]).unwrap();
        assert_eq!(args.paths, vec![PathBuf::from("src")]);
        assert!(args.count);
        assert!(args.json);
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn missing_pattern_is_a_usage_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn count_and_files_with_matches_conflict() {
        assert!(parse_args(&["pat", "-c", "-l"]).is_err());
    }
}
