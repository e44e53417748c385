/*!
Entry point for `zs`: parses CLI arguments, builds a `SearchRequest`, runs
the engine against stdout/stderr, and maps its outcome to an exit code.
*/

use std::process::ExitCode;

#[macro_use]
mod messages;

mod cli;
mod logger;

use anyhow::Result;
use zenith_core::{CancelToken, SearchRequest};
use zenith_searcher::Sink;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            if let Some(ioerr) = err.downcast_ref::<std::io::Error>() {
                if ioerr.kind() == std::io::ErrorKind::BrokenPipe {
                    return ExitCode::from(0);
                }
            }
            eprintln_locked!("{:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let argv = std::env::args_os().skip(1);
    let args = match cli::parse(argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln_locked!("{:#}", err);
            return Ok(ExitCode::from(2));
        }
    };

    log::set_max_level(match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    });
    let _ = logger::Logger::init();

    let request = build_request(&args);
    // Signal installation is an external-collaborator concern (§1); the
    // driver hands the engine a fresh token and nothing ever cancels it
    // outside of the `ZENITHSEARCH_TEST_CANCEL_AFTER_FILES` test hook.
    let cancel = CancelToken::new();

    let stdout = std::io::stdout();
    let mut sink: Box<dyn Sink + '_> = if args.json {
        Box::new(zenith_printer::JsonWriter::new(stdout.lock(), &request.pattern, request.no_snippet))
    } else {
        Box::new(zenith_printer::HumanWriter::new(stdout.lock(), request.no_snippet))
    };

    let stats = zenith_searcher::run(&request, &cancel, sink.as_mut(), &mut messages::report)?;

    Ok(if stats.cancelled {
        ExitCode::from(130)
    } else if stats.any_match {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    })
}

fn build_request(args: &cli::Args) -> SearchRequest {
    let mut builder = SearchRequest::builder(args.pattern.clone(), args.paths.clone())
        .extensions(args.extensions.clone())
        .ignore_hidden(!args.hidden)
        .no_ignore(args.no_ignore)
        .follow_symlinks(args.follow)
        .max_bytes(args.max_bytes)
        .binary_mode(args.binary_mode)
        .mmap_mode(args.mmap_mode)
        .algorithm_mode(args.algorithm_mode)
        .include_globs(args.include_globs.clone())
        .exclude_globs(args.exclude_globs.clone())
        .exclude_dirs(args.exclude_dirs.clone())
        .max_matches_per_file(args.max_matches_per_file)
        .no_snippet(args.no_snippet)
        .threads(args.threads)
        .json_output(args.json)
        .stable_output(if args.unstable {
            zenith_core::StableOutput::Off
        } else {
            zenith_core::StableOutput::On
        });
    if let Some(threshold) = args.mmap_threshold_bytes {
        builder = builder.mmap_threshold_bytes(threshold);
    }
    if let Some(chunk_size) = args.chunk_size {
        builder = builder.chunk_size(chunk_size);
    }
    if let Some(max_snippet_bytes) = args.max_snippet_bytes {
        builder = builder.max_snippet_bytes(max_snippet_bytes);
    }
    builder = builder.output_mode(if args.count {
        zenith_core::OutputMode::Count
    } else if args.files_with_matches {
        zenith_core::OutputMode::FilesWithMatches
    } else {
        zenith_core::OutputMode::Matches
    });
    builder.build()
}
