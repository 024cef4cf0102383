use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bind_memoizer::{
    find_render_functions, memoize_render_binds, BindMemoizerConfig, BindMemoizerJSONConfig,
    ImportStyle, MemoizeReport, RenderFunction,
};
use clap::{Parser, ValueEnum};
use logger::{Logger, WrapFileLogger};
use rayon::prelude::*;
use serde::Serialize;
use swc_common::comments::SingleThreadedComments;
use swc_utils_parse::{
    is_typescript_filename, resolve_program, try_parse_ecma_src_comments, with_globals,
};
use swc_utils_print::{program_to_str, PrintArgs};

/// Memoizes `.bind()` calls and inline closures in JSX render functions.
#[derive(Parser, Debug, Default)]
#[command(name = "bind-memoizer")]
pub struct CliArgs {
    /// Source files to transform
    #[arg(required_unless_present = "print_schema")]
    pub files: Vec<PathBuf>,

    /// Path to a JSON config file. Flags take precedence over it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub cache_size: Option<usize>,

    #[arg(long)]
    pub memoize_module: Option<String>,

    #[arg(long, value_enum)]
    pub import_style: Option<ImportStyleArg>,

    #[arg(long)]
    pub dedupe_captures: bool,

    /// Write transformed files into this directory instead of printing them
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print the render functions found in each file, without transforming
    #[arg(long)]
    pub list: bool,

    /// Print the JSON schema of the config file and exit
    #[arg(long)]
    pub print_schema: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyleArg {
    Require,
    EsModule,
}

impl From<ImportStyleArg> for ImportStyle {
    fn from(value: ImportStyleArg) -> Self {
        match value {
            ImportStyleArg::Require => ImportStyle::Require,
            ImportStyleArg::EsModule => ImportStyle::EsModule,
        }
    }
}

/// Reads the config file named on the command line, if any, and applies the
/// flag overrides on top of it.
pub fn load_config(args: &CliArgs) -> Result<BindMemoizerConfig> {
    let mut json_config = match &args.config {
        Some(config_path) => {
            let config_str = fs::read_to_string(config_path).with_context(|| {
                format!("failed to read config file {}", config_path.display())
            })?;
            serde_json::from_str::<BindMemoizerJSONConfig>(&config_str).with_context(|| {
                format!("failed to parse config file {}", config_path.display())
            })?
        }
        None => BindMemoizerJSONConfig::default(),
    };

    if let Some(cache_size) = args.cache_size {
        json_config.cache_size = cache_size;
    }
    if let Some(memoize_module) = &args.memoize_module {
        json_config.memoize_module = memoize_module.clone();
    }
    if let Some(import_style) = args.import_style {
        json_config.import_style = import_style.into();
    }
    if args.dedupe_captures {
        json_config.dedupe_captures = true;
    }

    BindMemoizerConfig::try_from(json_config).context("invalid bind-memoizer config")
}

pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(BindMemoizerJSONConfig);
    serde_json::to_string_pretty(&schema).context("failed to serialize config schema")
}

pub struct TransformedSource {
    pub code: String,
    pub report: MemoizeReport,
}

/// Parses, transforms and prints one source file.
///
/// Comments are preserved. A file with nothing to rewrite is returned as the
/// original text rather than reprinted.
pub fn transform_source(
    filename: &str,
    src: &str,
    config: &BindMemoizerConfig,
    logger: &impl Logger,
) -> Result<TransformedSource> {
    with_globals(|| -> Result<TransformedSource> {
        let comments = SingleThreadedComments::default();
        let (cm, mut program) = try_parse_ecma_src_comments(filename, src, Some(&comments))?;
        resolve_program(&mut program, is_typescript_filename(filename));

        let file_logger = WrapFileLogger::new(cm.clone(), logger);
        let report = memoize_render_binds(&mut program, config, &file_logger);
        if report.is_unchanged() {
            return Ok(TransformedSource {
                code: src.to_string(),
                report,
            });
        }

        let code = program_to_str(
            &cm,
            &program,
            PrintArgs {
                comments: Some(&comments),
                ..Default::default()
            },
        );
        Ok(TransformedSource { code, report })
    })
}

pub fn list_render_functions(filename: &str, src: &str) -> Result<Vec<RenderFunction>> {
    with_globals(|| -> Result<Vec<RenderFunction>> {
        let (_cm, program) = try_parse_ecma_src_comments(filename, src, None)?;
        Ok(find_render_functions(&program))
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEntry<'a> {
    file: String,
    render_functions: &'a [RenderFunction],
}

enum FileResult {
    Listed(Vec<RenderFunction>),
    Printed(TransformedSource),
    Written(PathBuf, MemoizeReport),
}

fn process_file(
    path: &Path,
    args: &CliArgs,
    config: &BindMemoizerConfig,
    logger: &impl Logger,
) -> Result<FileResult> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))?;
    let filename = path.to_string_lossy();

    if args.list {
        return Ok(FileResult::Listed(list_render_functions(&filename, &src)?));
    }

    let transformed = transform_source(&filename, &src, config, logger)
        .with_context(|| format!("failed to transform {}", path.display()))?;

    match &args.out_dir {
        Some(out_dir) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
            let out_path = out_dir.join(file_name);
            fs::write(&out_path, &transformed.code)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            Ok(FileResult::Written(out_path, transformed.report))
        }
        None => Ok(FileResult::Printed(transformed)),
    }
}

/// Runs the command line tool, writing listings and transformed sources to
/// `out`.
///
/// Every file is attempted. If any of them fail, the failures are logged and
/// an error is returned at the end.
pub fn run(args: &CliArgs, logger: &(impl Logger + Sync), out: &mut impl Write) -> Result<()> {
    if args.print_schema {
        writeln!(out, "{}", config_schema()?)?;
        return Ok(());
    }

    let config = load_config(args)?;
    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    }

    let results: Vec<Result<FileResult>> = args
        .files
        .par_iter()
        .map(|path| process_file(path, args, &config, logger))
        .collect();

    let mut failures = 0;
    for (path, result) in args.files.iter().zip(results) {
        match result {
            Ok(FileResult::Listed(render_functions)) => {
                let entry = ListEntry {
                    file: path.display().to_string(),
                    render_functions: &render_functions,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
            }
            Ok(FileResult::Printed(transformed)) => {
                logger.debug(format!("{}: {}", path.display(), transformed.report));
                if args.files.len() > 1 {
                    writeln!(out, "// {}", path.display())?;
                }
                writeln!(out, "{}", transformed.code.trim_end())?;
            }
            Ok(FileResult::Written(out_path, report)) => {
                logger.log(format!("{} -> {}: {}", path.display(), out_path.display(), report));
            }
            Err(err) => {
                failures += 1;
                logger.error(format!("{err:#}"));
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "{} of {} files could not be processed",
            failures,
            args.files.len()
        ));
    }
    Ok(())
}
