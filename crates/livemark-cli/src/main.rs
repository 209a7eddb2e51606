use anyhow::{Context, Result, bail};
use livemark_config::Config;
use livemark_engine::mapping::SourceMapEntry;
use livemark_engine::parsing::text::preview;
use livemark_engine::{
    Block, DeltaTransaction, DocModel, DocumentSession, InlineKind, IncrementalMarkdownParser,
    ModelDiff, RenderedFragment, SourceMapIndex, SourceMapInput,
};
use serde::Serialize;
use std::ops::Range;
use std::path::PathBuf;
use std::{env, process};

const USAGE: &str = "[--edit FROM..TO=TEXT]... [--at POS] [--json] <FILE>";

/// Bytes of block text shown in the block dump.
const PREVIEW_BYTES: usize = 32;

/// Positions this close to a block edge still resolve to the block.
const BLOCK_TOLERANCE: usize = 1;

#[derive(Debug, PartialEq)]
struct Edit {
    range: Range<usize>,
    text: String,
}

#[derive(Debug, Default, PartialEq)]
struct Args {
    file: PathBuf,
    edits: Vec<Edit>,
    at: Option<usize>,
    json: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut file = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--edit" => {
                    let raw = args.next().context("--edit needs FROM..TO=TEXT")?;
                    parsed.edits.push(parse_edit(&raw)?);
                }
                "--at" => {
                    let pos = args.next().context("--at needs a position")?;
                    parsed.at = Some(pos.parse().with_context(|| format!("bad position {pos:?}"))?);
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                path => {
                    if file.replace(PathBuf::from(path)).is_some() {
                        bail!("only one file can be given");
                    }
                }
            }
        }
        parsed.file = file.context("no file given")?;
        Ok(parsed)
    }
}

/// Parses `FROM..TO=TEXT`, where `\n` in TEXT stands for a newline.
fn parse_edit(raw: &str) -> Result<Edit> {
    let (range, text) = raw
        .split_once('=')
        .with_context(|| format!("edit {raw:?} is missing '='"))?;
    let (from, to) = range
        .split_once("..")
        .with_context(|| format!("edit range {range:?} is not FROM..TO"))?;
    let from: usize = from.parse().with_context(|| format!("bad edit start {from:?}"))?;
    let to: usize = to.parse().with_context(|| format!("bad edit end {to:?}"))?;
    if to < from {
        bail!("edit range {from}..{to} is reversed");
    }
    Ok(Edit {
        range: from..to,
        text: text.replace("\\n", "\n"),
    })
}

#[derive(Serialize)]
struct Report<'a> {
    model: &'a DocModel,
    diffs: &'a [ModelDiff],
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<Lookup<'a>>,
}

#[derive(Serialize)]
struct Lookup<'a> {
    position: usize,
    entries: Vec<&'a SourceMapEntry>,
    block: Option<&'a SourceMapEntry>,
}

fn main() {
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: {e}; using default settings");
            Config::default()
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
    log::debug!("config path: {}", Config::config_path().display());

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            let program_name = env::args().next().unwrap_or_else(|| "livemark".to_string());
            eprintln!("Error: {e:#}");
            eprintln!("Usage: {program_name} {USAGE}");
            process::exit(2);
        }
    };

    if let Err(e) = run(&config, args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(config: &Config, args: Args) -> Result<()> {
    let path = Config::expand_path(&args.file).unwrap_or(args.file);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let parser = IncrementalMarkdownParser::new(config.parser_options());
    let mut session = DocumentSession::with_parser(parser, config.session_options());
    let mut diffs: Vec<ModelDiff> = session.set_text(&text).diff.into_iter().collect();

    for edit in &args.edits {
        let current = session.text().to_string();
        if edit.range.end > current.len() {
            bail!(
                "edit {}..{} is past the end of the document ({} bytes)",
                edit.range.start,
                edit.range.end,
                current.len()
            );
        }
        let tx = DeltaTransaction::from_edits(&current, &[(edit.range.clone(), edit.text.as_str())]);
        let update = session.apply_transaction(&tx);
        let meta = update.model.meta();
        log::info!(
            "edit {}..{}: {} parse ({}), reparsed {}..{}",
            edit.range.start,
            edit.range.end,
            meta.parser,
            meta.reason,
            meta.reparsed_from,
            meta.reparsed_to
        );
        diffs.extend(update.diff);
    }

    let model = session.model();
    let fragments: Vec<RenderedFragment> = model
        .inline_spans()
        .iter()
        .filter(|s| matches!(s.kind, InlineKind::Wikilink | InlineKind::Embed))
        .map(|s| RenderedFragment::new(s.from, s.to))
        .collect();
    let index = SourceMapIndex::build(SourceMapInput {
        blocks: model.blocks(),
        rendered_fragments: &fragments,
        active_line: None,
    });
    let lookup = args.at.map(|position| Lookup {
        position,
        entries: index.entries_at(position),
        block: index.block_at(position, BLOCK_TOLERANCE),
    });

    if args.json {
        let report = Report {
            model,
            diffs: &diffs,
            lookup,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_model(model);
        for (i, diff) in diffs.iter().enumerate().skip(1) {
            print_diff(i, diff);
        }
        if let Some(lookup) = lookup {
            print_lookup(&lookup);
        }
    }
    Ok(())
}

fn print_model(model: &DocModel) {
    let meta = model.meta();
    println!(
        "v{} {} bytes, {} parse ({})",
        model.version(),
        model.len(),
        meta.parser,
        meta.reason
    );
    for block in model.blocks() {
        println!("{}", block_line(model, block));
    }
    println!("  {} inline spans", model.inline_spans().len());
}

/// One row of the block dump: range, lines, type, id and a text preview.
fn block_line(model: &DocModel, block: &Block) -> String {
    let text = preview(model.text(), block.span(), PREVIEW_BYTES).replace('\n', "\\n");
    format!(
        "  {:>5}..{:<5} L{}-{} {:<12} {} {text}",
        block.from,
        block.to,
        block.line_from,
        block.line_to,
        block.kind.as_str(),
        block.id
    )
}

fn print_diff(edit: usize, diff: &ModelDiff) {
    let changed = diff
        .changed_range
        .map(|r| format!("{}..{}", r.start, r.end))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "edit {edit}: changed {changed}, +{} -{} ~{} blocks, {:+} inline spans",
        diff.added_ids.len(),
        diff.removed_ids.len(),
        diff.updated_ids.len(),
        diff.inline_span_delta
    );
}

fn print_lookup(lookup: &Lookup<'_>) {
    println!("at {}:", lookup.position);
    for entry in &lookup.entries {
        println!(
            "  {:<17} {}..{} priority {}",
            entry.kind.as_str(),
            entry.source_from,
            entry.source_to,
            entry.priority
        );
    }
    match lookup.block {
        Some(block) => println!(
            "  block {}",
            block.block_id.as_ref().map(|id| id.as_str()).unwrap_or("-")
        ),
        None => println!("  no block"),
    }
}
