// Command-line interface for sticky notes
//
// Notes are stored as markdown. This binary formats, converts and inspects note files using the
// sticky-babel library, reading its formatting rules from sticky-config.
//
// Formatting:
//
// The format command round-trips a note through the parser and serializer and prints the
// canonical form. --check only reports whether the file is already canonical (exit status 1 if
// not), --write rewrites the file in place.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag. The to falls back to
// convert.default_format from the configuration.
// Usage:
//  sticky format <file> [--check] [--write]                        - Normalize a note
//  sticky convert <file> [--to <format>] [--from <format>] [-o <file>]  - Convert between formats
//  sticky inspect <file> [<transform>]                            - Debug views (defaults to "tree")
//  sticky --list-formats                                          - List available formats
//
// Configuration is read from ./sticky.toml when present, then from --config, then from STICKY_*
// environment variables. Logging goes to stderr and is controlled with RUST_LOG.

use sticky_cli::transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use sticky_babel::transforms::normalize_markdown_with_rules;
use sticky_babel::{FormatRegistry, FormattingRules};
use sticky_config::{Loader, StickyConfig};
use std::fs;

const LOCAL_CONFIG: &str = "sticky.toml";

/// The positional file argument every subcommand starts with.
fn note_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("sticky")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for formatting, converting and inspecting sticky notes")
        .long_about(
            "sticky is a command-line tool for working with sticky note files.\n\n\
            Commands:\n  \
            - format:  Normalize a note to its canonical markdown form\n  \
            - convert: Transform between formats (markdown, html, treeviz)\n  \
            - inspect: View internal representations (tree, events, etc.)\n\n\
            Examples:\n  \
            sticky format note.md --check          # Exit 1 if the note is not canonical\n  \
            sticky convert note.md --to html       # Editor markup on stdout\n  \
            sticky inspect note.md events          # View the event stream",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a sticky.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Normalize a note file")
                .long_about(
                    "Parse a markdown note and re-serialize it in canonical form.\n\n\
                    Markers, indentation, numbering and blank runs are rewritten according to\n\
                    the formatting rules. Output goes to stdout unless --write is given.\n\n\
                    Examples:\n  \
                    sticky format note.md                 # Canonical form to stdout\n  \
                    sticky format note.md --write         # Rewrite in place\n  \
                    sticky format note.md --check         # Only report",
                )
                .arg(note_arg("input", "Note to read"))
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Exit with status 1 if the file is not already normalized")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("write"),
                )
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Write the normalized note back to the file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats")
                .long_about(
                    "Convert notes between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Note storage format (.md)\n  \
                    - html:     Editing-surface markup (.html)\n  \
                    - treeviz:  Tree outline, output only (.tree)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(note_arg("input", "Note to read"))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Format of the input, when the extension does not say")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to convert.default_format)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write here instead of stdout")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the parsed structure of a note")
                .long_about(
                    "View the document tree built for a note.\n\n\
                    Transforms:\n  \
                    - tree:      Tree visualization (default)\n  \
                    - tree-json: Tree as JSON\n  \
                    - events:    Flat event stream\n  \
                    - html:      Editing-surface markup",
                )
                .arg(note_arg("path", "Note to inspect"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'tree'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    let rules = FormattingRules::from(&config.formatting.rules);
    let registry = FormatRegistry::with_rules(rules.clone());

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    match matches.subcommand() {
        Some(("format", sub_matches)) => handle_format_command(sub_matches, &rules),
        Some(("convert", sub_matches)) => {
            handle_convert_command(sub_matches, &registry, &config)
        }
        Some(("inspect", sub_matches)) => handle_inspect_command(sub_matches, &registry),
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

fn load_cli_config(config_path: Option<&str>) -> StickyConfig {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = config_path {
        loader = loader.with_file(path);
    }
    loader
        .with_env()
        .build()
        .unwrap_or_else(|err| fail(format!("Error loading configuration: {err}")))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1)
}

fn required_arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("Error: missing argument '{name}'")))
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("Error reading file '{path}': {e}")))
}

fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for format in registry.formats() {
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "read/write",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "-",
        };
        println!(
            "  {:<10} {direction:<11} .{}  {}",
            format.name(),
            format.file_extensions().join(", ."),
            format.description()
        );
    }
}

fn handle_format_command(matches: &ArgMatches, rules: &FormattingRules) {
    let input = required_arg(matches, "input");
    let source = read_source(input);
    let normalized = normalize_markdown_with_rules(&source, rules);
    log::debug!(
        "formatted {input}: {} -> {} bytes",
        source.len(),
        normalized.len()
    );

    if matches.get_flag("check") {
        if normalized != source {
            fail(format!("{input} is not normalized"))
        }
        return;
    }

    if matches.get_flag("write") {
        if normalized != source {
            fs::write(input, &normalized)
                .unwrap_or_else(|e| fail(format!("Error writing file '{input}': {e}")));
        }
        return;
    }

    print!("{normalized}");
}

fn detect_source_format(registry: &FormatRegistry, input: &str) -> String {
    registry
        .detect_format_from_filename(input)
        .unwrap_or_else(|| {
            fail(format!(
                "Error: Could not detect format from filename '{input}'\n\
                 Please specify --from explicitly"
            ))
        })
}

fn handle_convert_command(matches: &ArgMatches, registry: &FormatRegistry, config: &StickyConfig) {
    let input = required_arg(matches, "input");
    let from = match matches.get_one::<String>("from") {
        Some(from) => from.clone(),
        None => detect_source_format(registry, input),
    };
    let to = matches
        .get_one::<String>("to")
        .unwrap_or(&config.convert.default_format);

    for name in [from.as_str(), to.as_str()] {
        if let Err(e) = registry.get(name) {
            fail(format!("Error: {e}"))
        }
    }

    let source = read_source(input);
    let tree = registry
        .parse(&source, &from)
        .unwrap_or_else(|e| fail(format!("Parse error: {e}")));
    let result = registry
        .serialize(&tree, to)
        .unwrap_or_else(|e| fail(format!("Serialization error: {e}")));

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, result)
            .unwrap_or_else(|e| fail(format!("Error writing file '{path}': {e}"))),
        None => println!("{result}"),
    }
}

fn handle_inspect_command(matches: &ArgMatches, registry: &FormatRegistry) {
    let path = required_arg(matches, "path");
    let transform = matches
        .get_one::<String>("transform")
        .map(|s| s.as_str())
        .unwrap_or(transforms::DEFAULT_TRANSFORM);

    let from = registry
        .detect_format_from_filename(path)
        .unwrap_or_else(|| "markdown".to_string());
    let source = read_source(path);
    let tree = registry
        .parse(&source, &from)
        .unwrap_or_else(|e| fail(format!("Parse error: {e}")));

    let output = transforms::execute_transform(&tree, transform)
        .unwrap_or_else(|e| fail(format!("Error: {e}")));

    print!("{output}");
}
