// ebnftty: ISO/IEC 14977 EBNF parser and syntax-tree explorer

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ebnftty::format::{FormatConfig, Formatter, NewlineKind, QuoteStyle};
use ebnftty::parser::{parse_document, ParseError};
use ebnftty::ui::App;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuoteArg {
    Preserve,
    Single,
    Double,
}

impl From<QuoteArg> for QuoteStyle {
    fn from(arg: QuoteArg) -> Self {
        match arg {
            QuoteArg::Preserve => QuoteStyle::Preserve,
            QuoteArg::Single => QuoteStyle::Single,
            QuoteArg::Double => QuoteStyle::Double,
        }
    }
}

/// Parse an ISO/IEC 14977 EBNF grammar and explore its syntax tree
#[derive(Debug, ClapParser)]
#[command(name = "ebnftty", version, about)]
struct Args {
    /// Grammar file to read
    file: PathBuf,

    /// Print the grammar in canonical layout and exit
    #[arg(long, conflicts_with_all = ["dump", "check"])]
    fmt: bool,

    /// Print the structural form of every rule and exit
    #[arg(long, conflicts_with = "check")]
    dump: bool,

    /// Only parse and report the number of rules
    #[arg(long)]
    check: bool,

    /// Width above which a rule is split one alternative per line
    #[arg(long, value_name = "N", default_value_t = FormatConfig::default().line_width)]
    line_width: usize,

    /// Quote character for terminal strings
    #[arg(long, value_enum, default_value_t = QuoteArg::Preserve)]
    quotes: QuoteArg,

    /// Write CRLF line endings
    #[arg(long)]
    crlf: bool,
}

impl Args {
    fn format_config(&self) -> FormatConfig {
        FormatConfig {
            line_width: self.line_width,
            newline: if self.crlf {
                NewlineKind::Windows
            } else {
                NewlineKind::Unix
            },
            quote_style: self.quotes.into(),
            ..FormatConfig::default()
        }
    }
}

/// Print a parse error with the offending line and a caret under the column
fn report(path: &Path, source: &str, error: &ParseError) {
    eprintln!("error: {}", error);

    let Some(location) = error.location() else {
        eprintln!("  --> {}", path.display());
        return;
    };

    eprintln!("  --> {}:{}:{}", path.display(), location.line, location.column);
    if let Some(line) = source.lines().nth(location.line.saturating_sub(1)) {
        let gutter = location.line.to_string();
        let caret_pad: String = line
            .chars()
            .take(location.column.saturating_sub(1))
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        eprintln!("{} |", " ".repeat(gutter.len()));
        eprintln!("{} | {}", gutter, line);
        eprintln!("{} | {}^", " ".repeat(gutter.len()), caret_pad);
    }
}

fn run_explorer(app: &mut App) -> io::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let document = match parse_document(&source) {
        Ok(document) => document,
        Err(e) => {
            report(&args.file, &source, &e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        file = %args.file.display(),
        rules = document.syntax.rules.len(),
        "parsed grammar"
    );

    if args.check {
        println!(
            "{}: {} rule(s)",
            args.file.display(),
            document.syntax.rules.len()
        );
        return ExitCode::SUCCESS;
    }

    if args.dump {
        for rule in &document.syntax.rules {
            println!("{}", rule);
        }
        return ExitCode::SUCCESS;
    }

    if args.fmt {
        let config = args.format_config();
        print!("{}", Formatter::new(&document, &source, &config).format());
        return ExitCode::SUCCESS;
    }

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let mut app = App::new(document, source, file_name);
    if let Err(err) = run_explorer(&mut app) {
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
