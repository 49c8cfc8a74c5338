use std::env;
use std::io::{BufRead, Write, stdin, stdout};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use citeweave_config::Config;
use citeweave_engine::{CitationStyle, EditingSession, SourceDoc, render};
use citeweave_sources::SearchClient;

/// Seed draft shown when no file is given, so the search and citation flow
/// can be tried immediately.
const DEMO_DRAFT: &str = "Recent advances in large language model (LLM) technology promise to redefine how we interact with language technologies and use them in the new digital era.\nOne common challenge faced by LLMs is \"hallucination\" where they may produce answers that seem correct but are actually inaccurate or misleading.\nThis can be particularly problematic in scientific investigations where accuracy and reliability of evidences and claims are critical.";

struct App {
    session: EditingSession,
    search: SearchClient,
    draft_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return Ok(());
    }

    let draft_path = args
        .get(1)
        .map(PathBuf::from)
        .or_else(|| config.draft_path.clone());

    let draft = match &draft_path {
        Some(path) if path.exists() => std::fs::read_to_string(path)?,
        Some(path) => {
            log::info!("draft file {} does not exist yet", path.display());
            String::new()
        }
        None => DEMO_DRAFT.to_string(),
    };

    let style = config
        .citation_style
        .as_deref()
        .and_then(|s| s.parse::<CitationStyle>().ok())
        .unwrap_or_default();

    let mut app = App {
        session: EditingSession::new(&draft, style),
        search: SearchClient::new(config.search_key()),
        draft_path,
    };

    println!("citeweave (type 'help' for commands)");
    let stdin = stdin();
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if !app.dispatch(line.trim()).await? {
            break;
        }
    }

    Ok(())
}

impl App {
    /// Run one REPL command. Returns false when the session should end.
    async fn dispatch(&mut self, line: &str) -> Result<bool> {
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "quit" | "exit" => return Ok(false),
            "show" => println!("{}", self.session.text()),
            "render" => println!("{}", render::to_markup(self.session.buffer())),
            "style" => match rest.parse::<CitationStyle>() {
                Ok(style) => {
                    self.session.set_style(style);
                    println!("citation style: {style}");
                }
                Err(e) => eprintln!("{e}"),
            },
            "select" => {
                if self.session.select(rest) {
                    println!("selected: {:?}", rest.trim());
                } else {
                    eprintln!("nothing selected (empty text)");
                }
            }
            "sentence" => match rest.parse::<usize>() {
                Ok(cursor) => {
                    self.session.select_sentence_at(cursor);
                    match self.session.selected_text() {
                        Some(text) => println!("selected sentence: {text:?}"),
                        None => eprintln!("no sentence at offset {cursor}"),
                    }
                }
                Err(_) => eprintln!("usage: sentence <byte-offset>"),
            },
            "search" => self.run_search().await,
            "results" => self.print_results(),
            "cite" => match self.result_at(rest) {
                Some(doc) => {
                    let doc = doc.clone();
                    self.session.insert_citation(&doc);
                    println!("{}", self.session.text());
                }
                None => eprintln!("usage: cite <result-number>"),
            },
            "open" => match self.result_at(rest) {
                Some(doc) => println!("{}", doc.url),
                None => eprintln!("usage: open <result-number>"),
            },
            "save" => self.save()?,
            other => eprintln!("unknown command: {other} (try 'help')"),
        }

        Ok(true)
    }

    async fn run_search(&mut self) {
        let Some(query) = self.session.begin_search() else {
            eprintln!("search already in flight or nothing to search");
            return;
        };

        let results = self.search.search(&query).await;
        self.session.finish_search(results);
        self.print_results();
    }

    fn print_results(&self) {
        if self.session.results().is_empty() {
            println!("no results yet, run 'search' first");
            return;
        }
        for (i, doc) in self.session.results().iter().enumerate() {
            println!("{}. {}", i + 1, doc.title);
            if let Some(author) = &doc.author {
                println!("   {author}");
            }
            if let Some(date) = &doc.published_date {
                println!("   {date}");
            }
            if let Some(highlight) = &doc.highlight {
                println!("   \"{highlight}\"");
            }
        }
    }

    fn result_at(&self, arg: &str) -> Option<&SourceDoc> {
        let index = arg.parse::<usize>().ok()?.checked_sub(1)?;
        self.session.results().get(index)
    }

    fn save(&self) -> Result<()> {
        match &self.draft_path {
            Some(path) => {
                std::fs::write(path, self.session.text())?;
                println!("saved {}", path.display());
            }
            None => eprintln!("no draft path to save to (pass one as an argument)"),
        }
        Ok(())
    }
}

fn print_usage(program: &str) {
    println!("Usage: {program} [draft-file]");
    println!();
    println!("Interactive citation assistant. Reads the draft file (or a demo");
    println!("draft), then accepts commands to select text, search for sources");
    println!("and insert in-line citations.");
}

fn print_help() {
    println!("commands:");
    println!("  show                print the draft text");
    println!("  render              print the draft as markup with citation links");
    println!("  select <text>       select a span of the draft to cite");
    println!("  sentence <offset>   select the sentence around a byte offset");
    println!("  style <name>        set citation style: apa, mla, chicago");
    println!("  search              find sources for the selection (or whole draft)");
    println!("  results             list the current search results");
    println!("  cite <n>            insert a citation for result n");
    println!("  open <n>            print the URL of result n");
    println!("  save                write the draft back to its file");
    println!("  quit                exit");
}
