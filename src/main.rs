use clap::Parser;
use dom::Document;
use host::{HostError, HostEvent, WidgetHost};
use mimalloc::MiMalloc;
use serde_json::{Map, Value};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Runs one query through a typeahead attached to a headless page and
/// prints what the dropdown would show.
#[derive(Debug, Parser)]
#[command(name = "formkit", version)]
struct Cli {
    /// Text typed into the input.
    query: String,

    /// Candidate list: comma separated text, a JSON array, or an endpoint
    /// URL when `--fetch ajax` is used.
    #[arg(long, default_value = "")]
    list: String,

    /// Fetch behaviour reading the list.
    #[arg(long, default_value = "string")]
    fetch: String,

    /// Filter behaviour.
    #[arg(long, default_value = "startswith")]
    filter: String,

    #[arg(long, default_value_t = 10)]
    max_items: usize,

    #[arg(long, default_value_t = 2)]
    min_chars: usize,

    /// How long to wait for a remote fetch.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Print the rendered dropdown markup as well.
    #[arg(long)]
    html: bool,
}

impl Cli {
    fn options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("list".into(), Value::String(self.list.clone()));
        options.insert("fetch".into(), Value::String(self.fetch.clone()));
        options.insert("filter".into(), Value::String(self.filter.clone()));
        options.insert("coerce".into(), Value::String("valueOnly".into()));
        options.insert("maxItems".into(), Value::from(self.max_items));
        options.insert("minChars".into(), Value::from(self.min_chars));
        options
    }
}

fn run(cli: &Cli) -> Result<(), HostError> {
    let mut doc = Document::new();
    let form = doc.create_element("form");
    let input = doc.create("input", &[("type", "text"), ("name", "q")]);
    doc.append_child(form, input)?;
    doc.append_child(doc.body(), form)?;

    let mut host = WidgetHost::new();
    host.attach_typeahead(&mut doc, input, &cli.options())?;

    let now = Instant::now();
    doc.set_value(input, &cli.query)?;
    host.handle(&mut doc, HostEvent::Input { input }, now)?;
    let due = host.next_deadline().unwrap_or(now);
    host.tick(&mut doc, due)?;

    let Some(typeahead) = host.typeahead_mut(input) else {
        return Ok(());
    };
    if typeahead.is_pending() {
        log::info!("waiting for {:?}", typeahead.behaviour_names().fetch);
        typeahead.settle(&mut doc, Duration::from_secs(cli.timeout_secs))?;
    }

    if typeahead.suggestions().is_empty() {
        println!("no suggestions for {:?}", cli.query);
    }
    for suggestion in typeahead.suggestions() {
        if suggestion.label == suggestion.value {
            println!("{}", suggestion.value);
        } else {
            println!("{}\t{}", suggestion.label, suggestion.value);
        }
    }
    if cli.html {
        if let Some(container) = typeahead.container() {
            println!("{}", doc.outer_html(container));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("formkit: {err}");
            ExitCode::FAILURE
        }
    }
}
