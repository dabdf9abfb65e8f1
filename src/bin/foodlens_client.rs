//! Terminal front-end for the FoodLens API.
//!
//! Upload a meal photo, pick or correct the recognized name, then look up
//! its nutrition. Calls run one at a time, only when a command asks for it.

use anyhow::Result;
use clap::Parser;
use foodlens::client::{render, ApiClient, NutritionOutcome, Session, UploadedImage};
use foodlens::config::ClientConfig;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "foodlens-client")]
#[command(about = "Interactive client for the FoodLens API")]
struct CliArgs {
    /// Base URL of the API (overrides API_BASE_URL).
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,

    /// Image to upload right away.
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Upload(PathBuf),
    Recognize,
    Select(usize),
    Name(String),
    Nutrition,
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  upload <path>   load a jpg/jpeg/png image
  recognize       identify the food in the image
  select <n>      pick candidate number n
  name <text>     correct the name (empty clears it)
  nutrition       get nutritional info for the chosen name
  show            show the current session
  help            show this help
  quit            exit";

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "upload" | "load" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "upload" | "load" => Err("Usage: upload <path>".to_string()),
        "recognize" => Ok(Command::Recognize),
        "select" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Command::Select(n - 1))
            .ok_or_else(|| "Usage: select <n> (n starts at 1)".to_string()),
        "name" => Ok(Command::Name(rest.to_string())),
        "nutrition" => Ok(Command::Nutrition),
        "show" | "" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}'. Type `help`.", other)),
    }
}

/// Inputs of the nutrition form. They belong to one candidate list and are
/// reset whenever that list changes.
#[derive(Debug, Default)]
struct FormInput {
    selected: usize,
    manual: String,
}

struct Repl {
    api: ApiClient,
    session: Session,
    form: FormInput,
}

impl Repl {
    async fn upload(&mut self, path: PathBuf) {
        match UploadedImage::from_file(&path).await {
            Ok(image) => {
                if self.session.load_image(image) {
                    self.form = FormInput::default();
                }
                println!("{}", render::session(&self.session, self.form.selected));
            }
            Err(e) => println!("Could not load {}: {}", path.display(), e),
        }
    }

    async fn recognize(&mut self) {
        println!("Analyzing your meal...");
        let before = self.session.candidates().to_vec();
        self.session.recognize(&self.api).await;
        if self.session.candidates() != before.as_slice() {
            self.form = FormInput::default();
        }
        println!("{}", render::session(&self.session, self.form.selected));
    }

    async fn nutrition(&mut self) {
        let selected = self
            .session
            .candidates()
            .get(self.form.selected)
            .cloned();
        if let Some(name) = foodlens::client::session::resolve_food_name(
            selected.as_deref(),
            &self.form.manual,
        ) {
            println!("Fetching details for {}...", name);
        }

        match self
            .session
            .request_nutrition(&self.api, selected.as_deref(), &self.form.manual)
            .await
        {
            NutritionOutcome::MissingName => println!("Please select or enter a food name."),
            NutritionOutcome::NoCandidates => {
                println!("Recognize the food first with `recognize`.")
            }
            NutritionOutcome::Fetched | NutritionOutcome::Failed => {
                println!("{}", render::session(&self.session, self.form.selected))
            }
        }
    }

    fn select(&mut self, index: usize) {
        let candidates = self.session.candidates();
        if index < candidates.len() {
            self.form.selected = index;
            print!("{}", render::candidate_list(candidates, index));
        } else {
            println!("There are {} candidates.", candidates.len());
        }
    }

    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Upload(path) => self.upload(path).await,
            Command::Recognize => self.recognize().await,
            Command::Select(index) => self.select(index),
            Command::Name(name) => {
                self.form.manual = name;
                if self.form.manual.trim().is_empty() {
                    println!("Manual name cleared.");
                } else {
                    println!("Using '{}' for the lookup.", self.form.manual.trim());
                }
            }
            Command::Nutrition => self.nutrition().await,
            Command::Show => println!("{}", render::session(&self.session, self.form.selected)),
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodlens=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }

    let mut repl = Repl {
        api: ApiClient::new(config.api_base_url),
        session: Session::new(),
        form: FormInput::default(),
    };

    println!("FoodLens AI");
    println!("Upload a picture of your meal, recognize it, and get the nutritional breakdown.");
    println!("{}\n", HELP);

    if let Some(path) = args.image {
        repl.upload(path).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Ok(command) => {
                if !repl.handle(command).await {
                    break;
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    Ok(())
}
