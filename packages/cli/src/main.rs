mod api;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password, Select};

use crate::api::{ApiClient, ContentForm, ContentRecord};
use crate::session::{EditDraft, body_lines};

#[derive(Parser)]
#[command(name = "campus-admin", about = "Terminal admin client for the Campus CMS API")]
struct Cli {
    /// Base URL of the API server.
    #[arg(long, env = "CAMPUS_API_URL", default_value = "http://127.0.0.1:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the token for later commands.
    Login,
    /// Manage page content records.
    #[command(subcommand)]
    Content(ContentCommand),
}

#[derive(Subcommand)]
enum ContentCommand {
    /// List active content records.
    List {
        /// Only show one section.
        #[arg(long)]
        section: Option<String>,
    },
    /// Show one record in full.
    Show { id: i32 },
    /// Create a new record.
    Create {
        #[arg(long)]
        section: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, default_value_t = 0)]
        order: i32,
        /// Create the record as a hidden draft.
        #[arg(long)]
        inactive: bool,
        /// Image files to upload (repeatable, max 5).
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Edit a record interactively.
    Edit { id: i32 },
    /// Delete a record.
    Delete { id: i32 },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", style("error:").red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut client = ApiClient::new(&cli.api_url);

    match cli.command {
        Command::Login => login(&mut client),
        Command::Content(cmd) => content(&client, cmd),
    }
}

fn login(client: &mut ApiClient) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    let username = client.login(&username, &password)?;
    println!("{} logged in as {}", style("✓").green(), style(username).bold());
    Ok(())
}

fn content(client: &ApiClient, cmd: ContentCommand) -> Result<()> {
    match cmd {
        ContentCommand::List { section } => {
            let records = client.list_content(section.as_deref())?;
            if records.is_empty() {
                println!("no content records");
                return Ok(());
            }
            for record in records {
                println!(
                    "{:>5}  {:<14} {:<40} order={} images={}",
                    record.id,
                    record.section,
                    truncate(&record.title, 40),
                    record.order,
                    record.images.len(),
                );
            }
            Ok(())
        }
        ContentCommand::Show { id } => {
            let record = client.get_content(id)?;
            print_record(&record);
            Ok(())
        }
        ContentCommand::Create {
            section,
            title,
            subtitle,
            description,
            body,
            order,
            inactive,
            images,
        } => {
            let record = client.create_content(ContentForm {
                section,
                title,
                subtitle,
                description,
                body,
                order,
                is_active: !inactive,
                existing_images: None,
                uploads: images.into_iter().map(|p| (p, None)).collect(),
            })?;
            println!("{} created record {}", style("✓").green(), record.id);
            Ok(())
        }
        ContentCommand::Edit { id } => edit(client, id),
        ContentCommand::Delete { id } => {
            let record = client.get_content(id)?;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete '{}' ({})? This cannot be undone",
                    record.title, record.section
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("aborted");
                return Ok(());
            }
            client.delete_content(id)?;
            println!("{} deleted record {id}", style("✓").green());
            Ok(())
        }
    }
}

/// Interactive edit session: snapshot the record, mutate the draft from a
/// menu, and only hit the server on save.
fn edit(client: &ApiClient, id: i32) -> Result<()> {
    let record = client.get_content(id)?;
    print_record(&record);
    let mut draft = EditDraft::open(&record);

    loop {
        let choices = [
            "edit title",
            "edit subtitle",
            "edit description",
            "edit body",
            "edit order",
            "toggle active",
            "attach image",
            "remove image",
            "save",
            "cancel",
        ];
        let choice = Select::new()
            .with_prompt("Edit")
            .items(&choices)
            .default(8)
            .interact()?;

        match choices[choice] {
            "edit title" => {
                draft.title = Input::new()
                    .with_prompt("Title")
                    .with_initial_text(&draft.title)
                    .interact_text()?;
            }
            "edit subtitle" => draft.subtitle = prompt_optional("Subtitle", &draft.subtitle)?,
            "edit description" => {
                draft.description = prompt_optional("Description", &draft.description)?;
            }
            "edit body" => draft.body = prompt_optional("Body", &draft.body)?,
            "edit order" => {
                draft.order = Input::new()
                    .with_prompt("Order")
                    .with_initial_text(draft.order.to_string())
                    .interact_text()?;
            }
            "toggle active" => {
                draft.is_active = !draft.is_active;
                println!("is_active: {}", draft.is_active);
            }
            "attach image" => {
                let path: String = Input::new().with_prompt("File path").interact_text()?;
                let caption: String = Input::new()
                    .with_prompt("Caption (empty for none)")
                    .allow_empty(true)
                    .interact_text()?;
                draft.attach_upload(
                    PathBuf::from(path),
                    (!caption.trim().is_empty()).then(|| caption.trim().to_string()),
                );
            }
            "remove image" => {
                if draft.kept_images().is_empty() {
                    println!("no images to remove");
                    continue;
                }
                let items: Vec<String> = draft
                    .kept_images()
                    .iter()
                    .map(|m| {
                        format!("{} ({})", m.url, m.caption.as_deref().unwrap_or("no caption"))
                    })
                    .collect();
                let index = Select::new()
                    .with_prompt("Remove which image")
                    .items(&items)
                    .interact()?;
                draft.remove_image(index);
            }
            "save" => {
                let updated = draft.save(client)?;
                println!("{} saved", style("✓").green());
                print_record(&updated);
                return Ok(());
            }
            "cancel" => {
                draft.cancel();
                println!("discarded");
                return Ok(());
            }
            _ => unreachable!(),
        }
    }
}

fn prompt_optional(prompt: &str, current: &Option<String>) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(format!("{prompt} (empty to clear)"))
        .with_initial_text(current.as_deref().unwrap_or(""))
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn print_record(record: &ContentRecord) {
    println!(
        "{} {} [{}]{}",
        style(format!("#{}", record.id)).bold(),
        style(&record.title).bold(),
        record.section,
        if record.is_active { "" } else { " (inactive)" },
    );
    if let Some(subtitle) = &record.subtitle {
        println!("  {subtitle}");
    }
    if let Some(description) = &record.description {
        println!("  {description}");
    }
    if let Some(body) = &record.body {
        for line in body_lines(body) {
            println!("  | {line}");
        }
    }
    for image in &record.images {
        println!(
            "  [{}] {} {}",
            image.order,
            image.url,
            image.caption.as_deref().unwrap_or(""),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
