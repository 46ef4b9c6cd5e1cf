//! # CLI Layer
//!
//! One client of the fluffcook library. This is the only place that reads
//! stdin, writes to stdout, prompts for confirmation or sets up logging.
//!
//! - `run()`: parse arguments, initialize logging and context, dispatch
//! - `handle_*()`: call the API and hand the `CmdResult` to `print`

mod args;
mod print;

use args::{CacheCommands, Cli, Commands};
use clap::Parser;
use fluffcook::acquire::DefaultKitchen;
use fluffcook::api::{CmdResult, ConfigAction, RecipeUpdate};
use fluffcook::editor::edit_draft;
use fluffcook::error::{FluffError, Result};
use fluffcook::init::{initialize, FluffContext};
use fluffcook::model::{Mode, RecipeDraft};
use fluffcook::offline::origin::{AssetRequest, DirOrigin};
use print::{
    print_cache_status, print_config, print_full_recipes, print_messages, print_plain_recipes,
    print_recipe_list,
};
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut ctx = initialize()?;

    match cli.command {
        None | Some(Commands::List) => handle_list(&ctx),
        Some(Commands::View { indexes, plain }) => handle_view(&ctx, &indexes, plain),
        Some(Commands::Create {
            title,
            ingredients,
            steps,
        }) => handle_create(&mut ctx, title, ingredients, steps),
        Some(Commands::Edit { index }) => handle_edit(&mut ctx, &index),
        Some(Commands::Delete { indexes, yes }) => handle_delete(&mut ctx, &indexes, yes),
        Some(Commands::Fav { indexes }) => handle_fav(&mut ctx, &indexes),
        Some(Commands::Cook { input }) => handle_cook(&mut ctx, input, Mode::Extract).await,
        Some(Commands::Generate { description }) => {
            handle_cook(&mut ctx, description, Mode::Generate).await
        }
        Some(Commands::Export { out }) => handle_export(&ctx, out),
        Some(Commands::Import { path, yes }) => handle_import(&mut ctx, path, yes),
        Some(Commands::Key { key, clear }) => handle_key(&mut ctx, key, clear),
        Some(Commands::Rules { rules, clear }) => handle_rules(&mut ctx, rules, clear),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Cache(cmd)) => match cmd {
            CacheCommands::Install { origin } => handle_cache_install(&ctx, origin).await,
            CacheCommands::Status => handle_cache_status(&ctx).await,
            CacheCommands::Fetch {
                path,
                method,
                origin,
            } => handle_cache_fetch(&ctx, &path, &method, origin).await,
        },
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .try_init();
}

fn handle_list(ctx: &FluffContext) -> Result<()> {
    let result = ctx.api.list_recipes()?;
    print_recipe_list(&result.listed_recipes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &FluffContext, indexes: &[String], plain: bool) -> Result<()> {
    let result = ctx.api.view_recipes(indexes)?;
    if plain {
        print_plain_recipes(&result.listed_recipes);
    } else {
        print_full_recipes(&result.listed_recipes);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_create(
    ctx: &mut FluffContext,
    title: Option<String>,
    ingredients: Vec<String>,
    steps: Vec<String>,
) -> Result<()> {
    let draft = match title {
        Some(title) => RecipeDraft::from_lines(&title, ingredients, steps),
        None => edit_draft(&RecipeDraft::from_lines("", ingredients, steps))?,
    };
    let result = ctx.api.create_recipe(draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut FluffContext, index: &str) -> Result<()> {
    let viewed = ctx.api.view_recipes(&[index])?;
    let Some(current) = viewed.listed_recipes.into_iter().next() else {
        return Err(FluffError::Api(format!("Nothing to edit at {}", index)));
    };

    let initial = RecipeDraft::from(&current.recipe);
    let edited = edit_draft(&initial)?;
    if edited == initial {
        println!("No changes.");
        return Ok(());
    }

    let result = ctx
        .api
        .update_recipes(&[RecipeUpdate::new(current.index, edited)])?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut FluffContext, indexes: &[String], yes: bool) -> Result<()> {
    if !yes {
        let targets = ctx.api.view_recipes(indexes)?;
        for dr in &targets.listed_recipes {
            println!("  {}. {}", dr.index.0, dr.recipe.title);
        }
        let prompt = format!(
            "Delete {} recipe(s) permanently? [y/N] ",
            targets.listed_recipes.len()
        );
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let result = ctx.api.delete_recipes(indexes)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_fav(ctx: &mut FluffContext, indexes: &[String]) -> Result<()> {
    let result = ctx.api.toggle_favorites(indexes)?;
    print_messages(&result.messages);
    Ok(())
}

/// Words are joined with spaces. With no words and piped stdin, the piped
/// text is the input.
async fn handle_cook(ctx: &mut FluffContext, words: Vec<String>, mode: Mode) -> Result<()> {
    let mut input = words.join(" ");
    if input.trim().is_empty() && !std::io::stdin().is_terminal() {
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(FluffError::Io)?;
    }

    let kitchen = DefaultKitchen::from_config(&ctx.config)?;
    let result = ctx.api.cook(&kitchen, &input, mode).await?;
    print_messages(&result.messages);
    print_affected(&result);
    Ok(())
}

fn handle_export(ctx: &FluffContext, out: PathBuf) -> Result<()> {
    let result = ctx.api.export_recipes(&out)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut FluffContext, path: PathBuf, yes: bool) -> Result<()> {
    let mut prompt_error = None;
    let result = ctx.api.import_recipes(&path, |count| {
        if yes {
            return true;
        }
        let prompt = format!("Found {} recipes. Overwrite current list? [y/N] ", count);
        match confirm(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                prompt_error = Some(e);
                false
            }
        }
    })?;
    if let Some(e) = prompt_error {
        return Err(e);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_key(ctx: &mut FluffContext, key: Option<String>, clear: bool) -> Result<()> {
    let result = match (key, clear) {
        (_, true) => ctx.api.set_api_key(None)?,
        (Some(key), false) => ctx.api.set_api_key(Some(&key))?,
        (None, false) => ctx.api.show_api_key()?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_rules(ctx: &mut FluffContext, rules: Vec<String>, clear: bool) -> Result<()> {
    let result = if clear {
        ctx.api.set_rules(None)?
    } else if rules.is_empty() {
        ctx.api.show_rules()?
    } else {
        ctx.api.set_rules(Some(&rules.join(" ")))?
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &FluffContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_cache_install(ctx: &FluffContext, origin: PathBuf) -> Result<()> {
    let result = ctx.api.install_cache(DirOrigin::new(origin)).await?;
    print_messages(&result.messages);
    if let Some(status) = &result.cache_status {
        print_cache_status(status);
    }
    Ok(())
}

async fn handle_cache_status(ctx: &FluffContext) -> Result<()> {
    // Status never reaches the origin; any directory will do.
    let result = ctx.api.cache_status(DirOrigin::new(".")).await?;
    if let Some(status) = &result.cache_status {
        print_cache_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_cache_fetch(
    ctx: &FluffContext,
    path: &str,
    method: &str,
    origin: PathBuf,
) -> Result<()> {
    let request = AssetRequest::new(method, path);
    let result = ctx
        .api
        .cache_fetch(DirOrigin::new(origin), &request)
        .await?;
    print_messages(&result.messages);
    Ok(())
}

fn print_affected(result: &CmdResult) {
    for recipe in &result.affected_recipes {
        println!();
        println!("{}", recipe.to_plain_text());
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush().map_err(FluffError::Io)?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(FluffError::Io)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
