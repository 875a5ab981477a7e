use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};

use obhavo_core::favorites::store_from_config;
use obhavo_core::lookup::lookup_from_config;
use obhavo_core::{Config, Controller};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "obhavo", version, about = "Weather lookup with favorite cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and the favorites backend credentials.
    Configure,

    /// Show current weather for a city and exit.
    Show {
        /// City name, e.g. "Tashkent" or "London".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(&city).await,
            // No subcommand: start the interactive session.
            None => session().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:").prompt()?;
    config.set_weather_api_key(api_key.trim().to_string());

    let url = Text::new("Favorites store URL:")
        .with_help_message("Project base URL, e.g. https://xyz.supabase.co")
        .prompt()?;
    let store_key = Text::new("Favorites store API key:").prompt()?;
    config.set_store(url.trim().to_string(), store_key.trim().to_string());

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

fn build_controller(config: &Config) -> Result<Controller> {
    Ok(Controller::new(
        lookup_from_config(config)?,
        store_from_config(config)?,
    ))
}

async fn show(city: &str) -> Result<()> {
    let config = Config::load()?;
    let mut controller = build_controller(&config)?;

    controller.submit(city).await;
    render::search_result(&controller);

    Ok(())
}

const SEARCH: &str = "Search a city";
const ADD_FAVORITE: &str = "Add current city to favorites";
const FAVORITES: &str = "Favorites";
const QUIT: &str = "Quit";

const FAV_VIEW: &str = "View weather";
const FAV_EDIT: &str = "Edit notes";
const FAV_DELETE: &str = "Delete";
const FAV_BACK: &str = "Back";

async fn session() -> Result<()> {
    let config = Config::load()?;
    anyhow::ensure!(
        config.is_complete(),
        "obhavo is not configured yet.\n\
         Hint: run `obhavo configure` and enter the weather API key and store credentials."
    );

    let mut controller = build_controller(&config)?;
    controller.init().await;

    loop {
        let mut options = vec![SEARCH];
        if controller.snapshot().is_some() {
            options.push(ADD_FAVORITE);
        }
        if !controller.favorites().is_empty() {
            options.push(FAVORITES);
        }
        options.push(QUIT);

        match Select::new("What next?", options).prompt()? {
            SEARCH => {
                let city = Text::new("City name:")
                    .with_initial_value(controller.city())
                    .prompt()?;
                controller.set_city(city.clone());
                controller.submit(&city).await;
                render::search_result(&controller);
            }
            ADD_FAVORITE => {
                controller.add_favorite().await;
                println!("Favorites: {}", controller.favorites().len());
            }
            FAVORITES => favorites_menu(&mut controller).await?,
            _ => return Ok(()),
        }
    }
}

async fn favorites_menu(controller: &mut Controller) -> Result<()> {
    let labels: Vec<String> = controller
        .favorites()
        .iter()
        .map(render::favorite_line)
        .collect();

    let choice = Select::new("Favorite:", labels).raw_prompt()?;
    let favorite = controller.favorites()[choice.index].clone();

    match Select::new(
        "Action:",
        vec![FAV_VIEW, FAV_EDIT, FAV_DELETE, FAV_BACK],
    )
    .prompt()?
    {
        FAV_VIEW => {
            controller.load_favorite(&favorite).await;
            render::search_result(controller);
        }
        FAV_EDIT => {
            controller.start_edit(favorite.id);
            let draft = controller
                .edit()
                .map(|e| e.draft.clone())
                .unwrap_or_default();

            // Esc cancels the edit without touching the store.
            match Text::new("Notes:")
                .with_initial_value(&draft)
                .prompt_skippable()?
            {
                Some(notes) => {
                    controller.set_draft(notes);
                    let draft = controller
                        .edit()
                        .map(|e| e.draft.clone())
                        .unwrap_or_default();
                    controller.save_edit(favorite.id, &draft).await;
                }
                None => controller.cancel_edit(),
            }
        }
        FAV_DELETE => {
            controller.delete_favorite(favorite.id).await;
            println!("Deleted {}", favorite.city_name);
        }
        _ => {}
    }

    Ok(())
}
