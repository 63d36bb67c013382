/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML app definition
[POS]:    CLI initialization layer
[UPDATE]: When AppConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::path::PathBuf;

use lens_builder_adapter::{AppMetadata, EvmAddress, Handle, Platform, validate_uri};

use crate::config::AppConfig;

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to Lens Builder Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a new app definition.").dim()
    );

    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("App name")
        .default("Slice".to_string())
        .interact_text()?;

    let tagline: String = Input::with_theme(&theme)
        .with_prompt("Tagline")
        .allow_empty(true)
        .interact_text()?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;

    let developer: String = Input::with_theme(&theme)
        .with_prompt("Developer (name, or handle such as @slice)")
        .allow_empty(true)
        .validate_with(|input: &String| validate_developer(input))
        .interact_text()?;

    let url: String = Input::with_theme(&theme)
        .with_prompt("Website URL")
        .allow_empty(true)
        .validate_with(optional_uri("url"))
        .interact_text()?;

    let platform_names = ["WEB", "IOS", "ANDROID"];
    let platform_values = [Platform::Web, Platform::Ios, Platform::Android];
    let selected = MultiSelect::with_theme(&theme)
        .with_prompt("Platforms")
        .items(&platform_names)
        .defaults(&[true, false, false])
        .interact()?;

    println!("\n{}", style("--- Ownership ---").bold());
    let admins: String = Input::with_theme(&theme)
        .with_prompt("Admin addresses, comma separated (empty = signer)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            split_list(input)
                .try_for_each(|admin| EvmAddress::parse(admin).map(|_| ()))
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let treasury: String = Input::with_theme(&theme)
        .with_prompt("Treasury address (empty = none)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            if input.is_empty() {
                return Ok(());
            }
            EvmAddress::parse(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let verification = Confirm::with_theme(&theme)
        .with_prompt("Require verification?")
        .default(false)
        .interact()?;

    let logo_path: String = Input::with_theme(&theme)
        .with_prompt("Logo file (empty = none)")
        .allow_empty(true)
        .interact_text()?;

    let config = AppConfig {
        metadata: AppMetadata {
            name,
            tagline: non_empty(tagline),
            description: non_empty(description),
            developer: non_empty(developer).map(|d| match Handle::parse(&d) {
                Ok(handle) => handle.to_string(),
                Err(_) => d,
            }),
            url: non_empty(url),
            logo: None,
            platforms: selected.into_iter().map(|i| platform_values[i]).collect(),
            privacy_policy: None,
            terms_of_service: None,
        },
        admins: split_list(&admins).map(str::to_string).collect(),
        treasury: non_empty(treasury),
        verification: Some(verification),
        logo_path: non_empty(logo_path),
    };
    config.validate().context("app definition is invalid")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize app to YAML")?;

    std::fs::write(&output, yaml)
        .context(format!("failed to write app to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("App definition written to: {}", style(output.display()).cyan());

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Free-form names pass; anything written as `@name` must be a valid handle
fn validate_developer(input: &str) -> Result<(), String> {
    let input = input.trim();
    if !input.starts_with('@') {
        return Ok(());
    }
    Handle::parse(input).map(|_| ()).map_err(|e| e.to_string())
}

fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn optional_uri(field: &'static str) -> impl FnMut(&String) -> Result<(), String> {
    move |input: &String| {
        if input.is_empty() {
            return Ok(());
        }
        validate_uri(input, field).map_err(|e| e.to_string())
    }
}
