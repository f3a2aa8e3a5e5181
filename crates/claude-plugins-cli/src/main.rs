use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::{ColoredString, Colorize};
use tracing_subscriber::EnvFilter;

use claude_plugins_core::{
    ClaudePaths, PluginManager, PluginState, Result, Scope,
};

mod args;
use args::{Cli, Commands, ScopeArg, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        Some(command) => ClaudePaths::resolve(cli.claude_dir)
            .map(PluginManager::new)
            .and_then(|manager| run(&manager, command)),
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[FAIL]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Logs go to stderr. RUST_LOG wins over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn run(manager: &PluginManager, command: Commands) -> Result<()> {
    match command {
        Commands::List { path, json } => handle_list(manager, path.as_deref(), json),
        Commands::Enable { plugin, path } => {
            let id = manager.enable(&plugin, path.as_deref())?;
            println!("{} Plugin '{}' enabled", "[OK]".green(), id.as_str().cyan());
            Ok(())
        }
        Commands::Disable { plugin, path } => {
            let id = manager.disable(&plugin, path.as_deref())?;
            println!("{} Plugin '{}' disabled", "[OK]".green(), id.as_str().cyan());
            Ok(())
        }
        Commands::ChangeScope {
            plugin,
            scope,
            path,
            index,
        } => {
            let scope = to_scope(scope);
            let id = manager.change_scope(&plugin, scope, index, path.as_deref())?;
            println!(
                "{} Changed scope of '{}' to '{}'",
                "[OK]".green(),
                id.as_str().cyan(),
                scope
            );
            Ok(())
        }
        Commands::Sync { path } => handle_sync(manager, path.as_deref()),
        Commands::Info { path } => handle_info(manager, path.as_deref()),
        Commands::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    }
}

fn to_scope(scope: ScopeArg) -> Scope {
    match scope {
        ScopeArg::Project => Scope::Project,
        ScopeArg::User => Scope::User,
        ScopeArg::Global => Scope::Global,
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "claude-plugins", &mut io::stdout());
}

fn state_label(state: PluginState) -> ColoredString {
    match state {
        PluginState::Enabled => "Enabled".green(),
        PluginState::Disabled => "Disabled".red(),
        PluginState::Undefined => "Undefined".yellow(),
    }
}

fn handle_list(manager: &PluginManager, project: Option<&Path>, json: bool) -> Result<()> {
    let status = manager.plugin_status(project)?;

    if json {
        let mut map = serde_json::Map::new();
        for (id, view) in &status {
            map.insert(id.to_string(), serde_json::to_value(view)?);
        }
        let output = serde_json::to_string_pretty(&map)?;
        println!("{}", output);
        return Ok(());
    }

    if status.is_empty() {
        println!("{}", "No plugins installed".yellow());
    } else {
        println!();
        println!("{}", "Installed Claude Plugins".bold());
        for (id, view) in &status {
            let scopes = if view.all_scopes.is_empty() {
                "unknown".to_string()
            } else {
                view.all_scopes.join(", ")
            };
            println!("  {}", id.as_str().cyan().bold());
            println!(
                "    version: {}  scope: {}",
                view.version.as_deref().unwrap_or("unknown").blue(),
                scopes.yellow()
            );
            println!(
                "    global: {}  local: {}",
                state_label(view.global_status),
                state_label(view.local_status)
            );
        }
    }

    let description = manager.describe_config(project)?;
    println!();
    println!("{} {}", "Project:".bold(), description.project.display());
    if description.local_settings_exists {
        println!(
            "{} {}",
            "Local settings:".bold(),
            description.local_settings.display().to_string().green()
        );
    } else {
        println!("{} {}", "Local settings:".bold(), "Not found".yellow());
    }
    println!(
        "{} {}",
        "Global settings:".bold(),
        description.global_settings.display()
    );

    Ok(())
}

fn handle_sync(manager: &PluginManager, project: Option<&Path>) -> Result<()> {
    let report = manager.sync(project)?;

    if report.added.is_empty() {
        println!("{}", "All plugins are already defined in local settings".yellow());
    } else {
        println!(
            "{} Added {} plugin(s) to local settings (disabled):",
            "[OK]".green(),
            report.added.len()
        );
        for id in &report.added {
            println!("  + {}", id.as_str().cyan());
        }
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} already defined plugin(s):", report.skipped.len());
        for id in &report.skipped {
            println!("  = {}", id.as_str().dimmed());
        }
    }

    Ok(())
}

fn handle_info(manager: &PluginManager, project: Option<&Path>) -> Result<()> {
    let description = manager.describe_config(project)?;

    let exists = |flag: bool| {
        if flag {
            "present".green()
        } else {
            "missing".yellow()
        }
    };

    println!();
    println!("{}", "Claude Plugins Configuration".bold());
    println!("  Claude dir:        {}", description.claude_dir.display());
    println!(
        "  Global settings:   {} ({})",
        description.global_settings.display(),
        exists(description.global_settings_exists)
    );
    println!(
        "  Installed plugins: {} ({})",
        description.installed_plugins.display(),
        exists(description.installed_plugins_exists)
    );
    println!("  Project:           {}", description.project.display());
    println!(
        "  Local settings:    {} ({})",
        description.local_settings.display(),
        exists(description.local_settings_exists)
    );
    println!();

    Ok(())
}
