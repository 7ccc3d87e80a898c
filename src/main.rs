//! Folio CLI - track a portfolio of projects from the command line.

use clap::Parser;
use folio::cli::{Cli, Commands, ConfigCommands, MilestoneCommands, ProjectCommands};
use folio::commands::{self, MilestoneInput, Output, ProjectInput, ProjectPatch};
use folio::config::{ConfigOverrides, ResolvedSettings, resolve_settings};
use folio::logging;
use folio::models::{ProjectFilter, ProjectPriority, ProjectStatus};
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    let mut overrides = ConfigOverrides::new();
    if let Some(path) = cli.config {
        overrides = overrides.with_config_path(path);
    }
    if let Some(dir) = cli.data_dir {
        overrides = overrides.with_data_dir(dir);
    }

    let result = resolve_settings(&overrides).and_then(|settings| {
        // Held until exit so buffered records reach the log file
        let _guard = logging::init(settings.data_dir());
        tracing::debug!(data_dir = %settings.data_dir().display(), "settings resolved");
        run_command(cli.command, &settings, human)
    });

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(
                "{}",
                serde_json::json!({ "error": e.to_string(), "code": e.code() })
            );
        }
        process::exit(1);
    }
}

fn run_command(
    command: Commands,
    settings: &ResolvedSettings,
    human: bool,
) -> Result<(), folio::Error> {
    match command {
        Commands::Register {
            username,
            name,
            password,
        } => {
            let result = commands::register(settings, &username, &password, &name)?;
            output(&result, human);
        }
        Commands::Login { username, password } => {
            let result = commands::login(settings, &username, &password)?;
            output(&result, human);
        }
        Commands::Logout => {
            let result = commands::logout(settings)?;
            output(&result, human);
        }
        Commands::Whoami => {
            let result = commands::whoami(settings)?;
            output(&result, human);
        }
        Commands::Project { command } => run_project_command(command, settings, human)?,
        Commands::Summary {
            statuses,
            priorities,
        } => {
            let result = commands::summary(settings, &build_filter(statuses, priorities))?;
            output(&result, human);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(settings);
                output(&result, human);
            }
        },
    }
    Ok(())
}

fn run_project_command(
    command: ProjectCommands,
    settings: &ResolvedSettings,
    human: bool,
) -> Result<(), folio::Error> {
    match command {
        ProjectCommands::Create {
            name,
            description,
            start,
            end,
            status,
            priority,
            budget,
            spent,
            progress,
            members,
        } => {
            let input = ProjectInput {
                name,
                description,
                start_date: start,
                end_date: end,
                status,
                priority,
                budget,
                spent,
                progress,
                team_members: members,
            };
            let result = commands::project_create(settings, input)?;
            output(&result, human);
        }
        ProjectCommands::List {
            statuses,
            priorities,
        } => {
            let result = commands::project_list(settings, &build_filter(statuses, priorities))?;
            output(&result, human);
        }
        ProjectCommands::Show { id } => {
            let result = commands::project_show(settings, &id)?;
            output(&result, human);
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            start,
            end,
            status,
            priority,
            budget,
            spent,
            progress,
            members,
            clear_members,
        } => {
            let team_members = if clear_members {
                Some(Vec::new())
            } else if members.is_empty() {
                None
            } else {
                Some(members)
            };
            let patch = ProjectPatch {
                name,
                description,
                start_date: start,
                end_date: end,
                status,
                priority,
                budget,
                spent,
                progress,
                team_members,
            };
            let result = commands::project_update(settings, &id, patch)?;
            output(&result, human);
        }
        ProjectCommands::Delete { id } => {
            let result = commands::project_delete(settings, &id)?;
            output(&result, human);
        }
        ProjectCommands::Milestone { command } => match command {
            MilestoneCommands::Add {
                id,
                title,
                due,
                description,
            } => {
                let input = MilestoneInput {
                    title,
                    due_date: due,
                    description,
                };
                let result = commands::milestone_add(settings, &id, input)?;
                output(&result, human);
            }
            MilestoneCommands::Complete { id, number } => {
                let result = commands::milestone_complete(settings, &id, number)?;
                output(&result, human);
            }
        },
    }
    Ok(())
}

fn build_filter(statuses: Vec<ProjectStatus>, priorities: Vec<ProjectPriority>) -> ProjectFilter {
    ProjectFilter {
        statuses,
        priorities,
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
