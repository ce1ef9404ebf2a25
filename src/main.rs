use anyhow::Result;
use methodscope::cli::{self, Cli, Commands, RunSettings};
use methodscope::commands::{
    self, CompareConfig, ExportConfig, InitConfig, ListConfig, RenderConfig, ShowConfig,
    ValidateConfig,
};
use methodscope::filter::{SortKey, SortOrder, SortSpec};
use methodscope::observability::install_panic_hook;

// Main orchestrator function
fn main() -> Result<()> {
    install_panic_hook();
    let cli = cli::parse_args();
    cli::init_runtime(cli.verbosity, cli.plain);

    let settings = cli::resolve_settings(cli.data.clone(), cli.config.as_deref(), cli.plain)?;
    run_command(cli, &settings)
}

fn run_command(cli: Cli, settings: &RunSettings) -> Result<()> {
    match cli.command {
        Commands::List {
            filters,
            sort,
            desc,
            format,
            limit,
        } => commands::run_list(
            settings,
            ListConfig {
                filters: filters.to_patch(),
                sort: sort_spec(settings, sort, desc),
                format,
                limit,
            },
        ),
        Commands::Show { id, json } => commands::run_show(settings, ShowConfig { id, json }),
        Commands::Compare { ids, link, svg } => {
            commands::run_compare(settings, CompareConfig { ids, link, svg })
        }
        Commands::Render {
            chart,
            output,
            filters,
            methods,
            y_axis,
            color_mode,
            width,
            height,
        } => commands::run_render(
            settings,
            RenderConfig {
                chart,
                output,
                filters: filters.to_patch(),
                methods,
                y_axis,
                color_mode,
                width,
                height,
            },
        ),
        Commands::Export {
            dir,
            filters,
            compare,
        } => commands::run_export(
            settings,
            ExportConfig {
                dir,
                filters: filters.to_patch(),
                compare,
            },
        ),
        Commands::Validate { format } => {
            let passed = commands::run_validate(settings, ValidateConfig { format })?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Explore => commands::run_explore(settings),
        Commands::Init { force, user } => {
            commands::init_config(InitConfig { force, user })?;
            Ok(())
        }
    }
}

/// `--sort` and `--desc` over the configured default sort.
fn sort_spec(settings: &RunSettings, key: Option<SortKey>, desc: bool) -> Option<SortSpec> {
    if key.is_none() && !desc {
        return None;
    }
    let configured = settings.config.explorer().sort();
    Some(SortSpec {
        key: key.unwrap_or(configured.key),
        order: if desc { SortOrder::Desc } else { SortOrder::Asc },
    })
}
