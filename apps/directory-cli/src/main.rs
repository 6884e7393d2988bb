use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use employee_directory::client::{EmployeeDirectoryApi, ListQuery};
use employee_directory::domain::events::DirectoryEvent;
use employee_directory::domain::ports::EventPublisher;
use employee_directory::domain::validation::{validate_form, EmployeeForm, FormErrors};
use employee_directory::gateways::LocalDirectoryClient;
use employee_directory::infra::storage::{BlobSnapshotStore, FileBlobStore};
use employee_directory::model::EmployeeId;
use employee_directory::{open_engine, DirectoryConfig};
use paging_core::SortDir;

mod render;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE_NAME: &str = "employee_directory";

/// Employee directory - browse, edit, import and export employee records
#[derive(Parser)]
#[command(name = "directory-cli")]
#[command(about = "Employee directory - browse, edit, import and export employee records")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the persisted collection (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List employees, one page at a time
    List(ListArgs),
    /// Show one employee
    Show {
        id: u64,
        #[arg(long)]
        json: bool,
    },
    /// Add an employee
    Add(EmployeeFields),
    /// Update fields of an employee
    Update {
        id: u64,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Delete an employee
    Delete { id: u64 },
    /// List departments in use
    Departments,
    /// List roles in use
    Roles,
    /// Export the collection as a JSON array
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the collection with the records in a JSON file
    Import { file: PathBuf },
    /// Replace the collection with generated sample data
    Reset {
        /// Seed for reproducible sample data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Remove every employee
    Clear,
    /// Check configuration and storage
    Check,
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive match on first name, last name or email
    search: Option<String>,
    #[arg(long = "department")]
    departments: Vec<String>,
    #[arg(long = "role")]
    roles: Vec<String>,
    /// Field to sort by (firstName, lastName, email, department, role, createdAt, updatedAt, id)
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    desc: bool,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

/// Form fields; on `update`, omitted fields keep their current value.
#[derive(Args)]
struct EmployeeFields {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    role: Option<String>,
}

impl EmployeeFields {
    fn overlay(self, mut form: EmployeeForm) -> EmployeeForm {
        if let Some(v) = self.first_name {
            form.first_name = v;
        }
        if let Some(v) = self.last_name {
            form.last_name = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.department {
            form.department = v;
        }
        if let Some(v) = self.role {
            form.role = v;
        }
        form
    }
}

/// Forwards engine events to the log.
struct LogEvents;

impl EventPublisher<DirectoryEvent> for LogEvents {
    fn publish(&self, event: &DirectoryEvent) {
        match event {
            DirectoryEvent::SaveFailed { at } => {
                tracing::warn!(%at, "Changes could not be saved and will be lost on exit")
            }
            other => tracing::debug!(event = ?other, "Directory event"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        data_dir: cli.data_dir.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::debug!(home_dir = %config.app.home_dir, "Configuration loaded");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let module_config: DirectoryConfig = config
        .module_config(MODULE_NAME)?
        .unwrap_or_default();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::List(ListArgs::default()));

    let client = open_client(&config, &module_config);
    let result = dispatch(&client, command, &config, &module_config);
    if !client.engine().lock().last_save_ok() {
        eprintln!("warning: storage is unavailable, changes were not saved");
    }
    result
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            search: None,
            departments: Vec::new(),
            roles: Vec::new(),
            sort: None,
            desc: false,
            page: 1,
            page_size: None,
            json: false,
        }
    }
}

fn open_client(config: &AppConfig, module_config: &DirectoryConfig) -> LocalDirectoryClient {
    let blobs = Arc::new(FileBlobStore::new(config.data_dir()));
    let engine = open_engine(
        module_config,
        blobs,
        Arc::new(LogEvents),
        &mut StdRng::from_entropy(),
    );
    LocalDirectoryClient::new(engine)
}

fn dispatch(
    client: &LocalDirectoryClient,
    command: Commands,
    config: &AppConfig,
    module_config: &DirectoryConfig,
) -> Result<()> {
    match command {
        Commands::List(args) => {
            let query = ListQuery {
                search: args.search.unwrap_or_default(),
                departments: args.departments,
                roles: args.roles,
                sort: args.sort,
                dir: if args.desc { SortDir::Desc } else { SortDir::Asc },
                page_size: args.page_size,
                page: args.page,
            };
            let page = client.list_employees(query)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print!("{}", render::page(&page));
            }
        }
        Commands::Show { id, json } => {
            let employee = client.get_employee(EmployeeId(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&employee)?);
            } else {
                print!("{}", render::detail(&employee));
            }
        }
        Commands::Add(fields) => {
            let form = fields.overlay(EmployeeForm::default());
            let data = validate_form(&form, client, None).map_err(report)?;
            let created = client.create_employee(data)?;
            println!("Added employee {} ({})", created.id, created.full_name());
        }
        Commands::Update { id, fields } => {
            let id = EmployeeId(id);
            let current = client.get_employee(id)?;
            let form = fields.overlay(EmployeeForm::from(&current));
            validate_form(&form, client, Some(id)).map_err(report)?;
            let updated = client.update_employee(id, form.into_patch())?;
            println!("Updated employee {} ({})", updated.id, updated.full_name());
        }
        Commands::Delete { id } => {
            client.delete_employee(EmployeeId(id))?;
            println!("Deleted employee {id}");
        }
        Commands::Departments => client.departments().iter().for_each(|d| println!("{d}")),
        Commands::Roles => client.roles().iter().for_each(|r| println!("{r}")),
        Commands::Export { out } => {
            let text = client.export_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = client.import_json(&text)?;
            println!("Imported {count} employees");
        }
        Commands::Reset { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let engine = client.engine();
            let mut engine = engine.lock();
            engine.reset_to_sample_data(&mut rng);
            println!("Reset to {} sample employees", engine.total_employees());
        }
        Commands::Clear => {
            client.engine().lock().clear_all();
            println!("Cleared all employees");
        }
        Commands::Check => check(client, config, module_config)?,
    }
    Ok(())
}

/// Print every field error and turn them into the command's failure.
fn report(errors: FormErrors) -> anyhow::Error {
    for e in errors.iter() {
        eprintln!("{}: {}", e.field(), e);
    }
    anyhow::anyhow!("validation failed")
}

fn check(
    client: &LocalDirectoryClient,
    config: &AppConfig,
    module_config: &DirectoryConfig,
) -> Result<()> {
    tracing::info!("Checking configuration...");

    if module_config.default_page_size == 0 || module_config.max_page_size == 0 {
        bail!("page sizes in modules.{MODULE_NAME} must be positive");
    }

    let data_dir = config.data_dir();
    let store = BlobSnapshotStore::new(
        Arc::new(FileBlobStore::new(&data_dir)),
        module_config.storage_key.clone(),
    );
    if !store.is_available() {
        bail!("storage at {} is not writable", data_dir.display());
    }

    println!("Configuration check passed");
    println!("Data directory: {}", data_dir.display());
    println!("Employees: {}", client.engine().lock().total_employees());
    println!("{}", config.to_yaml()?);
    Ok(())
}
