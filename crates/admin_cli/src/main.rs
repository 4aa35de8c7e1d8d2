use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod prompt;
mod qr;

#[derive(Parser, Debug)]
#[command(name = "tableorder_admin")]
#[command(about = "Admin utilities for tableorder (staff accounts, menu seed, table QR codes)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./tableorder.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Menu(Menu),
    /// Print the link and QR code for one table.
    Qr(QrArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a staff account. The password is asked interactively.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Menu {
    #[command(subcommand)]
    command: MenuCommand,
}

#[derive(Subcommand, Debug)]
enum MenuCommand {
    /// Insert the default categories and dishes into an empty store.
    Seed,
}

#[derive(Args, Debug)]
struct QrArgs {
    /// Address of the customer app, e.g. `http://192.168.1.10:3000`.
    #[arg(long)]
    base_url: String,
    #[arg(long)]
    table: String,
    /// Also write the code as SVG to this file.
    #[arg(long)]
    out: Option<PathBuf>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn engine(database_url: &str) -> Result<Engine, Box<dyn Error + Send + Sync>> {
    let db = connect_db(database_url).await?;
    Ok(Engine::builder().database(db).build().await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let engine = engine(&cli.database_url).await?;
            let password = prompt::new_password()?;
            match engine.create_admin(&args.email, &password).await {
                Ok(()) => println!("created staff account: {}", args.email.trim()),
                Err(engine::EngineError::ExistingKey(email)) => {
                    eprintln!("account already exists: {email}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Menu(Menu {
            command: MenuCommand::Seed,
        }) => {
            let engine = engine(&cli.database_url).await?;
            let report = engine.seed_default_menu().await?;
            if report.categories == 0 {
                println!("menu already has categories, nothing inserted");
            } else {
                println!(
                    "inserted {} categories and {} menu items",
                    report.categories, report.menu_items
                );
            }
        }
        Command::Qr(args) => {
            let link = qr::table_link(&args.base_url, &args.table)?;
            println!("{}", qr::render_terminal(&link)?);
            println!("Table {}: {link}", args.table.trim());
            if let Some(path) = args.out {
                std::fs::write(&path, qr::render_svg(&link)?)?;
                println!("saved {}", path.display());
            }
        }
    }

    Ok(())
}
