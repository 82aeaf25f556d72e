use clap::Parser;
use small_lms::config::{CliConfig, Command};
use small_lms::utils::{logger, validation::Validate};
use small_lms::{Catalog, CatalogStore, ConfigProvider, Item, JsonFileStore, Patron, TomlConfig, TracingObserver};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting small-lms CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("❌ Operation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &CliConfig) -> small_lms::Result<()> {
    // 載入配置（TOML 檔優先於命令列參數）
    let provider: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            tracing::info!("Loaded configuration for {}", config.library.name);
            Box::new(config)
        }
        None => Box::new(cli.clone()),
    };

    let data_path = PathBuf::from(provider.data_path());
    let store = JsonFileStore::new(provider.pretty_output());

    // 載入目錄
    let mut catalog = Catalog::with_observer(Box::new(TracingObserver));
    store.load(&data_path, &mut catalog)?;

    let mutated = apply_command(&cli.command, &mut catalog)?;

    if mutated {
        store.save(&catalog, &data_path)?;
        tracing::info!("📁 Catalog saved to {}", data_path.display());
    }
    Ok(())
}

fn apply_command(command: &Command, catalog: &mut Catalog) -> small_lms::Result<bool> {
    match command {
        Command::AddItem {
            id,
            title,
            author,
            code,
            capacity,
        } => {
            let item = Item::new(
                id.clone(),
                title.clone(),
                author.clone(),
                code.clone(),
                *capacity,
            )?;
            catalog.add_item(item)?;
            println!("✅ Item {} added", id);
            Ok(true)
        }
        Command::RemoveItem { id } => {
            catalog.remove_item(id)?;
            println!("✅ Item {} removed", id);
            Ok(true)
        }
        Command::RegisterPatron { id, name, contact } => {
            let patron = Patron::new(id.clone(), name.clone(), contact.clone())?;
            catalog.register_patron(patron)?;
            println!("✅ Patron {} registered", id);
            Ok(true)
        }
        Command::RemovePatron { id } => {
            catalog.remove_patron(id)?;
            println!("✅ Patron {} removed", id);
            Ok(true)
        }
        Command::Lend { patron_id, item_id } => {
            catalog.lend(patron_id, item_id)?;
            println!("✅ Lent {} to {}", item_id, patron_id);
            Ok(true)
        }
        Command::Return { patron_id, item_id } => {
            catalog.return_item(patron_id, item_id)?;
            println!("✅ {} returned by {}", item_id, patron_id);
            Ok(true)
        }
        Command::Search { query } => {
            let mut count = 0;
            for item in catalog.search_items(query) {
                println!(
                    "{}  \"{}\" by {} [{}] ({}/{} available)",
                    item.id,
                    item.title,
                    item.author,
                    item.code,
                    item.available(),
                    item.capacity
                );
                count += 1;
            }
            if count == 0 {
                println!("No items match '{}'", query);
            } else {
                tracing::info!("Search for '{}' matched {} item(s)", query, count);
            }
            Ok(false)
        }
        Command::Stats => {
            let stats = catalog.compute_statistics();
            println!("Items:           {}", stats.total_items);
            println!("Patrons:         {}", stats.total_patrons);
            println!("Fully available: {}", stats.fully_available);
            println!("Fully loaned:    {}", stats.fully_loaned);
            Ok(false)
        }
    }
}
