use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::info;

use dalil_bot::bot::DirectoryBot;
use dalil_bot::config::Config;
use dalil_bot::conversation::{RenderInstruction, Selection};
use dalil_bot::logging;
use dalil_bot::registry::{specializations_of, RegistryIndex};
use dalil_bot::session::UserId;
use dalil_bot::source::{JsonFileSource, RegistrySource};
use dalil_bot::taxonomy;

/// The single local user driving the terminal transport.
const REPL_USER: UserId = 0;

#[derive(Parser)]
#[command(name = "dalil_bot")]
#[command(about = "Medical provider directory lookup bot")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the provider data file and print a category summary
    Check {
        /// Override the data file path from config
        #[arg(long)]
        data: Option<String>,
    },
    /// Drive the conversation flow from the terminal
    Repl {
        /// Override the data file path from config
        #[arg(long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Check { data } => check(&config, data).await?,
        Commands::Repl { data } => repl(&config, data).await?,
    }
    Ok(())
}

async fn load_index(config: &Config, data_override: Option<String>) -> anyhow::Result<RegistryIndex> {
    let path = data_override.unwrap_or_else(|| config.data.path.clone());
    let source = JsonFileSource::new(path);
    let rows = source.fetch_rows().await?;
    let index = RegistryIndex::load(&rows)?;
    info!(records = index.len(), source = source.source_name(), "Registry ready");
    Ok(index)
}

async fn check(config: &Config, data: Option<String>) -> anyhow::Result<()> {
    println!("🔍 Checking provider data...");
    let index = load_index(config, data).await?;

    println!("\n📊 Registry summary:");
    println!("   Total records: {}", index.len());

    let mut categorized = 0;
    for (id, label) in taxonomy::category_entries() {
        let filtered = index.filter_by_category(label);
        if filtered.is_empty() {
            continue;
        }
        categorized += filtered.len();
        let specializations = specializations_of(&filtered);
        println!(
            "   [{}] {}: {} records, {} specializations",
            id,
            label,
            filtered.len(),
            specializations.len()
        );
    }

    let stray = index.len() - categorized;
    if stray > 0 {
        println!("\n⚠️  {} records carry a category outside the taxonomy", stray);
        println!("   (they are reachable through general search only)");
    } else {
        println!("\n✅ Every record belongs to a taxonomy category");
    }
    Ok(())
}

async fn repl(config: &Config, data: Option<String>) -> anyhow::Result<()> {
    let index = Arc::new(load_index(config, data).await?);
    let bot = DirectoryBot::new(index);

    println!("👋 أهلاً بك في دليل الأطباء. (/quit للخروج)");
    render(config, bot.handle_selection(REPL_USER, Selection::MainMenu));

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let instruction = if line.starts_with('/') {
            match parse_command(line) {
                Some(selection) => bot.handle_selection(REPL_USER, selection),
                None => {
                    println!("⚠️  أمر غير معروف: {}", line);
                    continue;
                }
            }
        } else {
            bot.handle_text(REPL_USER, line)
        };
        render(config, instruction);
    }

    println!("👋 مع السلامة.");
    Ok(())
}

fn parse_command(line: &str) -> Option<Selection> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "/menu" => Some(Selection::MainMenu),
        "/cat" => parts.next().map(|id| Selection::Category(id.to_string())),
        "/spec" => parts.next().map(|id| Selection::Specialization(id.to_string())),
        "/general" => Some(Selection::GeneralSearch),
        "/name" => Some(Selection::SearchByName),
        "/addr" => Some(Selection::SearchByAddress),
        "/all" => Some(Selection::ShowAll),
        "/more" => Some(Selection::ShowMore),
        "/back" => Some(Selection::BackToSearch),
        "/contact" => Some(Selection::UpdateData),
        "/cancel" => Some(Selection::Cancel),
        _ => None,
    }
}

fn render(config: &Config, instruction: RenderInstruction) {
    match instruction {
        RenderInstruction::ShowCategoryMenu => {
            println!("يرجى اختيار التصنيف (/cat <رقم>):");
            for (id, label) in taxonomy::category_entries() {
                println!("   [{}] {}", id, label);
            }
            println!("   🔍 /general بحث عام");
        }
        RenderInstruction::ShowSpecializationMenu { options } => {
            println!("يرجى اختيار الاختصاص (/spec <رقم>):");
            for (id, specialization) in options {
                println!("   [{}] {}", id, specialization);
            }
            println!("   🏠 /menu القائمة الرئيسية");
        }
        RenderInstruction::ShowSearchOptions => {
            println!("يرجى اختيار طريقة البحث:");
            println!("   🔍 /name البحث بالاسم");
            println!("   📍 /addr البحث بالموقع");
            println!("   📋 /all عرض جميع النتائج");
            println!("   🔄 /contact تحديث البيانات");
            println!("   🏠 /menu القائمة الرئيسية");
        }
        RenderInstruction::ShowResultChunk { records, has_more } => {
            for record in &records {
                println!("👨‍⚕️ {}", record.name);
                println!("   🏷️ التصنيف: {}", record.category);
                println!("   📍 العنوان: {}", record.address);
                println!("   📞 الهاتف: {}", record.phone);
                println!("   📌 الاختصاص: {}", record.specialization);
                if !record.notes.is_empty() {
                    println!("   📝 ملاحظات: {}", record.notes);
                }
            }
            if has_more {
                println!("➡️  /more لعرض المزيد");
            }
            println!("🔙 /back رجوع لاختيار نوع البحث");
        }
        RenderInstruction::ShowNoResults => {
            println!("❌ لا توجد نتائج.");
        }
        RenderInstruction::ShowUnknownSelection => {
            println!("❌ اختيار غير معروف، يرجى المحاولة مرة أخرى.");
        }
        RenderInstruction::ShowContactInfo => {
            println!("لتحديث البيانات التواصل واتساب مع هذا الرقم:");
            println!("{}", config.contact.phone);
            println!("{}", config.contact.name);
        }
        RenderInstruction::ShowSessionEnded => {
            println!("تم إنهاء المحادثة، شكراً لاستخدامك البوت.");
        }
    }
}
