use std::path::PathBuf;

use clap::Parser;
use inkbind::epub::config::DEFAULT_CONFIG_PATH;
use inkbind::{Book, BookSource, EpubConfig, EpubWriter, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 📚 inkbind - EPUB装订工具
#[derive(Parser)]
#[command(name = "inkbind")]
#[command(about = "把本地章节HTML装订成EPUB3文件")]
#[command(version)]
struct Args {
    /// 书籍清单路径
    #[arg(help = "YAML书籍清单路径", required_unless_present = "init_config")]
    book_manifest: Option<PathBuf>,

    /// 输出文件
    #[arg(short, long, help = "输出的EPUB路径（默认为“书名 - 作者.epub”）")]
    output: Option<PathBuf>,

    /// 配置文件
    #[arg(short, long, help = "装订配置文件路径", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 详细输出模式
    #[arg(short, long, help = "输出调试日志")]
    verbose: bool,

    /// 生成默认配置文件
    #[arg(long, help = "在配置文件路径生成默认配置后退出")]
    init_config: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("📚 inkbind - EPUB装订工具");

    match run(&args) {
        Ok(Some(path)) => println!("🎉 EPUB已生成: {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(env_filter))
        .init();
}

fn run(args: &Args) -> Result<Option<PathBuf>> {
    if args.init_config {
        EpubConfig::generate_default_config(&args.config)?;
        println!("⚙️  已生成默认配置: {}", args.config.display());
        return Ok(None);
    }

    let Some(manifest) = &args.book_manifest else {
        return Ok(None);
    };

    let config = EpubConfig::load_or_default(&args.config)?;
    println!("正在读取书籍清单: {}", manifest.display());
    let book = BookSource::load(manifest)?;
    println!(
        "📖 《{}》 {} · 共 {} 章",
        book.metadata.title,
        book.metadata.author,
        book.chapters.len()
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&book));
    EpubWriter::new(config).write(&book, &output)?;
    Ok(Some(output))
}

/// `书名 - 作者.epub`，去掉路径分隔符
fn default_output(book: &Book) -> PathBuf {
    let name = format!("{} - {}.epub", book.metadata.title, book.metadata.author);
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    PathBuf::from(safe)
}
