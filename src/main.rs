use clap::{Parser, Subcommand};
use photo_strip::{config, output, process};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; only called while building the CLI
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-strip")]
#[command(about = "Batch-prepare photos for sharing: upright, metadata-free, web-sized")]
#[command(long_about = "\
Batch-prepare photos for sharing: upright, metadata-free, web-sized

Every file directly inside the input directory is opened as an image and
written to the output directory under the same name and in the same format:

  samples/                     output/
  ├── a.jpg  2000x1000, EXIF 6  ├── a.jpg  512x1024, no metadata
  ├── b.png  640x480            ├── b.png  640x480
  ├── c.gif                     │          (GIFs are logged, never written)
  └── notes.txt                 │          (not an image: skipped)

For each photo:
  1. EXIF orientation is applied to the pixels
  2. EXIF and ICC metadata are dropped
  3. photos larger than the bounding box are downsized (Lanczos3)

Run 'photo-strip gen-config' to generate a documented photo-strip.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Input directory [config: input_dir]
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output directory, must exist [config: output_dir]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Bounding box width in pixels, 0 = unconstrained [config: max_width]
    #[arg(long, global = true)]
    max_width: Option<u32>,

    /// Bounding box height in pixels, 0 = unconstrained [config: max_height]
    #[arg(long, global = true)]
    max_height: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Orient, strip and downsize every photo in the input directory
    Process {
        /// Also write a JSON report of the batch to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Open and log every input file without writing anything
    Check,
    /// Print a stock photo-strip.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Process { report } => {
            let batch_config = config::load_config(&cli.config, &cli.overrides())?;
            let (tx, printer) = spawn_printer();
            let result = process::process(&batch_config, Some(tx));
            join_printer(printer)?;
            let batch = result?;
            output::print_summary(&batch);
            if let Some(report_path) = report {
                process::write_report(&batch, report_path)?;
            }
        }
        Command::Check => {
            let batch_config = config::load_config(&cli.config, &cli.overrides())?;
            println!("==> Checking {}", batch_config.input_dir.display());
            let (tx, printer) = spawn_printer();
            let result = process::check(&batch_config, Some(tx));
            join_printer(printer)?;
            output::print_summary(&result?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Start the console printer; events are printed in the order they are sent.
fn spawn_printer() -> (Sender<process::ProcessEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) -> Result<(), Box<dyn std::error::Error>> {
    printer
        .join()
        .map_err(|_| "progress printer thread panicked".into())
}
