use clap::{Parser, Subcommand};
use locsync::{MissingTranslation, Syncer};
use unic_langid::LanguageIdentifier;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract all .strings/.stringsdict files into the YAML document.
    Extract {
        /// Path to the Resources directory containing *.lproj folders
        #[arg(short, long, default_value = "Resources")]
        resources: String,

        /// Output YAML file
        #[arg(short, long, default_value = "translations.yaml")]
        output: String,
    },

    /// Apply the YAML document back onto the .strings tree.
    Apply {
        /// Input YAML file
        #[arg(short, long, default_value = "translations.yaml")]
        input: String,

        /// Path to the Resources directory
        #[arg(short, long, default_value = "Resources")]
        resources: String,
    },

    /// Apply the YAML document to an Android res/ tree.
    ApplyAndroid {
        /// Input YAML file
        #[arg(short, long, default_value = "translations.yaml")]
        input: String,

        /// Android resource directory
        #[arg(long, default_value = "res")]
        res_dir: String,

        /// Language that maps to the default values/ folder
        #[arg(long, default_value = "en")]
        default_language: String,
    },
}

fn main() {
    let args = Args::parse();
    if let Err(message) = run(args.command) {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Extract { resources, output } => run_extract(resources, output),
        Commands::Apply { input, resources } => run_apply(input, resources),
        Commands::ApplyAndroid {
            input,
            res_dir,
            default_language,
        } => run_apply_android(input, res_dir, default_language),
    }
}

fn run_extract(resources: String, output: String) -> Result<(), String> {
    let syncer = Syncer::new(resources, &output);
    let report = syncer.extract().map_err(|e| e.to_string())?;

    println!(
        "Extracted {} keys from {} languages to {}",
        report.key_count,
        report.languages.len(),
        output
    );
    if report.plural_group_count > 0 {
        println!("Plural groups: {}", report.plural_group_count);
    }
    print_missing(&report.missing);
    Ok(())
}

fn run_apply(input: String, resources: String) -> Result<(), String> {
    let syncer = Syncer::new(resources, input);
    let report = syncer.apply().map_err(|e| e.to_string())?;

    println!(
        "Applied {} keys to {} languages",
        report.key_count,
        report.languages.len()
    );
    print_missing(&report.missing);
    Ok(())
}

fn run_apply_android(input: String, res_dir: String, default_language: String) -> Result<(), String> {
    default_language
        .parse::<LanguageIdentifier>()
        .map_err(|_| format!("Invalid language code: {}", default_language))?;

    let syncer = Syncer::new(".", input);
    let report = syncer
        .apply_android(&res_dir, &default_language)
        .map_err(|e| e.to_string())?;

    println!(
        "Wrote {} files for {} languages to {}",
        report.files_written.len(),
        report.languages.len(),
        res_dir
    );
    Ok(())
}

fn print_missing(missing: &[MissingTranslation]) {
    for entry in missing {
        println!("Warning: {}", entry);
    }
}
