use cf_draft::{DraftFile, FieldKey};
use cf_length::{
    InterProbeInput, LengthOutcome, MainConduitInput, compute_inter_probe_run_length,
    compute_main_conduit_length, derive_probe_count_bounds,
};
use cf_wizard::{
    ConfigurationPayload, Settings, WizardError, WizardResult, build_summary, draft_service,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "Probe chamber configurator CLI - lengths, drafts and BOM payloads", long_about = None)]
struct Cli {
    /// Settings YAML (length policy, default allowances)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the main conduit (HVB) length
    MainLength {
        /// Number of probes
        #[arg(long)]
        count: String,
        /// Probe spacing in mm
        #[arg(long)]
        spacing: String,
        /// Left allowance in mm
        #[arg(long, default_value = "")]
        left: String,
        /// Right allowance in mm
        #[arg(long, default_value = "")]
        right: String,
        /// Layout form, I or U
        #[arg(long, default_value = "I")]
        form: String,
    },
    /// Compute the run length between probes
    RunLength {
        /// Number of probes
        #[arg(long)]
        count: String,
        /// Probe spacing in mm
        #[arg(long)]
        spacing: String,
        /// Connection topology, einseitig or beidseitig
        #[arg(long, default_value = "")]
        topology: String,
    },
    /// Show the allowed probe count range for a chamber type
    Bounds {
        /// Chamber type (e.g. "GN X1")
        chamber_type: String,
        /// Maximum probe count reported for the chamber type
        #[arg(long)]
        server_max: Option<u32>,
        /// Probe count to clamp into range
        #[arg(long)]
        count: Option<i64>,
    },
    /// Validate a draft file
    Validate {
        /// Path to the draft (YAML or JSON)
        draft_path: PathBuf,
    },
    /// Print the review summary of a draft
    Summary {
        /// Path to the draft (YAML or JSON)
        draft_path: PathBuf,
    },
    /// Print the check/BOM request body for a draft
    Payload {
        /// Path to the draft (YAML or JSON)
        draft_path: PathBuf,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Set one field of a draft file, creating the file if needed
    Set {
        /// Path to the draft (YAML or JSON)
        draft_path: PathBuf,
        /// Field name, wire name (e.g. sondenanzahl) or draft name
        field: String,
        /// New value; empty clears the field
        value: String,
    },
}

fn main() -> WizardResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.settings.as_deref())?;

    match cli.command {
        Commands::MainLength {
            count,
            spacing,
            left,
            right,
            form,
        } => cmd_main_length(&settings, &count, &spacing, &left, &right, &form),
        Commands::RunLength {
            count,
            spacing,
            topology,
        } => cmd_run_length(&count, &spacing, &topology),
        Commands::Bounds {
            chamber_type,
            server_max,
            count,
        } => cmd_bounds(&chamber_type, server_max, count),
        Commands::Validate { draft_path } => cmd_validate(&draft_path),
        Commands::Summary { draft_path } => cmd_summary(&settings, &draft_path),
        Commands::Payload { draft_path, output } => cmd_payload(&draft_path, output.as_deref()),
        Commands::Set {
            draft_path,
            field,
            value,
        } => cmd_set(&draft_path, &field, &value),
    }
}

fn print_outcome(title: &str, outcome: &LengthOutcome) {
    match outcome {
        LengthOutcome::Computed(result) => {
            println!("{title}: {} m", result.meters_display());
            println!("  {}", result.formula_label);
        }
        LengthOutcome::NotComputable { reason } => {
            println!("{title}: not computable ({reason})");
        }
    }
}

fn cmd_main_length(
    settings: &Settings,
    count: &str,
    spacing: &str,
    left: &str,
    right: &str,
    form: &str,
) -> WizardResult<()> {
    let input = MainConduitInput::from_raw(count, spacing, left, right, form);
    let outcome = compute_main_conduit_length(&input, &settings.length_policy);
    print_outcome("HVB-Länge", &outcome);
    Ok(())
}

fn cmd_run_length(count: &str, spacing: &str, topology: &str) -> WizardResult<()> {
    let input = InterProbeInput::from_raw(count, spacing, topology);
    let outcome = compute_inter_probe_run_length(&input);
    print_outcome("Leitungslänge zwischen Sonden", &outcome);
    Ok(())
}

fn cmd_bounds(chamber_type: &str, server_max: Option<u32>, count: Option<i64>) -> WizardResult<()> {
    let bounds = derive_probe_count_bounds(chamber_type, server_max);
    println!("{chamber_type}: {}", bounds.range_hint());
    if let Some(count) = count {
        let clamped = bounds.clamp(count);
        if i64::from(clamped) == count {
            println!("  {count} is in range");
        } else {
            println!("  {count} -> {clamped}");
        }
    }
    Ok(())
}

fn cmd_validate(draft_path: &Path) -> WizardResult<()> {
    println!("Validating draft: {}", draft_path.display());
    let file = draft_service::load_draft(draft_path)?;
    draft_service::validate_draft(&file.draft)?;

    let missing: Vec<&str> = FieldKey::ALL
        .into_iter()
        .filter(|k| !file.draft.is_filled(*k))
        .map(|k| k.label())
        .collect();
    println!("✓ Draft is valid (version {})", file.version);
    if !missing.is_empty() {
        println!("  Not yet filled: {}", missing.join(", "));
    }
    Ok(())
}

fn cmd_summary(settings: &Settings, draft_path: &Path) -> WizardResult<()> {
    let file = draft_service::load_draft(draft_path)?;
    let summary = build_summary(&file.draft, &settings.length_policy);
    print!("{summary}");
    Ok(())
}

fn cmd_payload(draft_path: &Path, output: Option<&Path>) -> WizardResult<()> {
    let file = draft_service::load_draft(draft_path)?;
    let payload = ConfigurationPayload::from_draft(&file.draft);
    let json = payload
        .to_json_pretty()
        .map_err(|e| WizardError::Draft(format!("Failed to serialize payload: {}", e)))?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✓ Payload written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_set(draft_path: &Path, field: &str, value: &str) -> WizardResult<()> {
    let key = FieldKey::parse(field)
        .ok_or_else(|| WizardError::Validation(format!("Unknown field: {field}")))?;

    let mut file = if draft_path.exists() {
        draft_service::load_draft(draft_path)?
    } else {
        DraftFile::new(Default::default())
    };

    let change = file.draft.set_field(key, value);
    draft_service::save_draft(draft_path, &file)?;

    match file.draft.field_text(key) {
        Some(text) if change.is_changed() => println!("✓ {} = {}", key.label(), text),
        Some(text) => println!("  {} unchanged ({})", key.label(), text),
        None => println!("✓ {} cleared", key.label()),
    }
    tracing::debug!(field = %key, path = %draft_path.display(), "draft field set");
    Ok(())
}
