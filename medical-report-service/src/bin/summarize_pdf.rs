use anyhow::{Context, Result};
use medical_report_service::{PipelineOutcome, RawDocument, ReportPipeline, ServiceConfig};
use std::{env, path::Path};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <pdf_file_path>", args[0]);
        eprintln!("Example: {} /path/to/medical/report.pdf", args[0]);
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;

    let bytes = tokio::fs::read(pdf_path)
        .await
        .with_context(|| format!("Failed to read {}", pdf_path.display()))?;
    let file_name = pdf_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let pipeline = ReportPipeline::from_config(&config);

    match pipeline.process(RawDocument::new(file_name, bytes)).await {
        PipelineOutcome::Success(result) => {
            println!("{}", result.to_export_text());
            println!();
            println!("Sections: {}", result.sections.join(", "));
            Ok(())
        }
        PipelineOutcome::Rejected { reason } => {
            eprintln!("{}", reason);
            std::process::exit(2);
        }
        PipelineOutcome::Failed { cause } => {
            eprintln!("{}", cause);
            std::process::exit(3);
        }
    }
}
