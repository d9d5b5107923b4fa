//! Subcommand implementations

use crate::ExportArgs;
use anyhow::{bail, Context, Result};
use doc_model::{DesignState, ElementType};
use std::path::{Path, PathBuf};
use store::pdf::{export_pdf_async, PageRange, PdfExportOptions};
use store::{parse_workflow, SettingsManager, WorkflowData, WorkflowStore};

async fn read_workflow(path: &Path) -> Result<WorkflowData> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    parse_workflow(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Parse `N` or `N-M`, 1-based and inclusive, into page indices
pub fn parse_page_range(spec: &str) -> Result<PageRange> {
    let number = |s: &str| -> Result<usize> {
        let n: usize = s.trim().parse().with_context(|| format!("invalid page number `{s}`"))?;
        if n == 0 {
            bail!("pages are numbered from 1");
        }
        Ok(n)
    };
    match spec.split_once('-') {
        None => Ok(PageRange::single(number(spec)? - 1)),
        Some((first, last)) => {
            let (first, last) = (number(first)?, number(last)?);
            if last < first {
                bail!("page range `{spec}` ends before it starts");
            }
            Ok(PageRange::new(first - 1, last))
        }
    }
}

/// Configured export options with the command line flags applied
fn export_options(base: PdfExportOptions, args: &ExportArgs) -> Result<PdfExportOptions> {
    let mut options = base;
    if let Some(backend) = args.backend {
        options = options.with_backend(backend);
    }
    if let Some(title) = &args.title {
        options = options.with_title(title.clone());
    }
    if let Some(author) = &args.author {
        options = options.with_author(author.clone());
    }
    if let Some(pages) = &args.pages {
        options = options.with_page_range(parse_page_range(pages)?);
    }
    if args.no_compress {
        options = options.with_compression(false);
    }
    if let Some(output) = args.output.as_deref().and_then(Path::file_name) {
        options = options.with_filename(output.to_string_lossy());
    }
    Ok(options)
}

pub async fn export(data_dir: &Path, args: ExportArgs) -> Result<()> {
    let mut settings = SettingsManager::new(data_dir);
    settings.load().await.context("loading settings")?;
    let options = export_options(settings.get().export.clone(), &args)?;

    let workflow = read_workflow(&args.workflow).await?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&options.filename));
    let backend = options.backend;

    tracing::info!(workflow = %workflow.id, backend = %backend, "Exporting workflow");
    let bytes = export_pdf_async(workflow.design_state, options)
        .await
        .context("rendering PDF")?;
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    println!("Wrote {} ({} bytes, {} backend)", output.display(), bytes.len(), backend);
    Ok(())
}

/// One line per page: size and element counts
fn describe(state: &DesignState) -> Vec<String> {
    state
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let (width, height) = page.settings.size_mm();
            let of = |t: ElementType| page.elements.iter().filter(|e| e.element_type == t).count();
            let hidden = page.elements.iter().filter(|e| e.styles.is_hidden()).count();
            format!(
                "page {} ({}): {:.1} x {:.1} mm, {} text, {} image, {} shape, {} line, {} hidden",
                i + 1,
                page.id,
                width,
                height,
                of(ElementType::Text),
                of(ElementType::Image),
                of(ElementType::Shape),
                of(ElementType::Line),
                hidden,
            )
        })
        .collect()
}

pub async fn info(path: &Path) -> Result<()> {
    let workflow = read_workflow(path).await?;
    println!("{} ({})", workflow.name, workflow.id);
    println!("version {}, updated {}", workflow.version, workflow.updated_at.to_rfc3339());
    for line in describe(&workflow.design_state) {
        println!("  {line}");
    }
    Ok(())
}

pub async fn list(data_dir: &Path) -> Result<()> {
    let store = WorkflowStore::new(data_dir);
    let workflows = store.list().await.context("reading saved workflows")?;
    if workflows.is_empty() {
        println!("No saved workflows in {}", store.path().display());
    }
    for workflow in workflows {
        println!(
            "{}  {}  {}",
            workflow.id,
            workflow.updated_at.format("%Y-%m-%d %H:%M"),
            workflow.name
        );
    }
    Ok(())
}

pub async fn import(data_dir: &Path, path: &Path) -> Result<()> {
    let store = WorkflowStore::new(data_dir);
    let workflow = store
        .import_from_file(path)
        .await
        .with_context(|| format!("importing {}", path.display()))?;
    println!("Imported \"{}\" as {}", workflow.name, workflow.id);
    Ok(())
}
