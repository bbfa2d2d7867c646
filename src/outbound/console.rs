use crate::domain::session::{QueryKind, Recommendation, RetrievalSection, SessionReport};
use std::io::{Result, Write};

fn heading(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::Image => "📷 Retrieved Similar Images:",
        QueryKind::Text => "📷 Recommended Images Based on Your Query:",
    }
}

/// Writes a session report for the terminal. Every error variant ends up here.
pub fn render_report<W: Write>(report: &SessionReport, out: &mut W) -> Result<()> {
    for section in &report.sections {
        render_section(section, out)?;
    }

    match &report.recommendation {
        Recommendation::Generated(text) => {
            writeln!(out, "👗 AI Fashion Styling Recommendations:")?;
            writeln!(out, "{}", text)?;
        }
        Recommendation::Failed(err) => writeln!(out, "{}", err)?,
        Recommendation::Skipped => {}
    }
    Ok(())
}

fn render_section<W: Write>(section: &RetrievalSection, out: &mut W) -> Result<()> {
    writeln!(out, "{}", heading(section.kind))?;
    for err in &section.failures {
        writeln!(out, "{}", err)?;
    }
    for (i, image) in section.images.iter().enumerate() {
        writeln!(out, "Image {}: {}", i + 1, image.uri)?;
    }
    if section.hits.is_empty() && section.failures.is_empty() {
        writeln!(out, "No matching images found.")?;
    }
    writeln!(out)
}
