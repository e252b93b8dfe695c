//! One generation run
//!
//! Scans the compilation for candidate sites, resolves each into an error
//! model and emits its artifacts into a [`SourceSink`]. Every site is
//! processed on its own: a [`GeneratorError`] for one site becomes a
//! [`SiteFault`] and the run continues with the next.

use crate::config::Config;
use crate::diagnostics::{error_codes::generation, Diagnostic, DiagnosticBag, Span};
use crate::emitter::{templates, trace_artifact_name, Artifact, Emitter};
use crate::error::{GeneratorError, SinkError};
use crate::ledger::Ledger;
use crate::resolver::Resolver;
use crate::scanner::{CandidateSite, Scanner};
use crate::semantic::Compilation;
use crate::shape::ResultGrammar;
use crate::sink::SourceSink;
use serde::Serialize;

/// A site whose generation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFault {
    pub site: String,
    pub span: Span,
    #[serde(serialize_with = "display")]
    pub error: GeneratorError,
}

fn display<S: serde::Serializer>(error: &GeneratorError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of [`Generator::execute`]
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    /// Candidate sites after deduplication
    pub sites: usize,
    /// Sites whose enclosing type is unknown to the compilation
    pub dropped: usize,
    /// Artifacts handed to the sink, in emission order
    pub artifacts: Vec<Artifact>,
    pub faults: Vec<SiteFault>,
    /// Warnings from resolution and emission plus one error per fault
    pub diagnostics: DiagnosticBag,
}

impl GenerationReport {
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}

/// Runs the generation pipeline with one configuration
pub struct Generator<'a> {
    config: &'a Config,
    grammar: ResultGrammar,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            grammar: ResultGrammar::new(&config.grammar),
        }
    }

    /// Run once over `compilation`. Only sink failures abort the run.
    #[tracing::instrument(level = "info", skip_all, fields(units = compilation.units().len()))]
    pub fn execute(
        &self,
        compilation: &Compilation,
        sink: &mut dyn SourceSink,
    ) -> Result<GenerationReport, SinkError> {
        let scanner = Scanner::new(&self.config.marker);
        let resolver = Resolver::new(compilation, &self.config.marker, &self.grammar);
        let emitter = Emitter::new(self.config);
        let mut ledger = Ledger::new();

        let sites = scanner.scan_units(compilation.units());
        let mut report = GenerationReport {
            sites: sites.len(),
            ..GenerationReport::default()
        };

        for site in &sites {
            let generated = resolver
                .resolve(site, &mut report.diagnostics)
                .and_then(|model| match model {
                    Some(model) => emitter
                        .emit(&model, &mut ledger, &mut report.diagnostics)
                        .map(Some),
                    None => Ok(None),
                });

            match generated {
                Ok(Some(artifacts)) => {
                    for artifact in &artifacts {
                        sink.add_source(&artifact.name, &artifact.text)?;
                    }
                    report.artifacts.extend(artifacts);
                }
                Ok(None) => report.dropped += 1,
                Err(error) => self.record_fault(site, error, &mut report),
            }
        }

        if report.has_faults() {
            let lines: Vec<String> = report
                .faults
                .iter()
                .map(|fault| format!("{} {}: {}", generation::SITE_FAULT, fault.site, fault.error))
                .collect();
            let name = trace_artifact_name(&self.config.emit.file_prefix);
            sink.add_source(&name, &templates::trace(&lines))?;
        }

        tracing::info!(
            sites = report.sites,
            artifacts = report.artifacts.len(),
            dropped = report.dropped,
            faults = report.faults.len(),
            "generation finished"
        );
        Ok(report)
    }

    fn record_fault(&self, site: &CandidateSite, error: GeneratorError, report: &mut GenerationReport) {
        tracing::warn!(site = %site.qualified_id, %error, "site skipped");
        report.diagnostics.push(
            Diagnostic::error(generation::SITE_FAULT)
                .message(format!("could not generate error accessors for `{}`: {}", site.qualified_id, error))
                .span(site.span.clone())
                .build(),
        );
        report.faults.push(SiteFault {
            site: site.qualified_id.clone(),
            span: site.span.clone(),
            error,
        });
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
