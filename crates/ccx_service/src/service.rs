//! The service: request handlers running on one worker thread.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ccx_cache::{CacheStats, TuCaches};
use ccx_common::Location;
use ccx_config::CcxConfig;
use ccx_engine::{AnalysisEngine, CompleteOptions, TranslationUnit, UnsavedFile};
use ccx_format::{format, BuiltinMatcher, CompletionItem};
use ccx_pipeline::{GenerationCounter, Pipeline, RequestTicket, TaskError, TaskOutcome};
use tracing::{debug, info, warn};

use crate::args::{compiler_args, CompilerArgs};
use crate::context::BufferContext;
use crate::error::ServiceError;
use crate::host::Host;

const WORKER_NAME: &str = "ccx-worker";

/// Completion and go-to-definition for one editor session.
///
/// Every engine call runs on a single worker thread in request order. The
/// completion and navigation caches live on that thread and are never
/// touched from the editor's side.
pub struct SourceService<E: AnalysisEngine> {
    pipeline: Pipeline<TuCaches<E>>,
    completions: GenerationCounter,
    host: Arc<dyn Host>,
    config: Arc<CcxConfig>,
}

impl<E> SourceService<E>
where
    E: AnalysisEngine + 'static,
    E::Unit: 'static,
{
    /// Starts the worker and opens two engine handles on it with
    /// `make_engine`, one per cache. A factory error fails the start.
    pub fn start<F, X>(
        config: CcxConfig,
        host: Arc<dyn Host>,
        mut make_engine: F,
    ) -> Result<Self, ServiceError>
    where
        F: FnMut() -> Result<E, X> + Send + 'static,
        X: fmt::Display,
    {
        let warm_reparse = config.completion.warm_reparse;
        let pipeline = Pipeline::spawn(WORKER_NAME, move || {
            let completion = make_engine()?;
            let navigation = make_engine()?;
            Ok::<_, X>(
                TuCaches::new(completion, navigation).with_warm_reparse(warm_reparse),
            )
        })?;
        info!("service started");
        Ok(Self {
            pipeline,
            completions: GenerationCounter::new(),
            host,
            config: Arc::new(config),
        })
    }

    /// Queues a completion request for the buffer `lines`.
    ///
    /// The result list is delivered through [`Host::complete`]. Issuing a
    /// newer request supersedes this one: a superseded request delivers
    /// nothing, even if it was already running. A request that fails while
    /// still current delivers an empty list.
    pub fn on_complete(&self, ctx: BufferContext, lines: &[String]) -> Result<u64, ServiceError> {
        ctx.validate()?;
        let ticket = self.completions.issue();
        let source = lines.join("\n");
        let host = Arc::clone(&self.host);
        let config = Arc::clone(&self.config);

        let seq = self.pipeline.submit("on_complete", move |caches| {
            match build_completions(caches, &config, &ctx, &source, &ticket) {
                Ok(_) if !ticket.is_current() => TaskOutcome::Cancelled,
                Ok(items) => {
                    debug!(
                        "delivering {} items for generation {}",
                        items.len(),
                        ticket.generation()
                    );
                    host.complete(&ctx, ctx.start_column, items);
                    TaskOutcome::Completed
                }
                Err(TaskError::Cancelled) => TaskOutcome::Cancelled,
                Err(TaskError::Failed(reason)) => {
                    if ticket.is_current() {
                        host.complete(&ctx, ctx.start_column, Vec::new());
                    }
                    TaskOutcome::Failed(reason)
                }
            }
        })?;
        Ok(seq)
    }

    /// Queues a parse of the buffer into the completion cache.
    pub fn cache_add(&self, ctx: BufferContext, lines: &[String]) -> Result<u64, ServiceError> {
        ctx.validate()?;
        let source = lines.join("\n");
        let config = Arc::clone(&self.config);

        let seq = self.pipeline.submit("cache_add", move |caches| {
            let args = compiler_args(&ctx.filepath, &ctx.cwd, ctx.language(), &config.flags);
            match caches.completion.get_or_refresh(
                &ctx.filepath,
                &args.fingerprint(),
                ctx.changedtick,
                &source,
            ) {
                Ok(_) => TaskOutcome::Completed,
                Err(e) => TaskOutcome::Failed(e.to_string()),
            }
        })?;
        Ok(seq)
    }

    /// Queues removal of `filepath` from both caches.
    pub fn cache_del(&self, filepath: PathBuf) -> Result<u64, ServiceError> {
        let seq = self.pipeline.submit("cache_del", move |caches| {
            if caches.remove_file(&filepath) {
                debug!("dropped units for {}", filepath.display());
            }
            TaskOutcome::Completed
        })?;
        Ok(seq)
    }

    /// Looks up the definition of the symbol under the cursor.
    ///
    /// Runs after every queued request. Engine failures are reported to the
    /// user through [`Host::show_message`], together with the unit's error
    /// diagnostics, and yield `Ok(None)`.
    pub fn find_declaration(
        &self,
        ctx: BufferContext,
        lines: &[String],
    ) -> Result<Option<Location>, ServiceError> {
        ctx.validate()?;
        let source = lines.join("\n");
        let config = Arc::clone(&self.config);

        let lookup = self
            .pipeline
            .call("find_declaration", move |caches| {
                lookup_declaration(caches, &config, &ctx, &source)
            })?;

        match lookup {
            Ok(location) => Ok(location),
            Err(failure) => {
                warn!("find_declaration failed: {}", failure.reason);
                self.host.show_message(&failure.message());
                Ok(None)
            }
        }
    }

    /// Returns the arguments and run directory `ctx`'s file is parsed with.
    ///
    /// Runs after every queued request.
    pub fn args_dir(&self, ctx: BufferContext) -> Result<CompilerArgs, ServiceError> {
        let config = Arc::clone(&self.config);
        let args = self.pipeline.call("args_dir", move |_| {
            compiler_args(&ctx.filepath, &ctx.cwd, ctx.language(), &config.flags)
        })?;
        Ok(args)
    }

    /// Returns the completion and navigation cache counters.
    pub fn stats(&self) -> Result<(CacheStats, CacheStats), ServiceError> {
        let stats = self.pipeline.call("stats", |caches| {
            (caches.completion.stats(), caches.navigation.stats())
        })?;
        Ok(stats)
    }

    /// Blocks until every request queued so far has finished.
    pub fn barrier(&self) -> Result<(), ServiceError> {
        self.pipeline.barrier()?;
        Ok(())
    }

    /// Returns the configuration the service was started with.
    pub fn config(&self) -> &CcxConfig {
        &self.config
    }

    /// Finishes queued requests, releases every unit and stops the worker.
    pub fn shutdown(self) {
        self.pipeline.shutdown();
        info!("service stopped");
    }
}

fn build_completions<E: AnalysisEngine>(
    caches: &mut TuCaches<E>,
    config: &CcxConfig,
    ctx: &BufferContext,
    source: &str,
    ticket: &RequestTicket,
) -> Result<Vec<CompletionItem>, TaskError> {
    ticket.checkpoint()?;

    let path = ctx.completion_path();
    let args = compiler_args(&ctx.filepath, &ctx.cwd, ctx.language(), &config.flags);
    ticket.checkpoint()?;

    let unit = caches
        .completion
        .get_or_refresh(&path, &args.fingerprint(), ctx.changedtick, source)
        .map_err(TaskError::failed)?;
    ticket.checkpoint()?;

    let unsaved = [UnsavedFile::new(&path, source)];
    let results = unit
        .code_complete(
            &path,
            ctx.line,
            ctx.byte_column,
            &unsaved,
            CompleteOptions::standard(),
        )
        .map_err(TaskError::failed)?;

    let matcher = BuiltinMatcher::new(ctx.matcher.unwrap_or(config.completion.matcher));
    let mut items = Vec::with_capacity(results.len());
    for result in &results {
        ticket.checkpoint()?;
        if let Ok(item) = format(result, &ctx.base, &matcher) {
            items.push(item);
        }
    }
    Ok(items)
}

struct LookupFailure {
    reason: String,
    diagnostics: Vec<String>,
}

impl LookupFailure {
    fn message(&self) -> String {
        let mut message = format!("find_declaration failed: {}", self.reason);
        for diagnostic in &self.diagnostics {
            message.push('\n');
            message.push_str(diagnostic);
        }
        message
    }
}

fn lookup_declaration<E: AnalysisEngine>(
    caches: &mut TuCaches<E>,
    config: &CcxConfig,
    ctx: &BufferContext,
    source: &str,
) -> Result<Option<Location>, LookupFailure> {
    let args = compiler_args(&ctx.filepath, &ctx.cwd, ctx.language(), &config.flags);
    let unit = caches
        .navigation
        .get_or_refresh(&ctx.filepath, &args.fingerprint(), ctx.changedtick, source)
        .map_err(|e| LookupFailure {
            reason: e.to_string(),
            diagnostics: Vec::new(),
        })?;

    match unit.cursor_targets(&ctx.filepath, ctx.line, ctx.byte_column) {
        Ok(targets) => Ok(targets.best_location()),
        Err(e) => Err(LookupFailure {
            reason: e.to_string(),
            diagnostics: unit
                .diagnostics()
                .into_iter()
                .filter(|d| d.severity.is_error())
                .map(|d| d.to_string())
                .collect(),
        }),
    }
}
