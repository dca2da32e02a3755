// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::environment::Environment;
use crate::errors::{CompileError, ResolveError};
use crate::program::Program;
use crate::stringify::stringify;
use crate::value::Value;
use crate::Rc;

use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "cache")]
use dashmap::DashMap;
use log::{debug, trace};

/// Query text mapped to its resolved label value.
pub type ResolutionResult = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Keep compiled programs keyed by their exact query text.
    pub cache: bool,

    /// Once this many programs are cached, further programs are compiled and
    /// used but not retained.
    pub max_cached_programs: Option<usize>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache: true,
            max_cached_programs: None,
        }
    }
}

/// Resolves queries against objects, falling back to the query text on failure.
///
/// Clones share the compiled-program cache.
#[derive(Clone)]
pub struct Resolver {
    options: ResolverOptions,
    #[cfg(feature = "cache")]
    programs: Rc<DashMap<Rc<str>, Rc<Program>>>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .field("cached_programs", &self.cached_programs())
            .finish()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    pub fn without_cache() -> Self {
        Self::with_options(ResolverOptions {
            cache: false,
            max_cached_programs: None,
        })
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            options,
            #[cfg(feature = "cache")]
            programs: Rc::new(DashMap::new()),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Compile `query`, reusing a cached program when one exists.
    ///
    /// Two callers racing on the same uncached query may both compile it;
    /// one of the results is kept.
    pub fn compile(&self, query: &str) -> Result<Rc<Program>, CompileError> {
        #[cfg(feature = "cache")]
        if self.options.cache {
            if let Some(program) = self.programs.get(query) {
                trace!("cache hit for `{query}`");
                return Ok(program.value().clone());
            }
            trace!("cache miss for `{query}`");
        }

        let program = Rc::new(Program::compile(query)?);

        #[cfg(feature = "cache")]
        if self.options.cache {
            let full = self
                .options
                .max_cached_programs
                .is_some_and(|max| self.programs.len() >= max);
            if full {
                trace!("cache full; not retaining `{query}`");
            } else {
                self.programs.insert(query.into(), program.clone());
            }
        }

        Ok(program)
    }

    /// Resolve one query, reporting why it failed instead of falling back.
    pub fn try_resolve(&self, query: &str, object: &Value) -> Result<String, ResolveError> {
        let program = self.compile(query)?;
        let value = program.eval(object)?;
        stringify(&value)
    }

    /// As [`Resolver::try_resolve`], against an object already bound in `env`.
    pub fn try_resolve_in(&self, query: &str, env: &Environment) -> Result<String, ResolveError> {
        let program = self.compile(query)?;
        let value = program.eval_in(env)?;
        stringify(&value)
    }

    /// Label value for `query`, or the query text itself if it cannot be resolved.
    pub fn resolve_value(&self, query: &str, object: &Value) -> String {
        fallback(query, self.try_resolve(query, object))
    }

    pub fn resolve(&self, query: &str, object: &Value) -> ResolutionResult {
        let mut result = ResolutionResult::new();
        result.insert(query.to_string(), self.resolve_value(query, object));
        result
    }

    /// Resolve each query independently. A repeated query yields one entry.
    ///
    /// The object is converted for the engine once and shared by all queries.
    pub fn resolve_all<I, S>(&self, queries: I, object: &Value) -> ResolutionResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let env = Environment::new(object);
        queries
            .into_iter()
            .map(|q| {
                let q = q.as_ref();
                (q.to_string(), fallback(q, self.try_resolve_in(q, &env)))
            })
            .collect()
    }

    pub fn cached_programs(&self) -> usize {
        #[cfg(feature = "cache")]
        let count = self.programs.len();
        #[cfg(not(feature = "cache"))]
        let count = 0;
        count
    }

    pub fn clear_cache(&self) {
        #[cfg(feature = "cache")]
        self.programs.clear();
    }
}

fn fallback(query: &str, resolved: Result<String, ResolveError>) -> String {
    match resolved {
        Ok(s) => s,
        Err(e) => {
            debug!("`{query}` fell back to query text at {} stage: {e}", e.stage());
            query.to_string()
        }
    }
}
