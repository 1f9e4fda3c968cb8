//! # Bindgen pipeline
//!
//! ```text
//! HeaderDecls → IrBuilder → analyze (TypeMapper) → CodeGenerator → Artifacts
//! ```
//!
//! Every stage runs once per header. Nothing is written to disk until both
//! artifacts exist in memory.

use std::path::{Path, PathBuf};

use crate::config::BindgenConfig;
use crate::error::{Error, Result};
use crate::input::HeaderDecls;
use crate::ir::{IRContext, IrBuilder, SkipStage, SkippedFunction};
use crate::lean::{Binding, CodeGenerator, Support, TypeMapper};

/// File name of the C glue artifact
pub const C_GLUE_FILE: &str = "ffi.c";

/// Outcome counts and warnings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Functions that got bindings
    pub generated: usize,
    /// Function declarations in the input
    pub total: usize,
    /// Functions left out, lowering drops first, then mapping drops
    pub skipped: Vec<SkippedFunction>,
}

impl GenerationReport {
    /// `N/M generated`
    pub fn summary(&self) -> String {
        format!("{}/{} generated", self.generated, self.total)
    }

    /// One warning line per skipped function
    pub fn warnings(&self) -> Vec<String> {
        self.skipped.iter().map(ToString::to_string).collect()
    }
}

/// The two generated files, in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Lean file name, `{module_name}.lean`
    pub lean_file: String,
    /// Lean `@[extern]` declarations
    pub lean: String,
    /// C adapters
    pub c_glue: String,
}

/// Paths of written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// Lean bindings
    pub lean_path: PathBuf,
    /// C glue
    pub c_path: PathBuf,
}

impl Artifacts {
    /// Write both files into `dir`, creating it if needed
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<WrittenArtifacts> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let lean_path = dir.join(&self.lean_file);
        std::fs::write(&lean_path, &self.lean).map_err(|e| Error::io(&lean_path, e))?;
        tracing::info!("Lean bindings → {}", lean_path.display());

        let c_path = dir.join(C_GLUE_FILE);
        std::fs::write(&c_path, &self.c_glue).map_err(|e| Error::io(&c_path, e))?;
        tracing::info!("C glue code → {}", c_path.display());

        Ok(WrittenArtifacts { lean_path, c_path })
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct BindgenOutput {
    /// Generated files
    pub artifacts: Artifacts,
    /// Counts and warnings
    pub report: GenerationReport,
    /// Emitted bindings in order
    pub bindings: Vec<Binding>,
    /// The finished IR
    pub ctx: IRContext,
}

/// Decide support for every lowered function and mark the supported ones.
///
/// Returns the functions the mapper refused, in IR order.
pub fn analyze(ctx: &mut IRContext) -> Result<Vec<SkippedFunction>> {
    let mut supported = Vec::new();
    let mut skipped = Vec::new();
    {
        let mut mapper = TypeMapper::new(ctx);
        for func in ctx.all_functions() {
            match mapper.map_function(func)? {
                Support::Supported(_) => supported.push(func.id),
                Support::Rejected { at, reason } => skipped.push(SkippedFunction {
                    name: func.c_name.clone(),
                    stage: SkipStage::Mapping,
                    at,
                    reason,
                }),
            }
        }
    }

    for id in supported {
        ctx.mark_function_supported(id)?;
    }
    Ok(skipped)
}

/// Main bindgen driver
#[derive(Debug, Clone)]
pub struct Bindgen {
    config: BindgenConfig,
}

impl Bindgen {
    /// Create a driver; the configuration is validated first
    pub fn new(config: BindgenConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &BindgenConfig {
        &self.config
    }

    /// Build, analyze, and generate for one header
    pub fn run(&self, decls: &HeaderDecls) -> Result<BindgenOutput> {
        let built = IrBuilder::new(self.config.clone()).build(decls)?;
        let mut ctx = built.ctx;
        let mut skipped = built.skipped;
        skipped.extend(analyze(&mut ctx)?);

        for skip in &skipped {
            tracing::warn!("{}", skip);
        }

        let report = GenerationReport {
            generated: ctx.get_supported_functions().len(),
            total: built.total_functions,
            skipped,
        };
        tracing::info!("{}", report.summary());

        if report.generated == 0 {
            return Err(Error::NothingToGenerate {
                total: report.total,
            });
        }

        let generator = {
            let mut mapper = TypeMapper::new(&ctx);
            CodeGenerator::new(&ctx, &mut mapper)?
        };
        let artifacts = Artifacts {
            lean_file: format!("{}.lean", self.config.module_name),
            lean: generator.generate_lean(),
            c_glue: generator.generate_c_glue(),
        };

        Ok(BindgenOutput {
            artifacts,
            report,
            bindings: generator.bindings().to_vec(),
            ctx,
        })
    }

    /// Read a JSON declaration list, generate, and write both artifacts
    pub fn generate_to_dir(
        &self,
        input: impl AsRef<Path>,
        out_dir: impl AsRef<Path>,
    ) -> Result<(BindgenOutput, WrittenArtifacts)> {
        let decls = HeaderDecls::from_path(input)?;
        let output = self.run(&decls)?;
        let written = output.artifacts.write_to(out_dir)?;
        Ok((output, written))
    }
}
