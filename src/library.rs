//! Library generation pipelines.
//!
//! Each pipeline builds the template variables for one library and hands
//! them to the [`Renderer`]:
//!
//! | Template         | Variables                                  |
//! |------------------|--------------------------------------------|
//! | `resistors.lia`  | `resistor_values`, `resistor_packages`     |
//! | `capacitors.lia` | `capas` (list of [`CapacitorRecord`])      |

use std::path::PathBuf;

use serde::Serialize;

use crate::capacitor::{import_capacitor_csv, CapacitorRecord};
use crate::config::Config;
use crate::error::GenResult;
use crate::render::Renderer;
use crate::series::resistor_labels;

/// Template variables for the resistor library.
#[derive(Debug, Clone, Serialize)]
pub struct ResistorLibrary {
    /// Engineering labels, decade-major.
    pub resistor_values: Vec<String>,
    /// Package labels.
    pub resistor_packages: Vec<String>,
}

impl ResistorLibrary {
    /// Builds the E96 value table for `decades` decades.
    ///
    /// # Errors
    ///
    /// Fails if a value cannot be labelled.
    pub fn new(decades: u32, packages: &[String]) -> GenResult<Self> {
        Ok(Self {
            resistor_values: resistor_labels(decades)?,
            resistor_packages: packages.to_vec(),
        })
    }
}

/// Template variables for the capacitor library.
#[derive(Debug, Clone, Serialize)]
pub struct CapacitorLibrary {
    /// Parsed catalog entries in file order.
    pub capas: Vec<CapacitorRecord>,
}

/// Runs the generation pipelines for one configuration.
#[derive(Debug)]
pub struct LibraryGenerator {
    config: Config,
    renderer: Renderer,
}

impl LibraryGenerator {
    /// Discovers templates and prepares the renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the template directory cannot be loaded.
    pub fn new(config: Config) -> GenResult<Self> {
        let renderer = Renderer::discover(&config.template_dir, config.output_dir.clone())?
            .with_globals(&config.globals);
        Ok(Self { config, renderer })
    }

    /// The renderer in use.
    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Generates the E96 resistor library.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn create_resistor_library(&self) -> GenResult<PathBuf> {
        let settings = &self.config.resistors;
        let library = ResistorLibrary::new(settings.decades, &settings.packages)?;

        tracing::info!(
            values = library.resistor_values.len(),
            packages = library.resistor_packages.len(),
            "Generating resistor library"
        );

        self.renderer.render(&settings.template, &library)
    }

    /// Generates the capacitor library from the supplier CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be read or has a bad header, or if
    /// rendering or writing fails.
    pub fn create_capacitor_library(&self) -> GenResult<PathBuf> {
        let settings = &self.config.capacitors;
        let library = CapacitorLibrary {
            capas: import_capacitor_csv(&settings.csv_path, &settings.filter())?,
        };

        tracing::info!(
            capacitors = library.capas.len(),
            csv = %settings.csv_path.display(),
            "Generating capacitor library"
        );

        self.renderer.render(&settings.template, &library)
    }

    /// Runs the resistor then the capacitor pipeline.
    ///
    /// Stops at the first error; a library already written stays on disk.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error.
    pub fn run(&self) -> GenResult<Vec<PathBuf>> {
        let resistors = self.create_resistor_library()?;
        let capacitors = self.create_capacitor_library()?;
        Ok(vec![resistors, capacitors])
    }
}
