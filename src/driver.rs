//! Missing-asset planning and the batched generation loop.
//!
//! A run is idempotent: what is missing is always recomputed from the files
//! on disk, so re-running after a partial failure only retries the gaps.

use crate::backends::GenerationBackend;
use crate::catalog::{AssetLayout, Requirement};
use crate::error::{AssetError, Result};
use crate::pacer::Pacer;
use crate::slug::checked_slug;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    pub requirement: Requirement,
    pub slug: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub total: usize,
    pub already_present: usize,
    pub missing: Vec<PlannedAsset>,
}

/// Splits `requirements` into present and missing assets.
///
/// Fails before anything is generated if a key slugs to nothing or two
/// different keys would share one file.
pub fn plan(
    requirements: &[Requirement],
    existing: &HashSet<String>,
    layout: &AssetLayout,
) -> Result<BatchPlan> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut missing = Vec::new();
    let mut already_present = 0;

    for req in requirements {
        let slug = checked_slug(&req.key)?;

        match owners.get(&slug) {
            Some(first) if *first != req.key => {
                return Err(AssetError::SlugCollision {
                    slug,
                    first: first.to_string(),
                    second: req.key.clone(),
                });
            }
            Some(_) => continue,
            None => {
                owners.insert(slug.clone(), &req.key);
            }
        }

        if existing.contains(&slug) {
            already_present += 1;
            continue;
        }

        missing.push(PlannedAsset {
            requirement: req.clone(),
            target: layout.path_for(&slug),
            slug,
        });
    }

    Ok(BatchPlan {
        total: owners.len(),
        already_present,
        missing,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub attempted: usize,
    pub generated: usize,
    pub failures: Vec<ItemFailure>,
    pub batches: usize,
    pub pauses: usize,
    /// Items before the start index that this run did not touch.
    pub skipped: usize,
}

impl GenerationReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[derive(Debug, Clone)]
pub struct BatchDriver {
    batch_size: usize,
    pause: Duration,
    start_index: usize,
}

impl BatchDriver {
    pub fn new(batch_size: usize, pause: Duration) -> Result<Self> {
        if batch_size == 0 {
            return Err(AssetError::Config(config::ConfigError::Message(
                "batch size must be greater than 0".to_string(),
            )));
        }
        Ok(Self {
            batch_size,
            pause,
            start_index: 0,
        })
    }

    /// Starts at the batch containing `index` (0-based into the missing list).
    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    pub fn batch_count(&self, missing: usize) -> usize {
        missing.div_ceil(self.batch_size)
    }

    pub fn run(
        &self,
        plan: &BatchPlan,
        backend: &dyn GenerationBackend,
        pacer: &mut dyn Pacer,
    ) -> GenerationReport {
        let missing = &plan.missing;
        let total = missing.len();
        let first_batch = self.start_index / self.batch_size;
        let batches: Vec<&[PlannedAsset]> = missing.chunks(self.batch_size).collect();
        let last_batch = batches.len();

        let mut report = GenerationReport {
            skipped: (first_batch * self.batch_size).min(total),
            ..GenerationReport::default()
        };

        for (batch_idx, batch) in batches.iter().enumerate().skip(first_batch) {
            let offset = batch_idx * self.batch_size;
            println!("\nBatch {}/{}", batch_idx + 1, last_batch);
            println!("Items {} to {}", offset + 1, offset + batch.len());
            report.batches += 1;

            for (i, asset) in batch.iter().enumerate() {
                let position = offset + i + 1;
                println!(
                    "   [{}/{}] Generating: {}",
                    position, total, asset.requirement.key
                );
                report.attempted += 1;

                match backend.generate(&asset.requirement.text, &asset.target) {
                    Ok(()) => {
                        println!("      Saved: {}", asset.target.display());
                        report.generated += 1;
                    }
                    Err(e) => {
                        println!("      Failed: {}", e);
                        tracing::warn!(
                            backend = backend.id(),
                            "generation failed for '{}': {}",
                            asset.requirement.key,
                            e
                        );
                        report.failures.push(ItemFailure {
                            key: asset.requirement.key.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            if batch_idx + 1 < last_batch {
                if !self.pause.is_zero() {
                    println!("\nWaiting {:?} before next batch...", self.pause);
                }
                pacer.pause(self.pause);
                report.pauses += 1;
            }
        }

        report
    }
}
