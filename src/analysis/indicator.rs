use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::analysis::{average, fit};
use crate::config::IndicatorConfig;
use crate::models::{DataSource, MergedTimeline, SourceMeta};

/// One computed indicator sample. Channels are named optional slots
/// instead of packed value-array positions, so enabling smoothing or fit
/// never shifts another channel's location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSample {
    pub time: i64,
    pub average: f64,
    pub smoothed: Option<f64>,
    pub fit: Option<f64>,
    pub valid: bool,
}

impl IndicatorSample {
    /// Final drawable value: fit wins over smoothed wins over the raw average.
    #[inline]
    pub fn result(&self) -> f64 {
        self.fit.or(self.smoothed).unwrap_or(self.average)
    }
}

/// Derived data source computing moving averages (with optional smoothing
/// and horizontal fit) over exactly one required upstream source.
///
/// Samples live in arena-style storage aligned one-to-one with the merged
/// global timeline; a `None` slot means the required source has no sample
/// at that global step.
pub struct IndicatorSource {
    meta: SourceMeta,
    config: IndicatorConfig,
    required: Option<Box<dyn DataSource>>,
    times: Vec<i64>,
    samples: Vec<Option<IndicatorSample>>,
}

impl IndicatorSource {
    pub fn new(meta: SourceMeta, config: IndicatorConfig) -> Self {
        Self {
            meta,
            config,
            required: None,
            times: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Wires the single required source. Setting it twice is a
    /// configuration error.
    pub fn set_required(&mut self, source: Box<dyn DataSource>) -> Result<()> {
        if self.required.is_some() {
            bail!(
                "indicator '{}' already has a required source",
                self.meta.id
            );
        }
        if source.meta().period != self.meta.period {
            bail!(
                "indicator '{}' period {} does not match required source period {}",
                self.meta.id,
                self.meta.period,
                source.meta().period
            );
        }
        self.required = Some(source);
        Ok(())
    }

    pub fn required(&self) -> Option<&dyn DataSource> {
        self.required.as_deref()
    }

    pub fn sample_at(&self, global: usize) -> Option<&IndicatorSample> {
        self.samples.get(global)?.as_ref()
    }

    /// Recomputes all samples against the merged timeline. `slot` is the
    /// required source's position among the merged sources.
    ///
    /// Global indexes whose mapping is absent produce no sample (skip,
    /// don't fail). When fit is enabled, positions the shift cannot fill
    /// keep their other channels but are marked invalid so the draw phase
    /// ignores them.
    pub fn calculate(&mut self, timeline: &MergedTimeline, slot: usize) -> Result<()> {
        self.config.validate()?;
        let required = self
            .required
            .as_deref()
            .ok_or_else(|| anyhow!("indicator '{}' has no required source", self.meta.id))?;

        crate::trace_time!(&format!("indicator calc [{}]", self.meta.id), 2000, {
            // Project the configured price field once per local index.
            let mut projected = Vec::with_capacity(required.len());
            for local in 0..required.len() {
                let values = required.values_at(local)?;
                let value = self.config.field.project(&values).ok_or_else(|| {
                    anyhow!(
                        "required source '{}' has no projectable channel at index {}",
                        required.meta().id,
                        local
                    )
                })?;
                projected.push(value);
            }

            let averages = average::series(self.config.kind, &projected, self.config.periods);

            let smoothed = (self.config.smooth_periods > 0).then(|| {
                average::series(self.config.kind, &averages, self.config.smooth_periods)
            });

            // The fit aligns whatever the later passes produced so far.
            let fit_base = smoothed.as_deref().unwrap_or(&averages);
            let shift = self.config.fit.then(|| fit::best_shift(&projected, fit_base));

            // Arena pass: one slot per global index, written exactly once.
            self.times = timeline.times().to_vec();
            self.samples = vec![None; timeline.len()];
            for global in 0..timeline.len() {
                let Some(local) = timeline.local_index(slot, global) else {
                    continue;
                };
                if local >= averages.len() {
                    continue; // no data for this column
                }

                let (fit_value, valid) = match shift {
                    None => (None, true),
                    Some(s) => {
                        let j = local as i64 + s;
                        if j >= 0 && (j as usize) < fit_base.len() {
                            (Some(fit_base[j as usize]), true)
                        } else {
                            (None, false) // no data to shift in
                        }
                    }
                };

                self.samples[global] = Some(IndicatorSample {
                    time: self.times[global],
                    average: averages[local],
                    smoothed: smoothed.as_ref().map(|s| s[local]),
                    fit: fit_value,
                    valid,
                });
            }
        });

        log::debug!(
            "indicator '{}' ({}) computed {} samples over {} global steps",
            self.meta.id,
            self.config,
            self.samples.iter().filter(|s| s.is_some()).count(),
            self.samples.len()
        );
        Ok(())
    }
}

impl DataSource for IndicatorSource {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn time_at(&self, index: usize) -> Result<i64> {
        self.times.get(index).copied().ok_or_else(|| {
            anyhow!(
                "index {} out of range for indicator '{}' (len {})",
                index,
                self.meta.id,
                self.times.len()
            )
        })
    }

    fn values_at(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.samples.len() {
            bail!(
                "index {} out of range for indicator '{}' (len {})",
                index,
                self.meta.id,
                self.samples.len()
            );
        }
        Ok(match &self.samples[index] {
            Some(sample) => vec![sample.result()],
            None => Vec::new(), // column exists but carries no sample
        })
    }

    fn is_valid_at(&self, index: usize) -> bool {
        self.samples
            .get(index)
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.valid)
    }
}
